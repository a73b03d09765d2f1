/// Model transforms, spin animation and rotation state
use nalgebra::{Matrix4, Vector3};

/// Spin applied per frame tick (radians)
pub const SPIN_PER_TICK: f32 = 0.01;

/// Rotation state around three axes (in radians)
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RotationState {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl RotationState {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Rotate by delta amounts (in radians)
    pub fn rotate(&mut self, dx: f32, dy: f32, dz: f32) {
        self.x += dx;
        self.y += dy;
        self.z += dz;
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Create a rotation matrix from a rotation state (applied Z, Y, X)
    pub fn rotation_matrix(rotation: &RotationState) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(rotation.x, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, rotation.y, 0.0));
        let rz = Matrix4::new_rotation(Vector3::new(0.0, 0.0, rotation.z));

        rz * ry * rx
    }

    /// Spin angle for a given frame tick
    pub fn spin_angle(tick: u64) -> f32 {
        SPIN_PER_TICK * tick as f32
    }

    /// Model matrix: translate, then spin about +Y, then scale
    pub fn model_matrix(
        position: &Vector3<f32>,
        spin: f32,
        scale: &Vector3<f32>,
    ) -> Matrix4<f32> {
        Matrix4::new_translation(position)
            * Matrix4::new_rotation(Vector3::y() * spin)
            * Matrix4::new_nonuniform_scaling(scale)
    }

    /// Inverse-transpose of the model matrix, for transforming normals.
    ///
    /// Falls back to identity when the model is singular (zero scale).
    pub fn normal_matrix(model: &Matrix4<f32>) -> Matrix4<f32> {
        model
            .try_inverse()
            .map(|inverse| inverse.transpose())
            .unwrap_or_else(Matrix4::identity)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f32>,
        view: &Matrix4<f32>,
        projection: &Matrix4<f32>,
    ) -> Matrix4<f32> {
        projection * view * model
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::Point3;

    #[test]
    fn test_rotation_state() {
        let mut state = RotationState::default();
        assert_eq!(state, RotationState::new(0.0, 0.0, 0.0));

        state.rotate(0.1, 0.2, 0.3);
        assert!((state.x - 0.1).abs() < 1e-6);
        assert!((state.y - 0.2).abs() < 1e-6);
        assert!((state.z - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_identity_rotation() {
        let matrix = Transform::rotation_matrix(&RotationState::default());
        assert!((matrix - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_spin_angle() {
        assert_eq!(Transform::spin_angle(0), 0.0);
        assert!((Transform::spin_angle(100) - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_model_matrix_order() {
        let model = Transform::model_matrix(
            &Vector3::new(0.0, 0.0, 2.0),
            std::f32::consts::FRAC_PI_2,
            &Vector3::new(2.0, 2.0, 2.0),
        );
        // (1, 0, 0) scaled to (2, 0, 0), spun a quarter turn about +Y to
        // (0, 0, -2), then translated by +2 along Z
        let p = model.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 0.0, 0.0)).norm() < 1e-5);
    }

    #[test]
    fn test_normal_matrix_of_rotation_is_rotation() {
        let model = Transform::model_matrix(&Vector3::zeros(), 0.7, &Vector3::repeat(1.0));
        let normal = Transform::normal_matrix(&model);
        assert!((normal - model).norm() < 1e-5);
    }

    #[test]
    fn test_normal_matrix_of_singular_model() {
        let model = Transform::model_matrix(&Vector3::zeros(), 0.0, &Vector3::zeros());
        assert_eq!(Transform::normal_matrix(&model), Matrix4::identity());
    }
}
