/// Scene records and the per-frame draw parameter computation
use nalgebra::{Matrix4, Point3, Vector3, Vector4};
use tracing::info;

use crate::geometry::{ConeOptions, Geometry, SPHERE_HEIGHT_SEGMENTS, SPHERE_WIDTH_SEGMENTS};
use crate::lighting::{rgba8, Lighting};
use crate::projection::Camera;
use crate::transform::Transform;

/// One drawable solid: generated geometry plus its placement and color
#[derive(Debug, Clone, PartialEq)]
pub struct MeshInstance {
    pub geometry: Geometry,
    pub position: Vector3<f32>,
    pub scale: Vector3<f32>,
    pub color: Vector4<f32>,
}

impl MeshInstance {
    /// Instance at the origin, unit scale, magenta
    pub fn new(geometry: Geometry) -> Self {
        Self {
            geometry,
            position: Vector3::zeros(),
            scale: Vector3::repeat(1.0),
            color: Vector4::new(1.0, 0.0, 1.0, 1.0),
        }
    }

    pub fn with_position(mut self, x: f32, y: f32, z: f32) -> Self {
        self.position = Vector3::new(x, y, z);
        self
    }

    pub fn with_scale(mut self, x: f32, y: f32, z: f32) -> Self {
        self.scale = Vector3::new(x, y, z);
        self
    }

    pub fn with_color(mut self, color: Vector4<f32>) -> Self {
        self.color = color;
        self
    }
}

/// Everything a draw call needs for one mesh in one frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawParameters {
    pub model: Matrix4<f32>,
    /// Inverse-transpose of `model`
    pub normal: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub projection: Matrix4<f32>,
    pub color: Vector4<f32>,
    pub ambient: Vector4<f32>,
    pub light_color: Vector4<f32>,
    pub light_position: Point3<f32>,
}

impl DrawParameters {
    /// Combined model-view-projection matrix, with `orbit` rotating the
    /// world between the model and the camera (identity for none)
    pub fn mvp(&self, orbit: &Matrix4<f32>) -> Matrix4<f32> {
        Transform::mvp_matrix(&(orbit * self.model), &self.view, &self.projection)
    }
}

/// Compute the draw parameters of `instance` for frame `tick`.
///
/// Reads the instance record as it is now; callers mutate the record
/// between frames and pass it in again.
pub fn draw_parameters(
    instance: &MeshInstance,
    camera: &Camera,
    lighting: &Lighting,
    aspect: f32,
    tick: u64,
) -> DrawParameters {
    let model = Transform::model_matrix(
        &instance.position,
        Transform::spin_angle(tick),
        &instance.scale,
    );

    DrawParameters {
        model,
        normal: Transform::normal_matrix(&model),
        view: camera.view_matrix(),
        projection: camera.projection_matrix(aspect),
        color: instance.color,
        ambient: lighting.ambient,
        light_color: lighting.light_color,
        light_position: lighting.light_position,
    }
}

/// Which solids the demo scene contains
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ShapeSelection {
    #[default]
    All,
    Cube,
    Sphere,
    Cone,
}

/// Shape parameters for the demo scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneConfig {
    pub shapes: ShapeSelection,
    pub cube_size: f32,
    pub sphere_radius: f32,
    pub sphere_width_segments: u32,
    pub sphere_height_segments: u32,
    pub cone: ConeOptions,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            shapes: ShapeSelection::All,
            cube_size: 1.0,
            sphere_radius: 1.0,
            sphere_width_segments: SPHERE_WIDTH_SEGMENTS,
            sphere_height_segments: SPHERE_HEIGHT_SEGMENTS,
            cone: ConeOptions::default(),
        }
    }
}

/// Meshes, camera and lights
#[derive(Debug, Clone, PartialEq)]
pub struct Scene {
    pub meshes: Vec<MeshInstance>,
    pub camera: Camera,
    pub lighting: Lighting,
}

impl Scene {
    /// The default demo: cube, sphere and cone
    pub fn demo() -> Self {
        Self::from_config(&SceneConfig::default())
    }

    /// Build the demo scene; geometry is generated once here
    pub fn from_config(config: &SceneConfig) -> Self {
        let wants = |shape: ShapeSelection| {
            config.shapes == ShapeSelection::All || config.shapes == shape
        };
        let mut meshes = Vec::new();

        if wants(ShapeSelection::Cube) {
            meshes.push(
                MeshInstance::new(Geometry::cube(config.cube_size))
                    .with_position(0.0, 0.0, 2.0)
                    .with_color(rgba8(21, 19, 20, 1.0)),
            );
        }
        if wants(ShapeSelection::Sphere) {
            meshes.push(
                MeshInstance::new(Geometry::sphere(
                    config.sphere_radius,
                    config.sphere_width_segments,
                    config.sphere_height_segments,
                ))
                .with_color(rgba8(226, 232, 240, 1.0)),
            );
        }
        if wants(ShapeSelection::Cone) {
            meshes.push(
                MeshInstance::new(Geometry::cone(&config.cone))
                    .with_position(-2.5, 0.0, 0.0)
                    .with_color(rgba8(148, 163, 184, 1.0)),
            );
        }

        info!(meshes = meshes.len(), shapes = ?config.shapes, "scene ready");

        Self {
            meshes,
            camera: Camera::default(),
            lighting: Lighting::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_demo_scene() {
        let scene = Scene::demo();
        assert_eq!(scene.meshes.len(), 3);
        assert_eq!(scene.meshes[0].geometry.vertex_count(), 24);
        assert_eq!(scene.meshes[0].position, Vector3::new(0.0, 0.0, 2.0));
        assert_eq!(
            scene.meshes[1].geometry.vertex_count(),
            ((SPHERE_HEIGHT_SEGMENTS + 1) * (SPHERE_WIDTH_SEGMENTS + 1)) as usize
        );
    }

    #[test]
    fn test_shape_selection() {
        let scene = Scene::from_config(&SceneConfig {
            shapes: ShapeSelection::Cone,
            ..SceneConfig::default()
        });
        assert_eq!(scene.meshes.len(), 1);
        assert_eq!(scene.meshes[0].position, Vector3::new(-2.5, 0.0, 0.0));
    }

    #[test]
    fn test_mesh_instance_defaults() {
        let mesh = MeshInstance::new(Geometry::cube(1.0));
        assert_eq!(mesh.position, Vector3::zeros());
        assert_eq!(mesh.scale, Vector3::repeat(1.0));
        assert_eq!(mesh.color, Vector4::new(1.0, 0.0, 1.0, 1.0));
    }

    #[test]
    fn test_draw_parameters_track_the_record() {
        let scene = Scene::demo();
        let mut cube = scene.meshes[0].clone();

        let before = draw_parameters(&cube, &scene.camera, &scene.lighting, 1.0, 0);
        assert_eq!(before.model, Matrix4::new_translation(&Vector3::new(0.0, 0.0, 2.0)));

        cube.position = Vector3::new(1.0, 0.0, 0.0);
        cube.color = Vector4::repeat(0.5);
        let after = draw_parameters(&cube, &scene.camera, &scene.lighting, 1.0, 0);
        assert_eq!(after.model, Matrix4::new_translation(&Vector3::new(1.0, 0.0, 0.0)));
        assert_eq!(after.color, Vector4::repeat(0.5));
    }

    #[test]
    fn test_draw_parameters_spin_with_tick() {
        let scene = Scene::demo();
        let sphere = &scene.meshes[1];
        let still = draw_parameters(sphere, &scene.camera, &scene.lighting, 1.0, 0);
        let spun = draw_parameters(sphere, &scene.camera, &scene.lighting, 1.0, 157);
        assert_eq!(still.model, Matrix4::identity());
        // ~pi/2 about +Y sends +X towards -Z
        let x = spun.model.transform_vector(&Vector3::x());
        assert!(x.z < -0.99);
    }

    #[test]
    fn test_draw_parameters_are_pure() {
        let scene = Scene::demo();
        let a = draw_parameters(&scene.meshes[2], &scene.camera, &scene.lighting, 1.5, 42);
        let b = draw_parameters(&scene.meshes[2], &scene.camera, &scene.lighting, 1.5, 42);
        assert_eq!(a, b);
        assert_eq!(a.mvp(&Matrix4::identity()), a.projection * a.view * a.model);
    }

    #[test]
    fn test_orbit_sits_between_model_and_view() {
        let scene = Scene::demo();
        let params = draw_parameters(&scene.meshes[0], &scene.camera, &scene.lighting, 1.0, 0);
        let orbit = Matrix4::from_euler_angles(0.3, 0.0, 0.0);
        let expected = params.projection * params.view * orbit * params.model;
        assert!((params.mvp(&orbit) - expected).norm() < 1e-4);
    }

    #[test]
    fn test_scale_reaches_model_and_normal_matrices() {
        let scene = Scene::demo();
        let squashed = MeshInstance::new(Geometry::sphere(1.0, 8, 4)).with_scale(2.0, 0.5, 1.0);
        assert_eq!(squashed.scale, Vector3::new(2.0, 0.5, 1.0));

        let params = draw_parameters(&squashed, &scene.camera, &scene.lighting, 1.0, 0);
        assert_eq!(params.model.transform_vector(&Vector3::x()), Vector3::new(2.0, 0.0, 0.0));
        assert_eq!(params.model.transform_vector(&Vector3::y()), Vector3::new(0.0, 0.5, 0.0));
        // normals scale inversely
        let normal = params.normal.transform_vector(&Vector3::y());
        assert!((normal - Vector3::new(0.0, 2.0, 0.0)).norm() < 1e-5);
    }
}
