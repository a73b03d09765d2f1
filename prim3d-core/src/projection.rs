/// Camera and projection utilities
use nalgebra::{Matrix4, Point3, Vector3};

/// Perspective look-at camera
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub eye: Point3<f32>,
    pub target: Point3<f32>,
    pub up: Vector3<f32>,
    /// Vertical field of view (radians)
    pub fov: f32,
    pub near: f32,
    pub far: f32,
}

impl Camera {
    pub fn look_at(eye: Point3<f32>, target: Point3<f32>) -> Self {
        Self {
            eye,
            target,
            up: Vector3::y(),
            fov: std::f32::consts::PI / 4.0, // 45 degrees
            near: 0.1,
            far: 100.0,
        }
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f32> {
        Matrix4::look_at_rh(&self.eye, &self.target, &self.up)
    }

    /// Create the projection matrix for a viewport of the given aspect ratio.
    ///
    /// An empty viewport (zero or non-finite aspect) falls back to a square
    /// projection, since nothing is visible in it anyway.
    pub fn projection_matrix(&self, aspect: f32) -> Matrix4<f32> {
        let aspect = if aspect.is_finite() && aspect > f32::EPSILON {
            aspect
        } else {
            1.0
        };
        Matrix4::new_perspective(aspect, self.fov, self.near, self.far)
    }

    /// Project a model-space point to screen space.
    ///
    /// Returns `(x, y, depth)` with `x`/`y` in pixels (origin top-left) and
    /// depth in NDC, or `None` when the point is behind the camera or
    /// outside the near/far range. Points off the sides of the screen are
    /// still returned so triangles straddling the edge can be clipped by
    /// the rasterizer.
    pub fn project_to_screen(
        &self,
        point: &Point3<f32>,
        model_matrix: &Matrix4<f32>,
        width: u32,
        height: u32,
    ) -> Option<(f32, f32, f32)> {
        let aspect = width as f32 / height.max(1) as f32;
        let mvp = self.projection_matrix(aspect) * self.view_matrix() * model_matrix;
        project_clip(&mvp, point, width, height)
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::look_at(Point3::new(0.0, 3.0, 10.0), Point3::origin())
    }
}

/// Project a point through a precomputed model-view-projection matrix
pub fn project_clip(
    mvp: &Matrix4<f32>,
    point: &Point3<f32>,
    width: u32,
    height: u32,
) -> Option<(f32, f32, f32)> {
    let clip = mvp * point.to_homogeneous();

    // Behind the eye or on the eye plane
    if clip.w <= 1e-6 {
        return None;
    }

    let ndc_x = clip.x / clip.w;
    let ndc_y = clip.y / clip.w;
    let ndc_z = clip.z / clip.w;

    if !(-1.0..=1.0).contains(&ndc_z) {
        return None;
    }

    let screen_x = (ndc_x + 1.0) * 0.5 * width as f32;
    let screen_y = (1.0 - ndc_y) * 0.5 * height as f32;

    Some((screen_x, screen_y, ndc_z))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_camera() {
        let camera = Camera::default();
        assert_eq!(camera.eye, Point3::new(0.0, 3.0, 10.0));
        assert_eq!(camera.target, Point3::origin());
        assert!((camera.fov - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_view_matrix_moves_eye_to_origin() {
        let camera = Camera::default();
        let eye = camera.view_matrix().transform_point(&camera.eye);
        assert!(eye.coords.norm() < 1e-5);
    }

    #[test]
    fn test_target_projects_to_center() {
        let camera = Camera::default();
        let (x, y, depth) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 800, 600)
            .unwrap();
        assert!((x - 400.0).abs() < 1e-3);
        assert!((y - 300.0).abs() < 1e-3);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_point_behind_camera_is_rejected() {
        let camera = Camera::default();
        let behind = Point3::new(0.0, 3.0, 20.0);
        assert!(camera
            .project_to_screen(&behind, &Matrix4::identity(), 800, 600)
            .is_none());
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let camera = Camera::default();
        let model = Matrix4::identity();
        let (_, low, _) = camera
            .project_to_screen(&Point3::new(0.0, 0.0, 0.0), &model, 800, 600)
            .unwrap();
        let (_, high, _) = camera
            .project_to_screen(&Point3::new(0.0, 1.0, 0.0), &model, 800, 600)
            .unwrap();
        assert!(high < low);
    }

    #[test]
    fn test_empty_viewport_projection_is_finite() {
        let camera = Camera::default();
        for aspect in [0.0, -0.0, f32::NAN, f32::INFINITY] {
            let projection = camera.projection_matrix(aspect);
            assert!(projection.iter().all(|c| c.is_finite()), "aspect {aspect}");
        }
        assert!(camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 0, 600)
            .is_some());
    }
}
