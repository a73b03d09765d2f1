/// Procedural geometry for the primitive solids (cube, UV sphere, cone)
use std::f32::consts::PI;

use nalgebra::{Point3, Vector3};
use tracing::{debug, warn};

/// Default longitude divisions of [`Geometry::sphere`]
pub const SPHERE_WIDTH_SEGMENTS: u32 = 32;
/// Default latitude divisions of [`Geometry::sphere`]
pub const SPHERE_HEIGHT_SEGMENTS: u32 = 16;

const MIN_SPHERE_WIDTH_SEGMENTS: u32 = 3;
const MIN_SPHERE_HEIGHT_SEGMENTS: u32 = 2;

/// Cube faces in emission order: outward normal and the four corners
/// (in units of half the edge length), listed counter-clockwise as seen
/// from outside.
const CUBE_FACES: [([f32; 3], [[f32; 3]; 4]); 6] = [
    // Front
    (
        [0.0, 0.0, 1.0],
        [[-1.0, -1.0, 1.0], [1.0, -1.0, 1.0], [1.0, 1.0, 1.0], [-1.0, 1.0, 1.0]],
    ),
    // Right
    (
        [1.0, 0.0, 0.0],
        [[1.0, -1.0, 1.0], [1.0, -1.0, -1.0], [1.0, 1.0, -1.0], [1.0, 1.0, 1.0]],
    ),
    // Back
    (
        [0.0, 0.0, -1.0],
        [[1.0, -1.0, -1.0], [-1.0, -1.0, -1.0], [-1.0, 1.0, -1.0], [1.0, 1.0, -1.0]],
    ),
    // Left
    (
        [-1.0, 0.0, 0.0],
        [[-1.0, -1.0, -1.0], [-1.0, -1.0, 1.0], [-1.0, 1.0, 1.0], [-1.0, 1.0, -1.0]],
    ),
    // Top
    (
        [0.0, 1.0, 0.0],
        [[-1.0, 1.0, 1.0], [1.0, 1.0, 1.0], [1.0, 1.0, -1.0], [-1.0, 1.0, -1.0]],
    ),
    // Bottom
    (
        [0.0, -1.0, 0.0],
        [[-1.0, -1.0, -1.0], [1.0, -1.0, -1.0], [1.0, -1.0, 1.0], [-1.0, -1.0, 1.0]],
    ),
];

/// Shape parameters for [`Geometry::cone`]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConeOptions {
    pub radius_bottom: f32,
    pub height: f32,
    pub radial_segments: u32,
    pub height_segments: u32,
    /// Start angle of the swept surface (radians)
    pub theta_start: f32,
    /// Angular extent of the swept surface (radians)
    pub theta_length: f32,
}

impl Default for ConeOptions {
    fn default() -> Self {
        Self {
            radius_bottom: 1.0,
            height: 1.0,
            radial_segments: 32,
            height_segments: 1,
            theta_start: 0.0,
            theta_length: 2.0 * PI,
        }
    }
}

/// Indexed triangle geometry: positions, index-aligned unit normals and
/// counter-clockwise triangles.
///
/// A `Geometry` is built once by one of the generators and is read-only
/// afterwards.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Geometry {
    vertices: Vec<Point3<f32>>,
    normals: Vec<Vector3<f32>>,
    indices: Vec<[u32; 3]>,
}

impl Geometry {
    fn with_capacity(vertices: usize, triangles: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertices),
            normals: Vec::with_capacity(vertices),
            indices: Vec::with_capacity(triangles),
        }
    }

    /// Append a vertex and return its index
    fn push_vertex(&mut self, position: Point3<f32>, normal: Vector3<f32>) -> u32 {
        let index = self.vertices.len() as u32;
        self.vertices.push(position);
        self.normals.push(normal);
        index
    }

    fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.push([a, b, c]);
    }

    pub fn vertices(&self) -> &[Point3<f32>] {
        &self.vertices
    }

    pub fn normals(&self) -> &[Vector3<f32>] {
        &self.normals
    }

    pub fn indices(&self) -> &[[u32; 3]] {
        &self.indices
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len()
    }

    /// Positions flattened to `[x0, y0, z0, x1, ...]` for attribute upload
    pub fn position_buffer(&self) -> Vec<f32> {
        self.vertices
            .iter()
            .flat_map(|p| [p.x, p.y, p.z])
            .collect()
    }

    /// Normals flattened to `[x0, y0, z0, x1, ...]` for attribute upload
    pub fn normal_buffer(&self) -> Vec<f32> {
        self.normals.iter().flat_map(|n| [n.x, n.y, n.z]).collect()
    }

    /// Triangle indices flattened for an element buffer
    pub fn index_buffer(&self) -> Vec<u32> {
        self.indices.iter().flatten().copied().collect()
    }

    /// Axis-aligned cube centered at the origin with flat per-face normals.
    ///
    /// Every face owns its four vertices so it can carry its own normal:
    /// 24 vertices and 12 triangles, faces ordered front, right, back,
    /// left, top, bottom. Zero or negative sizes produce degenerate or
    /// inverted geometry.
    pub fn cube(size: f32) -> Self {
        let half = size / 2.0;
        let mut geometry = Self::with_capacity(24, 12);

        for (normal, corners) in CUBE_FACES {
            let normal = Vector3::from(normal);
            let first = geometry.vertex_count() as u32;
            for [x, y, z] in corners {
                geometry.push_vertex(Point3::new(x * half, y * half, z * half), normal);
            }
            geometry.push_triangle(first, first + 1, first + 2);
            geometry.push_triangle(first + 2, first + 3, first);
        }

        debug!(
            size,
            vertices = geometry.vertex_count(),
            triangles = geometry.triangle_count(),
            "generated cube"
        );
        geometry
    }

    /// UV sphere centered at the origin with smooth radial normals.
    ///
    /// Builds a `(height_segments + 1) x (width_segments + 1)` latitude /
    /// longitude grid (the seam column is duplicated) and emits two
    /// triangles per cell. Cells touching a pole yield one zero-area
    /// triangle each; they are kept so the triangle count is always
    /// `2 * width_segments * height_segments`.
    ///
    /// # Arguments
    /// * `radius` - Sphere radius
    /// * `width_segments` - Longitude divisions (min 3)
    /// * `height_segments` - Latitude divisions (min 2)
    pub fn sphere(radius: f32, width_segments: u32, height_segments: u32) -> Self {
        let width_segments =
            clamp_segments("sphere width_segments", width_segments, MIN_SPHERE_WIDTH_SEGMENTS);
        let height_segments = clamp_segments(
            "sphere height_segments",
            height_segments,
            MIN_SPHERE_HEIGHT_SEGMENTS,
        );

        let stride = width_segments + 1;
        let mut geometry = Self::with_capacity(
            ((height_segments + 1) * stride) as usize,
            (2 * width_segments * height_segments) as usize,
        );

        for iy in 0..=height_segments {
            let v = iy as f32 / height_segments as f32;
            let (sin_theta, cos_theta) = (v * PI).sin_cos();

            for ix in 0..=width_segments {
                let u = ix as f32 / width_segments as f32;
                let (sin_phi, cos_phi) = (u * 2.0 * PI).sin_cos();

                let direction = Vector3::new(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
                let position = Point3::from(direction * radius);
                let normal = position
                    .coords
                    .try_normalize(f32::EPSILON)
                    .unwrap_or(direction);

                geometry.push_vertex(position, normal);
            }
        }

        for iy in 0..height_segments {
            for ix in 0..width_segments {
                let a = iy * stride + ix + 1;
                let b = iy * stride + ix;
                let c = (iy + 1) * stride + ix;
                let d = (iy + 1) * stride + ix + 1;

                geometry.push_triangle(a, b, d);
                geometry.push_triangle(b, c, d);
            }
        }

        debug!(
            radius,
            width_segments,
            height_segments,
            vertices = geometry.vertex_count(),
            triangles = geometry.triangle_count(),
            "generated sphere"
        );
        geometry
    }

    /// Cone standing on the XZ plane: base ring at `y = -height / 2`,
    /// apex at `y = +height / 2`, closed by a bottom cap.
    ///
    /// The torso is a `(height_segments + 1) x (radial_segments + 1)` grid
    /// whose radius shrinks linearly to zero at the apex, with slanted
    /// normals. The cap duplicates its center vertex once per segment so
    /// each cap triangle owns its center.
    pub fn cone(options: &ConeOptions) -> Self {
        let ConeOptions {
            radius_bottom,
            height,
            radial_segments,
            height_segments,
            theta_start,
            theta_length,
        } = *options;

        let half_height = height / 2.0;
        let slope = radius_bottom / height;
        let stride = radial_segments + 1;

        let torso_vertices = ((height_segments + 1) * stride) as usize;
        let cap_vertices = (radial_segments + stride) as usize;
        let mut geometry = Self::with_capacity(
            torso_vertices + cap_vertices,
            (radial_segments * (2 * height_segments + 1)) as usize,
        );

        // Torso
        for y in 0..=height_segments {
            let v = fraction(y, height_segments);
            let radius = radius_bottom * (1.0 - v);
            let py = v * height - half_height;

            for x in 0..=radial_segments {
                let u = fraction(x, radial_segments);
                let (sin_theta, cos_theta) = (theta_start + u * theta_length).sin_cos();

                geometry.push_vertex(
                    Point3::new(radius * sin_theta, py, radius * cos_theta),
                    slant_normal(sin_theta, cos_theta, slope),
                );
            }
        }

        for y in 0..height_segments {
            for x in 0..radial_segments {
                let a = y * stride + x;
                let b = a + 1;
                let c = b + stride;
                let d = a + stride;

                geometry.push_triangle(a, b, d);
                geometry.push_triangle(b, c, d);
            }
        }

        // Bottom cap
        let down = Vector3::new(0.0, -1.0, 0.0);
        let center_start = geometry.vertex_count() as u32;
        for _ in 0..radial_segments {
            geometry.push_vertex(Point3::new(0.0, -half_height, 0.0), down);
        }

        let ring_start = geometry.vertex_count() as u32;
        for x in 0..=radial_segments {
            let u = fraction(x, radial_segments);
            let (sin_theta, cos_theta) = (theta_start + u * theta_length).sin_cos();
            geometry.push_vertex(
                Point3::new(radius_bottom * sin_theta, -half_height, radius_bottom * cos_theta),
                down,
            );
        }

        for i in 0..radial_segments {
            geometry.push_triangle(ring_start + i + 1, ring_start + i, center_start + i);
        }

        debug!(
            radius_bottom,
            height,
            radial_segments,
            height_segments,
            vertices = geometry.vertex_count(),
            triangles = geometry.triangle_count(),
            "generated cone"
        );
        geometry
    }
}

/// `step / segments`, or 0 for a grid with no segments
fn fraction(step: u32, segments: u32) -> f32 {
    if segments == 0 {
        0.0
    } else {
        step as f32 / segments as f32
    }
}

/// Outward cone normal for slope `radius_bottom / height`.
///
/// A flat cone (infinite slope) faces straight along the height axis; a cone
/// with neither radius nor height gets the radial direction.
fn slant_normal(sin_theta: f32, cos_theta: f32, slope: f32) -> Vector3<f32> {
    let radial = Vector3::new(sin_theta, 0.0, cos_theta);
    if slope.is_infinite() {
        return Vector3::new(0.0, slope.signum(), 0.0);
    }
    if !slope.is_finite() {
        return radial;
    }
    Vector3::new(sin_theta, slope, cos_theta)
        .try_normalize(f32::EPSILON)
        .unwrap_or(radial)
}

fn clamp_segments(name: &str, value: u32, min: u32) -> u32 {
    if value < min {
        warn!("{name} must be >= {min}, clamping {value} to {min}");
        min
    } else {
        value
    }
}
