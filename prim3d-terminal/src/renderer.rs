/// ASCII rasterizer for terminal rendering
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use nalgebra::Matrix4;
use prim3d_core::{projection::project_clip, DrawParameters, Geometry, Lighting};
use std::io::Write;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// Screen-space vertex: pixel x/y, NDC depth and lit intensity
type ScreenVertex = (f32, f32, f32, f32);

/// ASCII renderer that converts lit meshes to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f32>,
    char_buffer: Vec<char>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f32::INFINITY; size],
            char_buffer: vec![' '; size],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f32::INFINITY);
        self.char_buffer.fill(' ');
    }

    /// Draw one mesh. `orbit` is applied between the model and view
    /// transforms; lighting is evaluated per vertex in world space.
    pub fn render_mesh(
        &mut self,
        geometry: &Geometry,
        params: &DrawParameters,
        orbit: &Matrix4<f32>,
    ) {
        let lighting = Lighting {
            ambient: params.ambient,
            light_color: params.light_color,
            light_position: params.light_position,
        };
        let mvp = params.mvp(orbit);

        let screen: Vec<Option<ScreenVertex>> = geometry
            .vertices()
            .iter()
            .zip(geometry.normals())
            .map(|(position, normal)| {
                let (x, y, depth) =
                    project_clip(&mvp, position, self.width as u32, self.height as u32)?;
                let world = params.model.transform_point(position);
                let world_normal = params.normal.transform_vector(normal);
                let color = lighting.shade(&world, &world_normal, &params.color);
                Some((x, y, depth, Lighting::luminance(&color)))
            })
            .collect();

        for &[a, b, c] in geometry.indices() {
            let corners = (
                screen[a as usize],
                screen[b as usize],
                screen[c as usize],
            );
            // Any corner outside the depth range clips the whole triangle
            if let (Some(v0), Some(v1), Some(v2)) = corners {
                if is_front_facing(v0, v1, v2) {
                    self.rasterize_triangle(v0, v1, v2);
                }
            }
        }
    }

    fn rasterize_triangle(&mut self, v0: ScreenVertex, v1: ScreenVertex, v2: ScreenVertex) {
        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i32;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i32;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i32;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i32;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i32 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i32 - 1);

        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f32 + 0.5;
                let py = y as f32 + 0.5;

                let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                else {
                    return;
                };
                if w0 < 0.0 || w1 < 0.0 || w2 < 0.0 {
                    continue;
                }

                let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;
                let idx = y as usize * self.width + x as usize;
                if depth < self.depth_buffer[idx] {
                    let intensity = w0 * v0.3 + w1 * v1.3 + w2 * v2.3;
                    self.depth_buffer[idx] = depth;
                    self.char_buffer[idx] = shade_char(intensity);
                }
            }
        }
    }

    /// The current frame as plain text, one line per row
    pub fn to_text(&self) -> String {
        self.char_buffer
            .chunks(self.width.max(1))
            .map(|row| row.iter().collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let c = self.char_buffer[y * self.width + x];

                // Color based on character intensity
                let color = match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                };

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            writer.queue(Print('\n'))?;
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Counter-clockwise in NDC is front-facing; screen y points down, so
/// front faces have a negative signed area here.
fn is_front_facing(v0: ScreenVertex, v1: ScreenVertex, v2: ScreenVertex) -> bool {
    let area = (v1.0 - v0.0) * (v2.1 - v0.1) - (v2.0 - v0.0) * (v1.1 - v0.1);
    area < 0.0
}

/// Covered pixels always get at least the dimmest visible character
fn shade_char(intensity: f32) -> char {
    let steps = (LUMINOSITY_RAMP.len() - 2) as f32;
    let index = 1 + (intensity.clamp(0.0, 1.0) * steps).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f32, f32),
    v1: (f32, f32),
    v2: (f32, f32),
    p: (f32, f32),
) -> Option<(f32, f32, f32)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-6 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
