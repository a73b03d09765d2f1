/// Ambient + diffuse point-light model
use nalgebra::{Point3, Vector3, Vector4};

/// Build an RGBA color from 8-bit channels and an alpha/strength in 0..1
pub fn rgba8(r: u8, g: u8, b: u8, alpha: f32) -> Vector4<f32> {
    Vector4::new(
        r as f32 / 255.0,
        g as f32 / 255.0,
        b as f32 / 255.0,
        alpha,
    )
}

/// Lighting uniforms shared by every mesh in a scene.
///
/// The alpha channel of `ambient` and `light_color` is the strength of
/// that term.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    pub ambient: Vector4<f32>,
    pub light_color: Vector4<f32>,
    pub light_position: Point3<f32>,
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: rgba8(251, 207, 232, 0.65),
            light_color: rgba8(254, 243, 199, 0.9),
            light_position: Point3::new(5.0, 6.0, 4.0),
        }
    }
}

impl Lighting {
    /// Shade a world-space surface point.
    ///
    /// `(ambient + max(n . l, 0) * light, 1) * base`, with `l` pointing
    /// from the point towards the light.
    pub fn shade(
        &self,
        position: &Point3<f32>,
        normal: &Vector3<f32>,
        base: &Vector4<f32>,
    ) -> Vector4<f32> {
        let normal = normal.try_normalize(f32::EPSILON).unwrap_or_else(Vector3::zeros);
        let to_light = (self.light_position - *position)
            .try_normalize(f32::EPSILON)
            .unwrap_or_else(Vector3::zeros);

        let diffuse = normal.dot(&to_light).max(0.0);
        let ambient = self.ambient.xyz() * self.ambient.w;
        let light = self.light_color.xyz() * (self.light_color.w * diffuse);
        let lit = ambient + light;

        Vector4::new(lit.x, lit.y, lit.z, 1.0).component_mul(base)
    }

    /// Relative luminance (Rec. 709) of an RGB(A) color
    pub fn luminance(color: &Vector4<f32>) -> f32 {
        0.2126 * color.x + 0.7152 * color.y + 0.0722 * color.z
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white() -> Vector4<f32> {
        Vector4::repeat(1.0)
    }

    #[test]
    fn test_rgba8() {
        assert_eq!(rgba8(255, 0, 51, 0.5), Vector4::new(1.0, 0.0, 0.2, 0.5));
    }

    #[test]
    fn test_surface_facing_away_gets_ambient_only() {
        let lighting = Lighting::default();
        let point = Point3::origin();
        let away = -(lighting.light_position - point).normalize();

        let color = lighting.shade(&point, &away, &white());
        let ambient = lighting.ambient.xyz() * lighting.ambient.w;
        assert!((color.xyz() - ambient).norm() < 1e-6);
        assert_eq!(color.w, 1.0);
    }

    #[test]
    fn test_surface_facing_light_is_brightest() {
        let lighting = Lighting::default();
        let point = Point3::origin();
        let toward = (lighting.light_position - point).normalize();
        let sideways = Vector3::new(toward.y, -toward.x, 0.0);

        let lit = Lighting::luminance(&lighting.shade(&point, &toward, &white()));
        let grazing = Lighting::luminance(&lighting.shade(&point, &sideways, &white()));
        assert!(lit > grazing);
    }

    #[test]
    fn test_base_color_modulates() {
        let lighting = Lighting::default();
        let black = Vector4::new(0.0, 0.0, 0.0, 1.0);
        let color = lighting.shade(&Point3::origin(), &Vector3::y(), &black);
        assert_eq!(color, Vector4::new(0.0, 0.0, 0.0, 1.0));
    }
}
