/// Tunable constants for the viewer
use std::time::Duration;

use nalgebra::{Point3, Vector3};

/// Phong-style material and light shared by every uploaded model
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Material {
    pub ambient: [f32; 3],
    pub diffuse: [f32; 3],
    pub specular: [f32; 3],
    pub light_position: Point3<f32>,
    pub shininess: f32,
    pub blinn_phong: bool,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            ambient: [0.2, 0.1, 0.1],
            diffuse: [0.8, 0.35, 0.2],
            specular: [1.0, 1.0, 1.0],
            light_position: Point3::new(5.0, 5.0, 10.0),
            shininess: 32.0,
            blinn_phong: true,
        }
    }
}

/// Viewer configuration. Every field has a working default.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewerConfig {
    /// Vertical field of view, in degrees
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
    /// Distance of the eye cameras from the origin along +Z
    pub eye_distance: f32,
    pub up: Vector3<f32>,
    /// Z translation applied to the viewpoint per forward/backward key
    pub dolly_step: f32,
    /// Z translation of the viewpoint at startup
    pub initial_dolly: f32,
    pub eye_separation_step: f32,
    pub initial_eye_separation: f32,
    /// Pointer pixels to orbit radians
    pub mouse_scale: f32,
    /// Delay between showing the busy indicator and running a mesh build
    pub build_delay: Duration,
    /// RGBA clear color; alpha 0 lets the page background through
    pub clear_color: [f32; 4],
    pub clear_depth: f32,
    pub material: Material,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            fov_degrees: 45.0,
            near: 0.1,
            far: 200.0,
            eye_distance: 2.0,
            up: Vector3::new(0.0, 1.0, 0.0),
            dolly_step: 2.0,
            initial_dolly: -8.0,
            eye_separation_step: 0.01,
            initial_eye_separation: 0.0,
            mouse_scale: 0.01,
            build_delay: Duration::from_millis(30),
            clear_color: [0.0, 0.0, 0.0, 0.0],
            clear_depth: 1.0,
            material: Material::default(),
        }
    }
}

impl ViewerConfig {
    pub fn fov_radians(&self) -> f32 {
        self.fov_degrees.to_radians()
    }

    pub fn with_build_delay(mut self, delay: Duration) -> Self {
        self.build_delay = delay;
        self
    }

    pub fn with_material(mut self, material: Material) -> Self {
        self.material = material;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_projection_constants() {
        let config = ViewerConfig::default();
        assert_eq!(config.fov_degrees, 45.0);
        assert_eq!(config.near, 0.1);
        assert_eq!(config.far, 200.0);
        assert!((config.fov_radians() - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
    }

    #[test]
    fn test_default_clear_is_transparent() {
        let config = ViewerConfig::default();
        assert_eq!(config.clear_color[3], 0.0);
        assert_eq!(config.clear_depth, 1.0);
    }

    #[test]
    fn test_build_delay_override() {
        let config = ViewerConfig::default().with_build_delay(Duration::from_millis(5));
        assert_eq!(config.build_delay, Duration::from_millis(5));
    }
}
