/// Perspective projection and eye camera utilities
use nalgebra::{Matrix4, Point3};

use crate::config::ViewerConfig;
use crate::layout::ViewRect;

/// Perspective projection for one view rectangle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projection {
    pub aspect: f32,
    /// Vertical field of view, in radians
    pub fovy: f32,
    pub near: f32,
    pub far: f32,
    pub matrix: Matrix4<f32>,
}

impl Projection {
    /// Build the projection for `rect`. A zero-width rect is treated as one pixel wide.
    pub fn for_rect(rect: &ViewRect, config: &ViewerConfig) -> Self {
        let aspect = rect.width.max(1) as f32 / rect.height.max(1) as f32;
        let fovy = config.fov_radians();
        Self {
            aspect,
            fovy,
            near: config.near,
            far: config.far,
            matrix: Matrix4::new_perspective(aspect, fovy, config.near, config.far),
        }
    }
}

/// View matrix of an eye displaced `eye_offset` along X, looking at the origin
pub fn eye_view(eye_offset: f32, config: &ViewerConfig) -> Matrix4<f32> {
    Matrix4::look_at_rh(
        &eye_position(eye_offset, config),
        &Point3::origin(),
        &config.up,
    )
}

pub fn eye_position(eye_offset: f32, config: &ViewerConfig) -> Point3<f32> {
    Point3::new(eye_offset, 0.0, config.eye_distance)
}
