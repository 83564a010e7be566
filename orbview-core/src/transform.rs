/// Camera dolly, orbit offsets, and model transform composition
use nalgebra::{Matrix4, Vector3};

/// Normalized pointer offset from the canvas center, in radians of orbit
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MouseOffset {
    pub x: f32,
    pub y: f32,
}

impl MouseOffset {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    pub fn zero() -> Self {
        Self::default()
    }

    /// Offset of a pointer at `(client_x, client_y)` from the center of a
    /// `inner_width` x `inner_height` window, multiplied by `scale`
    pub fn from_pointer(
        client_x: f32,
        client_y: f32,
        inner_width: f32,
        inner_height: f32,
        scale: f32,
    ) -> Self {
        Self {
            x: (client_x - inner_width / 2.0) * scale,
            y: (client_y - inner_height / 2.0) * scale,
        }
    }
}

/// Accumulated camera dolly, independent of orbit
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewpoint(pub Matrix4<f32>);

impl Viewpoint {
    pub fn identity() -> Self {
        Self(Matrix4::identity())
    }

    pub fn at_depth(z: f32) -> Self {
        Self(Transform::translation_matrix(0.0, 0.0, z))
    }

    /// Translate along the local Z axis
    pub fn dolly(&mut self, dz: f32) {
        self.0 *= Transform::translation_matrix(0.0, 0.0, dz);
    }

    pub fn translation(&self) -> Vector3<f32> {
        self.0.fixed_view::<3, 1>(0, 3).into_owned()
    }
}

impl Default for Viewpoint {
    fn default() -> Self {
        Self::identity()
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Per-frame model transform: the viewpoint, then a rotation about X by
    /// `mouse.y`, then a rotation about Y by `mouse.x`.
    pub fn compose_model(viewpoint: &Viewpoint, mouse: &MouseOffset) -> Matrix4<f32> {
        let rx = Matrix4::new_rotation(Vector3::new(mouse.y, 0.0, 0.0));
        let ry = Matrix4::new_rotation(Vector3::new(0.0, mouse.x, 0.0));
        viewpoint.0 * rx * ry
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Matrix4<f32> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
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
    fn test_mouse_offset_from_pointer() {
        let offset = MouseOffset::from_pointer(500.0, 200.0, 800.0, 600.0, 0.01);
        assert!((offset.x - 1.0).abs() < 1e-6);
        assert!((offset.y + 1.0).abs() < 1e-6);

        let centered = MouseOffset::from_pointer(400.0, 300.0, 800.0, 600.0, 0.01);
        assert_eq!(centered, MouseOffset::zero());
    }

    #[test]
    fn test_dolly_accumulates() {
        let mut viewpoint = Viewpoint::at_depth(-8.0);
        for _ in 0..3 {
            viewpoint.dolly(2.0);
        }
        assert!((viewpoint.translation() - Vector3::new(0.0, 0.0, -2.0)).norm() < 1e-6);
    }

    #[test]
    fn test_identity_composition() {
        let model = Transform::compose_model(&Viewpoint::identity(), &MouseOffset::zero());
        assert!((model - Matrix4::identity()).norm() < 1e-6);
    }

    #[test]
    fn test_composition_is_pure() {
        let viewpoint = Viewpoint::at_depth(-4.0);
        let mouse = MouseOffset::new(0.3, -0.7);
        let first = Transform::compose_model(&viewpoint, &mouse);
        let second = Transform::compose_model(&viewpoint, &mouse);
        assert_eq!(first, second);
        assert_eq!(viewpoint, Viewpoint::at_depth(-4.0));
    }

    #[test]
    fn test_rotation_order_x_then_y() {
        let half_pi = std::f32::consts::FRAC_PI_2;
        let model = Transform::compose_model(
            &Viewpoint::identity(),
            &MouseOffset::new(half_pi, half_pi),
        );
        // Ry first takes +X to -Z, then Rx takes -Z to +Y
        let p = model.transform_point(&Point3::new(1.0, 0.0, 0.0));
        assert!((p - Point3::new(0.0, 1.0, 0.0)).norm() < 1e-5);
    }
}
