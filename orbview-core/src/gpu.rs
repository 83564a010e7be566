//! The GPU layer seam.
//!
//! A backend uploads meshes into opaque buffer handles and exposes the handful
//! of pipeline primitives a split-viewport frame needs: viewport, scissor,
//! clear, depth test, and an indexed draw.

use nalgebra::Matrix4;

use crate::config::Material;
use crate::error::GpuError;
use crate::geometry::Mesh;
use crate::layout::ViewRect;

/// Shader parameters for one draw call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Uniforms {
    pub material: Material,
    pub projection: Matrix4<f32>,
    pub view: Matrix4<f32>,
    pub model: Matrix4<f32>,
}

impl Uniforms {
    pub fn new(material: Material, projection: Matrix4<f32>) -> Self {
        Self {
            material,
            projection,
            view: Matrix4::identity(),
            model: Matrix4::identity(),
        }
    }
}

/// A mesh resident on the GPU together with its uniform set
#[derive(Debug)]
pub struct GpuModel<B> {
    pub buffers: B,
    pub uniforms: Uniforms,
    /// The centered mesh the buffers were built from
    pub mesh: Mesh,
}

pub trait GpuBackend {
    /// Backend-specific buffer handles
    type Buffers;

    fn upload(&mut self, mesh: &Mesh) -> Result<Self::Buffers, GpuError>;

    /// Free buffers of a model that is no longer displayed
    fn release(&mut self, buffers: Self::Buffers);

    fn set_viewport(&mut self, rect: ViewRect);

    fn enable_scissor(&mut self, rect: ViewRect);

    fn disable_scissor(&mut self);

    fn clear(&mut self, color: [f32; 4], depth: f32);

    fn enable_depth_test(&mut self);

    fn draw(&mut self, buffers: &Self::Buffers, uniforms: &Uniforms);
}
