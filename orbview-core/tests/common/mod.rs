use std::collections::HashMap;

use orbview_core::{GpuBackend, GpuError, Mesh, Uniforms, ViewRect};

/// One draw as seen by the GPU: where it went and with which uniforms
#[derive(Debug, Clone, PartialEq)]
pub struct DrawRecord {
    pub viewport: ViewRect,
    pub scissor: Option<ViewRect>,
    pub buffers: usize,
    pub uniforms: Uniforms,
}

/// GPU double that records draws and tracks live buffers
#[derive(Debug, Default)]
pub struct RecordingGpu {
    next_id: usize,
    pub live: HashMap<usize, Mesh>,
    pub released: Vec<usize>,
    pub draws: Vec<DrawRecord>,
    pub clears: usize,
    viewport: Option<ViewRect>,
    scissor: Option<ViewRect>,
}

impl RecordingGpu {
    pub fn scissor_enabled(&self) -> bool {
        self.scissor.is_some()
    }
}

impl GpuBackend for RecordingGpu {
    type Buffers = usize;

    fn upload(&mut self, mesh: &Mesh) -> Result<usize, GpuError> {
        let id = self.next_id;
        self.next_id += 1;
        self.live.insert(id, mesh.clone());
        Ok(id)
    }

    fn release(&mut self, buffers: usize) {
        self.live.remove(&buffers);
        self.released.push(buffers);
    }

    fn set_viewport(&mut self, rect: ViewRect) {
        self.viewport = Some(rect);
    }

    fn enable_scissor(&mut self, rect: ViewRect) {
        self.scissor = Some(rect);
    }

    fn disable_scissor(&mut self) {
        self.scissor = None;
    }

    fn clear(&mut self, _color: [f32; 4], _depth: f32) {
        self.clears += 1;
    }

    fn enable_depth_test(&mut self) {}

    fn draw(&mut self, buffers: &usize, uniforms: &Uniforms) {
        self.draws.push(DrawRecord {
            viewport: self.viewport.expect("draw before viewport"),
            scissor: self.scissor,
            buffers: *buffers,
            uniforms: *uniforms,
        });
    }
}
