/// Draws the active model into one view rectangle
use crate::config::ViewerConfig;
use crate::gpu::{GpuBackend, Uniforms};
use crate::layout::{ViewId, ViewLayout};
use crate::projection;

pub struct FrameRenderer<'a> {
    pub layout: &'a ViewLayout,
    pub config: &'a ViewerConfig,
}

impl<'a> FrameRenderer<'a> {
    pub fn new(layout: &'a ViewLayout, config: &'a ViewerConfig) -> Self {
        Self { layout, config }
    }

    /// Render into `view` with the eye shifted `eye_offset` along X.
    ///
    /// `base` is copied; only its projection and view matrices are replaced
    /// for this draw. Scissoring is switched off again before returning so
    /// it cannot clip later draws into the other half of the canvas.
    pub fn draw_view<G: GpuBackend>(
        &self,
        gpu: &mut G,
        buffers: &G::Buffers,
        base: &Uniforms,
        view: ViewId,
        eye_offset: f32,
    ) {
        let rect = self.layout.rect(view);
        gpu.set_viewport(rect);
        gpu.enable_scissor(rect);
        gpu.clear(self.config.clear_color, self.config.clear_depth);
        gpu.enable_depth_test();

        let uniforms = Uniforms {
            projection: self.layout.projection(view).matrix,
            view: projection::eye_view(eye_offset, self.config),
            ..*base
        };
        gpu.draw(buffers, &uniforms);
        gpu.disable_scissor();
    }
}
