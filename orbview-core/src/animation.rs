/// Per-frame driver: composes the model transform and issues one draw per eye
use crate::config::ViewerConfig;
use crate::gpu::{GpuBackend, GpuModel, Uniforms};
use crate::input::{InputState, RenderMode};
use crate::layout::{ViewId, ViewLayout};
use crate::renderer::FrameRenderer;
use crate::transform::Transform;

/// Whether the host should schedule another frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopControl {
    Continue,
    Stop,
}

/// Frame counter and a once-per-second FPS estimate
#[derive(Debug, Clone, Default)]
pub struct AnimationLoop {
    frame_index: u64,
    fps: f32,
    window_start_ms: Option<f64>,
    window_frames: u32,
}

impl AnimationLoop {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Render one frame. `now_ms` is the host's monotonic frame timestamp.
    pub fn tick<G: GpuBackend>(
        &mut self,
        now_ms: f64,
        gpu: &mut G,
        layout: &ViewLayout,
        input: &InputState,
        model: &GpuModel<G::Buffers>,
        config: &ViewerConfig,
    ) -> LoopControl {
        let uniforms = Uniforms {
            model: Transform::compose_model(&input.viewpoint, &input.mouse),
            ..model.uniforms
        };

        let renderer = FrameRenderer::new(layout, config);
        match input.mode {
            RenderMode::Normal => {
                renderer.draw_view(gpu, &model.buffers, &uniforms, ViewId::Normal, 0.0);
            }
            RenderMode::Stereo => {
                let sep = input.eye_separation;
                renderer.draw_view(gpu, &model.buffers, &uniforms, ViewId::Left, -sep);
                renderer.draw_view(gpu, &model.buffers, &uniforms, ViewId::Right, sep);
            }
        }

        self.update_stats(now_ms);
        LoopControl::Continue
    }

    fn update_stats(&mut self, now_ms: f64) {
        self.frame_index += 1;
        self.window_frames += 1;

        let start = *self.window_start_ms.get_or_insert(now_ms);
        let elapsed_ms = now_ms - start;
        if elapsed_ms >= 1000.0 {
            self.fps = (self.window_frames as f64 * 1000.0 / elapsed_ms) as f32;
            self.window_frames = 0;
            self.window_start_ms = Some(now_ms);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fps_window() {
        let mut animation = AnimationLoop::new();
        for i in 0..=60 {
            animation.update_stats(i as f64 * 1000.0 / 60.0);
        }
        assert_eq!(animation.frame_index(), 61);
        assert!((animation.fps() - 61.0).abs() < 1e-3);
    }

    #[test]
    fn test_fps_starts_at_zero() {
        let mut animation = AnimationLoop::new();
        animation.update_stats(5.0);
        assert_eq!(animation.fps(), 0.0);
    }
}
