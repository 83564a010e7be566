//! The rendering orchestrator.
//!
//! [`Viewer`] owns every piece of mutable viewer state: the layout, the input
//! state, the active model, pending builds, and the GPU and status layers.
//! Hosts forward platform events to it and call [`Viewer::tick`] once per
//! frame. Event handlers only update state; drawing happens in `tick`.

use crate::animation::{AnimationLoop, LoopControl};
use crate::config::ViewerConfig;
use crate::error::{Result, ViewerError};
use crate::geometry::{mesh_builder, Mesh, MeshBuilder};
use crate::gpu::{GpuBackend, GpuModel};
use crate::input::{InputState, KeyMap, KeyOutcome, RenderMode};
use crate::layout::{ViewId, ViewLayout};
use crate::menu::{Menu, MenuAction};
use crate::scheduler::{build_model, BuildTicket, ModelSwapScheduler};
use crate::status::StatusDisplay;

/// What selecting a menu entry started
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Selection {
    /// A build is pending; the host must call [`Viewer::complete_build`]
    /// after `ViewerConfig::build_delay`
    Build(BuildTicket),
    ModeChanged(RenderMode),
}

pub struct Viewer<G: GpuBackend, S: StatusDisplay> {
    config: ViewerConfig,
    keymap: KeyMap,
    menu: Menu,
    layout: ViewLayout,
    input: InputState,
    active: GpuModel<G::Buffers>,
    scheduler: ModelSwapScheduler,
    animation: AnimationLoop,
    gpu: G,
    status: S,
}

impl<G: GpuBackend, S: StatusDisplay> Viewer<G, S> {
    /// Lay out a `width` x `height` canvas and upload the default shape, the
    /// first mesh entry of `menu` (a cube if the menu has none).
    pub fn new(
        mut gpu: G,
        mut status: S,
        config: ViewerConfig,
        menu: Menu,
        width: u32,
        height: u32,
    ) -> Result<Self> {
        let layout = ViewLayout::compute(width, height, &config);

        let default = default_builder(&menu);
        let active = build_model(
            &default,
            &mut gpu,
            config.material,
            layout.projection(ViewId::Normal).matrix,
        )?;

        status.set_busy(false);
        status.set_hud(None);

        Ok(Self {
            input: InputState::new(&config),
            keymap: KeyMap::default(),
            scheduler: ModelSwapScheduler::new(),
            animation: AnimationLoop::new(),
            config,
            menu,
            layout,
            active,
            gpu,
            status,
        })
    }

    pub fn with_keymap(mut self, keymap: KeyMap) -> Self {
        self.keymap = keymap;
        self
    }

    /// Recompute view rectangles and projections for a new canvas size
    pub fn resize(&mut self, width: u32, height: u32) {
        self.layout = ViewLayout::compute(width, height, &self.config);
        log::debug!("resized to {:?}", self.layout.canvas_size());
    }

    pub fn key_pressed(&mut self, key: &str) -> KeyOutcome {
        let outcome = self.input.key_pressed(key, &self.keymap, &self.config);
        if outcome == KeyOutcome::EyesChanged && self.input.mode == RenderMode::Stereo {
            self.status.set_hud(self.input.hud_text().as_deref());
        }
        outcome
    }

    pub fn pointer_moved(
        &mut self,
        client_x: f32,
        client_y: f32,
        inner_width: f32,
        inner_height: f32,
    ) {
        self.input
            .pointer_moved(client_x, client_y, inner_width, inner_height, &self.config);
    }

    pub fn set_mode(&mut self, mode: RenderMode) {
        let hud = self.input.set_mode(mode);
        self.status.set_hud(hud.as_deref());
        log::debug!("render mode {mode:?}");
    }

    /// Activate the menu entry called `label`
    pub fn select(&mut self, label: &str) -> Result<Selection> {
        let Some(action) = self.menu.lookup(label).cloned() else {
            log::warn!("no menu entry named {label:?}");
            return Err(ViewerError::UnknownMenuEntry(label.to_owned()));
        };

        Ok(match action {
            MenuAction::Build(builder) => Selection::Build(self.request_build(label, builder)),
            MenuAction::SetMode(mode) => {
                self.set_mode(mode);
                Selection::ModeChanged(mode)
            }
        })
    }

    /// Show the busy indicator and queue `builder`
    pub fn request_build(&mut self, label: &str, builder: MeshBuilder) -> BuildTicket {
        self.scheduler.request(label, builder, &mut self.status)
    }

    /// Run a queued build and swap it in. Failures leave the current model
    /// displayed; the busy indicator is cleared either way.
    pub fn complete_build(&mut self, ticket: BuildTicket) -> Result<bool> {
        let projection = self.layout.projection(ViewId::Normal).matrix;
        self.scheduler.complete(
            ticket,
            &mut self.gpu,
            &mut self.active,
            self.config.material,
            projection,
            &mut self.status,
        )
    }

    pub fn cancel_build(&mut self, ticket: BuildTicket) -> bool {
        self.scheduler.cancel(ticket, &mut self.status)
    }

    /// Draw one frame
    pub fn tick(&mut self, now_ms: f64) -> LoopControl {
        self.animation.tick(
            now_ms,
            &mut self.gpu,
            &self.layout,
            &self.input,
            &self.active,
            &self.config,
        )
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn menu(&self) -> &Menu {
        &self.menu
    }

    pub fn layout(&self) -> &ViewLayout {
        &self.layout
    }

    pub fn input(&self) -> &InputState {
        &self.input
    }

    pub fn active_model(&self) -> &GpuModel<G::Buffers> {
        &self.active
    }

    pub fn animation(&self) -> &AnimationLoop {
        &self.animation
    }

    pub fn is_busy(&self) -> bool {
        self.scheduler.is_busy()
    }

    pub fn gpu(&self) -> &G {
        &self.gpu
    }

    pub fn gpu_mut(&mut self) -> &mut G {
        &mut self.gpu
    }

    pub fn status(&self) -> &S {
        &self.status
    }
}

fn default_builder(menu: &Menu) -> MeshBuilder {
    menu.entries()
        .find_map(|entry| match &entry.action {
            MenuAction::Build(builder) => Some(builder.clone()),
            MenuAction::SetMode(_) => None,
        })
        .unwrap_or_else(|| mesh_builder(|| Ok(Mesh::cube(2.0))))
}
