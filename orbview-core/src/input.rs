//! Live input state and the keyboard table.
//!
//! Only the input handlers on [`InputState`] mutate it; the animation loop
//! reads it once per tick.

use crate::config::ViewerConfig;
use crate::transform::{MouseOffset, Viewpoint};

/// Whether a frame is drawn once or once per eye
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum RenderMode {
    #[default]
    Normal,
    Stereo,
}

/// Effect bound to a key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Forward,
    Backward,
    NarrowEyes,
    WidenEyes,
}

/// Ordered key name → action table. Key names follow `KeyboardEvent.key`.
#[derive(Debug, Clone)]
pub struct KeyMap {
    bindings: Vec<(&'static str, KeyAction)>,
}

impl Default for KeyMap {
    fn default() -> Self {
        Self {
            bindings: vec![
                ("w", KeyAction::Forward),
                ("ArrowUp", KeyAction::Forward),
                ("s", KeyAction::Backward),
                ("ArrowDown", KeyAction::Backward),
                ("[", KeyAction::NarrowEyes),
                ("]", KeyAction::WidenEyes),
            ],
        }
    }
}

impl KeyMap {
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.bindings
            .iter()
            .find(|(name, _)| *name == key)
            .map(|&(_, action)| action)
    }

    /// Add a binding; earlier bindings win on duplicate names
    pub fn bind(mut self, key: &'static str, action: KeyAction) -> Self {
        self.bindings.push((key, action));
        self
    }

    pub fn bindings(&self) -> &[(&'static str, KeyAction)] {
        &self.bindings
    }
}

/// What a handled key changed, so the host can refresh status text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyOutcome {
    Moved,
    EyesChanged,
    Ignored,
}

/// Process-lifetime input state
#[derive(Debug, Clone, PartialEq)]
pub struct InputState {
    pub mouse: MouseOffset,
    pub eye_separation: f32,
    pub mode: RenderMode,
    pub viewpoint: Viewpoint,
}

impl InputState {
    pub fn new(config: &ViewerConfig) -> Self {
        Self {
            mouse: MouseOffset::zero(),
            eye_separation: config.initial_eye_separation,
            mode: RenderMode::Normal,
            viewpoint: Viewpoint::at_depth(config.initial_dolly),
        }
    }

    /// Apply a key press. Unmapped keys are logged and leave the state untouched.
    pub fn key_pressed(&mut self, key: &str, keymap: &KeyMap, config: &ViewerConfig) -> KeyOutcome {
        let Some(action) = keymap.lookup(key) else {
            log::warn!("unmapped key: {key:?}");
            return KeyOutcome::Ignored;
        };

        match action {
            KeyAction::Forward => {
                self.viewpoint.dolly(config.dolly_step);
                KeyOutcome::Moved
            }
            KeyAction::Backward => {
                self.viewpoint.dolly(-config.dolly_step);
                KeyOutcome::Moved
            }
            KeyAction::NarrowEyes => {
                self.eye_separation -= config.eye_separation_step;
                KeyOutcome::EyesChanged
            }
            KeyAction::WidenEyes => {
                self.eye_separation += config.eye_separation_step;
                KeyOutcome::EyesChanged
            }
        }
    }

    /// Pointer or first-touch move in window client coordinates
    pub fn pointer_moved(
        &mut self,
        client_x: f32,
        client_y: f32,
        inner_width: f32,
        inner_height: f32,
        config: &ViewerConfig,
    ) {
        self.mouse = MouseOffset::from_pointer(
            client_x,
            client_y,
            inner_width,
            inner_height,
            config.mouse_scale,
        );
    }

    /// Switch render mode, returning the HUD text for the new mode
    pub fn set_mode(&mut self, mode: RenderMode) -> Option<String> {
        self.mode = mode;
        self.hud_text()
    }

    /// Stereo readout, or `None` in mono mode
    pub fn hud_text(&self) -> Option<String> {
        match self.mode {
            RenderMode::Normal => None,
            RenderMode::Stereo => Some(format!("eye separation: {:.2}", self.eye_separation)),
        }
    }
}
