/// Busy indicator and HUD text exposed by the host UI
pub trait StatusDisplay {
    fn set_busy(&mut self, busy: bool);

    /// Show `text` in the HUD, or clear it with `None`
    fn set_hud(&mut self, text: Option<&str>);
}

/// Status sink that only remembers the last values it was given
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StatusSnapshot {
    pub busy: bool,
    pub hud: Option<String>,
}

impl StatusDisplay for StatusSnapshot {
    fn set_busy(&mut self, busy: bool) {
        self.busy = busy;
    }

    fn set_hud(&mut self, text: Option<&str>) {
        self.hud = text.map(str::to_owned);
    }
}
