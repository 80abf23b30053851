//! Fun modal host and the surprise-section scroll reveal

use super::markup::Markup;
use crate::stage::Stage;

pub const ACTIVE_CLASS: &str = "active";
pub const VISIBLE_CLASS: &str = "visible";

/// Modal with an embedded frame; closing reloads the frame to stop playback
#[derive(Debug, Default)]
pub struct ModalHost {
    open: bool,
}

impl ModalHost {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    /// Show the modal and lock page scroll
    pub fn open(&mut self, stage: &mut Stage, markup: &Markup) {
        self.open = true;
        stage.add_class(markup.modal, ACTIVE_CLASS);
        stage.set_style(markup.body, "overflow", "hidden");
        log::info!("Modal opened");
    }

    /// Hide the modal, unlock scroll and reset the frame
    pub fn close(&mut self, stage: &mut Stage, markup: &Markup) {
        self.open = false;
        stage.remove_class(markup.modal, ACTIVE_CLASS);
        stage.set_style(markup.body, "overflow", "");
        stage.reload_frame(markup.frame);
        log::info!("Modal closed");
    }
}

/// One-time reveal when a section scrolls far enough into view
#[derive(Debug)]
pub struct RevealGate {
    threshold: f32,
    revealed: bool,
}

impl Default for RevealGate {
    fn default() -> Self {
        Self::new(Self::DEFAULT_THRESHOLD)
    }
}

impl RevealGate {
    /// Visible fraction that triggers the reveal
    pub const DEFAULT_THRESHOLD: f32 = 0.2;

    pub fn new(threshold: f32) -> Self {
        Self {
            threshold: threshold.clamp(0.0, 1.0),
            revealed: false,
        }
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_revealed(&self) -> bool {
        self.revealed
    }

    /// Feed an intersection report; returns true when this call revealed
    pub fn observe(&mut self, stage: &mut Stage, markup: &Markup, intersecting: bool, ratio: f32) -> bool {
        // Observers report the crossing ratio with float noise
        if self.revealed || !intersecting || ratio + 1e-3 < self.threshold {
            return false;
        }
        self.revealed = true;
        stage.add_class(markup.surprise, VISIBLE_CLASS);
        log::debug!("Surprise section revealed at {:.2}", ratio);
        true
    }
}
