//! Loading screen and one-shot entrance timeline

use super::markup::Markup;
use crate::event::CardEvent;
use crate::stage::{Prop, Stage, Unit};
use crate::tween::{Ease, Position, Timeline, Tween, TweenEngine};

/// Where the page is in its load-time choreography
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntrancePhase {
    #[default]
    Idle,
    /// Progress bar filling, loader fading
    Loading,
    /// Entrance timeline playing
    Revealing,
    Done,
}

#[derive(Debug, Default)]
pub struct EntranceSequencer {
    phase: EntrancePhase,
}

impl EntranceSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> EntrancePhase {
        self.phase
    }

    /// Window finished loading: fill the bar, then fade the loader out
    pub fn start(&mut self, stage: &mut Stage, engine: &mut TweenEngine<CardEvent>, markup: &Markup) -> bool {
        if self.phase != EntrancePhase::Idle {
            log::debug!("Entrance already started");
            return false;
        }
        self.phase = EntrancePhase::Loading;

        let timeline = Timeline::new()
            .stagger(&markup.progress, 0.0, Position::End, |id| {
                Tween::new(id)
                    .to(Prop::Width(Unit::Percent), 100.0)
                    .duration(1.5)
                    .ease(Ease::PowerInOut(2))
            })
            .add(
                Tween::new(markup.loader)
                    .to(Prop::Opacity, 0.0)
                    .duration(0.8)
                    .on_complete(CardEvent::LoaderDone),
                Position::End,
            );
        engine.play(stage, timeline);
        log::info!("Loading...");
        true
    }

    /// Loader gone: hide it for good and play the entrance reveals
    pub fn on_loader_done(&mut self, stage: &mut Stage, engine: &mut TweenEngine<CardEvent>, markup: &Markup) {
        if self.phase != EntrancePhase::Loading {
            return;
        }
        self.phase = EntrancePhase::Revealing;
        stage.set_style(markup.loader, "display", "none");

        let timeline = Timeline::new()
            .stagger(&markup.main_title, 0.0, Position::End, |id| {
                Tween::new(id)
                    .from(Prop::Y, 50.0)
                    .from(Prop::Opacity, 0.0)
                    .duration(1.2)
                    .ease(Ease::PowerOut(4))
            })
            .stagger(&markup.cake, 0.0, Position::Offset(-0.8), |id| {
                Tween::new(id)
                    .from(Prop::Scale, 0.0)
                    .from(Prop::Opacity, 0.0)
                    .duration(1.0)
                    .ease(Ease::BackOut(1.7))
            })
            .stagger(&markup.controls, 0.0, Position::Offset(-0.5), |id| {
                Tween::new(id)
                    .from(Prop::Y, 20.0)
                    .from(Prop::Opacity, 0.0)
                    .duration(0.8)
            })
            .stagger(&markup.audio_player, 0.0, Position::Offset(-0.8), |id| {
                Tween::new(id)
                    .from(Prop::X, -20.0)
                    .from(Prop::Opacity, 0.0)
                    .duration(0.8)
            })
            .call(CardEvent::EntranceDone, Position::End);
        engine.play(stage, timeline);
    }

    pub fn on_entrance_done(&mut self) {
        if self.phase == EntrancePhase::Revealing {
            self.phase = EntrancePhase::Done;
            log::info!("Entrance complete");
        }
    }
}
