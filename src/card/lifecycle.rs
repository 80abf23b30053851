//! Card open/close state machine
//!
//! `Closed -> Open` plays the open timeline; when it finishes the heart
//! starts pulsing and the ending reveal is scheduled as a cancellable task.
//! `Open -> Closed` reverses scale and cover rotation, drops any unfired
//! open-timeline callbacks and cancels the pending ending.

use serde::{Deserialize, Serialize};

use super::markup::Markup;
use crate::event::CardEvent;
use crate::stage::{Prop, Stage};
use crate::tween::{Ease, GroupId, Position, TaskHandle, Timeline, Tween, TweenEngine};

pub const OPEN_CLASS: &str = "is-open";
pub const PULSE_CLASS: &str = "heart-pulse";
pub const ACTIVE_CLASS: &str = "active";

/// Open/closed mode of the card
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CardState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug)]
pub struct CardController {
    state: CardState,
    open_sequence: Option<GroupId>,
    ending_task: Option<TaskHandle>,
    ending_enabled: bool,
    ending_delay: f32,
}

impl CardController {
    pub fn new(ending_enabled: bool, ending_delay: f32) -> Self {
        Self {
            state: CardState::Closed,
            open_sequence: None,
            ending_task: None,
            ending_enabled,
            ending_delay,
        }
    }

    pub fn state(&self) -> CardState {
        self.state
    }

    pub fn is_open(&self) -> bool {
        self.state == CardState::Open
    }

    /// True while an ending reveal is scheduled
    pub fn ending_scheduled(&self) -> bool {
        self.ending_task.is_some()
    }

    /// Open the card; returns false if it was already open
    pub fn open(&mut self, stage: &mut Stage, engine: &mut TweenEngine<CardEvent>, markup: &Markup) -> bool {
        if self.state == CardState::Open {
            log::debug!("Card already open");
            return false;
        }
        self.state = CardState::Open;
        stage.add_class(markup.card, OPEN_CLASS);

        let timeline = Timeline::new()
            .add(
                Tween::new(markup.card)
                    .to(Prop::Scale, 1.1)
                    .duration(1.2)
                    .ease(Ease::PowerInOut(3)),
                Position::At(0.0),
            )
            .add(
                Tween::new(markup.card_front)
                    .to(Prop::RotationY, -180.0)
                    .duration(1.4)
                    .ease(Ease::PowerInOut(4)),
                Position::At(0.0),
            )
            .stagger(&markup.wish_title, 0.0, Position::Offset(-0.4), |id| {
                Tween::new(id)
                    .from_to(Prop::Opacity, 0.0, 1.0)
                    .from_to(Prop::Y, 15.0, 0.0)
                    .duration(0.8)
                    .ease(Ease::PowerOut(3))
            })
            .stagger(&markup.paragraphs, 0.3, Position::Offset(-0.4), |id| {
                Tween::new(id)
                    .from_to(Prop::Opacity, 0.0, 1.0)
                    .from_to(Prop::Y, 10.0, 0.0)
                    .duration(0.8)
                    .ease(Ease::PowerOut(2))
            })
            .add(
                Tween::new(markup.signature)
                    .from_to(Prop::Opacity, 0.0, 1.0)
                    .from_to(Prop::Scale, 0.9, 1.0)
                    .from_to(Prop::Blur, 5.0, 0.0)
                    .duration(1.0)
                    .ease(Ease::BackOut(2.0)),
                Position::Offset(-0.2),
            )
            .call(CardEvent::OpenSequenceDone, Position::End);

        log::info!("Opening card ({:.1}s sequence)", timeline.duration());
        self.open_sequence = Some(engine.play(stage, timeline));
        true
    }

    /// Close the card; returns false if it was already closed
    pub fn close(&mut self, stage: &mut Stage, engine: &mut TweenEngine<CardEvent>, markup: &Markup) -> bool {
        if self.state == CardState::Closed {
            log::debug!("Card already closed");
            return false;
        }
        self.state = CardState::Closed;
        stage.remove_class(markup.card, OPEN_CLASS);

        if let Some(group) = self.open_sequence.take() {
            engine.cancel_group_calls(group);
        }
        if let Some(task) = self.ending_task.take() {
            engine.cancel(task);
            log::debug!("Pending ending reveal cancelled");
        }

        engine.add(
            stage,
            Tween::new(markup.card)
                .to(Prop::Scale, 1.0)
                .duration(1.2)
                .ease(Ease::PowerInOut(3)),
        );
        engine.add(
            stage,
            Tween::new(markup.card_front)
                .to(Prop::RotationY, 0.0)
                .duration(1.2)
                .ease(Ease::PowerInOut(3)),
        );
        log::info!("Closing card");
        true
    }

    /// The open timeline finished: pulse the heart and schedule the ending
    pub fn on_open_sequence_done(
        &mut self,
        stage: &mut Stage,
        engine: &mut TweenEngine<CardEvent>,
        markup: &Markup,
    ) {
        self.open_sequence = None;
        if self.state != CardState::Open {
            return;
        }
        stage.add_class(markup.heart, PULSE_CLASS);

        if self.ending_enabled {
            if let Some(stale) = self.ending_task.take() {
                engine.cancel(stale);
            }
            self.ending_task = Some(engine.delayed_call(self.ending_delay, CardEvent::EndingDue));
            log::debug!("Ending reveal in {:.1}s", self.ending_delay);
        }
    }

    /// The ending delay elapsed; reveal only if the card is still open
    pub fn on_ending_due(
        &mut self,
        stage: &mut Stage,
        engine: &mut TweenEngine<CardEvent>,
        markup: &Markup,
    ) -> bool {
        self.ending_task = None;
        if self.state != CardState::Open {
            return false;
        }

        stage.add_class(markup.ending_scene, ACTIVE_CLASS);
        let timeline = Timeline::new().stagger(&markup.ending_items, 0.2, Position::End, |id| {
            Tween::new(id)
                .from(Prop::Y, 20.0)
                .from(Prop::Opacity, 0.0)
                .duration(0.8)
                .ease(Ease::PowerOut(3))
        });
        engine.play(stage, timeline);
        log::info!("Ending scene revealed");
        true
    }

    /// Dismiss the ending scene so the card can be enjoyed again
    pub fn replay(&mut self, stage: &mut Stage, markup: &Markup) {
        stage.remove_class(markup.ending_scene, ACTIVE_CLASS);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DT: f32 = 1.0 / 60.0;

    struct Rig {
        card: CardController,
        stage: Stage,
        engine: TweenEngine<CardEvent>,
        markup: Markup,
    }

    impl Rig {
        fn new() -> Self {
            let mut stage = Stage::new();
            let markup = Markup::build(&mut stage, 4, 3).expect("markup");
            Self {
                card: CardController::new(true, 3.0),
                stage,
                engine: TweenEngine::new(),
                markup,
            }
        }

        fn advance(&mut self, secs: f32) {
            for _ in 0..(secs / DT).round() as usize {
                for event in self.engine.tick(&mut self.stage, DT) {
                    match event {
                        CardEvent::OpenSequenceDone => {
                            self.card
                                .on_open_sequence_done(&mut self.stage, &mut self.engine, &self.markup)
                        }
                        CardEvent::EndingDue => {
                            self.card.on_ending_due(&mut self.stage, &mut self.engine, &self.markup);
                        }
                        _ => {}
                    }
                }
            }
        }

        fn open(&mut self) -> bool {
            self.card.open(&mut self.stage, &mut self.engine, &self.markup)
        }

        fn close(&mut self) -> bool {
            self.card.close(&mut self.stage, &mut self.engine, &self.markup)
        }

        fn ending_active(&self) -> bool {
            self.stage.has_class(self.markup.ending_scene, ACTIVE_CLASS)
        }
    }

    #[test]
    fn test_open_reveals_interior() {
        let mut rig = Rig::new();
        assert!(rig.open());
        assert_eq!(rig.card.state(), CardState::Open);
        assert!(rig.stage.has_class(rig.markup.card, OPEN_CLASS));
        // fromTo hides the text straight away
        assert_eq!(rig.stage.get(rig.markup.paragraphs[3], Prop::Opacity), 0.0);

        rig.advance(5.0);
        assert!((rig.stage.get(rig.markup.card, Prop::Scale) - 1.1).abs() < 1e-4);
        assert!((rig.stage.get(rig.markup.card_front, Prop::RotationY) + 180.0).abs() < 1e-3);
        for &p in &rig.markup.paragraphs {
            assert!((rig.stage.get(p, Prop::Opacity) - 1.0).abs() < 1e-4);
        }
        assert!(rig.stage.get(rig.markup.signature, Prop::Blur).abs() < 1e-4);
        assert!(rig.stage.has_class(rig.markup.heart, PULSE_CLASS));
    }

    #[test]
    fn test_open_is_idempotent() {
        let mut rig = Rig::new();
        assert!(rig.open());
        let tweens = rig.engine.active_tweens();
        assert!(!rig.open());
        assert_eq!(rig.engine.active_tweens(), tweens);
        assert_eq!(rig.card.state(), CardState::Open);
    }

    #[test]
    fn test_close_when_closed_is_noop() {
        let mut rig = Rig::new();
        assert!(!rig.close());
        assert_eq!(rig.engine.active_tweens(), 0);
    }

    #[test]
    fn test_ending_fires_while_open() {
        let mut rig = Rig::new();
        rig.open();
        rig.advance(4.5);
        assert!(rig.card.ending_scheduled());
        assert!(!rig.ending_active());

        rig.advance(3.5);
        assert!(rig.ending_active());
        assert!(!rig.card.ending_scheduled());
    }

    #[test]
    fn test_close_before_delay_suppresses_ending() {
        let mut rig = Rig::new();
        rig.open();
        rig.advance(1.0);
        rig.close();
        rig.advance(2.0);
        assert!(!rig.ending_active());

        rig.advance(10.0);
        assert!(!rig.ending_active());
        assert_eq!(rig.engine.pending_calls(), 0);
    }

    #[test]
    fn test_close_during_delay_cancels_task() {
        let mut rig = Rig::new();
        rig.open();
        rig.advance(5.0);
        assert!(rig.card.ending_scheduled());
        rig.close();
        assert!(!rig.card.ending_scheduled());
        assert_eq!(rig.engine.pending_calls(), 0);
        rig.advance(5.0);
        assert!(!rig.ending_active());
    }

    #[test]
    fn test_reopen_within_delay_schedules_once() {
        let mut rig = Rig::new();
        rig.open();
        rig.advance(5.0);
        rig.close();
        rig.advance(0.5);
        rig.open();
        rig.advance(5.0);
        assert_eq!(rig.engine.pending_calls(), 1);

        rig.advance(3.0);
        assert!(rig.ending_active());
        assert_eq!(rig.engine.pending_calls(), 0);
    }

    #[test]
    fn test_close_reverses_scale_and_cover() {
        let mut rig = Rig::new();
        rig.open();
        rig.advance(2.0);
        rig.close();
        rig.advance(2.0);
        assert!((rig.stage.get(rig.markup.card, Prop::Scale) - 1.0).abs() < 1e-4);
        assert!(rig.stage.get(rig.markup.card_front, Prop::RotationY).abs() < 1e-3);
        assert!(!rig.stage.has_class(rig.markup.card, OPEN_CLASS));
    }

    #[test]
    fn test_replay_hides_ending() {
        let mut rig = Rig::new();
        rig.open();
        rig.advance(9.0);
        assert!(rig.ending_active());
        rig.card.replay(&mut rig.stage, &rig.markup);
        assert!(!rig.ending_active());
    }

    #[test]
    fn test_ending_disabled_variant() {
        let mut rig = Rig::new();
        rig.card = CardController::new(false, 3.0);
        rig.open();
        rig.advance(10.0);
        assert!(!rig.card.ending_scheduled());
        assert!(!rig.ending_active());
    }
}
