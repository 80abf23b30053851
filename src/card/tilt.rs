//! Pointer and device-orientation to 3D tilt mapping

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::lifecycle::CardState;
use super::markup::Markup;
use crate::event::CardEvent;
use crate::settings::TiltConfig;
use crate::stage::{Prop, Stage, Unit};
use crate::tween::{Ease, Tween, TweenEngine};

/// Browser viewport size (CSS px)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    pub fn center(&self) -> Vec2 {
        Vec2::new(self.width / 2.0, self.height / 2.0)
    }
}

/// Card rotation in degrees
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tilt {
    pub rotation_x: f32,
    pub rotation_y: f32,
}

#[derive(Debug)]
pub struct TiltMapper {
    config: TiltConfig,
}

impl TiltMapper {
    pub fn new(config: TiltConfig) -> Self {
        Self { config }
    }

    /// Pointer tilt only runs on wide (desktop) viewports
    pub fn enabled_for(&self, viewport: Viewport) -> bool {
        viewport.width >= self.config.min_viewport_width
    }

    /// Rotation for a pointer at `point`; gentler while the card is open
    pub fn rotation_for(&self, viewport: Viewport, point: Vec2, state: CardState) -> Tilt {
        let factor = match state {
            CardState::Open => self.config.open_factor,
            CardState::Closed => self.config.closed_factor,
        }
        .max(f32::EPSILON);
        let center = viewport.center();
        Tilt {
            rotation_x: (center.y - point.y) / factor,
            rotation_y: (point.x - center.x) / factor,
        }
    }

    /// Handle a pointer move; `None` when the viewport is too narrow
    pub fn pointer_move(
        &self,
        stage: &mut Stage,
        engine: &mut TweenEngine<CardEvent>,
        markup: &Markup,
        viewport: Viewport,
        point: Vec2,
        state: CardState,
    ) -> Option<Tilt> {
        if !self.enabled_for(viewport) {
            return None;
        }
        let tilt = self.rotation_for(viewport, point, state);
        self.apply(stage, engine, markup, point, tilt);
        Some(tilt)
    }

    /// Handle device orientation (`beta` front-back, `gamma` left-right, in
    /// degrees) as a virtual pointer offset from the centre. Only used while
    /// the card is closed; not subject to the width gate.
    pub fn orientation(
        &self,
        stage: &mut Stage,
        engine: &mut TweenEngine<CardEvent>,
        markup: &Markup,
        viewport: Viewport,
        beta: f32,
        gamma: f32,
        state: CardState,
    ) -> Option<Tilt> {
        if state == CardState::Open {
            return None;
        }
        let gain = self.config.orientation_gain;
        let point = viewport.center() + Vec2::new(gamma * gain, beta * gain);
        let tilt = self.rotation_for(viewport, point, state);
        self.apply(stage, engine, markup, point, tilt);
        Some(tilt)
    }

    /// Ease the card back to flat with a springy curve
    pub fn pointer_leave(&self, stage: &mut Stage, engine: &mut TweenEngine<CardEvent>, markup: &Markup) {
        engine.add(
            stage,
            Tween::new(markup.card)
                .to(Prop::RotationX, 0.0)
                .to(Prop::RotationY, 0.0)
                .duration(self.config.leave_duration)
                .ease(Ease::ElasticOut(0.3)),
        );
    }

    fn apply(
        &self,
        stage: &mut Stage,
        engine: &mut TweenEngine<CardEvent>,
        markup: &Markup,
        point: Vec2,
        tilt: Tilt,
    ) {
        engine.add(
            stage,
            Tween::new(markup.card)
                .to(Prop::RotationX, tilt.rotation_x)
                .to(Prop::RotationY, tilt.rotation_y)
                .duration(self.config.card_duration)
                .ease(Ease::PowerOut(2)),
        );

        engine.add(
            stage,
            Tween::new(markup.cursor_light)
                .to(Prop::Left(Unit::Px), point.x)
                .to(Prop::Top(Unit::Px), point.y)
                .duration(self.config.light_duration),
        );

        // Orbs drift in opposite directions for parallax
        let k = self.config.orb_factor;
        for (orbs, sign) in [(&markup.orb_left, 1.0), (&markup.orb_right, -1.0)] {
            for &orb in orbs {
                engine.add(
                    stage,
                    Tween::new(orb)
                        .to(Prop::X, sign * tilt.rotation_y * k)
                        .to(Prop::Y, sign * tilt.rotation_x * k)
                        .duration(self.config.orb_duration),
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESKTOP: Viewport = Viewport {
        width: 1600.0,
        height: 900.0,
    };
    const PHONE: Viewport = Viewport {
        width: 390.0,
        height: 844.0,
    };

    fn setup() -> (TiltMapper, Stage, TweenEngine<CardEvent>, Markup) {
        let mut stage = Stage::new();
        let markup = Markup::build(&mut stage, 3, 2).expect("markup");
        (
            TiltMapper::new(TiltConfig::default()),
            stage,
            TweenEngine::new(),
            markup,
        )
    }

    fn settle(stage: &mut Stage, engine: &mut TweenEngine<CardEvent>) {
        for _ in 0..180 {
            engine.tick(stage, 1.0 / 60.0);
        }
    }

    #[test]
    fn test_center_is_flat() {
        let mapper = TiltMapper::new(TiltConfig::default());
        let tilt = mapper.rotation_for(DESKTOP, DESKTOP.center(), CardState::Closed);
        assert_eq!(tilt, Tilt::default());
    }

    #[test]
    fn test_open_is_gentler() {
        let mapper = TiltMapper::new(TiltConfig::default());
        let point = Vec2::new(1400.0, 100.0);
        let closed = mapper.rotation_for(DESKTOP, point, CardState::Closed);
        let open = mapper.rotation_for(DESKTOP, point, CardState::Open);
        assert!((closed.rotation_y - 600.0 / 40.0).abs() < 1e-4);
        assert!((closed.rotation_x - 350.0 / 40.0).abs() < 1e-4);
        assert!(open.rotation_y.abs() < closed.rotation_y.abs());
        assert!((open.rotation_y - 10.0).abs() < 1e-4);
    }

    #[test]
    fn test_pointer_move_rotates_card() {
        let (mapper, mut stage, mut engine, markup) = setup();
        let point = Vec2::new(1200.0, 300.0);
        let tilt = mapper
            .pointer_move(&mut stage, &mut engine, &markup, DESKTOP, point, CardState::Closed)
            .expect("desktop tilt");
        settle(&mut stage, &mut engine);

        assert!((stage.get(markup.card, Prop::RotationY) - tilt.rotation_y).abs() < 1e-4);
        assert!((stage.get(markup.card, Prop::RotationX) - tilt.rotation_x).abs() < 1e-4);
        assert!((stage.get(markup.cursor_light, Prop::Left(Unit::Px)) - 1200.0).abs() < 1e-3);
        assert!((stage.get(markup.orb_left[0], Prop::X) - tilt.rotation_y * 1.5).abs() < 1e-4);
        assert!((stage.get(markup.orb_right[0], Prop::X) + tilt.rotation_y * 1.5).abs() < 1e-4);
    }

    #[test]
    fn test_narrow_viewport_does_not_rotate() {
        let (mapper, mut stage, mut engine, markup) = setup();
        let result = mapper.pointer_move(
            &mut stage,
            &mut engine,
            &markup,
            PHONE,
            Vec2::new(10.0, 10.0),
            CardState::Closed,
        );
        assert!(result.is_none());
        settle(&mut stage, &mut engine);
        assert_eq!(stage.get(markup.card, Prop::RotationX), 0.0);
        assert_eq!(stage.get(markup.card, Prop::RotationY), 0.0);
        assert_eq!(engine.active_tweens(), 0);
    }

    #[test]
    fn test_orientation_substitutes_on_phone_when_closed() {
        let (mapper, mut stage, mut engine, markup) = setup();
        let tilt = mapper
            .orientation(&mut stage, &mut engine, &markup, PHONE, 10.0, -20.0, CardState::Closed)
            .expect("orientation tilt while closed");
        assert!((tilt.rotation_y - (-40.0 / 40.0)).abs() < 1e-4);
        assert!((tilt.rotation_x - (-20.0 / 40.0)).abs() < 1e-4);

        let ignored =
            mapper.orientation(&mut stage, &mut engine, &markup, PHONE, 10.0, -20.0, CardState::Open);
        assert!(ignored.is_none());
    }

    #[test]
    fn test_pointer_leave_returns_to_flat() {
        let (mapper, mut stage, mut engine, markup) = setup();
        mapper.pointer_move(
            &mut stage,
            &mut engine,
            &markup,
            DESKTOP,
            Vec2::new(0.0, 0.0),
            CardState::Closed,
        );
        settle(&mut stage, &mut engine);
        assert!(stage.get(markup.card, Prop::RotationY).abs() > 1.0);

        mapper.pointer_leave(&mut stage, &mut engine, &markup);
        settle(&mut stage, &mut engine);
        assert!(stage.get(markup.card, Prop::RotationY).abs() < 1e-4);
        assert!(stage.get(markup.card, Prop::RotationX).abs() < 1e-4);
    }
}
