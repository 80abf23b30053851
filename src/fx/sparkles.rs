//! Click sparkles
//!
//! Unlike particles, sparkles are single-use: each one flies out from the
//! interaction point, shrinks and fades, then the engine reports `Despawn`
//! and the element is removed.

use rand::Rng;

use crate::event::CardEvent;
use crate::settings::SparkleConfig;
use crate::stage::{ElementId, Prop, Role, Stage, Unit};
use crate::tween::{Tween, TweenEngine};

/// Fallback if a custom config ships an empty palette
const DEFAULT_COLOR: &str = "#ff4d6d";

#[derive(Debug)]
pub struct SparkleEmitter {
    config: SparkleConfig,
}

impl SparkleEmitter {
    pub fn new(config: SparkleConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &SparkleConfig {
        &self.config
    }

    /// Spawn one sparkle at viewport coordinates `(x, y)`
    pub fn emit<R: Rng + ?Sized>(
        &self,
        stage: &mut Stage,
        engine: &mut TweenEngine<CardEvent>,
        rng: &mut R,
        x: f32,
        y: f32,
    ) -> ElementId {
        let id = stage.spawn(Role::Sparkle, None);
        let size = self.config.size.sample(rng);
        let color = match self.config.palette.len() {
            0 => DEFAULT_COLOR.to_string(),
            n => self.config.palette[rng.random_range(0..n)].clone(),
        };

        stage.set_style(id, "position", "fixed");
        stage.set_style(id, "left", "0");
        stage.set_style(id, "top", "0");
        stage.set_style(id, "border-radius", "50%");
        stage.set_style(id, "pointer-events", "none");
        stage.set_style(id, "z-index", "9999");
        stage.set_style(id, "background-color", color);
        engine.set(
            stage,
            id,
            &[
                (Prop::X, x),
                (Prop::Y, y),
                (Prop::Width(Unit::Px), size),
                (Prop::Height(Unit::Px), size),
            ],
        );

        let spread = self.config.spread.abs();
        let (dx, dy) = if spread > 0.0 {
            (
                rng.random_range(-spread..=spread),
                rng.random_range(-spread..=spread),
            )
        } else {
            (0.0, 0.0)
        };
        let tween = Tween::new(id)
            .to(Prop::X, x + dx)
            .to(Prop::Y, y + dy)
            .to(Prop::Opacity, 0.0)
            .to(Prop::Scale, 0.0)
            .duration(self.config.duration.sample(rng))
            .ease(self.config.ease)
            .on_complete(CardEvent::Despawn(id));
        engine.add(stage, tween);
        id
    }

    /// Spawn `count` sparkles from the same point
    pub fn burst<R: Rng + ?Sized>(
        &self,
        stage: &mut Stage,
        engine: &mut TweenEngine<CardEvent>,
        rng: &mut R,
        x: f32,
        y: f32,
        count: usize,
    ) -> Vec<ElementId> {
        log::debug!("Sparkle burst of {} at ({:.0}, {:.0})", count, x, y);
        (0..count)
            .map(|_| self.emit(stage, engine, rng, x, y))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::Variant;
    use proptest::prelude::*;
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    fn despawn_all(stage: &mut Stage, events: Vec<CardEvent>) {
        for event in events {
            if let CardEvent::Despawn(id) = event {
                stage.remove(id);
            }
        }
    }

    #[test]
    fn test_sparkles_are_removed_after_flight() {
        let emitter = SparkleEmitter::new(Variant::Deluxe.effects().sparkles);
        let mut stage = Stage::new();
        let mut engine = TweenEngine::new();
        let mut rng = Pcg32::seed_from_u64(1);

        emitter.burst(&mut stage, &mut engine, &mut rng, 300.0, 200.0, 10);
        emitter.burst(&mut stage, &mut engine, &mut rng, 10.0, 10.0, 10);
        assert_eq!(stage.count(Role::Sparkle), 20);

        let max = emitter.config().duration.max;
        let dt = 1.0 / 60.0;
        for _ in 0..((max + 0.2) / dt) as usize {
            let events = engine.tick(&mut stage, dt);
            despawn_all(&mut stage, events);
        }
        assert_eq!(stage.count(Role::Sparkle), 0);
        assert_eq!(engine.active_tweens(), 0);
    }

    #[test]
    fn test_empty_palette_falls_back() {
        let mut config = Variant::Classic.effects().sparkles;
        config.palette.clear();
        let emitter = SparkleEmitter::new(config);
        let mut stage = Stage::new();
        let mut engine = TweenEngine::new();
        let mut rng = Pcg32::seed_from_u64(3);

        let id = emitter.emit(&mut stage, &mut engine, &mut rng, 0.0, 0.0);
        assert_eq!(stage.style(id, "background-color"), Some(DEFAULT_COLOR));
    }

    proptest! {
        #[test]
        fn prop_sparkle_geometry_in_bounds(seed in any::<u64>(), x in 0.0f32..2000.0, y in 0.0f32..2000.0) {
            let config = Variant::Classic.effects().sparkles;
            let emitter = SparkleEmitter::new(config.clone());
            let mut stage = Stage::new();
            let mut engine = TweenEngine::new();
            let mut rng = Pcg32::seed_from_u64(seed);

            let id = emitter.emit(&mut stage, &mut engine, &mut rng, x, y);
            prop_assert_eq!(stage.get(id, Prop::X), x);
            prop_assert!(config.size.contains(stage.get(id, Prop::Width(Unit::Px))));
            let color = stage.style(id, "background-color").unwrap_or_default().to_string();
            prop_assert!(config.palette.contains(&color));

            // Run to completion and check the landing point
            let mut landed = None;
            for _ in 0..120 {
                let events = engine.tick(&mut stage, 1.0 / 60.0);
                if events.contains(&CardEvent::Despawn(id)) {
                    landed = Some((stage.get(id, Prop::X), stage.get(id, Prop::Y)));
                    break;
                }
            }
            let (lx, ly) = landed.expect("sparkle finishes within 2s");
            prop_assert!((lx - x).abs() <= config.spread + 1e-3);
            prop_assert!((ly - y).abs() <= config.spread + 1e-3);
            prop_assert!(stage.get(id, Prop::Opacity).abs() < 1e-6);
        }
    }
}
