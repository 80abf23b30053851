//! Ambient particle pool
//!
//! A fixed number of dots drift upward and fade. When a cycle completes the
//! engine reports `ParticleCycled`, and the particle is moved back below the
//! container with freshly rolled parameters and launched again. Nothing is
//! ever created or destroyed after `init`.

use rand::Rng;

use crate::event::CardEvent;
use crate::settings::ParticleConfig;
use crate::stage::{ElementId, Prop, Role, Stage, Unit};
use crate::tween::{Tween, TweenEngine};

#[derive(Debug)]
pub struct ParticleRecycler {
    config: ParticleConfig,
    pool: Vec<ElementId>,
    running: bool,
}

impl ParticleRecycler {
    pub fn new(config: ParticleConfig) -> Self {
        Self {
            config,
            pool: Vec::new(),
            running: false,
        }
    }

    /// Create the pool inside `container` and start every particle
    pub fn init<R: Rng + ?Sized>(
        &mut self,
        stage: &mut Stage,
        engine: &mut TweenEngine<CardEvent>,
        rng: &mut R,
        container: ElementId,
    ) {
        if !self.pool.is_empty() {
            log::warn!("Particle pool already initialized");
            return;
        }

        for _ in 0..self.config.pool_size {
            let id = stage.spawn(Role::Particle, Some(container));
            let size = self.config.size.sample(rng);
            stage.set_style(id, "position", "absolute");
            stage.set_style(id, "background", "white");
            stage.set_style(id, "border-radius", "50%");
            stage.set_style(id, "pointer-events", "none");
            engine.set(
                stage,
                id,
                &[
                    (Prop::Width(Unit::Px), size),
                    (Prop::Height(Unit::Px), size),
                    (Prop::Opacity, self.config.opacity.sample(rng)),
                    (Prop::Top(Unit::Percent), rng.random_range(0.0..=100.0)),
                    (Prop::Left(Unit::Percent), rng.random_range(0.0..=100.0)),
                ],
            );
            self.pool.push(id);
        }

        self.running = true;
        for &id in &self.pool {
            self.launch(stage, engine, rng, id);
        }
        log::info!("Spawned {} ambient particles", self.pool.len());
    }

    fn launch<R: Rng + ?Sized>(
        &self,
        stage: &mut Stage,
        engine: &mut TweenEngine<CardEvent>,
        rng: &mut R,
        id: ElementId,
    ) {
        let tween = Tween::new(id)
            .by(Prop::Y, -self.config.rise.sample(rng))
            .by(Prop::X, self.config.drift.sample(rng))
            .to(Prop::Opacity, 0.0)
            .duration(self.config.duration.sample(rng))
            .ease(self.config.ease)
            .on_complete(CardEvent::ParticleCycled(id));
        engine.add(stage, tween);
    }

    /// Reset a finished particle to the bottom edge and start its next cycle
    pub fn recycle<R: Rng + ?Sized>(
        &mut self,
        stage: &mut Stage,
        engine: &mut TweenEngine<CardEvent>,
        rng: &mut R,
        id: ElementId,
    ) {
        if !self.running || !self.pool.contains(&id) {
            return;
        }
        engine.set(
            stage,
            id,
            &[
                (Prop::Top(Unit::Percent), self.config.reset_top),
                (Prop::Left(Unit::Percent), rng.random_range(0.0..=100.0)),
                (Prop::Opacity, self.config.opacity.sample(rng)),
                (Prop::X, 0.0),
                (Prop::Y, 0.0),
            ],
        );
        self.launch(stage, engine, rng, id);
    }

    /// Halt every cycle (page teardown); particles stay where they are
    pub fn stop(&mut self, engine: &mut TweenEngine<CardEvent>) {
        self.running = false;
        for &id in &self.pool {
            engine.kill_tweens_of(id);
        }
        log::debug!("Particle loop stopped");
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    pub fn particles(&self) -> &[ElementId] {
        &self.pool
    }

    pub fn len(&self) -> usize {
        self.pool.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pool.is_empty()
    }
}
