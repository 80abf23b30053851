//! The greeting page controller
//!
//! `Greeting` owns every piece of UI state (card state, music flag, effect
//! pools) and receives browser events through plain method calls. The
//! browser layer calls `frame` once per animation frame and applies the
//! returned `DomOp`s.

use glam::Vec2;
use rand::SeedableRng;
use rand_pcg::Pcg32;

use crate::audio::Playback;
use crate::card::{
    CardController, CardState, EntrancePhase, EntranceSequencer, Markup, ModalHost, MusicToggle,
    RevealGate, Tilt, TiltMapper, Viewport, heart, lifecycle,
};
use crate::error::Result;
use crate::event::CardEvent;
use crate::fx::{ParticleRecycler, SparkleEmitter};
use crate::settings::Settings;
use crate::stage::{DomOp, Role, Stage};
use crate::tween::TweenEngine;

/// Longest step fed to the engine (tab switches, debugger pauses)
pub const MAX_FRAME_DT: f32 = 0.1;

/// What a click landed on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// A button or link
    Control,
    /// Anything else
    Surface,
}

pub struct Greeting {
    settings: Settings,
    stage: Stage,
    engine: TweenEngine<CardEvent>,
    rng: Pcg32,
    markup: Markup,
    viewport: Viewport,
    entrance: EntranceSequencer,
    card: CardController,
    tilt: TiltMapper,
    particles: ParticleRecycler,
    sparkles: SparkleEmitter,
    music: MusicToggle,
    modal: ModalHost,
    reveal: RevealGate,
}

impl Greeting {
    /// Build the controller over a stage whose markup roles are adopted
    pub fn new(settings: Settings, stage: Stage, viewport: Viewport, seed: u64) -> Result<Self> {
        let markup = Markup::from_stage(&stage)?;
        Ok(Self {
            card: CardController::new(settings.features.ending_reveal, settings.ending_delay),
            tilt: TiltMapper::new(settings.tilt),
            particles: ParticleRecycler::new(settings.effects.particles.clone()),
            sparkles: SparkleEmitter::new(settings.effects.sparkles.clone()),
            settings,
            stage,
            engine: TweenEngine::new(),
            rng: Pcg32::seed_from_u64(seed),
            markup,
            viewport,
            entrance: EntranceSequencer::new(),
            music: MusicToggle::new(),
            modal: ModalHost::new(),
            reveal: RevealGate::default(),
        })
    }

    /// Document ready: start the ambient particle loop
    pub fn on_ready(&mut self) {
        self.particles.init(
            &mut self.stage,
            &mut self.engine,
            &mut self.rng,
            self.markup.particle_field,
        );
    }

    /// Window loaded: run the loader and then the entrance reveal
    pub fn on_load(&mut self) {
        self.entrance
            .start(&mut self.stage, &mut self.engine, &self.markup);
    }

    pub fn on_resize(&mut self, width: f32, height: f32) {
        self.viewport = Viewport::new(width, height);
    }

    pub fn on_pointer_move(&mut self, x: f32, y: f32) -> Option<Tilt> {
        self.tilt.pointer_move(
            &mut self.stage,
            &mut self.engine,
            &self.markup,
            self.viewport,
            Vec2::new(x, y),
            self.card.state(),
        )
    }

    pub fn on_pointer_leave(&mut self) {
        if self.settings.features.reset_on_leave {
            self.tilt
                .pointer_leave(&mut self.stage, &mut self.engine, &self.markup);
        }
    }

    /// Device orientation; an angle the device does not report counts as 0
    pub fn on_orientation(&mut self, beta: Option<f32>, gamma: Option<f32>) -> Option<Tilt> {
        self.tilt.orientation(
            &mut self.stage,
            &mut self.engine,
            &self.markup,
            self.viewport,
            beta.unwrap_or(0.0),
            gamma.unwrap_or(0.0),
            self.card.state(),
        )
    }

    /// Global click: sparkle burst unless excluded; returns sparkles emitted
    pub fn on_click(&mut self, x: f32, y: f32, target: ClickTarget) -> usize {
        if target == ClickTarget::Control && self.settings.features.exclude_controls {
            return 0;
        }
        let count = self.settings.effects.sparkles.click_burst;
        self.sparkles
            .burst(&mut self.stage, &mut self.engine, &mut self.rng, x, y, count)
            .len()
    }

    pub fn open_card(&mut self) -> bool {
        self.card
            .open(&mut self.stage, &mut self.engine, &self.markup)
    }

    pub fn close_card(&mut self) -> bool {
        self.card
            .close(&mut self.stage, &mut self.engine, &self.markup)
    }

    pub fn replay(&mut self) {
        self.card.replay(&mut self.stage, &self.markup);
    }

    pub fn toggle_music(&mut self, media: &mut dyn Playback) -> bool {
        self.music.toggle(&mut self.stage, &self.markup, media)
    }

    /// Heart tap: pulse, toast and a reward burst at the viewport centre
    pub fn heart_tap(&mut self) {
        if !self.settings.features.heart_reward {
            return;
        }
        heart::pulse(&mut self.stage, &mut self.engine, &self.markup);
        let center = self.viewport.center();
        let count = self.settings.effects.sparkles.reward_burst;
        self.sparkles.burst(
            &mut self.stage,
            &mut self.engine,
            &mut self.rng,
            center.x,
            center.y,
            count,
        );
    }

    pub fn open_modal(&mut self) {
        self.modal.open(&mut self.stage, &self.markup);
    }

    pub fn close_modal(&mut self) {
        self.modal.close(&mut self.stage, &self.markup);
    }

    pub fn on_intersection(&mut self, intersecting: bool, ratio: f32) -> bool {
        self.reveal
            .observe(&mut self.stage, &self.markup, intersecting, ratio)
    }

    /// Stop the perpetual particle loop (page teardown)
    pub fn teardown(&mut self) {
        self.particles.stop(&mut self.engine);
    }

    /// Advance all animations by `dt` seconds and return DOM updates
    pub fn frame(&mut self, dt: f32) -> Vec<DomOp> {
        let dt = dt.clamp(0.0, MAX_FRAME_DT);
        let events = self.engine.tick(&mut self.stage, dt);
        for event in events {
            self.dispatch(event);
        }
        self.stage.flush()
    }

    fn dispatch(&mut self, event: CardEvent) {
        match event {
            CardEvent::LoaderDone => {
                self.entrance
                    .on_loader_done(&mut self.stage, &mut self.engine, &self.markup);
            }
            CardEvent::EntranceDone => self.entrance.on_entrance_done(),
            CardEvent::OpenSequenceDone => {
                self.card
                    .on_open_sequence_done(&mut self.stage, &mut self.engine, &self.markup);
            }
            CardEvent::EndingDue => {
                self.card
                    .on_ending_due(&mut self.stage, &mut self.engine, &self.markup);
            }
            CardEvent::ParticleCycled(id) => {
                self.particles
                    .recycle(&mut self.stage, &mut self.engine, &mut self.rng, id);
            }
            CardEvent::Despawn(id) => {
                self.stage.remove(id);
            }
            CardEvent::HeartPopped => {
                heart::pop_toast(&mut self.stage, &mut self.engine, &self.markup);
            }
        }
    }

    // === Queries ===

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    pub fn markup(&self) -> &Markup {
        &self.markup
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn card_state(&self) -> CardState {
        self.card.state()
    }

    pub fn entrance_phase(&self) -> EntrancePhase {
        self.entrance.phase()
    }

    pub fn music_playing(&self) -> bool {
        self.music.is_playing()
    }

    pub fn modal_open(&self) -> bool {
        self.modal.is_open()
    }

    pub fn particle_count(&self) -> usize {
        self.stage.count(Role::Particle)
    }

    pub fn live_sparkles(&self) -> usize {
        self.stage.count(Role::Sparkle)
    }

    pub fn ending_active(&self) -> bool {
        self.stage
            .has_class(self.markup.ending_scene, lifecycle::ACTIVE_CLASS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::SilentPlayback;
    use crate::card::music::{PAUSE_LABEL, PLAY_LABEL, PLAYING_CLASS};
    use crate::settings::Variant;
    use crate::stage::Prop;

    const DT: f32 = 1.0 / 60.0;
    const DESKTOP: Viewport = Viewport {
        width: 1440.0,
        height: 900.0,
    };

    fn greeting(variant: Variant, viewport: Viewport) -> Greeting {
        let mut stage = Stage::new();
        Markup::build(&mut stage, 4, 3).expect("markup");
        let mut g = Greeting::new(Settings::from_variant(variant), stage, viewport, 2024)
            .expect("greeting");
        g.on_ready();
        g
    }

    fn run(g: &mut Greeting, secs: f32) {
        for _ in 0..(secs / DT).round() as usize {
            g.frame(DT);
        }
    }

    #[test]
    fn test_particle_pool_invariant() {
        for (variant, size) in [(Variant::Classic, 20), (Variant::Deluxe, 25)] {
            let mut g = greeting(variant, DESKTOP);
            assert_eq!(g.particle_count(), size);
            for _ in 0..6 {
                run(&mut g, 5.0);
                assert_eq!(g.particle_count(), size);
            }
        }
    }

    #[test]
    fn test_sparkles_never_accumulate() {
        let mut g = greeting(Variant::Deluxe, DESKTOP);
        let mut emitted = 0;
        for i in 0..5 {
            emitted += g.on_click(100.0 + i as f32, 200.0, ClickTarget::Surface);
            run(&mut g, 0.1);
        }
        assert_eq!(emitted, 50);
        assert!(g.live_sparkles() > 0);

        run(&mut g, 2.0);
        assert_eq!(g.live_sparkles(), 0);
    }

    #[test]
    fn test_card_state_toggles() {
        let mut g = greeting(Variant::Deluxe, DESKTOP);
        assert_eq!(g.card_state(), CardState::Closed);
        assert!(g.open_card());
        assert!(!g.open_card());
        assert_eq!(g.card_state(), CardState::Open);
        run(&mut g, 5.0);

        let scale = g.stage().get(g.markup().card, Prop::Scale);
        assert!(!g.open_card());
        run(&mut g, 1.0);
        assert_eq!(g.stage().get(g.markup().card, Prop::Scale), scale);

        assert!(g.close_card());
        assert_eq!(g.card_state(), CardState::Closed);
    }

    #[test]
    fn test_ending_suppressed_by_early_close() {
        let mut g = greeting(Variant::Deluxe, DESKTOP);
        g.open_card();
        run(&mut g, 1.0);
        g.close_card();
        run(&mut g, 2.0);
        assert!(!g.ending_active());
        run(&mut g, 10.0);
        assert!(!g.ending_active());
    }

    #[test]
    fn test_ending_shows_when_left_open() {
        let mut g = greeting(Variant::Deluxe, DESKTOP);
        g.open_card();
        run(&mut g, 10.0);
        assert!(g.ending_active());
        g.replay();
        assert!(!g.ending_active());
    }

    #[test]
    fn test_narrow_viewport_no_rotation() {
        let mut g = greeting(Variant::Deluxe, Viewport::new(800.0, 600.0));
        assert!(g.on_pointer_move(10.0, 10.0).is_none());
        run(&mut g, 1.0);
        assert_eq!(g.stage().get(g.markup().card, Prop::RotationX), 0.0);
        assert_eq!(g.stage().get(g.markup().card, Prop::RotationY), 0.0);

        g.on_resize(1280.0, 800.0);
        assert!(g.on_pointer_move(10.0, 10.0).is_some());
    }

    #[test]
    fn test_orientation_missing_angle_is_zero() {
        let mut g = greeting(Variant::Deluxe, Viewport::new(390.0, 844.0));
        let tilt = g.on_orientation(None, Some(10.0)).expect("closed card tilts");
        assert_eq!(tilt.rotation_x, 0.0);
        assert!((tilt.rotation_y - 0.5).abs() < 1e-5);

        let tilt = g.on_orientation(None, None).expect("closed card tilts");
        assert_eq!(tilt, Tilt::default());

        g.open_card();
        assert!(g.on_orientation(Some(5.0), Some(5.0)).is_none());
    }

    #[test]
    fn test_music_toggle_labels() {
        let mut g = greeting(Variant::Deluxe, DESKTOP);
        let mut media = SilentPlayback;
        let (button, label) = (g.markup().music_button, g.markup().music_label);

        assert!(g.toggle_music(&mut media));
        assert_eq!(g.stage().text(label), Some(PAUSE_LABEL));
        assert!(g.stage().has_class(button, PLAYING_CLASS));

        assert!(!g.toggle_music(&mut media));
        assert_eq!(g.stage().text(label), Some(PLAY_LABEL));
        assert!(!g.stage().has_class(button, PLAYING_CLASS));
    }

    #[test]
    fn test_controls_excluded_from_sparkles() {
        let mut g = greeting(Variant::Deluxe, DESKTOP);
        assert_eq!(g.on_click(50.0, 50.0, ClickTarget::Control), 0);
        assert_eq!(g.live_sparkles(), 0);
        assert_eq!(g.on_click(50.0, 50.0, ClickTarget::Surface), 10);

        let mut classic = greeting(Variant::Classic, DESKTOP);
        assert_eq!(classic.on_click(50.0, 50.0, ClickTarget::Control), 8);
    }

    #[test]
    fn test_heart_reward_cleans_up() {
        let mut g = greeting(Variant::Deluxe, DESKTOP);
        g.heart_tap();
        assert_eq!(g.live_sparkles(), 10);
        run(&mut g, 0.7);
        assert_eq!(g.stage().count(Role::Toast), 1);
        run(&mut g, 3.0);
        assert_eq!(g.stage().count(Role::Toast), 0);
        assert_eq!(g.live_sparkles(), 0);

        let mut classic = greeting(Variant::Classic, DESKTOP);
        classic.heart_tap();
        assert_eq!(classic.live_sparkles(), 0);
    }

    #[test]
    fn test_load_runs_entrance_once() {
        let mut g = greeting(Variant::Deluxe, DESKTOP);
        g.on_load();
        run(&mut g, 6.0);
        assert_eq!(g.entrance_phase(), EntrancePhase::Done);
        g.on_load();
        assert_eq!(g.entrance_phase(), EntrancePhase::Done);
    }

    #[test]
    fn test_pointer_leave_depends_on_variant() {
        let mut classic = greeting(Variant::Classic, DESKTOP);
        classic.on_pointer_move(0.0, 0.0);
        run(&mut classic, 1.0);
        classic.on_pointer_leave();
        run(&mut classic, 2.0);
        assert!(classic.stage().get(classic.markup().card, Prop::RotationY).abs() < 1e-3);

        let mut deluxe = greeting(Variant::Deluxe, DESKTOP);
        deluxe.on_pointer_move(0.0, 0.0);
        run(&mut deluxe, 1.0);
        deluxe.on_pointer_leave();
        run(&mut deluxe, 2.0);
        assert!(deluxe.stage().get(deluxe.markup().card, Prop::RotationY).abs() > 1.0);
    }

    #[test]
    fn test_frame_emits_dom_ops() {
        let mut g = greeting(Variant::Deluxe, DESKTOP);
        let ops = g.frame(DT);
        let creates = ops
            .iter()
            .filter(|op| matches!(op, DomOp::Create { role: Role::Particle, .. }))
            .count();
        assert_eq!(creates, 25);
        assert!(!g.frame(DT).is_empty());
    }

    #[test]
    fn test_teardown_stops_particles() {
        let mut g = greeting(Variant::Deluxe, DESKTOP);
        g.teardown();
        run(&mut g, 10.0);
        assert_eq!(g.particle_count(), 25);
        assert!(g.frame(DT).is_empty());
    }
}
