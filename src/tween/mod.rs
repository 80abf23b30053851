//! Property tweening
//!
//! A small GSAP-shaped animation engine:
//! - `Tween`: animate props of one element over a duration with an ease
//! - `Timeline`: ordered tweens and callbacks with overlaps and staggers
//! - `TweenEngine`: steps everything by explicit `dt` and reports
//!   completion events back to the caller instead of invoking callbacks

pub mod ease;
pub mod engine;
pub mod timeline;

pub use ease::Ease;
pub use engine::{GroupId, TaskHandle, TweenEngine};
pub use timeline::{Position, Timeline};

use crate::stage::{ElementId, Prop};

/// Where a channel ends up
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Goal {
    /// Absolute end value
    To(f32),
    /// Relative to the value when the tween starts (`"+=n"` / `"-=n"`)
    By(f32),
    /// The value the property had when the tween was created
    Current,
}

/// One animated property
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Channel {
    pub prop: Prop,
    /// Explicit start value, applied as soon as the tween is created
    pub from: Option<f32>,
    pub goal: Goal,
}

/// Description of a single tween, completed by an optional event `E`
#[derive(Debug, Clone)]
pub struct Tween<E> {
    pub target: ElementId,
    pub channels: Vec<Channel>,
    pub duration: f32,
    pub delay: f32,
    pub ease: Ease,
    /// Extra plays after the first
    pub repeat: u32,
    /// Alternate direction on each repeat
    pub yoyo: bool,
    pub on_complete: Option<E>,
}

impl<E> Tween<E> {
    /// Default duration matches GSAP (0.5s)
    pub const DEFAULT_DURATION: f32 = 0.5;

    pub fn new(target: ElementId) -> Self {
        Self {
            target,
            channels: Vec::new(),
            duration: Self::DEFAULT_DURATION,
            delay: 0.0,
            ease: Ease::default(),
            repeat: 0,
            yoyo: false,
            on_complete: None,
        }
    }

    /// Animate `prop` to an absolute value
    pub fn to(mut self, prop: Prop, value: f32) -> Self {
        self.push(prop, None, Goal::To(value));
        self
    }

    /// Animate `prop` by a relative delta
    pub fn by(mut self, prop: Prop, delta: f32) -> Self {
        self.push(prop, None, Goal::By(delta));
        self
    }

    /// Jump `prop` to `value` now, then animate back to its current value
    pub fn from(mut self, prop: Prop, value: f32) -> Self {
        self.push(prop, Some(value), Goal::Current);
        self
    }

    /// Jump `prop` to `start` now, then animate to `end`
    pub fn from_to(mut self, prop: Prop, start: f32, end: f32) -> Self {
        self.push(prop, Some(start), Goal::To(end));
        self
    }

    fn push(&mut self, prop: Prop, from: Option<f32>, goal: Goal) {
        self.channels.retain(|c| c.prop != prop);
        self.channels.push(Channel { prop, from, goal });
    }

    pub fn duration(mut self, secs: f32) -> Self {
        self.duration = secs.max(0.0);
        self
    }

    pub fn delay(mut self, secs: f32) -> Self {
        self.delay = secs.max(0.0);
        self
    }

    pub fn ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    pub fn repeat(mut self, count: u32) -> Self {
        self.repeat = count;
        self
    }

    pub fn yoyo(mut self, yoyo: bool) -> Self {
        self.yoyo = yoyo;
        self
    }

    pub fn on_complete(mut self, event: E) -> Self {
        self.on_complete = Some(event);
        self
    }

    /// Play time including repeats, excluding delay
    pub fn total_duration(&self) -> f32 {
        self.duration * (self.repeat + 1) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_replaces_duplicate_props() {
        let tween: Tween<()> = Tween::new(ElementId(0))
            .to(Prop::Opacity, 1.0)
            .to(Prop::Opacity, 0.0);
        assert_eq!(tween.channels.len(), 1);
        assert_eq!(tween.channels[0].goal, Goal::To(0.0));
    }

    #[test]
    fn test_total_duration_counts_repeats() {
        let tween: Tween<()> = Tween::new(ElementId(0)).duration(0.3).repeat(1).yoyo(true);
        assert!((tween.total_duration() - 0.6).abs() < 1e-6);
    }
}
