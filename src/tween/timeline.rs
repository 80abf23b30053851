//! Ordered sequences of tweens and callbacks

use super::Tween;
use crate::stage::ElementId;

/// Where an entry lands on the timeline
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Position {
    /// Right after everything added so far
    #[default]
    End,
    /// Relative to the current end; negative values overlap (`"-=0.4"`)
    Offset(f32),
    /// Absolute seconds from the timeline start
    At(f32),
}

#[derive(Debug, Clone)]
pub enum Entry<E> {
    Tween { at: f32, tween: Tween<E> },
    Call { at: f32, event: E },
}

/// A builder of timed entries; hand it to `TweenEngine::play`
#[derive(Debug, Clone)]
pub struct Timeline<E> {
    entries: Vec<Entry<E>>,
    end: f32,
}

impl<E> Default for Timeline<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> Timeline<E> {
    pub fn new() -> Self {
        Self {
            entries: Vec::new(),
            end: 0.0,
        }
    }

    fn resolve(&self, position: Position) -> f32 {
        match position {
            Position::End => self.end,
            Position::Offset(offset) => (self.end + offset).max(0.0),
            Position::At(at) => at.max(0.0),
        }
    }

    pub fn add(mut self, tween: Tween<E>, position: Position) -> Self {
        let at = self.resolve(position);
        self.end = self.end.max(at + tween.delay + tween.total_duration());
        self.entries.push(Entry::Tween { at, tween });
        self
    }

    /// Add one tween per target, each starting `stagger` seconds after the last
    pub fn stagger(
        mut self,
        targets: &[ElementId],
        stagger: f32,
        position: Position,
        build: impl Fn(ElementId) -> Tween<E>,
    ) -> Self {
        let base = self.resolve(position);
        for (i, &target) in targets.iter().enumerate() {
            let tween = build(target);
            let at = base + stagger * i as f32;
            self.end = self.end.max(at + tween.delay + tween.total_duration());
            self.entries.push(Entry::Tween { at, tween });
        }
        self
    }

    /// Emit `event` when playback reaches the position
    pub fn call(mut self, event: E, position: Position) -> Self {
        let at = self.resolve(position);
        self.end = self.end.max(at);
        self.entries.push(Entry::Call { at, event });
        self
    }

    /// Time at which the last entry finishes
    pub fn duration(&self) -> f32 {
        self.end
    }

    pub(crate) fn into_entries(self) -> Vec<Entry<E>> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stage::Prop;

    fn fade(target: u32, secs: f32) -> Tween<&'static str> {
        Tween::new(ElementId(target)).to(Prop::Opacity, 1.0).duration(secs)
    }

    fn starts(tl: &Timeline<&'static str>) -> Vec<f32> {
        tl.entries
            .iter()
            .map(|e| match e {
                Entry::Tween { at, .. } | Entry::Call { at, .. } => *at,
            })
            .collect()
    }

    #[test]
    fn test_sequential_with_overlaps() {
        let tl = Timeline::new()
            .add(fade(0, 1.2), Position::End)
            .add(fade(1, 1.0), Position::Offset(-0.8))
            .add(fade(2, 0.8), Position::Offset(-0.5));

        let at = starts(&tl);
        assert!((at[0] - 0.0).abs() < 1e-6);
        assert!((at[1] - 0.4).abs() < 1e-6);
        assert!((at[2] - 0.9).abs() < 1e-6);
        assert!((tl.duration() - 1.7).abs() < 1e-6);
    }

    #[test]
    fn test_absolute_position_does_not_move_end_backwards() {
        let tl = Timeline::new()
            .add(fade(0, 1.2), Position::At(0.0))
            .add(fade(1, 1.4), Position::At(0.0));
        assert!((tl.duration() - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_stagger_spacing() {
        let targets = [ElementId(1), ElementId(2), ElementId(3)];
        let tl = Timeline::new().stagger(&targets, 0.3, Position::End, |t| {
            Tween::new(t).to(Prop::Opacity, 1.0).duration(0.8)
        });
        let at = starts(&tl);
        assert_eq!(at.len(), 3);
        assert!((at[2] - 0.6).abs() < 1e-6);
        assert!((tl.duration() - 1.4).abs() < 1e-6);
    }

    #[test]
    fn test_call_marks_end() {
        let tl = Timeline::new()
            .add(fade(0, 1.0), Position::End)
            .call("done", Position::End);
        let at = starts(&tl);
        assert!((at[1] - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_offset_never_negative() {
        let tl: Timeline<&'static str> = Timeline::new().add(fade(0, 0.5), Position::Offset(-3.0));
        assert_eq!(starts(&tl), vec![0.0]);
    }
}
