//! Frame-stepped tween runner and delayed-call scheduler

use super::timeline::Entry;
use super::{Channel, Ease, Goal, Timeline, Tween};
use crate::stage::{ElementId, Prop, Stage};

/// Handle to a pending delayed call; pass to `TweenEngine::cancel`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskHandle(u64);

/// Identifies everything scheduled by one `TweenEngine::play`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GroupId(u64);

#[derive(Debug)]
struct Running<E> {
    id: u64,
    target: ElementId,
    channels: Vec<Channel>,
    /// (prop, start, end) once started
    resolved: Vec<(Prop, f32, f32)>,
    delay: f32,
    elapsed: f32,
    duration: f32,
    ease: Ease,
    repeat: u32,
    yoyo: bool,
    started: bool,
    dead: bool,
    on_complete: Option<E>,
}

impl<E> Running<E> {
    fn total(&self) -> f32 {
        self.duration * (self.repeat + 1) as f32
    }

    fn start(&mut self, stage: &Stage) {
        self.started = true;
        self.resolved = self
            .channels
            .iter()
            .map(|c| {
                let start = c.from.unwrap_or_else(|| stage.get(self.target, c.prop));
                let end = match c.goal {
                    Goal::To(v) => v,
                    Goal::By(d) => start + d,
                    Goal::Current => stage.get(self.target, c.prop),
                };
                (c.prop, start, end)
            })
            .collect();
    }

    /// Playhead position within the current iteration, direction applied
    fn progress(&self) -> f32 {
        if self.duration <= 0.0 {
            return 1.0;
        }
        let total = self.total();
        if self.elapsed >= total {
            return if self.yoyo && self.repeat % 2 == 1 { 0.0 } else { 1.0 };
        }
        let cycle = (self.elapsed / self.duration).floor();
        let local = (self.elapsed - cycle * self.duration) / self.duration;
        if self.yoyo && (cycle as u32) % 2 == 1 {
            1.0 - local
        } else {
            local
        }
    }

    fn render(&self, stage: &mut Stage) {
        let eased = self.ease.apply(self.progress());
        for &(prop, start, end) in &self.resolved {
            stage.set(self.target, prop, start + (end - start) * eased);
        }
    }
}

#[derive(Debug)]
struct Pending<E> {
    id: u64,
    group: Option<GroupId>,
    at: f64,
    event: E,
}

/// Owns every running tween and delayed call
#[derive(Debug)]
pub struct TweenEngine<E> {
    clock: f64,
    tweens: Vec<Running<E>>,
    calls: Vec<Pending<E>>,
    next_id: u64,
}

impl<E> Default for TweenEngine<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> TweenEngine<E> {
    pub fn new() -> Self {
        Self {
            clock: 0.0,
            tweens: Vec::new(),
            calls: Vec::new(),
            next_id: 1,
        }
    }

    fn next_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    /// Seconds stepped so far
    pub fn clock(&self) -> f64 {
        self.clock
    }

    /// Start a standalone tween
    pub fn add(&mut self, stage: &mut Stage, tween: Tween<E>) {
        let id = self.next_id();
        let mut channels = tween.channels;
        // from/fromTo render their start values immediately
        for channel in channels.iter_mut() {
            if let Some(from) = channel.from {
                if channel.goal == Goal::Current {
                    channel.goal = Goal::To(stage.get(tween.target, channel.prop));
                }
                stage.set(tween.target, channel.prop, from);
            }
        }
        self.tweens.push(Running {
            id,
            target: tween.target,
            channels,
            resolved: Vec::new(),
            delay: tween.delay,
            elapsed: 0.0,
            duration: tween.duration,
            ease: tween.ease,
            repeat: tween.repeat,
            yoyo: tween.yoyo,
            started: false,
            dead: false,
            on_complete: tween.on_complete,
        });
    }

    /// Schedule every entry of a timeline relative to now
    pub fn play(&mut self, stage: &mut Stage, timeline: Timeline<E>) -> GroupId {
        let group = GroupId(self.next_id());
        for entry in timeline.into_entries() {
            match entry {
                Entry::Tween { at, mut tween } => {
                    tween.delay += at;
                    self.add(stage, tween);
                }
                Entry::Call { at, event } => {
                    let id = self.next_id();
                    self.calls.push(Pending {
                        id,
                        group: Some(group),
                        at: self.clock + at as f64,
                        event,
                    });
                }
            }
        }
        group
    }

    /// Assign props immediately without animating
    pub fn set(&mut self, stage: &mut Stage, target: ElementId, props: &[(Prop, f32)]) {
        for &(prop, value) in props {
            stage.set(target, prop, value);
        }
    }

    /// Emit `event` after `delay` seconds unless cancelled first
    pub fn delayed_call(&mut self, delay: f32, event: E) -> TaskHandle {
        let id = self.next_id();
        self.calls.push(Pending {
            id,
            group: None,
            at: self.clock + delay.max(0.0) as f64,
            event,
        });
        TaskHandle(id)
    }

    /// Cancel a pending delayed call; false if it already fired
    pub fn cancel(&mut self, handle: TaskHandle) -> bool {
        let before = self.calls.len();
        self.calls.retain(|c| c.id != handle.0);
        self.calls.len() != before
    }

    pub fn is_pending(&self, handle: TaskHandle) -> bool {
        self.calls.iter().any(|c| c.id == handle.0)
    }

    /// Drop a timeline's unfired callbacks, leaving its tweens running
    pub fn cancel_group_calls(&mut self, group: GroupId) -> usize {
        let before = self.calls.len();
        self.calls.retain(|c| c.group != Some(group));
        before - self.calls.len()
    }

    /// Stop every tween on `target` without emitting completions
    pub fn kill_tweens_of(&mut self, target: ElementId) -> usize {
        let before = self.tweens.len();
        self.tweens.retain(|t| t.target != target);
        before - self.tweens.len()
    }

    pub fn is_tweening(&self, target: ElementId) -> bool {
        self.tweens.iter().any(|t| t.target == target && !t.dead)
    }

    pub fn active_tweens(&self) -> usize {
        self.tweens.len()
    }

    pub fn pending_calls(&self) -> usize {
        self.calls.len()
    }

    /// Advance time by `dt` seconds, writing values into the stage.
    ///
    /// Returns completion events and due callbacks ordered by the moment
    /// they happened within the step.
    pub fn tick(&mut self, stage: &mut Stage, dt: f32) -> Vec<E> {
        let dt = dt.max(0.0);
        let step_start = self.clock;
        self.clock += dt as f64;

        let mut fired: Vec<(f64, u64, E)> = Vec::new();
        let mut started_now: Vec<usize> = Vec::new();

        for (index, tween) in self.tweens.iter_mut().enumerate() {
            if tween.dead {
                continue;
            }
            if !stage.contains(tween.target) {
                tween.dead = true;
                continue;
            }

            let mut budget = dt;
            if tween.delay > 0.0 {
                if budget < tween.delay {
                    tween.delay -= budget;
                    continue;
                }
                budget -= tween.delay;
                tween.delay = 0.0;
            }

            if !tween.started {
                tween.start(stage);
                started_now.push(index);
            }

            let total = tween.total();
            let remaining = total - tween.elapsed;
            tween.elapsed = (tween.elapsed + budget).min(total);
            tween.render(stage);

            if tween.elapsed >= total {
                tween.dead = true;
                if let Some(event) = tween.on_complete.take() {
                    let at = step_start + (dt - budget) as f64 + remaining as f64;
                    fired.push((at, tween.id, event));
                }
            }
        }

        self.overwrite(&started_now);
        self.tweens.retain(|t| !t.dead);

        let clock = self.clock;
        let (due, waiting): (Vec<_>, Vec<_>) = std::mem::take(&mut self.calls)
            .into_iter()
            .partition(|c| c.at <= clock + 1e-9);
        self.calls = waiting;
        fired.extend(due.into_iter().map(|c| (c.at, c.id, c.event)));

        fired.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        fired.into_iter().map(|(_, _, event)| event).collect()
    }

    /// Newly started tweens take over their props from older running ones
    fn overwrite(&mut self, started_now: &[usize]) {
        for &index in started_now {
            let (id, target) = (self.tweens[index].id, self.tweens[index].target);
            let props: Vec<Prop> = self.tweens[index].channels.iter().map(|c| c.prop).collect();

            for other in self.tweens.iter_mut() {
                if other.id >= id || other.target != target || !other.started || other.dead {
                    continue;
                }
                other.channels.retain(|c| !props.contains(&c.prop));
                other.resolved.retain(|(p, _, _)| !props.contains(p));
                if other.channels.is_empty() {
                    other.dead = true;
                    other.on_complete = None;
                }
            }
        }
    }
}
