//! Loading-animation sequencer.
//!
//! A fixed list of steps, each with a duration, advanced one at a time by a
//! deferred tick. After the last step a single completion fires.
//!
//! Timers go through a [`Scheduler`]. Every run gets a fresh generation
//! number stamped into its ticks, and restarting or cancelling cancels the
//! pending timer and bumps the generation, so a tick from an abandoned run
//! is ignored even if a scheduler delivers it anyway.

use std::time::Duration;

use tracing::{debug, trace};

/// One step of a loading sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Step {
    pub label: &'static str,
    pub duration: Duration,
}

const fn step(label: &'static str, millis: u64) -> Step {
    Step {
        label,
        duration: Duration::from_millis(millis),
    }
}

/// Steps shown while note candidates are "generated".
pub fn note_steps() -> Vec<Step> {
    vec![
        step("Analyzing the requirement and querying the knowledge base", 2500),
        step("Researching trending topics, tags, and reader behavior", 3000),
        step("Drafting titles and an engaging structure", 3500),
        step("Polishing tone for resonance and interaction", 2500),
    ]
}

/// Steps shown while image candidates are "generated".
pub fn image_steps() -> Vec<Step> {
    vec![
        step("Analyzing copy and visual style", 2000),
        step("Composing visual concepts", 2500),
        step("Rendering images", 4000),
        step("Refining color and detail", 2000),
    ]
}

/// Payload of a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    /// Generation of the run that scheduled it.
    pub run: u64,
    /// Index of the step that finishes when the tick fires.
    pub step: usize,
}

/// Handle to a scheduled timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TimerId(u64);

/// A timer queue that hands due ticks back to whoever drives it.
pub trait Scheduler {
    /// Time elapsed on the scheduler's clock.
    fn now(&self) -> Duration;

    /// Schedules `tick` to fire `delay` from now.
    fn schedule(&mut self, delay: Duration, tick: Tick) -> TimerId;

    /// Cancels a pending timer. Returns false if it already fired or was cancelled.
    fn cancel(&mut self, timer: TimerId) -> bool;

    /// Due time of the earliest pending timer.
    fn next_due(&self) -> Option<Duration>;

    /// Removes the earliest pending timer, moving the clock to its due time.
    fn fire_next(&mut self) -> Option<Tick>;
}

impl<S: Scheduler + ?Sized> Scheduler for &mut S {
    fn now(&self) -> Duration {
        (**self).now()
    }

    fn schedule(&mut self, delay: Duration, tick: Tick) -> TimerId {
        (**self).schedule(delay, tick)
    }

    fn cancel(&mut self, timer: TimerId) -> bool {
        (**self).cancel(timer)
    }

    fn next_due(&self) -> Option<Duration> {
        (**self).next_due()
    }

    fn fire_next(&mut self) -> Option<Tick> {
        (**self).fire_next()
    }
}

#[derive(Debug, Clone)]
struct Timer {
    id: TimerId,
    due: Duration,
    tick: Tick,
}

/// Virtual-clock scheduler. Time only moves when a timer fires.
#[derive(Debug, Default)]
pub struct ManualScheduler {
    now: Duration,
    next_id: u64,
    timers: Vec<Timer>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of timers not yet fired or cancelled.
    #[cfg(test)]
    pub fn pending(&self) -> usize {
        self.timers.len()
    }

    fn earliest(&self) -> Option<usize> {
        self.timers
            .iter()
            .enumerate()
            .min_by_key(|(_, t)| (t.due, t.id))
            .map(|(i, _)| i)
    }
}

impl Scheduler for ManualScheduler {
    fn now(&self) -> Duration {
        self.now
    }

    fn schedule(&mut self, delay: Duration, tick: Tick) -> TimerId {
        let id = TimerId(self.next_id);
        self.next_id += 1;
        self.timers.push(Timer {
            id,
            due: self.now + delay,
            tick,
        });
        id
    }

    fn cancel(&mut self, timer: TimerId) -> bool {
        let before = self.timers.len();
        self.timers.retain(|t| t.id != timer);
        self.timers.len() != before
    }

    fn next_due(&self) -> Option<Duration> {
        self.earliest().map(|i| self.timers[i].due)
    }

    fn fire_next(&mut self) -> Option<Tick> {
        let timer = self.timers.remove(self.earliest()?);
        self.now = self.now.max(timer.due);
        Some(timer.tick)
    }
}

/// Where a sequencer stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SequencerState {
    Idle,
    Running { step: usize },
    Complete,
}

/// What a delivered tick did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    /// A step finished and the next one started.
    Advanced { finished: usize, next: usize },

    /// The last step finished. Fires once per run.
    Completed,
}

/// Cancellable step sequencer driven by a [`Scheduler`].
#[derive(Debug)]
pub struct Sequencer<S: Scheduler> {
    steps: Vec<Step>,
    scheduler: S,
    state: SequencerState,
    run: u64,
    pending: Option<TimerId>,
}

impl<S: Scheduler> Sequencer<S> {
    pub fn new(steps: Vec<Step>, scheduler: S) -> Self {
        Self {
            steps,
            scheduler,
            state: SequencerState::Idle,
            run: 0,
            pending: None,
        }
    }

    pub fn state(&self) -> SequencerState {
        self.state
    }

    /// The step in progress, if running.
    pub fn current_step(&self) -> Option<&Step> {
        match self.state {
            SequencerState::Running { step } => self.steps.get(step),
            _ => None,
        }
    }

    pub fn is_running(&self) -> bool {
        matches!(self.state, SequencerState::Running { .. })
    }

    /// Starts a new run, abandoning any run in progress.
    pub fn start(&mut self) {
        self.abandon();
        self.state = SequencerState::Running { step: 0 };
        let delay = self.steps.first().map_or(Duration::ZERO, |s| s.duration);
        self.arm(delay, 0);
        debug!(run = self.run, steps = self.steps.len(), "sequence started");
    }

    /// Stops the current run. Its completion will never fire.
    pub fn cancel(&mut self) {
        if self.is_running() {
            debug!(run = self.run, "sequence cancelled");
        }
        self.abandon();
        self.state = SequencerState::Idle;
    }

    /// Applies a delivered tick. Ticks from other runs or out of order are
    /// ignored and return `None`.
    pub fn on_tick(&mut self, tick: Tick) -> Option<Progress> {
        let SequencerState::Running { step } = self.state else {
            trace!(?tick, "tick while not running");
            return None;
        };
        if tick.run != self.run || tick.step != step {
            trace!(?tick, run = self.run, step, "stale tick");
            return None;
        }
        self.pending = None;

        let next = step + 1;
        if next < self.steps.len() {
            self.state = SequencerState::Running { step: next };
            self.arm(self.steps[next].duration, next);
            Some(Progress::Advanced {
                finished: step,
                next,
            })
        } else {
            self.state = SequencerState::Complete;
            debug!(run = self.run, "sequence complete");
            Some(Progress::Completed)
        }
    }

    /// Drives the scheduler until this run completes or is left without a
    /// pending timer.
    ///
    /// `wait` is called with the time until each tick is due, before it
    /// fires; pass a sleep for real time or a no-op to skip ahead.
    pub fn run_to_completion(
        &mut self,
        mut wait: impl FnMut(Duration),
        mut observe: impl FnMut(&Self, Progress),
    ) {
        while self.is_running() {
            let Some(due) = self.scheduler.next_due() else {
                break;
            };
            wait(due.saturating_sub(self.scheduler.now()));
            let Some(tick) = self.scheduler.fire_next() else {
                break;
            };
            if let Some(progress) = self.on_tick(tick) {
                observe(&*self, progress);
            }
        }
    }

    fn arm(&mut self, delay: Duration, step: usize) {
        let timer = self.scheduler.schedule(delay, Tick { run: self.run, step });
        self.pending = Some(timer);
    }

    fn abandon(&mut self) {
        if let Some(timer) = self.pending.take() {
            self.scheduler.cancel(timer);
        }
        self.run += 1;
    }
}

impl<S: Scheduler> Drop for Sequencer<S> {
    fn drop(&mut self) {
        self.cancel();
    }
}
