//! Auto-scroll state machine
//!
//! ```text
//! Idle      --set_speed(>0)-------------------------------> Running
//! Running   --set_speed(0)--------------------------------> Idle
//! Running   --begin_manual_interaction--------------------> Suspended
//! Suspended --end_manual_interaction (last one, speed>0)--> Running
//! Suspended --end_manual_interaction (last one, speed=0)--> Idle
//! Suspended --set_speed(any)------------------------------> Suspended
//! any       --set_active_content--------------------------> Idle, re-evaluated
//! ```

use std::rc::{Rc, Weak};
use std::time::Duration;

use tracing::{debug, trace};

use super::speed::Speed;
use super::ticker::{Tick, TickScheduler};
use super::viewport::{SharedViewport, ViewportRef};

/// Default per-tick advance in scroll units
pub const DEFAULT_STEP: f64 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScrollState {
    /// No content, or speed is zero
    Idle,
    /// Tick source active
    Running,
    /// A manual interaction is in progress; speed is kept for resuming
    Suspended,
}

impl ScrollState {
    pub fn label(&self) -> &'static str {
        match self {
            ScrollState::Idle => "IDLE",
            ScrollState::Running => "SCROLLING",
            ScrollState::Suspended => "PAUSED",
        }
    }
}

/// Turns a speed setting into a periodic offset advance on the active
/// viewport, pausing while manual interactions are in progress.
pub struct ScrollSpeedController<S: TickScheduler> {
    scheduler: S,
    /// Remembered speed, kept across suspensions
    speed: Speed,
    state: ScrollState,
    /// Count of overlapping manual interactions
    interactions: u32,
    content: Option<ViewportRef>,
    /// Bumped on every start/stop; ticks from other generations are stale
    generation: u64,
    step: f64,
}

impl<S: TickScheduler> ScrollSpeedController<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            speed: Speed::ZERO,
            state: ScrollState::Idle,
            interactions: 0,
            content: None,
            generation: 0,
            step: DEFAULT_STEP,
        }
    }

    /// Override the per-tick advance. Non-positive or non-finite values
    /// keep the default.
    pub fn with_step(mut self, step: f64) -> Self {
        if step.is_finite() && step > 0.0 {
            self.step = step;
        }
        self
    }

    #[inline]
    pub fn state(&self) -> ScrollState {
        self.state
    }

    #[inline]
    pub fn speed(&self) -> Speed {
        self.speed
    }

    #[inline]
    pub fn step(&self) -> f64 {
        self.step
    }

    pub fn tick_interval(&self) -> Option<Duration> {
        self.speed.tick_interval()
    }

    /// Number of manual interactions currently in progress
    pub fn active_interactions(&self) -> u32 {
        self.interactions
    }

    pub fn has_content(&self) -> bool {
        self.content
            .as_ref()
            .is_some_and(|content| content.strong_count() > 0)
    }

    /// Set the speed. Values are clamped, never rejected.
    pub fn set_speed(&mut self, value: impl Into<Speed>) {
        let speed = value.into();
        let previous = self.speed;
        self.speed = speed;

        match self.state {
            ScrollState::Suspended => {
                debug!(%speed, "Speed changed while suspended, will apply on resume");
            }
            ScrollState::Running => {
                if speed == previous {
                    return;
                }
                self.stop_ticking();
                self.state = ScrollState::Idle;
                self.evaluate();
            }
            ScrollState::Idle => self.evaluate(),
        }
    }

    /// Start of a manual interaction (drag, manual scroll, hold).
    /// Calls nest; each must be matched by `end_manual_interaction`.
    pub fn begin_manual_interaction(&mut self) {
        self.interactions = self.interactions.saturating_add(1);
        if self.state == ScrollState::Running {
            self.stop_ticking();
            self.state = ScrollState::Suspended;
            debug!("Auto-scroll suspended");
        }
        trace!(interactions = self.interactions, "Manual interaction began");
    }

    /// End of a manual interaction. Unmatched calls are ignored.
    pub fn end_manual_interaction(&mut self) {
        if self.interactions == 0 {
            trace!("Unmatched end of manual interaction ignored");
            return;
        }
        self.interactions -= 1;
        trace!(interactions = self.interactions, "Manual interaction ended");

        if self.interactions == 0 && self.state == ScrollState::Suspended {
            self.state = ScrollState::Idle;
            self.evaluate();
        }
    }

    /// Point the controller at a new surface. The previous run is cancelled
    /// and scrolling restarts from the new surface's own offset.
    pub fn set_active_content(&mut self, content: &SharedViewport) {
        self.stop_ticking();
        self.state = ScrollState::Idle;
        self.content = Some(Rc::downgrade(content));
        self.evaluate();
    }

    /// Forget the active surface (document dismissed)
    pub fn clear_active_content(&mut self) {
        self.stop_ticking();
        self.state = ScrollState::Idle;
        self.content = None;
        debug!("Active content cleared");
    }

    /// Route a tick from the scheduler. Ticks from a cancelled run are
    /// dropped. Returns true if the offset moved.
    pub fn deliver(&mut self, tick: Tick) -> bool {
        if tick.generation != self.generation {
            trace!(
                tick = tick.generation,
                current = self.generation,
                "Dropping stale tick"
            );
            return false;
        }
        self.on_tick()
    }

    /// Advance the active surface by one step, clamped to its bottom.
    /// Returns true if the offset moved.
    pub fn on_tick(&mut self) -> bool {
        if self.state != ScrollState::Running {
            return false;
        }
        let Some(content) = self.content.as_ref().and_then(Weak::upgrade) else {
            return false;
        };
        let Ok(mut content) = content.try_borrow_mut() else {
            return false;
        };

        let extent = content.extent();
        let next = (extent.current_offset + self.step)
            .min(extent.max_offset())
            .max(0.0);
        if next == extent.current_offset {
            return false;
        }
        content.set_offset(next);
        true
    }

    /// Settle into Idle, Suspended or Running from a stopped state
    fn evaluate(&mut self) {
        let Some(interval) = self.speed.tick_interval() else {
            self.state = ScrollState::Idle;
            return;
        };
        if !self.has_content() {
            self.state = ScrollState::Idle;
        } else if self.interactions > 0 {
            self.state = ScrollState::Suspended;
        } else {
            self.generation += 1;
            self.scheduler.start(interval, self.generation);
            self.state = ScrollState::Running;
            debug!(
                speed = %self.speed,
                interval_ms = interval.as_millis() as u64,
                "Auto-scroll running"
            );
        }
    }

    fn stop_ticking(&mut self) {
        if self.scheduler.is_active() {
            self.scheduler.stop();
        }
        self.generation += 1;
    }
}

impl<S: TickScheduler> Drop for ScrollSpeedController<S> {
    fn drop(&mut self) {
        self.scheduler.stop();
    }
}
