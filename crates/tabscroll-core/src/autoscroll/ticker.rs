//! Periodic tick sources
//!
//! The controller only talks to [`TickScheduler`]. Production code uses
//! [`TokioTicker`], which delivers [`Tick`]s over a channel; tests use
//! [`ManualTicker`] and step time by hand.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::trace;

/// One firing of a tick source. `generation` identifies the run that
/// produced it so ticks queued before a restart can be recognised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tick {
    pub generation: u64,
}

/// A cancellable fixed-interval tick source
pub trait TickScheduler {
    /// Start ticking every `interval`, replacing any run in progress
    fn start(&mut self, interval: Duration, generation: u64);

    /// Stop ticking. Must be a no-op when already stopped.
    fn stop(&mut self);

    fn is_active(&self) -> bool;
}

impl<T: TickScheduler + ?Sized> TickScheduler for Box<T> {
    fn start(&mut self, interval: Duration, generation: u64) {
        (**self).start(interval, generation)
    }

    fn stop(&mut self) {
        (**self).stop()
    }

    fn is_active(&self) -> bool {
        (**self).is_active()
    }
}

/// Tick source backed by a tokio interval task
pub struct TokioTicker {
    tx: mpsc::UnboundedSender<Tick>,
    task: Option<JoinHandle<()>>,
}

impl TokioTicker {
    /// Create a ticker and the receiver its ticks arrive on.
    /// `start` must be called from within a tokio runtime.
    pub fn new() -> (Self, mpsc::UnboundedReceiver<Tick>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx, task: None }, rx)
    }
}

impl TickScheduler for TokioTicker {
    fn start(&mut self, interval: Duration, generation: u64) {
        self.stop();

        let tx = self.tx.clone();
        self.task = Some(tokio::spawn(async move {
            let mut ticks = interval_at(Instant::now() + interval, interval);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticks.tick().await;
                if tx.send(Tick { generation }).is_err() {
                    trace!("Tick receiver dropped, stopping ticker task");
                    break;
                }
            }
        }));
    }

    fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            task.abort();
        }
    }

    fn is_active(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for TokioTicker {
    fn drop(&mut self) {
        self.stop();
    }
}

#[derive(Debug, Default)]
struct ManualState {
    run: Option<(Duration, u64)>,
    elapsed: Duration,
    starts: usize,
    stops: usize,
}

/// Deterministic tick source for tests. Clones share state, so a test can
/// keep a handle while the controller owns another.
#[derive(Debug, Clone, Default)]
pub struct ManualTicker {
    state: Rc<RefCell<ManualState>>,
}

impl ManualTicker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The tick the current run would deliver next, if running
    pub fn fire(&self) -> Option<Tick> {
        self.state
            .borrow()
            .run
            .map(|(_, generation)| Tick { generation })
    }

    /// Let `elapsed` pass and return every tick that falls due
    pub fn advance(&self, elapsed: Duration) -> Vec<Tick> {
        let mut state = self.state.borrow_mut();
        let Some((interval, generation)) = state.run else {
            return Vec::new();
        };
        state.elapsed += elapsed;
        let due = (state.elapsed.as_nanos() / interval.as_nanos().max(1)) as usize;
        state.elapsed -= interval * due as u32;
        vec![Tick { generation }; due]
    }

    pub fn interval(&self) -> Option<Duration> {
        self.state.borrow().run.map(|(interval, _)| interval)
    }

    /// Number of `start` calls so far
    pub fn starts(&self) -> usize {
        self.state.borrow().starts
    }

    /// Number of `stop` calls that cancelled a run
    pub fn stops(&self) -> usize {
        self.state.borrow().stops
    }
}

impl TickScheduler for ManualTicker {
    fn start(&mut self, interval: Duration, generation: u64) {
        let mut state = self.state.borrow_mut();
        state.run = Some((interval, generation));
        state.elapsed = Duration::ZERO;
        state.starts += 1;
    }

    fn stop(&mut self) {
        let mut state = self.state.borrow_mut();
        if state.run.take().is_some() {
            state.stops += 1;
        }
        state.elapsed = Duration::ZERO;
    }

    fn is_active(&self) -> bool {
        self.state.borrow().run.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn drain(rx: &mut mpsc::UnboundedReceiver<Tick>) -> Vec<Tick> {
        let mut ticks = Vec::new();
        while let Ok(tick) = rx.try_recv() {
            ticks.push(tick);
        }
        ticks
    }

    #[test]
    fn test_manual_ticker_advance() {
        let mut ticker = ManualTicker::new();
        assert!(ticker.advance(Duration::from_secs(1)).is_empty());

        ticker.start(Duration::from_millis(100), 3);
        assert_eq!(ticker.advance(Duration::from_millis(250)).len(), 2);
        // 50ms carried over from the previous call
        let ticks = ticker.advance(Duration::from_millis(50));
        assert_eq!(ticks, vec![Tick { generation: 3 }]);

        ticker.stop();
        assert!(ticker.fire().is_none());
        assert!(ticker.advance(Duration::from_secs(1)).is_empty());
        assert_eq!(ticker.starts(), 1);
        assert_eq!(ticker.stops(), 1);
    }

    #[test]
    fn test_manual_ticker_stop_is_idempotent() {
        let mut ticker = ManualTicker::new();
        ticker.stop();
        ticker.start(Duration::from_millis(10), 1);
        ticker.stop();
        ticker.stop();
        assert_eq!(ticker.stops(), 1);
        assert!(!ticker.is_active());
    }

    #[test]
    fn test_manual_ticker_clones_share_state() {
        let handle = ManualTicker::new();
        let mut boxed: Box<dyn TickScheduler> = Box::new(handle.clone());
        boxed.start(Duration::from_millis(40), 9);
        assert_eq!(handle.interval(), Some(Duration::from_millis(40)));
        assert_eq!(handle.fire(), Some(Tick { generation: 9 }));
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_ticker_fires_on_interval() {
        let (mut ticker, mut rx) = TokioTicker::new();
        ticker.start(Duration::from_millis(100), 7);

        tokio::time::sleep(Duration::from_millis(350)).await;
        let ticks = drain(&mut rx);
        assert_eq!(ticks.len(), 3);
        assert!(ticks.iter().all(|t| t.generation == 7));

        ticker.stop();
        assert!(!ticker.is_active());
        tokio::time::sleep(Duration::from_millis(500)).await;
        assert!(drain(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_tokio_ticker_restart_replaces_previous_run() {
        let (mut ticker, mut rx) = TokioTicker::new();
        ticker.start(Duration::from_millis(100), 1);
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert_eq!(drain(&mut rx), vec![Tick { generation: 1 }]);

        ticker.start(Duration::from_millis(50), 2);
        tokio::time::sleep(Duration::from_millis(120)).await;
        let ticks = drain(&mut rx);
        assert_eq!(ticks.len(), 2);
        assert!(ticks.iter().all(|t| t.generation == 2));
    }
}
