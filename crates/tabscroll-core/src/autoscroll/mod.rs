//! Auto-scroll core
//!
//! Translates a speed setting into a periodic, fixed-size offset advance on
//! whichever surface is displayed, and pauses while the user interacts with
//! it directly.
//!
//! - `speed` - clamped speed value and the tick interval derived from it
//! - `viewport` - the [`ViewportAdapter`] capability and its [`Extent`]
//! - `ticker` - injectable tick sources (tokio-backed and manual)
//! - `controller` - the [`ScrollSpeedController`] state machine
//!
//! # Usage
//!
//! ```ignore
//! let (ticker, mut ticks) = TokioTicker::new();
//! let mut controller = ScrollSpeedController::new(ticker);
//! controller.set_active_content(&viewport);
//! controller.set_speed(2.5);
//!
//! // In the main loop
//! while let Ok(tick) = ticks.try_recv() {
//!     controller.deliver(tick);
//! }
//! ```

pub mod controller;
pub mod speed;
pub mod ticker;
pub mod viewport;

pub use controller::{ScrollSpeedController, ScrollState, DEFAULT_STEP};
pub use speed::Speed;
pub use ticker::{ManualTicker, Tick, TickScheduler, TokioTicker};
pub use viewport::{Extent, SharedViewport, ViewportAdapter, ViewportRef};
