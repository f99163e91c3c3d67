//! Smooth manual scrolling
//!
//! Keyboard and mouse-wheel scrolling glide to their target with an easing
//! curve. Auto-scroll stays suspended for the whole glide and picks up from
//! wherever it lands.
//!
//! - `easing` - easing curves mapping [0, 1] to [0, 1]
//! - `timing` - progress and interpolation helpers
//! - `config` - helpers over `ManualScrollConfig` from tabscroll-core
//! - `animation` - the animator combining the above

pub mod config;
pub mod easing;
pub mod timing;

pub mod animation;

pub use animation::ScrollAnimator;
pub use config::{ManualScrollConfig, ScrollConfigExt};
pub use easing::{EasingType, EasingTypeExt};
