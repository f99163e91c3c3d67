use std::time::Duration;

pub use tabscroll_core::config::ManualScrollConfig;

pub trait ScrollConfigExt {
    fn animation_duration(&self) -> Duration;

    /// Smooth scrolling is effectively on
    fn is_smooth(&self) -> bool;
}

impl ScrollConfigExt for ManualScrollConfig {
    #[inline]
    fn animation_duration(&self) -> Duration {
        Duration::from_millis(self.animation_duration_ms)
    }

    #[inline]
    fn is_smooth(&self) -> bool {
        self.smooth_enabled && self.animation_duration_ms > 0
    }
}
