//! Manual scroll animation
//!
//! The animator never owns the offset: the viewport does. Callers pass the
//! current offset in and apply whatever position the animator hands back.

use std::time::{Duration, Instant};

use super::config::{ManualScrollConfig, ScrollConfigExt};
use super::easing::{EasingType, EasingTypeExt};
use super::timing::{is_complete, lerp, progress};

#[derive(Debug, Clone)]
struct ActiveAnimation {
    start: Instant,
    from: f64,
    to: f64,
    duration: Duration,
    easing: EasingType,
}

#[derive(Debug, Clone, Default)]
pub struct ScrollAnimator {
    animation: Option<ActiveAnimation>,
    config: ManualScrollConfig,
}

impl ScrollAnimator {
    pub fn new(config: ManualScrollConfig) -> Self {
        Self {
            animation: None,
            config,
        }
    }

    #[inline]
    pub fn is_animating(&self) -> bool {
        self.animation.is_some()
    }

    /// Where the running animation will land
    pub fn target(&self) -> Option<f64> {
        self.animation.as_ref().map(|a| a.to)
    }

    /// Glide from `from` to `target`.
    ///
    /// Returns `Some(target)` when the move should be applied at once
    /// (smooth scrolling off, or nothing to animate); otherwise the position
    /// arrives through [`update`](Self::update).
    pub fn scroll_to(&mut self, from: f64, target: f64, now: Instant) -> Option<f64> {
        if !self.config.is_smooth() || from == target {
            self.animation = None;
            return Some(target);
        }

        self.animation = Some(ActiveAnimation {
            start: now,
            from,
            to: target,
            duration: self.config.animation_duration(),
            easing: self.config.easing,
        });
        None
    }

    /// Interpolated position at `now`, or `None` when idle. The animation
    /// is cleared once it reports its final position.
    pub fn update(&mut self, now: Instant) -> Option<f64> {
        let anim = self.animation.as_ref()?;

        if is_complete(anim.start, anim.duration, now) {
            let to = anim.to;
            self.animation = None;
            return Some(to);
        }

        let t = anim.easing.apply(progress(anim.start, anim.duration, now));
        Some(lerp(anim.from, anim.to, t))
    }

    /// Stop where we are
    pub fn cancel(&mut self) {
        self.animation = None;
    }
}
