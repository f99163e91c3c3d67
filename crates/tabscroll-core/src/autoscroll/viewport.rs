//! The capability the controller scrolls through

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// How much content exists, how much is visible and where the view is
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Extent {
    pub content_size: f64,
    pub viewport_size: f64,
    pub current_offset: f64,
}

impl Extent {
    pub fn new(content_size: f64, viewport_size: f64, current_offset: f64) -> Self {
        Self {
            content_size,
            viewport_size,
            current_offset,
        }
    }

    /// Largest valid offset; zero when the content fits in the viewport
    #[inline]
    pub fn max_offset(&self) -> f64 {
        (self.content_size - self.viewport_size).max(0.0)
    }

    /// Clamp an offset into `[0, max_offset]`
    #[inline]
    pub fn clamp(&self, offset: f64) -> f64 {
        offset.clamp(0.0, self.max_offset())
    }

    #[inline]
    pub fn at_end(&self) -> bool {
        self.current_offset >= self.max_offset()
    }

    /// Scroll progress in [0, 1]
    pub fn progress(&self) -> f64 {
        let max = self.max_offset();
        if max <= 0.0 {
            1.0
        } else {
            (self.current_offset / max).clamp(0.0, 1.0)
        }
    }
}

/// A displayed content surface (text flow or paginated document).
///
/// Implementations keep `current_offset` clamped themselves and must apply
/// `set_offset` immediately, without animation.
pub trait ViewportAdapter {
    fn extent(&self) -> Extent;

    fn set_offset(&mut self, offset: f64);
}

/// Owning handle the application keeps for the displayed surface
pub type SharedViewport = Rc<RefCell<dyn ViewportAdapter>>;

/// Back-reference the controller keeps; it never owns the surface
pub type ViewportRef = Weak<RefCell<dyn ViewportAdapter>>;
