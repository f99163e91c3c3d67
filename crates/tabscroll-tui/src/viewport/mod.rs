//! Scrollable surfaces for the two document kinds
//!
//! Offsets are measured in scroll units; one terminal row spans
//! `units_per_line` units, so auto-scroll can advance by less than a row per
//! tick and still look continuous.

mod paged;
mod text;

use std::cell::RefCell;
use std::rc::Rc;

use tabscroll_core::autoscroll::{Extent, SharedViewport, ViewportAdapter};
use tabscroll_core::Document;

pub use paged::{PageRow, PagedViewport};
pub use text::{wrap_text, TextViewport};

const FALLBACK_UNITS_PER_LINE: f64 = 16.0;

/// Row-based scroll bookkeeping shared by both surfaces
#[derive(Debug, Clone)]
pub struct ScrollSurface {
    content_rows: usize,
    viewport_rows: u16,
    offset: f64,
    units_per_line: f64,
}

impl ScrollSurface {
    pub fn new(units_per_line: f64) -> Self {
        let units_per_line = if units_per_line.is_finite() && units_per_line > 0.0 {
            units_per_line
        } else {
            FALLBACK_UNITS_PER_LINE
        };
        Self {
            content_rows: 0,
            viewport_rows: 0,
            offset: 0.0,
            units_per_line,
        }
    }

    pub fn extent(&self) -> Extent {
        Extent::new(
            self.content_rows as f64 * self.units_per_line,
            self.viewport_rows as f64 * self.units_per_line,
            self.offset,
        )
    }

    /// Clamped; non-finite offsets are ignored
    pub fn set_offset(&mut self, offset: f64) {
        if offset.is_finite() {
            self.offset = self.extent().clamp(offset);
        }
    }

    /// Apply new dimensions, keeping the reading position proportional
    pub fn resize(&mut self, content_rows: usize, viewport_rows: u16) {
        if self.content_rows > 0 && content_rows != self.content_rows {
            self.offset *= content_rows as f64 / self.content_rows as f64;
        }
        self.content_rows = content_rows;
        self.viewport_rows = viewport_rows;
        self.offset = self.extent().clamp(self.offset);
    }

    #[inline]
    pub fn offset(&self) -> f64 {
        self.offset
    }

    /// First content row at least partly visible
    #[inline]
    pub fn first_row(&self) -> usize {
        (self.offset / self.units_per_line).floor() as usize
    }

    #[inline]
    pub fn content_rows(&self) -> usize {
        self.content_rows
    }

    #[inline]
    pub fn viewport_rows(&self) -> u16 {
        self.viewport_rows
    }

    #[inline]
    pub fn units_per_line(&self) -> f64 {
        self.units_per_line
    }

    /// Visible range of content rows
    pub fn visible_rows(&self) -> std::ops::Range<usize> {
        let first = self.first_row().min(self.content_rows);
        let last = first
            .saturating_add(self.viewport_rows as usize)
            .min(self.content_rows);
        first..last
    }
}

/// The surface for the open document. The application holds the strong
/// reference; the auto-scroll controller only gets a weak one.
#[derive(Clone)]
pub enum DocumentViewport {
    Text(Rc<RefCell<TextViewport>>),
    Paged(Rc<RefCell<PagedViewport>>),
}

impl DocumentViewport {
    pub fn from_document(document: &Document, units_per_line: f64) -> Self {
        match document {
            Document::Text { content, .. } => DocumentViewport::Text(Rc::new(RefCell::new(
                TextViewport::new(content, units_per_line),
            ))),
            Document::Pdf { page_count, .. } => DocumentViewport::Paged(Rc::new(RefCell::new(
                PagedViewport::new(*page_count, units_per_line),
            ))),
        }
    }

    /// Type-erased handle for the controller
    pub fn shared(&self) -> SharedViewport {
        match self {
            DocumentViewport::Text(text) => text.clone() as SharedViewport,
            DocumentViewport::Paged(paged) => paged.clone() as SharedViewport,
        }
    }

    /// Lay the content out for an inner area of `width` x `height` cells
    pub fn layout(&self, width: u16, height: u16) {
        match self {
            DocumentViewport::Text(text) => text.borrow_mut().layout(width, height),
            DocumentViewport::Paged(paged) => paged.borrow_mut().layout(width, height),
        }
    }

    pub fn extent(&self) -> Extent {
        match self {
            DocumentViewport::Text(text) => text.borrow().extent(),
            DocumentViewport::Paged(paged) => paged.borrow().extent(),
        }
    }

    pub fn set_offset(&self, offset: f64) {
        match self {
            DocumentViewport::Text(text) => text.borrow_mut().set_offset(offset),
            DocumentViewport::Paged(paged) => paged.borrow_mut().set_offset(offset),
        }
    }

    pub fn units_per_line(&self) -> f64 {
        match self {
            DocumentViewport::Text(text) => text.borrow().surface().units_per_line(),
            DocumentViewport::Paged(paged) => paged.borrow().surface().units_per_line(),
        }
    }

    pub fn viewport_rows(&self) -> u16 {
        match self {
            DocumentViewport::Text(text) => text.borrow().surface().viewport_rows(),
            DocumentViewport::Paged(paged) => paged.borrow().surface().viewport_rows(),
        }
    }
}
