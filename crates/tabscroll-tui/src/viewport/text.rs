use tabscroll_core::autoscroll::{Extent, ViewportAdapter};
use unicode_width::UnicodeWidthChar;

use super::ScrollSurface;

const TAB_WIDTH: usize = 4;

/// Continuous text flow, hard-wrapped to the viewport width
#[derive(Debug, Clone)]
pub struct TextViewport {
    source: String,
    wrapped: Vec<String>,
    wrap_width: u16,
    surface: ScrollSurface,
}

impl TextViewport {
    pub fn new(text: &str, units_per_line: f64) -> Self {
        Self {
            source: text.replace('\t', &" ".repeat(TAB_WIDTH)),
            wrapped: Vec::new(),
            wrap_width: 0,
            surface: ScrollSurface::new(units_per_line),
        }
    }

    /// Re-wrap if the width changed and apply the new viewport height
    pub fn layout(&mut self, width: u16, height: u16) {
        if width != self.wrap_width || self.wrapped.is_empty() {
            self.wrapped = wrap_text(&self.source, width);
            self.wrap_width = width;
        }
        self.surface.resize(self.wrapped.len(), height);
    }

    pub fn surface(&self) -> &ScrollSurface {
        &self.surface
    }

    /// Wrapped rows currently on screen
    pub fn visible_lines(&self) -> &[String] {
        &self.wrapped[self.surface.visible_rows()]
    }

    pub fn line_count(&self) -> usize {
        self.wrapped.len()
    }
}

impl ViewportAdapter for TextViewport {
    fn extent(&self) -> Extent {
        self.surface.extent()
    }

    fn set_offset(&mut self, offset: f64) {
        self.surface.set_offset(offset);
    }
}

/// Hard-wrap text by display width. A width of zero disables wrapping.
pub fn wrap_text(text: &str, width: u16) -> Vec<String> {
    let width = width as usize;
    let mut rows = Vec::new();

    for line in text.lines() {
        if width == 0 || line.is_empty() {
            rows.push(line.to_string());
            continue;
        }

        let mut row = String::new();
        let mut row_width = 0;
        for ch in line.chars() {
            let w = ch.width().unwrap_or(0);
            if row_width + w > width && !row.is_empty() {
                rows.push(std::mem::take(&mut row));
                row_width = 0;
            }
            row.push(ch);
            row_width += w;
        }
        rows.push(row);
    }

    rows
}
