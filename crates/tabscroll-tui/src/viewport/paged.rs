use tabscroll_core::autoscroll::{Extent, ViewportAdapter};

use super::ScrollSurface;

/// Height over width of an A-series page
const PAGE_ASPECT: f64 = 1.414;
/// Terminal cells are roughly twice as tall as they are wide
const CELL_ASPECT: f64 = 2.0;
const MIN_PAGE_ROWS: usize = 3;
const GAP_ROWS: usize = 1;

/// What a content row of a paged layout shows. Pages are zero-based.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRow {
    Top { page: usize },
    Body { page: usize, line: usize },
    Bottom { page: usize },
    Gap,
}

/// Pages stacked vertically with a gap row between them
#[derive(Debug, Clone)]
pub struct PagedViewport {
    page_count: usize,
    page_rows: usize,
    width: u16,
    surface: ScrollSurface,
}

impl PagedViewport {
    pub fn new(page_count: usize, units_per_line: f64) -> Self {
        Self {
            page_count,
            page_rows: MIN_PAGE_ROWS,
            width: 0,
            surface: ScrollSurface::new(units_per_line),
        }
    }

    /// Page height follows the available width
    pub fn layout(&mut self, width: u16, height: u16) {
        self.width = width;
        self.page_rows = page_rows_for_width(width);
        self.surface.resize(self.content_rows(), height);
    }

    fn content_rows(&self) -> usize {
        if self.page_count == 0 {
            return 0;
        }
        self.page_count
            .saturating_mul(self.page_rows)
            .saturating_add((self.page_count - 1).saturating_mul(GAP_ROWS))
    }

    pub fn surface(&self) -> &ScrollSurface {
        &self.surface
    }

    pub fn page_rows(&self) -> usize {
        self.page_rows
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    /// One-based number of the page at the top of the view
    pub fn current_page(&self) -> usize {
        if self.page_count == 0 {
            return 0;
        }
        let stride = self.page_rows + GAP_ROWS;
        (self.surface.first_row() / stride + 1).min(self.page_count)
    }

    pub fn row_kind(&self, row: usize) -> PageRow {
        let stride = self.page_rows + GAP_ROWS;
        let page = row / stride;
        let within = row % stride;

        if page >= self.page_count || within >= self.page_rows {
            PageRow::Gap
        } else if within == 0 {
            PageRow::Top { page }
        } else if within + 1 == self.page_rows {
            PageRow::Bottom { page }
        } else {
            PageRow::Body { page, line: within }
        }
    }
}

impl ViewportAdapter for PagedViewport {
    fn extent(&self) -> Extent {
        self.surface.extent()
    }

    fn set_offset(&mut self, offset: f64) {
        self.surface.set_offset(offset);
    }
}

fn page_rows_for_width(width: u16) -> usize {
    let rows = (width as f64 * PAGE_ASPECT / CELL_ASPECT).round() as usize;
    rows.max(MIN_PAGE_ROWS)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_page_rows_follow_width() {
        assert_eq!(page_rows_for_width(0), MIN_PAGE_ROWS);
        assert_eq!(page_rows_for_width(20), 14);
        assert_eq!(page_rows_for_width(100), 71);
    }

    #[test]
    fn test_content_size() {
        let mut viewport = PagedViewport::new(3, 1.0);
        viewport.layout(20, 10);
        // 3 pages of 14 rows plus 2 gaps
        assert_eq!(viewport.extent().content_size, 44.0);
        assert_eq!(viewport.extent().viewport_size, 10.0);
    }

    #[test]
    fn test_huge_page_count_saturates() {
        let mut viewport = PagedViewport::new(usize::MAX, 16.0);
        viewport.layout(80, 24);
        assert_eq!(viewport.surface().content_rows(), usize::MAX);
        assert_eq!(viewport.current_page(), 1);

        viewport.set_offset(f64::MAX);
        assert!(viewport.extent().at_end());
        let rows = viewport.surface().visible_rows();
        assert!(rows.start <= rows.end);
        viewport.row_kind(rows.start);
    }

    #[test]
    fn test_row_kinds() {
        let mut viewport = PagedViewport::new(2, 1.0);
        viewport.layout(0, 10);
        // page_rows = 3, stride = 4
        assert_eq!(viewport.row_kind(0), PageRow::Top { page: 0 });
        assert_eq!(viewport.row_kind(1), PageRow::Body { page: 0, line: 1 });
        assert_eq!(viewport.row_kind(2), PageRow::Bottom { page: 0 });
        assert_eq!(viewport.row_kind(3), PageRow::Gap);
        assert_eq!(viewport.row_kind(4), PageRow::Top { page: 1 });
        assert_eq!(viewport.row_kind(8), PageRow::Gap);
    }

    #[test]
    fn test_current_page() {
        let mut viewport = PagedViewport::new(5, 16.0);
        viewport.layout(20, 10);
        assert_eq!(viewport.current_page(), 1);

        // Top of the third page: 2 * (14 + 1) rows
        viewport.set_offset(30.0 * 16.0);
        assert_eq!(viewport.current_page(), 3);
    }

    #[test]
    fn test_empty_document() {
        let mut viewport = PagedViewport::new(0, 16.0);
        viewport.layout(20, 10);
        assert_eq!(viewport.extent().content_size, 0.0);
        assert_eq!(viewport.current_page(), 0);
    }
}
