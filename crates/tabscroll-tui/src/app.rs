use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tabscroll_core::autoscroll::{ScrollSpeedController, ScrollState, Speed, Tick, TickScheduler};
use tabscroll_core::config::expand_tilde;
use tabscroll_core::{document, AppConfig, Document};
use tracing::{debug, info, warn};

use crate::scroll::ScrollAnimator;
use crate::theme::Theme;
use crate::themes::load_theme;
use crate::viewport::DocumentViewport;

/// Application mode
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
    /// Reading
    Normal,
    /// Typing the path of a document to open
    OpenPrompt(String),
    /// Help overlay
    Help,
}

/// The displayed document and the surface it is laid out on
pub struct OpenDocument {
    pub document: Document,
    pub viewport: DocumentViewport,
}

/// A left-button drag in progress
#[derive(Debug, Clone, Copy)]
struct DragState {
    anchor_row: u16,
    anchor_offset: f64,
}

/// Application state
pub struct App {
    /// Application configuration
    pub config: Arc<AppConfig>,
    pub theme: Theme,
    /// Currently displayed document
    pub document: Option<OpenDocument>,
    /// Auto-scroll controller for the displayed document
    pub autoscroll: ScrollSpeedController<Box<dyn TickScheduler>>,
    /// Current application mode
    pub mode: Mode,
    /// Whether the app should quit
    pub should_quit: bool,
    /// Status message
    pub status_message: Option<String>,
    /// The status message reports a failure
    pub status_is_error: bool,
    /// Pending key for multi-key sequences (e.g., 'gg')
    pub pending_key: Option<char>,
    animator: ScrollAnimator,
    /// The running animation counts as one manual interaction
    animation_hold: bool,
    /// Hold key engaged
    hold: bool,
    drag: Option<DragState>,
    /// Speed restored by the toggle key
    last_speed: Speed,
    /// Inner size of the document area from the last layout
    area: Option<(u16, u16)>,
}

impl App {
    pub fn new(config: Arc<AppConfig>, scheduler: Box<dyn TickScheduler>) -> Self {
        let autoscroll =
            ScrollSpeedController::new(scheduler).with_step(config.autoscroll.step_units);
        let mut app = Self {
            theme: load_theme(&config.ui.theme),
            animator: ScrollAnimator::new(config.manual_scroll.clone()),
            last_speed: Speed::new(config.autoscroll.resume_speed),
            config,
            document: None,
            autoscroll,
            mode: Mode::Normal,
            should_quit: false,
            status_message: None,
            status_is_error: false,
            pending_key: None,
            animation_hold: false,
            hold: false,
            drag: None,
            area: None,
        };
        let initial = app.config.autoscroll.initial_speed;
        app.set_speed(initial);
        app
    }

    // ---- documents ----

    /// Load and display a document. On failure the current document stays
    /// and the error goes to the status bar.
    pub fn open_document(&mut self, path: &Path) {
        let path = expand_tilde(path);
        match document::load(&path) {
            Ok(document) => {
                self.set_status(format!("Opened {}", document.display_name()));
                self.show_document(document);
            }
            Err(e) => {
                warn!("Failed to open {}: {}", path.display(), e);
                self.set_error(format!("Failed to open {}: {}", path.display(), e));
            }
        }
    }

    /// Display an already loaded document, replacing the current one
    pub fn show_document(&mut self, document: Document) {
        self.release_content_interactions();

        let viewport =
            DocumentViewport::from_document(&document, self.config.autoscroll.units_per_line);
        if let Some((width, height)) = self.area {
            viewport.layout(width, height);
        }
        self.autoscroll.set_active_content(&viewport.shared());
        info!(
            "Showing {} ({})",
            document.display_name(),
            document.kind().label()
        );
        self.document = Some(OpenDocument { document, viewport });
    }

    pub fn close_document(&mut self) {
        let Some(open) = self.document.take() else {
            return;
        };
        self.release_content_interactions();
        self.autoscroll.clear_active_content();
        info!("Closed {}", open.document.display_name());
        self.set_status(format!("Closed {}", open.document.display_name()));
    }

    /// Drop interactions tied to the displayed surface: a running animation
    /// and a drag. The hold key is the user's and survives.
    fn release_content_interactions(&mut self) {
        self.animator.cancel();
        self.release_animation_hold();
        if self.drag.take().is_some() {
            self.autoscroll.end_manual_interaction();
        }
    }

    fn viewport(&self) -> Option<DocumentViewport> {
        self.document.as_ref().map(|open| open.viewport.clone())
    }

    /// Lay the document out for an inner area of `width` x `height` cells
    pub fn layout(&mut self, width: u16, height: u16) {
        if self.area == Some((width, height)) {
            return;
        }
        self.area = Some((width, height));
        if let Some(viewport) = self.viewport() {
            viewport.layout(width, height);
        }
    }

    // ---- auto-scroll ----

    pub fn set_speed(&mut self, value: impl Into<Speed>) {
        let speed = value.into();
        if !speed.is_zero() {
            self.last_speed = speed;
        }
        self.autoscroll.set_speed(speed);
    }

    pub fn speed_up(&mut self) {
        let step = self.config.autoscroll.speed_step;
        self.set_speed(self.autoscroll.speed().offset_by(step));
    }

    pub fn speed_down(&mut self) {
        let step = self.config.autoscroll.speed_step;
        self.set_speed(self.autoscroll.speed().offset_by(-step));
    }

    pub fn speed_up_coarse(&mut self) {
        let step = self.config.autoscroll.coarse_speed_step;
        self.set_speed(self.autoscroll.speed().offset_by(step));
    }

    pub fn speed_down_coarse(&mut self) {
        let step = self.config.autoscroll.coarse_speed_step;
        self.set_speed(self.autoscroll.speed().offset_by(-step));
    }

    /// Switch between speed 0 and the last non-zero speed
    pub fn toggle_autoscroll(&mut self) {
        if self.autoscroll.speed().is_zero() {
            self.set_speed(self.last_speed);
        } else {
            self.set_speed(Speed::ZERO);
        }
    }

    /// Engage or release the hold key
    pub fn toggle_hold(&mut self) {
        self.hold = !self.hold;
        if self.hold {
            self.autoscroll.begin_manual_interaction();
        } else {
            self.autoscroll.end_manual_interaction();
        }
        debug!(hold = self.hold, "Hold toggled");
    }

    pub fn is_holding(&self) -> bool {
        self.hold
    }

    pub fn scroll_state(&self) -> ScrollState {
        self.autoscroll.state()
    }

    pub fn deliver_tick(&mut self, tick: Tick) -> bool {
        self.autoscroll.deliver(tick)
    }

    // ---- manual scrolling ----

    /// Move the view to `target`, animated when smooth scrolling is on.
    /// Auto-scroll stays suspended until the move lands.
    fn scroll_to(&mut self, target: f64, now: Instant) {
        let Some(viewport) = self.viewport() else {
            return;
        };
        let from = viewport.extent().current_offset;

        if !self.animation_hold {
            self.animation_hold = true;
            self.autoscroll.begin_manual_interaction();
        }
        if let Some(position) = self.animator.scroll_to(from, target, now) {
            viewport.set_offset(position);
            self.release_animation_hold();
        }
    }

    fn release_animation_hold(&mut self) {
        if self.animation_hold {
            self.animation_hold = false;
            self.autoscroll.end_manual_interaction();
        }
    }

    /// Scroll by a number of rows; chained presses stack on the pending target
    pub fn scroll_rows(&mut self, rows: f64, now: Instant) {
        let Some(viewport) = self.viewport() else {
            return;
        };
        let extent = viewport.extent();
        let base = self.animator.target().unwrap_or(extent.current_offset);
        let target = extent.clamp(base + rows * viewport.units_per_line());
        self.scroll_to(target, now);
    }

    fn page_rows(&self) -> f64 {
        self.viewport()
            .map(|viewport| viewport.viewport_rows().max(1) as f64)
            .unwrap_or(1.0)
    }

    pub fn line_down(&mut self, now: Instant) {
        self.scroll_rows(1.0, now);
    }

    pub fn line_up(&mut self, now: Instant) {
        self.scroll_rows(-1.0, now);
    }

    pub fn half_page_down(&mut self, now: Instant) {
        let rows = (self.page_rows() / 2.0).floor().max(1.0);
        self.scroll_rows(rows, now);
    }

    pub fn half_page_up(&mut self, now: Instant) {
        let rows = (self.page_rows() / 2.0).floor().max(1.0);
        self.scroll_rows(-rows, now);
    }

    pub fn page_down(&mut self, now: Instant) {
        self.scroll_rows(self.page_rows(), now);
    }

    pub fn page_up(&mut self, now: Instant) {
        self.scroll_rows(-self.page_rows(), now);
    }

    pub fn jump_to_top(&mut self, now: Instant) {
        self.scroll_to(0.0, now);
    }

    pub fn jump_to_bottom(&mut self, now: Instant) {
        if let Some(viewport) = self.viewport() {
            self.scroll_to(viewport.extent().max_offset(), now);
        }
    }

    pub fn wheel_down(&mut self, now: Instant) {
        self.scroll_rows(self.config.manual_scroll.wheel_lines as f64, now);
    }

    pub fn wheel_up(&mut self, now: Instant) {
        self.scroll_rows(-(self.config.manual_scroll.wheel_lines as f64), now);
    }

    /// Advance the manual scroll animation. Returns true if the view moved.
    pub fn update_manual_scroll(&mut self, now: Instant) -> bool {
        let Some(position) = self.animator.update(now) else {
            return false;
        };
        if let Some(viewport) = self.viewport() {
            viewport.set_offset(position);
        }
        if !self.animator.is_animating() {
            self.release_animation_hold();
        }
        true
    }

    // ---- mouse drag ----

    pub fn drag_start(&mut self, row: u16) {
        let Some(viewport) = self.viewport() else {
            return;
        };
        if self.drag.is_some() {
            return;
        }
        self.animator.cancel();
        self.release_animation_hold();

        self.autoscroll.begin_manual_interaction();
        self.drag = Some(DragState {
            anchor_row: row,
            anchor_offset: viewport.extent().current_offset,
        });
    }

    /// Content follows the pointer: dragging upwards scrolls down
    pub fn drag_move(&mut self, row: u16) {
        let (Some(drag), Some(viewport)) = (self.drag, self.viewport()) else {
            return;
        };
        let delta_rows = row as f64 - drag.anchor_row as f64;
        viewport.set_offset(drag.anchor_offset - delta_rows * viewport.units_per_line());
    }

    pub fn drag_end(&mut self) {
        if self.drag.take().is_some() {
            self.autoscroll.end_manual_interaction();
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Whether the main loop should poll at animation rate
    pub fn needs_fast_update(&self) -> bool {
        self.autoscroll.state() == ScrollState::Running
            || self.animator.is_animating()
            || self.drag.is_some()
    }

    // ---- prompt and status ----

    pub fn start_open_prompt(&mut self) {
        self.mode = Mode::OpenPrompt(String::new());
    }

    pub fn prompt_input(&mut self, c: char) {
        if let Mode::OpenPrompt(buffer) = &mut self.mode {
            buffer.push(c);
        }
    }

    pub fn prompt_backspace(&mut self) {
        if let Mode::OpenPrompt(buffer) = &mut self.mode {
            buffer.pop();
        }
    }

    pub fn confirm_prompt(&mut self) {
        let mode = std::mem::replace(&mut self.mode, Mode::Normal);
        if let Mode::OpenPrompt(buffer) = mode {
            let path = buffer.trim();
            if !path.is_empty() {
                self.open_document(Path::new(path));
            }
        }
    }

    pub fn cancel_mode(&mut self) {
        self.mode = Mode::Normal;
    }

    pub fn toggle_help(&mut self) {
        self.mode = match self.mode {
            Mode::Help => Mode::Normal,
            _ => Mode::Help,
        };
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.status_message = Some(message.into());
        self.status_is_error = true;
    }

    pub fn clear_status(&mut self) {
        self.status_message = None;
        self.status_is_error = false;
    }

    pub fn clear_pending_key(&mut self) {
        self.pending_key = None;
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::time::Duration;

    use tabscroll_core::autoscroll::ManualTicker;

    use super::*;

    fn text_document(lines: usize) -> Document {
        let content = (0..lines)
            .map(|i| format!("line {}", i))
            .collect::<Vec<_>>()
            .join("\n");
        Document::Text {
            path: PathBuf::from("notes.txt"),
            content,
        }
    }

    fn app_with(smooth: bool) -> (App, ManualTicker) {
        let mut config = AppConfig::default();
        config.manual_scroll.smooth_enabled = smooth;
        config.manual_scroll.animation_duration_ms = 100;
        let ticker = ManualTicker::new();
        let mut app = App::new(Arc::new(config), Box::new(ticker.clone()));
        app.layout(40, 10);
        app.show_document(text_document(100));
        (app, ticker)
    }

    fn offset(app: &App) -> f64 {
        app.document
            .as_ref()
            .map(|open| open.viewport.extent().current_offset)
            .unwrap_or_default()
    }

    fn run_ticks(app: &mut App, ticker: &ManualTicker, count: usize) {
        for _ in 0..count {
            if let Some(tick) = ticker.fire() {
                app.deliver_tick(tick);
            }
        }
    }

    #[test]
    fn test_initial_speed_from_config() {
        let mut config = AppConfig::default();
        config.autoscroll.initial_speed = 2.5;
        let app = App::new(Arc::new(config), Box::new(ManualTicker::new()));
        assert_eq!(app.autoscroll.speed(), Speed::new(2.5));
        // Nothing displayed yet
        assert_eq!(app.scroll_state(), ScrollState::Idle);
    }

    #[test]
    fn test_ticks_advance_document() {
        let (mut app, ticker) = app_with(false);
        app.set_speed(3.0);
        assert_eq!(app.scroll_state(), ScrollState::Running);

        run_ticks(&mut app, &ticker, 10);
        assert_eq!(offset(&app), 10.0);
    }

    #[test]
    fn test_instant_manual_scroll_resumes_from_landing() {
        let (mut app, ticker) = app_with(false);
        app.set_speed(1.0);
        run_ticks(&mut app, &ticker, 4);

        app.line_down(Instant::now());
        assert_eq!(offset(&app), 20.0);
        assert_eq!(app.scroll_state(), ScrollState::Running);

        run_ticks(&mut app, &ticker, 1);
        assert_eq!(offset(&app), 21.0);
    }

    #[test]
    fn test_animation_suspends_until_landed() {
        let (mut app, ticker) = app_with(true);
        app.set_speed(2.0);
        let start = Instant::now();

        app.page_down(start);
        assert_eq!(app.scroll_state(), ScrollState::Suspended);
        assert!(ticker.fire().is_none());

        assert!(app.update_manual_scroll(start + Duration::from_millis(50)));
        assert_eq!(app.scroll_state(), ScrollState::Suspended);

        assert!(app.update_manual_scroll(start + Duration::from_millis(100)));
        assert_eq!(offset(&app), 160.0);
        assert_eq!(app.scroll_state(), ScrollState::Running);
        assert!(!app.update_manual_scroll(start + Duration::from_millis(150)));

        run_ticks(&mut app, &ticker, 1);
        assert_eq!(offset(&app), 161.0);
    }

    #[test]
    fn test_chained_scrolls_stack_on_target() {
        let (mut app, _ticker) = app_with(true);
        let start = Instant::now();
        app.line_down(start);
        app.line_down(start);
        app.update_manual_scroll(start + Duration::from_millis(100));
        assert_eq!(offset(&app), 32.0);
        assert_eq!(app.autoscroll.active_interactions(), 0);
    }

    #[test]
    fn test_hold_toggle() {
        let (mut app, ticker) = app_with(false);
        app.set_speed(1.0);

        app.toggle_hold();
        assert!(app.is_holding());
        assert_eq!(app.scroll_state(), ScrollState::Suspended);
        assert!(ticker.fire().is_none());

        app.toggle_hold();
        assert_eq!(app.scroll_state(), ScrollState::Running);
    }

    #[test]
    fn test_drag_moves_and_suspends() {
        let (mut app, ticker) = app_with(false);
        app.set_speed(1.0);

        app.drag_start(5);
        assert_eq!(app.scroll_state(), ScrollState::Suspended);
        app.drag_move(3);
        assert_eq!(offset(&app), 32.0);
        run_ticks(&mut app, &ticker, 5);
        assert_eq!(offset(&app), 32.0);

        app.drag_end();
        assert_eq!(app.scroll_state(), ScrollState::Running);
        run_ticks(&mut app, &ticker, 1);
        assert_eq!(offset(&app), 33.0);
    }

    #[test]
    fn test_toggle_autoscroll_restores_last_speed() {
        let (mut app, _ticker) = app_with(false);
        app.set_speed(3.5);
        app.toggle_autoscroll();
        assert!(app.autoscroll.speed().is_zero());
        assert_eq!(app.scroll_state(), ScrollState::Idle);

        app.toggle_autoscroll();
        assert_eq!(app.autoscroll.speed(), Speed::new(3.5));
        assert_eq!(app.scroll_state(), ScrollState::Running);
    }

    #[test]
    fn test_toggle_uses_resume_speed_initially() {
        let (mut app, _ticker) = app_with(false);
        app.toggle_autoscroll();
        assert_eq!(app.autoscroll.speed(), Speed::new(1.0));
    }

    #[test]
    fn test_speed_keys_step_and_clamp() {
        let (mut app, _ticker) = app_with(false);
        app.speed_up();
        assert_eq!(app.autoscroll.speed(), Speed::new(0.1));
        app.speed_up_coarse();
        assert_eq!(app.autoscroll.speed(), Speed::new(1.1));
        app.speed_down_coarse();
        app.speed_down_coarse();
        assert!(app.autoscroll.speed().is_zero());
        for _ in 0..10 {
            app.speed_up_coarse();
        }
        assert_eq!(app.autoscroll.speed(), Speed::MAX);
    }

    #[test]
    fn test_failed_open_keeps_document() {
        let (mut app, _ticker) = app_with(false);
        app.open_document(Path::new("/definitely/not/here.txt"));
        assert!(app.status_message.as_deref().unwrap_or("").starts_with("Failed to open"));
        assert!(app.status_is_error);
        assert!(app.document.is_some());

        app.clear_status();
        assert!(!app.status_is_error);
    }

    #[test]
    fn test_drag_released_under_help_resumes() {
        let (mut app, ticker) = app_with(false);
        app.set_speed(1.0);

        app.drag_start(5);
        app.toggle_help();
        assert_eq!(app.scroll_state(), ScrollState::Suspended);

        app.drag_end();
        assert!(!app.is_dragging());
        assert_eq!(app.autoscroll.active_interactions(), 0);
        assert_eq!(app.scroll_state(), ScrollState::Running);
        let before = offset(&app);
        run_ticks(&mut app, &ticker, 1);
        assert_eq!(offset(&app), before + 1.0);
    }

    #[test]
    fn test_close_document_goes_idle() {
        let (mut app, ticker) = app_with(false);
        app.set_speed(2.0);
        let stale = ticker.fire().unwrap();

        app.close_document();
        assert!(app.document.is_none());
        assert_eq!(app.scroll_state(), ScrollState::Idle);
        assert!(!app.deliver_tick(stale));
    }

    #[test]
    fn test_switching_document_restarts_at_its_offset() {
        let (mut app, ticker) = app_with(false);
        app.set_speed(2.0);
        run_ticks(&mut app, &ticker, 30);
        let stale = ticker.fire().unwrap();

        app.show_document(text_document(20));
        assert_eq!(offset(&app), 0.0);
        assert!(!app.deliver_tick(stale));
        assert_eq!(app.scroll_state(), ScrollState::Running);
        run_ticks(&mut app, &ticker, 1);
        assert_eq!(offset(&app), 1.0);
    }

    #[test]
    fn test_switch_mid_drag_releases_interaction() {
        let (mut app, _ticker) = app_with(false);
        app.set_speed(1.0);
        app.drag_start(2);
        app.show_document(text_document(20));
        assert!(!app.is_dragging());
        assert_eq!(app.autoscroll.active_interactions(), 0);
        assert_eq!(app.scroll_state(), ScrollState::Running);
    }

    #[test]
    fn test_prompt_editing() {
        let (mut app, _ticker) = app_with(false);
        app.start_open_prompt();
        for c in "ab".chars() {
            app.prompt_input(c);
        }
        app.prompt_backspace();
        assert_eq!(app.mode, Mode::OpenPrompt("a".to_string()));
        app.cancel_mode();
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn test_needs_fast_update() {
        let (mut app, _ticker) = app_with(false);
        assert!(!app.needs_fast_update());
        app.set_speed(1.0);
        assert!(app.needs_fast_update());
    }
}
