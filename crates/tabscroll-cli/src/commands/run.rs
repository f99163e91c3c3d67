use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::Result;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen, SetTitle},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};
use tokio::sync::mpsc;
use tracing::info;

use tabscroll_core::autoscroll::{Tick, TokioTicker};
use tabscroll_core::AppConfig;
use tabscroll_tui::{
    app::{App, Mode},
    event::{AppEvent, EventHandler},
    input::{handle_key_event, handle_mouse_event, Action},
    keymap::Keymap,
    widgets::{DocumentViewWidget, PopupWidget, StatusBarWidget},
};

type Backend = CrosstermBackend<io::Stdout>;

pub async fn run(config: Arc<AppConfig>, file: Option<PathBuf>) -> Result<()> {
    // Create keymap from config
    let keymap = Keymap::from_config(&config.keymap);

    let (ticker, ticks) = TokioTicker::new();
    let mut app = App::new(config.clone(), Box::new(ticker));
    if let Some(path) = file {
        app.open_document(&path);
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture, SetTitle("tabscroll"))?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    info!("Viewer started");

    let result = main_loop(&mut terminal, &mut app, &keymap, ticks);

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;
    info!("Viewer stopped");

    result
}

fn main_loop(
    terminal: &mut Terminal<Backend>,
    app: &mut App,
    keymap: &Keymap,
    mut ticks: mpsc::UnboundedReceiver<Tick>,
) -> Result<()> {
    let event_handler =
        EventHandler::with_animation_fps(app.config.ui.tick_rate_ms, app.config.ui.animation_fps);

    // Checked at the end of each iteration to pick the next poll timeout
    let mut needs_fast_update = app.needs_fast_update();

    loop {
        // Auto-scroll ticks queued since the last frame
        while let Ok(tick) = ticks.try_recv() {
            app.deliver_tick(tick);
        }

        app.update_manual_scroll(Instant::now());

        terminal.draw(|frame| draw(frame, app))?;

        let event = if needs_fast_update {
            event_handler.next_animation()?
        } else {
            event_handler.next()?
        };
        if let Some(event) = event {
            match event {
                AppEvent::Key(key) => {
                    let action = handle_key_event(key, app, keymap);
                    handle_action(app, action);
                }
                AppEvent::Mouse(mouse) => {
                    let action = handle_mouse_event(mouse, app);
                    handle_action(app, action);
                }
                // Layout is recomputed on the next draw
                AppEvent::Resize(_, _) | AppEvent::Tick => {}
            }
        }

        needs_fast_update = app.needs_fast_update();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn draw(frame: &mut Frame, app: &mut App) {
    let size = frame.area();

    let (document_area, status_area) = if app.config.ui.show_status_bar {
        let main_layout = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(1), Constraint::Length(1)])
            .split(size);
        (main_layout[0], Some(main_layout[1]))
    } else {
        (size, None)
    };

    let inner = DocumentViewWidget::inner_area(document_area);
    app.layout(inner.width, inner.height);

    DocumentViewWidget::render(frame, document_area, app);
    if let Some(area) = status_area {
        StatusBarWidget::render(frame, area, app);
    }

    match &app.mode {
        Mode::Help => PopupWidget::render_help(frame, &app.config.keymap, &app.theme),
        Mode::OpenPrompt(input) => PopupWidget::render_open_prompt(frame, input, &app.theme),
        Mode::Normal => {}
    }
}

fn handle_action(app: &mut App, action: Action) {
    let now = Instant::now();

    if action == Action::PendingG {
        app.pending_key = Some('g');
        return;
    }
    app.clear_pending_key();

    match action {
        Action::Quit => app.should_quit = true,

        Action::SpeedUp => app.speed_up(),
        Action::SpeedDown => app.speed_down(),
        Action::SpeedUpCoarse => app.speed_up_coarse(),
        Action::SpeedDownCoarse => app.speed_down_coarse(),
        Action::ToggleAutoScroll => app.toggle_autoscroll(),
        Action::Hold => app.toggle_hold(),

        Action::LineDown => app.line_down(now),
        Action::LineUp => app.line_up(now),
        Action::HalfPageDown => app.half_page_down(now),
        Action::HalfPageUp => app.half_page_up(now),
        Action::PageDown => app.page_down(now),
        Action::PageUp => app.page_up(now),
        Action::JumpToTop => app.jump_to_top(now),
        Action::JumpToBottom => app.jump_to_bottom(now),
        Action::WheelDown => app.wheel_down(now),
        Action::WheelUp => app.wheel_up(now),
        Action::DragStart(row) => app.drag_start(row),
        Action::DragMove(row) => app.drag_move(row),
        Action::DragEnd => app.drag_end(),

        Action::OpenFile => app.start_open_prompt(),
        Action::CloseFile => app.close_document(),
        Action::Help => app.toggle_help(),
        Action::ExitMode => {
            if app.mode == Mode::Normal {
                app.clear_status();
            } else {
                app.cancel_mode();
            }
        }
        Action::Confirm => app.confirm_prompt(),
        Action::Cancel => app.cancel_mode(),
        Action::InputChar(c) => app.prompt_input(c),
        Action::Backspace => app.prompt_backspace(),

        Action::PendingG | Action::None => {}
    }
}
