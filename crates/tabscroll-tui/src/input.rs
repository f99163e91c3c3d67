use crossterm::event::{KeyCode, KeyEvent, MouseButton, MouseEvent, MouseEventKind};

use crate::app::{App, Mode};
use crate::keymap::{KeyBinding, Keymap};

/// Input action that can be performed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Quit,
    // Auto-scroll
    SpeedUp,
    SpeedDown,
    SpeedUpCoarse,
    SpeedDownCoarse,
    ToggleAutoScroll,
    Hold,
    // Manual scrolling
    LineDown,
    LineUp,
    HalfPageDown,
    HalfPageUp,
    PageDown,
    PageUp,
    JumpToTop,
    JumpToBottom,
    PendingG, // First 'g' press, waiting for second 'g'
    WheelDown,
    WheelUp,
    DragStart(u16),
    DragMove(u16),
    DragEnd,
    // Documents
    OpenFile,
    CloseFile,
    Help,
    ExitMode,
    Confirm,
    Cancel,
    InputChar(char),
    Backspace,
    None,
}

/// Handle a key event and return the corresponding action
pub fn handle_key_event(key: KeyEvent, app: &App, keymap: &Keymap) -> Action {
    match &app.mode {
        Mode::OpenPrompt(_) => return handle_input_mode(key),
        // Any key closes help
        Mode::Help => return Action::ExitMode,
        Mode::Normal => {}
    }

    let binding = KeyBinding::new(key.code, key.modifiers);
    if keymap.is_g_prefix(&binding) {
        if app.pending_key == Some('g') {
            if let Some(action) = keymap.get_pending_g_action() {
                return action.clone();
            }
        }
        return Action::PendingG;
    }

    keymap
        .lookup(key.code, key.modifiers)
        .cloned()
        .unwrap_or(Action::None)
}

/// Handle key events while typing a path
fn handle_input_mode(key: KeyEvent) -> Action {
    match key.code {
        KeyCode::Enter => Action::Confirm,
        KeyCode::Esc => Action::Cancel,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) => Action::InputChar(c),
        _ => Action::None,
    }
}

/// Translate mouse input. Rows are terminal rows.
pub fn handle_mouse_event(mouse: MouseEvent, app: &App) -> Action {
    // A drag may begin before a popup opens; its release must still land
    if mouse.kind == MouseEventKind::Up(MouseButton::Left) {
        return Action::DragEnd;
    }
    if app.mode != Mode::Normal {
        return Action::None;
    }

    match mouse.kind {
        MouseEventKind::ScrollDown => Action::WheelDown,
        MouseEventKind::ScrollUp => Action::WheelUp,
        MouseEventKind::Down(MouseButton::Left) => Action::DragStart(mouse.row),
        MouseEventKind::Drag(MouseButton::Left) => Action::DragMove(mouse.row),
        MouseEventKind::Up(MouseButton::Left) => Action::DragEnd,
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};
    use std::sync::Arc;
    use tabscroll_core::autoscroll::ManualTicker;
    use tabscroll_core::AppConfig;

    fn key(code: KeyCode, modifiers: KeyModifiers) -> KeyEvent {
        KeyEvent {
            code,
            modifiers,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    fn mouse(kind: MouseEventKind, row: u16) -> MouseEvent {
        MouseEvent {
            kind,
            column: 0,
            row,
            modifiers: KeyModifiers::NONE,
        }
    }

    fn app() -> App {
        App::new(
            Arc::new(AppConfig::default()),
            Box::new(ManualTicker::new()),
        )
    }

    #[test]
    fn test_normal_mode_keys() {
        let app = app();
        let keymap = Keymap::default();
        assert_eq!(
            handle_key_event(key(KeyCode::Char('+'), KeyModifiers::NONE), &app, &keymap),
            Action::SpeedUp
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char(' '), KeyModifiers::NONE), &app, &keymap),
            Action::Hold
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Char('z'), KeyModifiers::NONE), &app, &keymap),
            Action::None
        );
    }

    #[test]
    fn test_gg_sequence() {
        let mut app = app();
        let keymap = Keymap::default();
        let g = key(KeyCode::Char('g'), KeyModifiers::NONE);

        assert_eq!(handle_key_event(g, &app, &keymap), Action::PendingG);
        app.pending_key = Some('g');
        assert_eq!(handle_key_event(g, &app, &keymap), Action::JumpToTop);
    }

    #[test]
    fn test_prompt_mode_captures_text() {
        let mut app = app();
        app.mode = Mode::OpenPrompt(String::new());
        let keymap = Keymap::default();

        assert_eq!(
            handle_key_event(key(KeyCode::Char('q'), KeyModifiers::NONE), &app, &keymap),
            Action::InputChar('q')
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Enter, KeyModifiers::NONE), &app, &keymap),
            Action::Confirm
        );
        assert_eq!(
            handle_key_event(key(KeyCode::Esc, KeyModifiers::NONE), &app, &keymap),
            Action::Cancel
        );
    }

    #[test]
    fn test_help_mode_any_key_exits() {
        let mut app = app();
        app.mode = Mode::Help;
        let keymap = Keymap::default();
        assert_eq!(
            handle_key_event(key(KeyCode::Char('j'), KeyModifiers::NONE), &app, &keymap),
            Action::ExitMode
        );
    }

    #[test]
    fn test_mouse_events() {
        let mut app = app();
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Down(MouseButton::Left), 4), &app),
            Action::DragStart(4)
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 7), &app),
            Action::DragMove(7)
        );
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollDown, 0), &app),
            Action::WheelDown
        );

        app.mode = Mode::Help;
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::ScrollDown, 0), &app),
            Action::None
        );
    }

    #[test]
    fn test_mouse_release_ends_drag_in_any_mode() {
        let mut app = app();
        let release = mouse(MouseEventKind::Up(MouseButton::Left), 9);

        app.mode = Mode::Help;
        assert_eq!(handle_mouse_event(release, &app), Action::DragEnd);
        assert_eq!(
            handle_mouse_event(mouse(MouseEventKind::Drag(MouseButton::Left), 9), &app),
            Action::None
        );

        app.mode = Mode::OpenPrompt(String::new());
        assert_eq!(handle_mouse_event(release, &app), Action::DragEnd);
    }
}
