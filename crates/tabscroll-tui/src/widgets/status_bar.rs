use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use tabscroll_core::ScrollState;
use unicode_width::UnicodeWidthStr;

use crate::app::{App, Mode};
use crate::viewport::DocumentViewport;

pub struct StatusBarWidget;

impl StatusBarWidget {
    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let theme = &app.theme;
        let bar = Style::default().bg(theme.bg2);

        let mode_str = match &app.mode {
            Mode::Normal => "NORMAL",
            Mode::OpenPrompt(_) => "OPEN",
            Mode::Help => "HELP",
        };

        let state = app.scroll_state();
        let state_color = match state {
            ScrollState::Idle => theme.grey2,
            ScrollState::Running => theme.running,
            ScrollState::Suspended => theme.suspended,
        };

        let mut spans = vec![
            Span::styled(
                format!(" {} ", mode_str),
                Style::default()
                    .fg(theme.bg0)
                    .bg(theme.accent)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!(" {} ", state.label()),
                bar.fg(state_color).add_modifier(Modifier::BOLD),
            ),
        ];

        let (status_text, status_color) = match &app.status_message {
            Some(msg) if app.status_is_error => (format!(" {}", msg), theme.error),
            Some(msg) => (format!(" {}", msg), theme.fg0),
            None => (Self::scroll_summary(app), theme.fg0),
        };
        spans.push(Span::styled(status_text, bar.fg(status_color)));

        let help_hint = " +/-:speed s:toggle space:hold ?:help ";
        let used: usize = spans.iter().map(|s| s.content.width()).sum();
        let padding = (area.width as usize).saturating_sub(used + help_hint.width());
        spans.push(Span::styled(" ".repeat(padding), bar));
        spans.push(Span::styled(help_hint, bar.fg(theme.grey2)));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Speed, tick interval, position and hold flag
    fn scroll_summary(app: &App) -> String {
        let speed = app.autoscroll.speed();
        let interval = match speed.tick_interval() {
            Some(interval) => format!("{}ms", interval.as_millis()),
            None => "off".to_string(),
        };

        let mut summary = format!(" speed {} | tick {}", speed, interval);

        if let Some(open) = &app.document {
            let extent = open.viewport.extent();
            if extent.at_end() {
                summary.push_str(" | end");
            } else {
                let percent = (extent.progress() * 100.0).round() as u32;
                summary.push_str(&format!(" | {}%", percent));
            }
            if let DocumentViewport::Paged(paged) = &open.viewport {
                let paged = paged.borrow();
                summary.push_str(&format!(
                    " | page {}/{}",
                    paged.current_page(),
                    paged.page_count()
                ));
            }
        }
        if app.is_holding() {
            summary.push_str(" | HOLD");
        }
        summary
    }
}
