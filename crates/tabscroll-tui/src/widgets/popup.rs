use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tabscroll_core::config::KeymapConfig;

use crate::theme::Theme;

pub struct PopupWidget;

impl PopupWidget {
    /// Key reference built from the active keymap
    pub fn render_help(frame: &mut Frame, keymap: &KeymapConfig, theme: &Theme) {
        let entries: [(&str, &str); 19] = [
            (keymap.speed_up.as_str(), "Speed up"),
            (keymap.speed_down.as_str(), "Slow down"),
            (keymap.speed_up_coarse.as_str(), "Speed up (coarse)"),
            (keymap.speed_down_coarse.as_str(), "Slow down (coarse)"),
            (keymap.toggle_autoscroll.as_str(), "Toggle auto-scroll"),
            (keymap.hold.as_str(), "Hold / release"),
            (keymap.line_down.as_str(), "Line down"),
            (keymap.line_up.as_str(), "Line up"),
            (keymap.half_page_down.as_str(), "Half page down"),
            (keymap.half_page_up.as_str(), "Half page up"),
            (keymap.page_down.as_str(), "Page down"),
            (keymap.page_up.as_str(), "Page up"),
            (keymap.jump_to_top.as_str(), "Top"),
            (keymap.jump_to_bottom.as_str(), "Bottom"),
            ("drag", "Scroll with the mouse"),
            (keymap.open_file.as_str(), "Open file"),
            (keymap.close_file.as_str(), "Close file"),
            (keymap.help.as_str(), "This help"),
            (keymap.quit.as_str(), "Quit"),
        ];

        let key_style = Style::default().fg(theme.accent).add_modifier(Modifier::BOLD);
        let desc_style = Style::default().fg(theme.fg0);
        let lines: Vec<Line> = entries
            .iter()
            .map(|(key, desc)| {
                Line::from(vec![
                    Span::styled(format!("{:>10}  ", key), key_style),
                    Span::styled(*desc, desc_style),
                ])
            })
            .collect();

        let area = frame.area();
        let popup_area = centered_rect(
            44u16.min(area.width.saturating_sub(2)),
            (lines.len() as u16 + 2).min(area.height.saturating_sub(2)),
            area,
        );
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Keys ")
            .title_alignment(Alignment::Center)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.accent))
            .style(Style::default().bg(theme.bg1));
        frame.render_widget(Paragraph::new(lines).block(block), popup_area);
    }

    /// Single-line path input
    pub fn render_open_prompt(frame: &mut Frame, input: &str, theme: &Theme) {
        let area = frame.area();
        let popup_area = centered_rect(60u16.min(area.width.saturating_sub(2)), 3, area);
        frame.render_widget(Clear, popup_area);

        let block = Block::default()
            .title(" Open file ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.info))
            .style(Style::default().bg(theme.bg1));

        let line = Line::from(vec![
            Span::styled(input.to_string(), Style::default().fg(theme.fg1)),
            Span::styled("█", Style::default().fg(theme.accent)),
        ]);
        frame.render_widget(Paragraph::new(line).block(block), popup_area);
    }
}

/// Helper function to create a centered rect
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;
    Rect::new(x, y, width, height)
}
