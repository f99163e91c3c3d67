use ratatui::{
    layout::{Alignment, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::app::App;
use crate::theme::Theme;
use crate::viewport::{DocumentViewport, PageRow, PagedViewport, TextViewport};

pub struct DocumentViewWidget;

impl DocumentViewWidget {
    fn block<'a>(app: &App) -> Block<'a> {
        let theme = &app.theme;
        let (title, border) = match &app.document {
            Some(open) => (
                format!(
                    " {} [{}] ",
                    open.document.display_name(),
                    open.document.kind().label()
                ),
                theme.accent,
            ),
            None => (" tabscroll ".to_string(), theme.grey0),
        };
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border))
            .style(Style::default().bg(theme.bg0).fg(theme.fg0))
    }

    /// Area the document is laid out in, inside the border
    pub fn inner_area(area: Rect) -> Rect {
        Block::default().borders(Borders::ALL).inner(area)
    }

    pub fn render(frame: &mut Frame, area: Rect, app: &App) {
        let block = Self::block(app);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let theme = &app.theme;
        let content = match &app.document {
            Some(open) => match &open.viewport {
                DocumentViewport::Text(text) => Self::text_rows(&text.borrow(), theme),
                DocumentViewport::Paged(paged) => Self::page_rows(&paged.borrow(), theme),
            },
            None => Self::placeholder(theme),
        };

        frame.render_widget(Paragraph::new(content), inner);
    }

    fn text_rows<'a>(viewport: &TextViewport, theme: &Theme) -> Text<'a> {
        let style = Style::default().fg(theme.fg0);
        viewport
            .visible_lines()
            .iter()
            .map(|line| Line::from(Span::styled(line.clone(), style)))
            .collect::<Vec<_>>()
            .into()
    }

    /// Pages as framed boxes, the label centred in the middle row
    fn page_rows<'a>(viewport: &PagedViewport, theme: &Theme) -> Text<'a> {
        let width = viewport.width() as usize;
        let page_count = viewport.page_count();
        let frame_style = Style::default().fg(theme.grey1);
        let label_style = Style::default().fg(theme.fg1).add_modifier(Modifier::BOLD);
        let label_line = viewport.page_rows() / 2;

        viewport
            .surface()
            .visible_rows()
            .map(|row| match viewport.row_kind(row) {
                PageRow::Gap => Line::from(""),
                PageRow::Top { .. } => Line::from(Span::styled(edge('┌', '┐', width), frame_style)),
                PageRow::Bottom { .. } => {
                    Line::from(Span::styled(edge('└', '┘', width), frame_style))
                }
                PageRow::Body { page, line } if line == label_line => {
                    let label = format!("Page {} / {}", page + 1, page_count);
                    let (left, right) = centre_padding(&label, width.saturating_sub(2));
                    Line::from(vec![
                        Span::styled("│", frame_style),
                        Span::raw(" ".repeat(left)),
                        Span::styled(label, label_style),
                        Span::raw(" ".repeat(right)),
                        Span::styled("│", frame_style),
                    ])
                }
                PageRow::Body { .. } => Line::from(Span::styled(
                    format!("│{}│", " ".repeat(width.saturating_sub(2))),
                    frame_style,
                )),
            })
            .collect::<Vec<_>>()
            .into()
    }

    fn placeholder<'a>(theme: &Theme) -> Text<'a> {
        let muted = Style::default().fg(theme.grey1);
        Text::from(vec![
            Line::from(""),
            Line::from(Span::styled("No document open", muted)),
            Line::from(Span::styled("Press o to open a file, ? for help", muted)),
        ])
        .alignment(Alignment::Center)
    }
}

fn edge(left: char, right: char, width: usize) -> String {
    if width < 2 {
        return "─".repeat(width);
    }
    format!("{}{}{}", left, "─".repeat(width - 2), right)
}

fn centre_padding(label: &str, width: usize) -> (usize, usize) {
    let spare = width.saturating_sub(label.width());
    (spare / 2, spare - spare / 2)
}
