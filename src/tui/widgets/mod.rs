//! TUI widgets

pub mod billing;
pub mod cards;
pub mod connections;
pub mod help;
pub mod overview;
pub mod spinner;
pub mod tabs;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::theme::Theme;

/// Maximum content width for all views
pub const MAX_CONTENT_WIDTH: u16 = 170;

/// Clamp `area` to the max content width and center it
pub fn centered_content(area: Rect) -> Rect {
    let content_width = area.width.min(MAX_CONTENT_WIDTH);
    let x_offset = (area.width.saturating_sub(content_width)) / 2;
    Rect {
        x: area.x + x_offset,
        y: area.y,
        width: content_width,
        height: area.height,
    }
}

pub fn render_separator(area: Rect, buf: &mut Buffer, theme: Theme) {
    let line = "─".repeat(area.width as usize);
    buf.set_string(area.x, area.y, &line, Style::default().fg(theme.muted()));
}

/// Footer shared by every view
pub fn render_keybindings(area: Rect, buf: &mut Buffer, theme: Theme) {
    let mut spans = Vec::new();
    for (i, (key, desc)) in [
        ("q", ": Quit"),
        ("Tab", ": Switch view"),
        ("r", ": Refresh"),
        ("?", ": Help"),
    ]
    .into_iter()
    .enumerate()
    {
        if i > 0 {
            spans.push(Span::raw("  "));
        }
        spans.push(Span::styled(key, Style::default().fg(theme.accent())));
        spans.push(Span::styled(desc, Style::default().fg(theme.muted())));
    }

    Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .render(area, buf);
}

/// Buffer contents as text, one line per row
#[cfg(test)]
pub(crate) fn buffer_text(buf: &Buffer) -> String {
    let area = buf.area;
    (area.y..area.y + area.height)
        .map(|y| {
            (area.x..area.x + area.width)
                .map(|x| buf[(x, y)].symbol())
                .collect::<String>()
        })
        .collect::<Vec<_>>()
        .join("\n")
}
