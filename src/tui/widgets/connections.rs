//! Connected AI tools panel

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Modifier, Style},
    widgets::Widget,
};

use super::spinner::{LoadingStage, Spinner};
use crate::services::{ConnectionRow, ConnectionView};
use crate::tui::theme::Theme;

/// Column widths: tool name, last used
const NAME_WIDTH: usize = 24;
const LAST_USED_WIDTH: usize = 18;

const EMPTY_MESSAGE: &str = "No AI tools connected yet";
const EMPTY_ACTION: &str = "[ Connect Tool ]";

/// Panel rendering a `ConnectionView`
pub struct ConnectionsPanel<'a> {
    view: &'a ConnectionView,
    spinner_frame: usize,
    stage: LoadingStage,
    theme: Theme,
}

impl<'a> ConnectionsPanel<'a> {
    pub fn new(
        view: &'a ConnectionView,
        spinner_frame: usize,
        stage: LoadingStage,
        theme: Theme,
    ) -> Self {
        Self {
            view,
            spinner_frame,
            stage,
            theme,
        }
    }

    /// Rows the panel needs (header included)
    pub fn height(view: &ConnectionView) -> u16 {
        match view {
            ConnectionView::Loading => 1,
            ConnectionView::Empty => 2,
            ConnectionView::Populated(rows) => rows.len() as u16 + 1,
        }
    }

    fn render_row(&self, area: Rect, y: u16, row: &ConnectionRow, buf: &mut Buffer) {
        let name = truncate(&row.tool_name, NAME_WIDTH - 1);
        buf.set_string(
            area.x,
            y,
            format!("{:<width$}", name, width = NAME_WIDTH),
            Style::default().fg(self.theme.text()),
        );
        buf.set_string(
            area.x + NAME_WIDTH as u16,
            y,
            format!("{:<width$}", row.last_used, width = LAST_USED_WIDTH),
            Style::default().fg(self.theme.date()),
        );
        buf.set_string(
            area.x + (NAME_WIDTH + LAST_USED_WIDTH) as u16,
            y,
            format!("[{}]", row.status),
            Style::default()
                .fg(self.theme.badge(row.badge))
                .add_modifier(Modifier::BOLD),
        );
    }
}

impl Widget for ConnectionsPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        match self.view {
            ConnectionView::Loading => {
                Spinner::new(self.spinner_frame, self.stage, self.theme).render(area, buf);
            }
            ConnectionView::Empty => {
                let message_x =
                    area.x + (area.width.saturating_sub(EMPTY_MESSAGE.len() as u16)) / 2;
                buf.set_string(
                    message_x,
                    area.y,
                    EMPTY_MESSAGE,
                    Style::default().fg(self.theme.muted()),
                );
                if area.height > 1 {
                    let action_x =
                        area.x + (area.width.saturating_sub(EMPTY_ACTION.len() as u16)) / 2;
                    buf.set_string(
                        action_x,
                        area.y + 1,
                        EMPTY_ACTION,
                        Style::default().fg(self.theme.accent()),
                    );
                }
            }
            ConnectionView::Populated(rows) => {
                let header = format!(
                    "{:<name$}{:<last$}{}",
                    "Tool",
                    "Last Used",
                    "Status",
                    name = NAME_WIDTH,
                    last = LAST_USED_WIDTH
                );
                buf.set_string(
                    area.x,
                    area.y,
                    header,
                    Style::default()
                        .fg(self.theme.muted())
                        .add_modifier(Modifier::BOLD),
                );

                for (i, row) in rows.iter().enumerate() {
                    let y = area.y + 1 + i as u16;
                    if y >= area.y + area.height {
                        break;
                    }
                    self.render_row(area, y, row, buf);
                }
            }
        }
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
        out.push('…');
        out
    }
}
