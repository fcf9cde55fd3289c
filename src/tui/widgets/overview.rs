//! Overview layout widget

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::cards::{cards_per_row, grid_height, render_card_grid, StatCard};
use super::connections::ConnectionsPanel;
use super::spinner::{LoadingStage, Spinner};
use super::tabs::{Tab, TabBar};
use super::{centered_content, render_keybindings, render_separator};
use crate::services::presenter::{StatCardView, StatKind, RECENT_ACTIVITY};
use crate::services::{summary_cards, ConnectionView};
use crate::tui::theme::Theme;
use crate::types::DashboardSummary;

/// Data for the overview display (references to avoid cloning)
#[derive(Debug)]
pub struct OverviewData<'a> {
    pub summary: &'a DashboardSummary,
    pub connections: &'a ConnectionView,
    pub loading: bool,
    pub stage: LoadingStage,
    pub spinner_frame: usize,
    pub selected_tab: Tab,
}

/// Overview widget: stat cards, connected tools, recent activity
pub struct Overview<'a> {
    data: OverviewData<'a>,
    theme: Theme,
}

impl<'a> Overview<'a> {
    pub fn new(data: OverviewData<'a>, theme: Theme) -> Self {
        Self { data, theme }
    }

    fn build_cards(&self) -> Vec<StatCard> {
        summary_cards(self.data.summary, self.data.loading)
            .into_iter()
            .map(|view| self.card(view))
            .collect()
    }

    fn card(&self, view: StatCardView) -> StatCard {
        let color = match view.kind {
            StatKind::ActiveServices => self.theme.accent(),
            StatKind::ConnectedTools => self.theme.stat_blue(),
            StatKind::TotalSpent => self.theme.stat_warm(),
            StatKind::AccountStatus => self.theme.bar(),
        };
        StatCard {
            title: view.title.to_string(),
            value: view.value,
            caption: view.caption.to_string(),
            value_color: color,
            border_color: color,
            caption_color: self.theme.muted(),
        }
    }

    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        if self.data.loading {
            Spinner::new(self.data.spinner_frame, self.data.stage, self.theme).render(area, buf);
            return;
        }

        Paragraph::new(Line::from(Span::styled(
            "Dashboard Overview",
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(area, buf);
    }

    fn render_section_header(&self, area: Rect, buf: &mut Buffer, title: &str) {
        buf.set_string(
            area.x + 2,
            area.y,
            title,
            Style::default()
                .fg(self.theme.date())
                .add_modifier(Modifier::BOLD),
        );
    }

    fn render_activity(&self, area: Rect, buf: &mut Buffer) {
        for (i, entry) in RECENT_ACTIVITY.iter().enumerate() {
            let y = area.y + i as u16;
            if y >= area.y + area.height {
                break;
            }
            let line = Line::from(vec![
                Span::styled(
                    format!("  {:<16}", entry.date),
                    Style::default().fg(self.theme.date()),
                ),
                Span::styled(
                    format!("{:<24}", entry.activity),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("[{}]", entry.status),
                    Style::default().fg(self.theme.badge(entry.badge())),
                ),
            ]);
            buf.set_line(area.x, y, &line, area.width);
        }
    }
}

impl Widget for Overview<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let centered_area = centered_content(area);

        let cards = self.build_cards();
        let cols = cards_per_row(centered_area.width, cards.len());
        let connections_height = ConnectionsPanel::height(self.data.connections);

        let chunks = Layout::vertical([
            Constraint::Length(1),                             // 0: Top padding
            Constraint::Length(1),                             // 1: Tabs
            Constraint::Length(1),                             // 2: Separator
            Constraint::Length(1),                             // 3: Title / spinner
            Constraint::Length(1),                             // 4: Blank
            Constraint::Length(grid_height(cards.len(), cols)), // 5: Cards
            Constraint::Length(1),                             // 6: Connections header
            Constraint::Length(connections_height),            // 7: Connections
            Constraint::Length(1),                             // 8: Blank
            Constraint::Length(1),                             // 9: Activity header
            Constraint::Length(RECENT_ACTIVITY.len() as u16),  // 10: Activity
            Constraint::Fill(1),                               // 11: Remaining
            Constraint::Length(1),                             // 12: Separator
            Constraint::Length(1),                             // 13: Keybindings
        ])
        .split(centered_area);

        TabBar::new(self.data.selected_tab, self.theme).render(chunks[1], buf);
        render_separator(chunks[2], buf, self.theme);
        self.render_title(chunks[3], buf);
        render_card_grid(chunks[5], buf, &cards, cols);

        self.render_section_header(chunks[6], buf, "Connected AI Tools");
        let panel_area = Rect {
            x: chunks[7].x + 2,
            width: chunks[7].width.saturating_sub(2),
            ..chunks[7]
        };
        ConnectionsPanel::new(
            self.data.connections,
            self.data.spinner_frame,
            self.data.stage,
            self.theme,
        )
        .render(panel_area, buf);

        self.render_section_header(chunks[9], buf, "Recent Activity");
        self.render_activity(chunks[10], buf);

        render_separator(chunks[12], buf, self.theme);
        render_keybindings(chunks[13], buf, self.theme);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tui::widgets::buffer_text;

    fn render(data: OverviewData<'_>) -> String {
        let area = Rect::new(0, 0, 140, 40);
        let mut buf = Buffer::empty(area);
        Overview::new(data, Theme::Dark).render(area, &mut buf);
        buffer_text(&buf)
    }

    #[test]
    fn test_overview_builds_four_cards() {
        let summary = DashboardSummary::default();
        let connections = ConnectionView::Empty;
        let overview = Overview::new(
            OverviewData {
                summary: &summary,
                connections: &connections,
                loading: false,
                stage: LoadingStage::Fetching,
                spinner_frame: 0,
                selected_tab: Tab::Overview,
            },
            Theme::Dark,
        );

        let cards = overview.build_cards();
        assert_eq!(cards.len(), 4);
        assert_eq!(cards[3].title, "Account Status");
    }

    #[test]
    fn test_overview_loaded() {
        let summary = DashboardSummary {
            active_service_count: 2,
            connected_tool_count: 0,
            total_spent: 150.5,
        };
        let connections = ConnectionView::Empty;

        let text = render(OverviewData {
            summary: &summary,
            connections: &connections,
            loading: false,
            stage: LoadingStage::Fetching,
            spinner_frame: 0,
            selected_tab: Tab::Overview,
        });

        assert!(text.contains("Dashboard Overview"));
        assert!(text.contains("Active Services"));
        assert!(text.contains("$151"));
        assert!(text.contains("No AI tools connected yet"));
        assert!(text.contains("Payment Processed"));
    }

    #[test]
    fn test_overview_loading_shows_placeholders() {
        let summary = DashboardSummary::default();
        let connections = ConnectionView::Loading;

        let text = render(OverviewData {
            summary: &summary,
            connections: &connections,
            loading: true,
            stage: LoadingStage::SignIn,
            spinner_frame: 0,
            selected_tab: Tab::Overview,
        });

        assert!(text.contains("Waiting for sign-in..."));
        assert!(!text.contains("Fetching account data..."));
        assert!(text.contains("$..."));
        assert!(!text.contains("Dashboard Overview"));
    }
}
