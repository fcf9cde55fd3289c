//! Billing view widget - payment cards and invoice history

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Widget},
};

use super::cards::{cards_per_row, grid_height, render_card_grid, StatCard};
use super::tabs::{Tab, TabBar};
use super::{centered_content, render_keybindings, render_separator};
use crate::services::BillingHistory;
use crate::tui::theme::Theme;

/// Column widths: invoice, date, amount
const ID_WIDTH: usize = 12;
const DATE_WIDTH: usize = 16;
const AMOUNT_WIDTH: usize = 12;

/// Billing view widget
pub struct BillingView<'a> {
    history: &'a BillingHistory,
    selected_tab: Tab,
    theme: Theme,
}

impl<'a> BillingView<'a> {
    pub fn new(history: &'a BillingHistory, theme: Theme) -> Self {
        Self {
            history,
            selected_tab: Tab::Billing,
            theme,
        }
    }

    pub fn with_tab(mut self, tab: Tab) -> Self {
        self.selected_tab = tab;
        self
    }

    fn build_cards(&self) -> Vec<StatCard> {
        vec![
            StatCard {
                title: "Payment Method".to_string(),
                value: self.history.payment_method.label.to_string(),
                caption: self.history.payment_method.expiry.to_string(),
                value_color: self.theme.text(),
                border_color: self.theme.accent(),
                caption_color: self.theme.muted(),
            },
            StatCard {
                title: "Next Payment".to_string(),
                value: self.history.next_payment.date.to_string(),
                caption: self.history.next_payment.amount.to_string(),
                value_color: self.theme.date(),
                border_color: self.theme.cost(),
                caption_color: self.theme.cost(),
            },
        ]
    }

    fn render_title(&self, area: Rect, buf: &mut Buffer) {
        Paragraph::new(Line::from(Span::styled(
            "Billing History",
            Style::default()
                .fg(self.theme.text())
                .add_modifier(Modifier::BOLD),
        )))
        .alignment(Alignment::Center)
        .render(area, buf);
    }

    fn table_width() -> u16 {
        (ID_WIDTH + DATE_WIDTH + AMOUNT_WIDTH + "Status".len()) as u16
    }

    fn render_invoices(&self, area: Rect, buf: &mut Buffer) {
        let x = area.x + (area.width.saturating_sub(Self::table_width())) / 2;

        let header = format!(
            "{:<id$}{:<date$}{:<amount$}{}",
            "Invoice",
            "Date",
            "Amount",
            "Status",
            id = ID_WIDTH,
            date = DATE_WIDTH,
            amount = AMOUNT_WIDTH
        );
        buf.set_string(
            x,
            area.y,
            header,
            Style::default()
                .fg(self.theme.muted())
                .add_modifier(Modifier::BOLD),
        );

        for (i, invoice) in self.history.invoices.iter().enumerate() {
            let y = area.y + 1 + i as u16;
            if y >= area.y + area.height {
                break;
            }
            let line = Line::from(vec![
                Span::styled(
                    format!("{:<width$}", invoice.id, width = ID_WIDTH),
                    Style::default().fg(self.theme.text()),
                ),
                Span::styled(
                    format!("{:<width$}", invoice.date, width = DATE_WIDTH),
                    Style::default().fg(self.theme.date()),
                ),
                Span::styled(
                    format!("{:<width$}", invoice.amount_label(), width = AMOUNT_WIDTH),
                    Style::default().fg(self.theme.cost()),
                ),
                Span::styled(invoice.status, Style::default().fg(self.theme.bar())),
            ]);
            buf.set_line(x, y, &line, area.width.saturating_sub(x - area.x));
        }
    }
}

impl Widget for BillingView<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let centered_area = centered_content(area);

        let cards = self.build_cards();
        let cols = cards_per_row(centered_area.width, cards.len());
        let invoice_rows = self.history.invoices.len() as u16 + 1;

        let chunks = Layout::vertical([
            Constraint::Length(1),                              // 0: Top padding
            Constraint::Length(1),                              // 1: Tabs
            Constraint::Length(1),                              // 2: Separator
            Constraint::Length(1),                              // 3: Title
            Constraint::Length(1),                              // 4: Blank
            Constraint::Length(grid_height(cards.len(), cols)), // 5: Cards
            Constraint::Length(invoice_rows),                   // 6: Invoices
            Constraint::Fill(1),                                // 7: Remaining
            Constraint::Length(1),                              // 8: Separator
            Constraint::Length(1),                              // 9: Keybindings
        ])
        .split(centered_area);

        TabBar::new(self.selected_tab, self.theme).render(chunks[1], buf);
        render_separator(chunks[2], buf, self.theme);
        self.render_title(chunks[3], buf);
        render_card_grid(chunks[5], buf, &cards, cols);
        self.render_invoices(chunks[6], buf);
        render_separator(chunks[8], buf, self.theme);
        render_keybindings(chunks[9], buf, self.theme);
    }
}
