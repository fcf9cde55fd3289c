//! Bordered stat cards laid out in a centered grid

use ratatui::{
    buffer::Buffer,
    layout::Rect,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Widget},
};

/// Card dimensions
pub const CARD_WIDTH: u16 = 28;
pub const CARD_HEIGHT: u16 = 6;

/// One card: title, highlighted value, muted caption
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatCard {
    pub title: String,
    pub value: String,
    pub caption: String,
    pub value_color: Color,
    pub border_color: Color,
    pub caption_color: Color,
}

/// Number of cards per row for the available width, at most `max_cols`
pub fn cards_per_row(width: u16, max_cols: usize) -> usize {
    let usable_width = width.saturating_sub(4); // padding
    let cards = (usable_width / (CARD_WIDTH + 2)) as usize; // +2 for spacing
    cards.clamp(1, max_cols.max(1))
}

/// Height a grid of `count` cards needs
pub fn grid_height(count: usize, cols: usize) -> u16 {
    let rows = count.div_ceil(cols.max(1));
    (rows as u16) * (CARD_HEIGHT + 1) // +1 for spacing
}

/// Cards left-to-right, top-to-bottom, centered horizontally
pub fn render_card_grid(area: Rect, buf: &mut Buffer, cards: &[StatCard], cols: usize) {
    let cols = cols.max(1);
    let total_cards_width = (cols as u16) * CARD_WIDTH + ((cols - 1) as u16) * 2;
    let start_x = area.x + (area.width.saturating_sub(total_cards_width)) / 2;

    for (i, card) in cards.iter().enumerate() {
        let row = i / cols;
        let col = i % cols;

        let card_x = start_x + (col as u16) * (CARD_WIDTH + 2);
        let card_y = area.y + (row as u16) * (CARD_HEIGHT + 1);

        if card_y + CARD_HEIGHT > area.y + area.height {
            continue;
        }

        let card_area = Rect {
            x: card_x,
            y: card_y,
            width: CARD_WIDTH.min(area.width),
            height: CARD_HEIGHT,
        };
        render_card(card_area, buf, card);
    }
}

pub fn render_card(area: Rect, buf: &mut Buffer, card: &StatCard) {
    Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(card.border_color))
        .render(area, buf);

    let centered_x = |text: &str| area.x + (area.width.saturating_sub(text.chars().count() as u16)) / 2;

    if area.height > 2 {
        buf.set_string(
            centered_x(&card.title),
            area.y + 1,
            &card.title,
            Style::default().fg(card.border_color),
        );
    }

    if area.height > 3 {
        buf.set_string(
            centered_x(&card.value),
            area.y + 3,
            &card.value,
            Style::default()
                .fg(card.value_color)
                .add_modifier(Modifier::BOLD),
        );
    }

    if area.height > 4 {
        buf.set_string(
            centered_x(&card.caption),
            area.y + 4,
            &card.caption,
            Style::default().fg(card.caption_color),
        );
    }
}
