//! Inline loading indicator

use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget};

use crate::tui::theme::Theme;

/// Spinner animation frames
const SPINNER_FRAMES: &[char] = &['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];

/// What the dashboard is waiting on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadingStage {
    /// No signed-in identity; nothing is fetched
    SignIn,
    /// Fetch in flight
    Fetching,
}

impl LoadingStage {
    pub fn message(self) -> &'static str {
        match self {
            Self::SignIn => "Waiting for sign-in...",
            Self::Fetching => "Fetching account data...",
        }
    }
}

/// Single-line spinner, centered in its area
pub struct Spinner {
    frame: usize,
    stage: LoadingStage,
    theme: Theme,
}

impl Spinner {
    pub fn new(frame: usize, stage: LoadingStage, theme: Theme) -> Self {
        Self {
            frame,
            stage,
            theme,
        }
    }

    /// Get the current spinner character
    pub fn current_char(&self) -> char {
        SPINNER_FRAMES[self.frame % SPINNER_FRAMES.len()]
    }

    /// Advance to next frame, returning the new frame index
    pub fn next_frame(frame: usize) -> usize {
        (frame + 1) % SPINNER_FRAMES.len()
    }

    pub fn label(&self) -> String {
        format!("{} {}", self.current_char(), self.stage.message())
    }
}

impl Widget for Spinner {
    fn render(self, area: Rect, buf: &mut Buffer) {
        if area.height == 0 || area.width == 0 {
            return;
        }

        let text = self.label();
        let width = text.chars().count() as u16;
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        buf.set_stringn(
            x,
            area.y,
            &text,
            area.width as usize,
            Style::default().fg(self.theme.accent()),
        );
    }
}
