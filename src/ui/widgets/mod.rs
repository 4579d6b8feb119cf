pub mod delete_dialog;
pub mod tweet_card;
pub mod tweet_dialog;
pub mod tweet_text;

use crossterm::event::KeyEvent;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

/// A dialog drawn over the whole screen that captures input while open.
pub trait Modal {
    type Outcome;

    fn is_open(&self) -> bool;

    fn render(&self, frame: &mut Frame, screen: Rect);

    fn handle_key(&mut self, key: KeyEvent) -> Self::Outcome;

    fn handle_click(&mut self, screen: Rect, column: u16, row: u16) -> Self::Outcome;
}

pub fn contains(area: Rect, column: u16, row: u16) -> bool {
    column >= area.x
        && column < area.x.saturating_add(area.width)
        && row >= area.y
        && row < area.y.saturating_add(area.height)
}

pub fn center_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Centre a fixed-size box in `r`, shrinking it to fit.
pub fn center_fixed(width: u16, height: u16, r: Rect) -> Rect {
    let width = width.min(r.width);
    let height = height.min(r.height);
    Rect::new(
        r.x + (r.width - width) / 2,
        r.y + (r.height - height) / 2,
        width,
        height,
    )
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use ratatui::{backend::TestBackend, buffer::Buffer, text::Line, Terminal};

    /// Draw into a test terminal and return the buffer.
    pub(crate) fn draw<F>(width: u16, height: u16, render: F) -> Buffer
    where
        F: FnOnce(&mut Frame),
    {
        let mut terminal = Terminal::new(TestBackend::new(width, height)).unwrap();
        terminal.draw(render).unwrap();
        terminal.backend().buffer().clone()
    }

    /// Row text as a user would read it. Cells hidden behind a double-width
    /// glyph are skipped.
    pub(crate) fn rows(buffer: &Buffer) -> Vec<String> {
        buffer
            .content
            .chunks(usize::from(buffer.area.width))
            .map(|row| {
                let mut text = String::new();
                let mut hidden = 0;
                for cell in row {
                    if hidden > 0 {
                        hidden -= 1;
                        continue;
                    }
                    text.push_str(cell.symbol());
                    hidden = Line::from(cell.symbol()).width().saturating_sub(1);
                }
                text
            })
            .collect()
    }

    pub(crate) fn screen_text(buffer: &Buffer) -> String {
        rows(buffer).join("\n")
    }

    #[test]
    fn test_contains() {
        let area = Rect::new(2, 3, 4, 2);
        assert!(contains(area, 2, 3));
        assert!(contains(area, 5, 4));
        assert!(!contains(area, 6, 4));
        assert!(!contains(area, 2, 5));
        assert!(!contains(area, 1, 3));
    }

    #[test]
    fn test_center_fixed() {
        let r = Rect::new(0, 0, 80, 24);
        assert_eq!(center_fixed(40, 8, r), Rect::new(20, 8, 40, 8));
        assert_eq!(center_fixed(100, 30, r), r);
    }

    #[test]
    fn test_center_rect_is_inside() {
        let r = Rect::new(0, 0, 100, 50);
        let inner = center_rect(60, 30, r);
        assert_eq!(inner.width, 60);
        assert!(inner.x >= 19 && inner.y >= 16);
    }
}
