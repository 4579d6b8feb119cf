use super::{center_fixed, contains, Modal};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

const DIALOG_WIDTH: u16 = 44;
const DIALOG_HEIGHT: u16 = 7;
const CANCEL_LABEL: &str = "[ Cancel ]";
const DELETE_LABEL: &str = "[ Delete ]";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DialogState {
    #[default]
    Closed,
    Open,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ConfirmButton {
    #[default]
    Cancel,
    Delete,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfirmOutcome {
    /// The dialog is closed and did not look at the input.
    Ignored,
    /// Input was captured; the dialog stays open.
    Pending,
    Confirmed,
    Cancelled,
}

/// Confirmation shown before a tweet is deleted. Only its two buttons close
/// it: Escape and clicks outside the box are swallowed.
#[derive(Debug, Clone, Default)]
pub struct DeleteDialog {
    state: DialogState,
    focus: ConfirmButton,
}

struct DialogRegions {
    frame: Rect,
    body: Rect,
    cancel: Rect,
    delete: Rect,
}

impl DeleteDialog {
    pub fn state(&self) -> DialogState {
        self.state
    }

    pub fn focus(&self) -> ConfirmButton {
        self.focus
    }

    pub fn open(&mut self) {
        self.state = DialogState::Open;
        self.focus = ConfirmButton::Cancel;
    }

    fn close(&mut self, outcome: ConfirmOutcome) -> ConfirmOutcome {
        self.state = DialogState::Closed;
        outcome
    }

    fn regions(screen: Rect) -> DialogRegions {
        let frame = center_fixed(DIALOG_WIDTH, DIALOG_HEIGHT, screen);
        let inner = Block::default().borders(Borders::ALL).inner(frame);
        let label = CANCEL_LABEL.len() as u16;
        let buttons_y = inner.y + 3;
        let delete_x = inner.right().saturating_sub(label + 1);
        let cancel_x = delete_x.saturating_sub(label + 1);

        DialogRegions {
            frame,
            body: Rect::new(inner.x + 1, inner.y + 1, inner.width.saturating_sub(2), 1),
            cancel: Rect::new(cancel_x, buttons_y, label, 1),
            delete: Rect::new(delete_x, buttons_y, label, 1),
        }
    }

    fn button_style(&self, button: ConfirmButton) -> Style {
        let style = Style::default().fg(Color::Cyan);
        if self.focus == button {
            style.add_modifier(Modifier::REVERSED | Modifier::BOLD)
        } else {
            style
        }
    }
}

impl Modal for DeleteDialog {
    type Outcome = ConfirmOutcome;

    fn is_open(&self) -> bool {
        self.state == DialogState::Open
    }

    fn render(&self, frame: &mut Frame, screen: Rect) {
        if !self.is_open() {
            return;
        }
        let regions = Self::regions(screen);
        frame.render_widget(Clear, regions.frame);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red))
            .title(" Delete Tweet ");
        frame.render_widget(block, regions.frame);

        frame.render_widget(
            Paragraph::new("Tweet will be deleted permanently."),
            regions.body.intersection(screen),
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                CANCEL_LABEL,
                self.button_style(ConfirmButton::Cancel),
            ))),
            regions.cancel.intersection(screen),
        );
        frame.render_widget(
            Paragraph::new(Line::from(Span::styled(
                DELETE_LABEL,
                self.button_style(ConfirmButton::Delete),
            ))),
            regions.delete.intersection(screen),
        );
    }

    fn handle_key(&mut self, key: KeyEvent) -> ConfirmOutcome {
        if !self.is_open() {
            return ConfirmOutcome::Ignored;
        }
        match key.code {
            KeyCode::Tab | KeyCode::BackTab | KeyCode::Left | KeyCode::Right => {
                self.focus = match self.focus {
                    ConfirmButton::Cancel => ConfirmButton::Delete,
                    ConfirmButton::Delete => ConfirmButton::Cancel,
                };
                ConfirmOutcome::Pending
            }
            KeyCode::Enter => match self.focus {
                ConfirmButton::Cancel => self.close(ConfirmOutcome::Cancelled),
                ConfirmButton::Delete => self.close(ConfirmOutcome::Confirmed),
            },
            KeyCode::Char('y') => self.close(ConfirmOutcome::Confirmed),
            KeyCode::Char('n') => self.close(ConfirmOutcome::Cancelled),
            _ => ConfirmOutcome::Pending,
        }
    }

    fn handle_click(&mut self, screen: Rect, column: u16, row: u16) -> ConfirmOutcome {
        if !self.is_open() {
            return ConfirmOutcome::Ignored;
        }
        let regions = Self::regions(screen);
        if contains(regions.cancel, column, row) {
            self.close(ConfirmOutcome::Cancelled)
        } else if contains(regions.delete, column, row) {
            self.close(ConfirmOutcome::Confirmed)
        } else {
            ConfirmOutcome::Pending
        }
    }
}
