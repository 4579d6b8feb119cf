use super::tweet_text::{TextStyle, TweetText};
use super::{center_rect, Modal};
use crate::store::Dispatcher;
use crate::tweet::{Tweet, TweetId};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogOutcome {
    Ignored,
    Editing,
    Submitted,
    Closed,
}

/// Reply composer for a single parent tweet, quoting it above the draft.
#[derive(Debug, Clone)]
pub struct TweetDialog {
    open: bool,
    parent_id: TweetId,
    parent_author: String,
    quote: String,
    text: String,
    dispatch: Dispatcher,
}

impl TweetDialog {
    pub fn new(parent: &Tweet, dispatch: Dispatcher) -> Self {
        Self {
            open: false,
            parent_id: parent.id.clone(),
            parent_author: parent.owner.username.clone(),
            quote: parent.text.clone(),
            text: String::new(),
            dispatch,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn set_open(&mut self, open: bool) {
        self.open = open;
        self.text.clear();
    }

    fn submit(&mut self) -> DialogOutcome {
        if self.text.trim().is_empty() {
            return DialogOutcome::Editing;
        }
        self.dispatch.reply(&self.parent_id, self.text.trim());
        self.set_open(false);
        DialogOutcome::Submitted
    }
}

impl Modal for TweetDialog {
    type Outcome = DialogOutcome;

    fn is_open(&self) -> bool {
        self.open
    }

    fn render(&self, frame: &mut Frame, screen: Rect) {
        if !self.open {
            return;
        }
        let modal_area = center_rect(60, 50, screen);
        frame.render_widget(Clear, modal_area);

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan))
            .title(" Reply ");

        let inner = block.inner(modal_area);
        frame.render_widget(block, modal_area);

        let muted = Style::default().fg(Color::DarkGray);
        let mut text = vec![Line::from(Span::styled(
            format!("Replying to @{}", self.parent_author),
            muted,
        ))];
        text.extend(TweetText::new(&self.quote, TextStyle::muted()).lines(inner.width));
        text.extend([
            Line::from(""),
            Line::from(format!("{}▏", self.text)),
            Line::from(""),
            Line::from(Span::styled("Enter to reply | Esc to cancel", muted)),
        ]);

        let paragraph = Paragraph::new(text).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);
    }

    fn handle_key(&mut self, key: KeyEvent) -> DialogOutcome {
        if !self.open {
            return DialogOutcome::Ignored;
        }
        match key.code {
            KeyCode::Esc => {
                self.set_open(false);
                DialogOutcome::Closed
            }
            KeyCode::Enter => self.submit(),
            KeyCode::Backspace => {
                self.text.pop();
                DialogOutcome::Editing
            }
            KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.text.push(c);
                DialogOutcome::Editing
            }
            _ => DialogOutcome::Editing,
        }
    }

    fn handle_click(&mut self, _screen: Rect, _column: u16, _row: u16) -> DialogOutcome {
        if self.open {
            DialogOutcome::Editing
        } else {
            DialogOutcome::Ignored
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tweet::tests::make_tweet;
    use crate::tweet_message::TweetAction;
    use crate::ui::widgets::tests::{draw, rows, screen_text};

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_text(dialog: &mut TweetDialog, text: &str) {
        for c in text.chars() {
            dialog.handle_key(key(KeyCode::Char(c)));
        }
    }

    #[test]
    fn test_closed_dialog_ignores_input() {
        let (dispatch, _rx) = Dispatcher::channel();
        let mut dialog = TweetDialog::new(&make_tweet("1", "alice"), dispatch);
        assert_eq!(dialog.handle_key(key(KeyCode::Char('a'))), DialogOutcome::Ignored);
        assert_eq!(dialog.text(), "");
    }

    #[test]
    fn test_submit_dispatches_reply() {
        let (dispatch, mut rx) = Dispatcher::channel();
        let mut dialog = TweetDialog::new(&make_tweet("1", "alice"), dispatch);
        dialog.set_open(true);
        type_text(&mut dialog, "hey!");
        dialog.handle_key(key(KeyCode::Backspace));
        assert_eq!(dialog.text(), "hey");

        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), DialogOutcome::Submitted);
        assert!(!dialog.is_open());
        assert_eq!(
            rx.try_recv().unwrap(),
            TweetAction::Reply {
                parent_id: "1".to_string(),
                text: "hey".to_string()
            }
        );
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_empty_submit_stays_open() {
        let (dispatch, mut rx) = Dispatcher::channel();
        let mut dialog = TweetDialog::new(&make_tweet("1", "alice"), dispatch);
        dialog.set_open(true);
        type_text(&mut dialog, "   ");
        assert_eq!(dialog.handle_key(key(KeyCode::Enter)), DialogOutcome::Editing);
        assert!(dialog.is_open());
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_escape_discards_draft() {
        let (dispatch, mut rx) = Dispatcher::channel();
        let mut dialog = TweetDialog::new(&make_tweet("1", "alice"), dispatch);
        dialog.set_open(true);
        type_text(&mut dialog, "draft");
        assert_eq!(dialog.handle_key(key(KeyCode::Esc)), DialogOutcome::Closed);
        assert!(!dialog.is_open());

        dialog.set_open(true);
        assert_eq!(dialog.text(), "");
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn test_render_shows_draft() {
        let (dispatch, _rx) = Dispatcher::channel();
        let mut dialog = TweetDialog::new(&make_tweet("1", "alice"), dispatch);
        dialog.set_open(true);
        type_text(&mut dialog, "typing");
        let buffer = draw(80, 24, |frame| dialog.render(frame, frame.area()));
        let text = screen_text(&buffer);
        assert!(text.contains("Reply"));
        assert!(text.contains("typing"));
        assert!(text.contains("Enter to reply"));
    }

    #[test]
    fn test_render_quotes_parent_muted() {
        let (dispatch, _rx) = Dispatcher::channel();
        let mut dialog = TweetDialog::new(&make_tweet("7", "alice"), dispatch);
        dialog.set_open(true);
        let buffer = draw(80, 24, |frame| dialog.render(frame, frame.area()));
        let text = screen_text(&buffer);
        assert!(text.contains("Replying to @alice"));
        assert!(text.contains("Tweet number 7"));

        let width = usize::from(buffer.area.width);
        let (row, line) = rows(&buffer)
            .into_iter()
            .enumerate()
            .find(|(_, line)| line.contains("Tweet number 7"))
            .unwrap();
        let column = line[..line.find("Tweet").unwrap()].chars().count();
        assert_eq!(buffer.content[row * width + column].fg, Color::DarkGray);
    }
}
