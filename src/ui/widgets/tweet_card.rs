//! The tweet card: author header, body, engagement bar and the two dialogs
//! it owns (reply composer and delete confirmation).
//!
//! A card holds its own copy of the tweet prop. Every store snapshot pushed
//! through [`TweetCard::sync`] is reconciled into that copy before anything
//! is derived from it, and resets the optimistic like/retweet flags to the
//! authoritative values.

use super::delete_dialog::{ConfirmOutcome, DeleteDialog, DialogState};
use super::tweet_dialog::TweetDialog;
use super::tweet_text::{TextStyle, TweetText};
use super::{contains, Modal};
use crate::store::{Dispatcher, StoreSnapshot};
use crate::tweet::{
    format_long_date, format_short_date, DisplayMode, NameWidth, Tweet, TweetId, UserState,
    GRID_COLUMNS,
};
use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

pub const COMMENT_ICON: &str = "✎";
pub const RETWEET_ICON: &str = "⇄";
pub const LIKE_ICON: &str = "♡";
pub const LIKE_FILLED_ICON: &str = "♥";
pub const BOOKMARK_ICON: &str = "⚐";
pub const BOOKMARK_FILLED_ICON: &str = "⚑";
pub const STATS_ICON: &str = "▥";
pub const DELETE_ICON: &str = "✖";

/// Selection bar, avatar and a blank column.
const GUTTER: u16 = 5;
/// An icon button is the glyph plus one cell of padding on each side.
const BUTTON_WIDTH: u16 = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gesture {
    /// Activate the card body.
    Open,
    Comment,
    Like,
    Retweet,
    Delete,
    Bookmark,
    Stats,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CardOutcome {
    Ignored,
    Consumed,
    Navigate(TweetId),
}

/// Display values for one render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub name: String,
    pub username: String,
    pub name_width: NameWidth,
    pub top_date: Option<String>,
    pub detail_date: Option<String>,
    pub divider: bool,
    pub comment_count: u64,
    pub likes_count: u64,
    pub retweets_count: u64,
    pub liked: bool,
    pub retweeted: bool,
    pub bookmarked: bool,
    pub owned: bool,
}

pub fn derive_view(tweet: &Tweet, mode: DisplayMode, user: &UserState) -> CardView {
    let layout = mode.layout();
    CardView {
        name: tweet.owner.name.clone(),
        username: tweet.owner.username.clone(),
        name_width: layout.name_width,
        top_date: layout.top_date.then(|| format_short_date(&tweet.date)),
        detail_date: layout
            .detail_footer
            .then(|| format_long_date(&tweet.date)),
        divider: layout.detail_footer,
        comment_count: tweet.comment_count(),
        likes_count: tweet.likes_count,
        retweets_count: tweet.retweets_count,
        liked: tweet.liked,
        retweeted: tweet.retweeted,
        // no bookmark model yet
        bookmarked: false,
        owned: tweet.is_owned_by(user),
    }
}

struct ActionRegion {
    gesture: Gesture,
    button: Rect,
    slot: Rect,
}

struct CardRegions {
    rail: Rect,
    avatar: Rect,
    name: Rect,
    handle: Rect,
    delete: Option<Rect>,
    text: Rect,
    detail_date: Option<Rect>,
    divider: Option<Rect>,
    actions: Vec<ActionRegion>,
    bottom: Rect,
}

#[derive(Debug, Clone)]
pub struct TweetCard {
    tweet: Tweet,
    mode: DisplayMode,
    user: UserState,
    dispatch: Dispatcher,
    liked: bool,
    retweeted: bool,
    delete_dialog: DeleteDialog,
    comment_dialog: TweetDialog,
}

impl TweetCard {
    pub fn new(
        tweet: Tweet,
        mode: DisplayMode,
        snapshot: &StoreSnapshot,
        dispatch: Dispatcher,
    ) -> Self {
        let comment_dialog = TweetDialog::new(&tweet, dispatch.clone());
        let mut card = Self {
            liked: tweet.liked,
            retweeted: tweet.retweeted,
            tweet,
            mode,
            user: snapshot.user.clone(),
            dispatch,
            delete_dialog: DeleteDialog::default(),
            comment_dialog,
        };
        card.sync(snapshot);
        card
    }

    pub fn id(&self) -> &str {
        &self.tweet.id
    }

    pub fn tweet(&self) -> &Tweet {
        &self.tweet
    }

    pub fn mode(&self) -> DisplayMode {
        self.mode
    }

    /// Replace the tweet prop, e.g. after the parent refreshed it.
    pub fn set_tweet(&mut self, tweet: Tweet, snapshot: &StoreSnapshot) {
        self.tweet = tweet;
        self.sync(snapshot);
    }

    /// Apply a store snapshot: reconcile the last action result, then reset
    /// the optimistic flags from the (possibly patched) prop.
    pub fn sync(&mut self, snapshot: &StoreSnapshot) {
        self.user = snapshot.user.clone();
        self.tweet.reconcile(snapshot.tweet_action.as_ref());
        self.liked = self.tweet.liked;
        self.retweeted = self.tweet.retweeted;
    }

    pub fn view(&self) -> CardView {
        CardView {
            liked: self.liked,
            retweeted: self.retweeted,
            ..derive_view(&self.tweet, self.mode, &self.user)
        }
    }

    pub fn is_modal_open(&self) -> bool {
        self.delete_dialog.is_open() || self.comment_dialog.is_open()
    }

    pub fn delete_dialog_state(&self) -> DialogState {
        self.delete_dialog.state()
    }

    pub fn is_comment_dialog_open(&self) -> bool {
        self.comment_dialog.is_open()
    }

    pub fn height(&self, width: u16) -> u16 {
        let layout = self.mode.layout();
        let text = TweetText::new(&self.tweet.text, TextStyle::tweet());
        let footer = if layout.detail_footer { 2 } else { 0 };
        header_rows(layout.name_width)
            .saturating_add(text.height(content_width(width)))
            .saturating_add(footer + 2)
    }

    pub fn gesture(&mut self, gesture: Gesture) -> CardOutcome {
        let owned = self.tweet.is_owned_by(&self.user);
        match gesture {
            Gesture::Open => {
                if self.mode.layout().navigable {
                    CardOutcome::Navigate(self.tweet.id.clone())
                } else {
                    CardOutcome::Ignored
                }
            }
            Gesture::Comment => {
                self.comment_dialog.set_open(true);
                CardOutcome::Consumed
            }
            Gesture::Like => {
                if self.liked {
                    self.dispatch.remove_like(&self.tweet.id);
                } else {
                    self.dispatch.like_tweet(&self.tweet.id);
                }
                self.liked = !self.liked;
                CardOutcome::Consumed
            }
            Gesture::Retweet => {
                if self.retweeted {
                    self.dispatch.remove_retweet(&self.tweet.id);
                } else {
                    self.dispatch.retweet(&self.tweet.id);
                }
                self.retweeted = !self.retweeted;
                CardOutcome::Consumed
            }
            Gesture::Delete => {
                if !owned {
                    return CardOutcome::Ignored;
                }
                self.delete_dialog.open();
                CardOutcome::Consumed
            }
            // stats has no target view yet
            Gesture::Stats if !owned => CardOutcome::Ignored,
            Gesture::Stats | Gesture::Bookmark => CardOutcome::Consumed,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent) -> CardOutcome {
        if self.delete_dialog.is_open() {
            let outcome = self.delete_dialog.handle_key(key);
            self.on_confirm(outcome);
            return CardOutcome::Consumed;
        }
        if self.comment_dialog.is_open() {
            self.comment_dialog.handle_key(key);
            return CardOutcome::Consumed;
        }

        let gesture = match key.code {
            KeyCode::Enter => Gesture::Open,
            KeyCode::Char('c') => Gesture::Comment,
            KeyCode::Char('l') => Gesture::Like,
            KeyCode::Char('r') => Gesture::Retweet,
            KeyCode::Char('d') => Gesture::Delete,
            KeyCode::Char('b') => Gesture::Bookmark,
            KeyCode::Char('s') => Gesture::Stats,
            _ => return CardOutcome::Ignored,
        };
        self.gesture(gesture)
    }

    /// Route a click. `area` is where the card was drawn, `screen` is where
    /// its dialogs are drawn.
    pub fn handle_click(&mut self, area: Rect, screen: Rect, column: u16, row: u16) -> CardOutcome {
        if self.delete_dialog.is_open() {
            let outcome = self.delete_dialog.handle_click(screen, column, row);
            self.on_confirm(outcome);
            return CardOutcome::Consumed;
        }
        if self.comment_dialog.is_open() {
            self.comment_dialog.handle_click(screen, column, row);
            return CardOutcome::Consumed;
        }
        match self.hit_test(area, column, row) {
            Some(gesture) => self.gesture(gesture),
            None => CardOutcome::Ignored,
        }
    }

    /// Which gesture a click at (`column`, `row`) maps to. Anything inside
    /// the card but outside an icon button is the body.
    pub fn hit_test(&self, area: Rect, column: u16, row: u16) -> Option<Gesture> {
        if !contains(area, column, row) {
            return None;
        }
        let regions = self.regions(area);
        if regions.delete.is_some_and(|r| contains(r, column, row)) {
            return Some(Gesture::Delete);
        }
        let action = regions
            .actions
            .iter()
            .find(|action| contains(action.button, column, row))
            .map(|action| action.gesture);
        Some(action.unwrap_or(Gesture::Open))
    }

    fn on_confirm(&mut self, outcome: ConfirmOutcome) {
        if outcome == ConfirmOutcome::Confirmed {
            self.dispatch.delete_tweet(&self.tweet.id);
        }
    }

    fn regions(&self, area: Rect) -> CardRegions {
        let view = self.view();
        let content = Rect::new(
            area.x + GUTTER,
            area.y,
            content_width(area.width),
            area.height,
        );
        let text_rows = TweetText::new(&self.tweet.text, TextStyle::tweet()).height(content.width);

        let delete = view.owned.then(|| {
            Rect::new(
                content.right().saturating_sub(BUTTON_WIDTH),
                content.y,
                BUTTON_WIDTH,
                1,
            )
        });
        let header_width = if delete.is_some() {
            content.width.saturating_sub(BUTTON_WIDTH)
        } else {
            content.width
        };

        let (name, handle, header_rows) = match view.name_width {
            NameWidth::Span(units) if units >= GRID_COLUMNS => (
                Rect::new(content.x, content.y, header_width, 1),
                Rect::new(content.x, content.y + 1, header_width, 1),
                2,
            ),
            NameWidth::Span(units) => {
                let width = header_width * units / GRID_COLUMNS;
                (
                    Rect::new(content.x, content.y, width, 1),
                    Rect::new(content.x + width, content.y, header_width - width, 1),
                    1,
                )
            }
            NameWidth::Auto => {
                let width = u16::try_from(Line::from(view.name.as_str()).width())
                    .unwrap_or(u16::MAX)
                    .min(header_width);
                (
                    Rect::new(content.x, content.y, width, 1),
                    Rect::new(content.x + width, content.y, header_width - width, 1),
                    1,
                )
            }
        };

        let mut y = content.y + header_rows;
        let text = Rect::new(content.x, y, content.width, text_rows);
        y += text_rows;

        let (detail_date, divider) = if view.divider {
            let date = Rect::new(content.x, y, content.width, 1);
            let divider = Rect::new(content.x, y + 1, content.width, 1);
            y += 2;
            (Some(date), Some(divider))
        } else {
            (None, None)
        };

        let mut gestures = vec![
            Gesture::Comment,
            Gesture::Retweet,
            Gesture::Like,
            Gesture::Bookmark,
        ];
        if view.owned {
            gestures.push(Gesture::Stats);
        }
        let slots = Layout::horizontal(vec![
            Constraint::Ratio(1, gestures.len() as u32);
            gestures.len()
        ])
        .split(Rect::new(content.x, y, content.width, 1));
        let actions = gestures
            .into_iter()
            .zip(slots.iter())
            .map(|(gesture, slot)| ActionRegion {
                gesture,
                button: Rect::new(slot.x, slot.y, BUTTON_WIDTH.min(slot.width), 1),
                slot: *slot,
            })
            .collect();
        y += 1;

        CardRegions {
            rail: Rect::new(area.x, area.y, 1, y - area.y),
            avatar: Rect::new(area.x + 1, area.y, 3, 1),
            name,
            handle,
            delete,
            text,
            detail_date,
            divider,
            actions,
            bottom: Rect::new(area.x, y, area.width, 1),
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, selected: bool) {
        let view = self.view();
        let regions = self.regions(area);
        let muted = Style::default().fg(Color::DarkGray);

        if selected {
            let rail = vec![Line::from("▌"); usize::from(regions.rail.height)];
            put(frame, area, regions.rail, rail, Style::default().fg(Color::Cyan));
        }

        put(
            frame,
            area,
            regions.avatar,
            vec![Line::from(avatar_label(&view.name))],
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        );

        put(
            frame,
            area,
            regions.name,
            vec![Line::from(view.name.clone())],
            Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
        );

        let mut handle = vec![Span::raw(if view.name_width == NameWidth::Auto {
            format!(" @{}", view.username)
        } else {
            format!("@{}", view.username)
        })];
        if let Some(date) = &view.top_date {
            handle.push(Span::raw(format!(" · {}", date)));
        }
        put(frame, area, regions.handle, vec![Line::from(handle)], muted);

        if let Some(delete) = regions.delete {
            put(
                frame,
                area,
                delete,
                vec![Line::from(format!(" {}", DELETE_ICON))],
                Style::default().fg(Color::Red),
            );
        }

        let text = TweetText::new(&self.tweet.text, TextStyle::tweet());
        put(frame, area, regions.text, text.lines(regions.text.width), Style::default());

        if let (Some(rect), Some(date)) = (regions.detail_date, &view.detail_date) {
            put(
                frame,
                area,
                rect,
                vec![Line::from(date.clone())],
                Style::default().fg(Color::Magenta),
            );
        }
        if let Some(rect) = regions.divider {
            put(frame, area, rect, vec![divider_line(rect.width)], muted);
        }

        for action in &regions.actions {
            let (icon, count, style) = match action.gesture {
                Gesture::Comment => (COMMENT_ICON, Some(view.comment_count), muted),
                Gesture::Retweet => (
                    RETWEET_ICON,
                    Some(view.retweets_count),
                    if view.retweeted {
                        Style::default().fg(Color::Green)
                    } else {
                        muted
                    },
                ),
                Gesture::Like => (
                    if view.liked { LIKE_FILLED_ICON } else { LIKE_ICON },
                    Some(view.likes_count),
                    Style::default().fg(Color::Red),
                ),
                Gesture::Bookmark => (
                    if view.bookmarked {
                        BOOKMARK_FILLED_ICON
                    } else {
                        BOOKMARK_ICON
                    },
                    None,
                    Style::default().fg(Color::Blue),
                ),
                Gesture::Stats | Gesture::Delete | Gesture::Open => (STATS_ICON, None, muted),
            };
            let mut spans = vec![Span::styled(format!(" {} ", icon), style)];
            if let Some(count) = count {
                spans.push(Span::styled(count.to_string(), muted));
            }
            put(frame, area, action.slot, vec![Line::from(spans)], Style::default());
        }

        put(frame, area, regions.bottom, vec![divider_line(regions.bottom.width)], muted);
    }

    pub fn render_dialogs(&self, frame: &mut Frame, screen: Rect) {
        self.delete_dialog.render(frame, screen);
        self.comment_dialog.render(frame, screen);
    }
}

fn header_rows(name_width: NameWidth) -> u16 {
    match name_width {
        NameWidth::Span(units) if units >= GRID_COLUMNS => 2,
        _ => 1,
    }
}

fn content_width(width: u16) -> u16 {
    width.saturating_sub(GUTTER + 1).max(1)
}

fn initial(name: &str) -> String {
    name.chars()
        .next()
        .map(|c| c.to_uppercase().collect())
        .unwrap_or_else(|| "?".to_string())
}

/// `(A)` for narrow initials. A double-width initial fills the slot alone.
fn avatar_label(name: &str) -> String {
    let initial = initial(name);
    if Line::from(initial.as_str()).width() > 1 {
        initial
    } else {
        format!("({})", initial)
    }
}

fn divider_line(width: u16) -> Line<'static> {
    Line::from("─".repeat(usize::from(width)))
}

/// Draw `lines` into `rect`, clipped to the card's `area`.
fn put(frame: &mut Frame, area: Rect, rect: Rect, lines: Vec<Line<'static>>, style: Style) {
    let rect = rect.intersection(area).intersection(frame.area());
    if rect.is_empty() {
        return;
    }
    frame.render_widget(Paragraph::new(lines).style(style), rect);
}
