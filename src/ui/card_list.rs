use crate::store::Store;
use crate::ui::widgets::tweet_card::TweetCard;
use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Style},
    text::Line,
    widgets::Paragraph,
    Frame,
};

/// A vertically scrolling column of cards with one selected.
#[derive(Debug, Clone, Default)]
pub struct CardList {
    cards: Vec<TweetCard>,
    selected: usize,
    offset: usize,
}

impl CardList {
    pub fn new(cards: Vec<TweetCard>) -> Self {
        Self {
            cards,
            selected: 0,
            offset: 0,
        }
    }

    pub fn cards(&self) -> &[TweetCard] {
        &self.cards
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_card(&self) -> Option<&TweetCard> {
        self.cards.get(self.selected)
    }

    pub fn selected_card_mut(&mut self) -> Option<&mut TweetCard> {
        self.cards.get_mut(self.selected)
    }

    pub fn card_mut(&mut self, index: usize) -> Option<&mut TweetCard> {
        self.cards.get_mut(index)
    }

    /// The card whose dialog currently owns the input, if any.
    pub fn modal_card(&self) -> Option<&TweetCard> {
        self.cards.iter().find(|card| card.is_modal_open())
    }

    pub fn modal_card_mut(&mut self) -> Option<&mut TweetCard> {
        self.cards.iter_mut().find(|card| card.is_modal_open())
    }

    pub fn select(&mut self, index: usize) {
        if index < self.cards.len() {
            self.selected = index;
        }
    }

    pub fn select_next(&mut self) {
        if self.selected + 1 < self.cards.len() {
            self.selected += 1;
        }
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn push(&mut self, card: TweetCard) {
        self.cards.push(card);
    }

    pub fn insert(&mut self, index: usize, card: TweetCard) {
        let index = index.min(self.cards.len());
        if index <= self.selected && !self.cards.is_empty() {
            self.selected += 1;
        }
        self.cards.insert(index, card);
    }

    /// Drop every card showing `id`. Returns whether any was removed.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.cards.len();
        let selected_id = self.selected_card().map(|card| card.id().to_string());
        self.cards.retain(|card| card.id() != id);
        if let Some(selected_id) = selected_id {
            if let Some(index) = self.cards.iter().position(|card| card.id() == selected_id) {
                self.selected = index;
            }
        }
        self.selected = self.selected.min(self.cards.len().saturating_sub(1));
        self.offset = self.offset.min(self.selected);
        self.cards.len() != before
    }

    /// Re-read every card's tweet from the store, then sync it.
    pub fn reload(&mut self, store: &Store) {
        let snapshot = store.snapshot();
        for card in &mut self.cards {
            match store.find(card.id()) {
                Some(tweet) if tweet != card.tweet() => card.set_tweet(tweet.clone(), &snapshot),
                _ => card.sync(&snapshot),
            }
        }
    }

    /// Move the scroll offset so the selected card is fully visible in `area`
    /// when it fits at all.
    pub fn scroll_into_view(&mut self, area: Rect) {
        if self.selected < self.offset {
            self.offset = self.selected;
            return;
        }
        while self.offset < self.selected {
            let used: u32 = self.cards[self.offset..=self.selected]
                .iter()
                .map(|card| u32::from(card.height(area.width)))
                .sum();
            if used <= u32::from(area.height) {
                break;
            }
            self.offset += 1;
        }
    }

    /// Where each visible card lands in `area`. The last one may be cut off.
    pub fn layout(&self, area: Rect) -> Vec<(usize, Rect)> {
        let mut placed = Vec::new();
        let mut y = area.y;
        for (index, card) in self.cards.iter().enumerate().skip(self.offset) {
            if y >= area.bottom() {
                break;
            }
            let height = card.height(area.width).min(area.bottom() - y);
            placed.push((index, Rect::new(area.x, y, area.width, height)));
            y += height;
        }
        placed
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        if self.cards.is_empty() {
            let empty = Paragraph::new(vec![Line::from(""), Line::from("No tweets yet.")])
                .alignment(Alignment::Center)
                .style(Style::default().fg(Color::DarkGray));
            frame.render_widget(empty, area);
            return;
        }
        for (index, rect) in self.layout(area) {
            self.cards[index].render(frame, rect, index == self.selected);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Dispatcher, StoreSnapshot};
    use crate::tweet::tests::make_tweet;
    use crate::tweet::{DisplayMode, UserState};

    fn make_list(count: usize) -> CardList {
        let (dispatch, _rx) = Dispatcher::channel();
        let snapshot = StoreSnapshot {
            user: UserState::new("alice"),
            tweet_action: None,
        };
        CardList::new(
            (0..count)
                .map(|i| {
                    TweetCard::new(
                        make_tweet(&i.to_string(), "bob"),
                        DisplayMode::Normal,
                        &snapshot,
                        dispatch.clone(),
                    )
                })
                .collect(),
        )
    }

    #[test]
    fn test_selection_bounds() {
        let mut list = make_list(3);
        list.select_prev();
        assert_eq!(list.selected(), 0);
        list.select_next();
        list.select_next();
        list.select_next();
        assert_eq!(list.selected(), 2);
        list.select(10);
        assert_eq!(list.selected(), 2);
    }

    #[test]
    fn test_remove_keeps_selected_card() {
        let mut list = make_list(3);
        list.select(2);
        assert!(list.remove("0"));
        assert_eq!(list.selected_card().unwrap().id(), "2");
        assert!(!list.remove("0"));

        assert!(list.remove("2"));
        assert_eq!(list.selected_card().unwrap().id(), "1");
        assert!(list.remove("1"));
        assert!(list.selected_card().is_none());
    }

    #[test]
    fn test_insert_before_selection_shifts_it() {
        let mut list = make_list(2);
        list.select(1);
        let extra = list.cards()[0].clone();
        list.insert(0, extra);
        assert_eq!(list.selected(), 2);
        assert_eq!(list.cards().len(), 3);
    }

    #[test]
    fn test_reload_takes_store_copy() {
        let mut list = make_list(2);
        let mut changed = make_tweet("1", "bob");
        changed.comments_count = 7;
        let store = Store::new(UserState::new("alice"), vec![changed]);
        list.reload(&store);
        assert_eq!(list.cards()[1].view().comment_count, 7);
        assert_eq!(list.cards()[0].view().comment_count, 0);
    }

    #[test]
    fn test_layout_and_scroll() {
        // each normal card is 4 rows at this width
        let mut list = make_list(5);
        let area = Rect::new(0, 1, 60, 10);
        let placed = list.layout(area);
        assert_eq!(placed.len(), 3);
        assert_eq!(placed[0], (0, Rect::new(0, 1, 60, 4)));
        assert_eq!(placed[2], (2, Rect::new(0, 9, 60, 2)));

        list.select(4);
        list.scroll_into_view(area);
        let placed = list.layout(area);
        assert_eq!(placed[0].0, 3);
        assert_eq!(placed.last().unwrap(), &(4, Rect::new(0, 5, 60, 4)));

        list.select(0);
        list.scroll_into_view(area);
        assert_eq!(list.layout(area)[0].0, 0);
    }
}
