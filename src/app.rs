use crate::config::Config;
use crate::feeds;
use crate::service::{spawn_worker, LocalTweetService, TweetService};
use crate::store::{Dispatcher, Store, StoreChange};
use crate::tweet::{DisplayMode, Tweet, TweetId, UserState};
use crate::tweet_message::TweetEvent;
use crate::ui::widgets::contains;
use crate::ui::widgets::tweet_card::{CardOutcome, TweetCard};
use crate::ui::{self, card_list::CardList};
use anyhow::{Context, Result};
use crossterm::{
    event::{
        DisableMouseCapture, EnableMouseCapture, Event, EventStream, KeyCode, KeyEvent,
        KeyEventKind, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
    },
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
    ExecutableCommand,
};
use futures::StreamExt;
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc::{self, UnboundedReceiver};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Feed,
    TweetDetail(TweetId),
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Feed => "/".to_string(),
            Route::TweetDetail(id) => format!("/tweet-detail/{}", id),
        }
    }
}

/// A detail screen: the tweet in detail mode followed by its replies.
#[derive(Debug, Clone)]
struct DetailScreen {
    id: TweetId,
    cards: CardList,
}

pub struct App {
    store: Store,
    dispatch: Dispatcher,
    feed: CardList,
    details: Vec<DetailScreen>,
    screen: Rect,
    should_quit: bool,
}

impl App {
    pub fn new(store: Store, dispatch: Dispatcher) -> Self {
        let snapshot = store.snapshot();
        let feed = CardList::new(
            store
                .state()
                .feed
                .iter()
                .map(|tweet| {
                    TweetCard::new(
                        tweet.clone(),
                        DisplayMode::Normal,
                        &snapshot,
                        dispatch.clone(),
                    )
                })
                .collect(),
        );
        Self {
            store,
            dispatch,
            feed,
            details: Vec::new(),
            screen: Rect::default(),
            should_quit: false,
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    pub fn route(&self) -> Route {
        match self.details.last() {
            Some(detail) => Route::TweetDetail(detail.id.clone()),
            None => Route::Feed,
        }
    }

    /// The card list of the route on top of the stack.
    pub fn current(&self) -> &CardList {
        match self.details.last() {
            Some(detail) => &detail.cards,
            None => &self.feed,
        }
    }

    fn current_mut(&mut self) -> &mut CardList {
        match self.details.last_mut() {
            Some(detail) => &mut detail.cards,
            None => &mut self.feed,
        }
    }

    pub fn resize(&mut self, screen: Rect) {
        self.screen = screen;
        let body = ui::body_area(screen);
        self.current_mut().scroll_into_view(body);
    }

    /// Push the detail route for `id`. Returns false when no such tweet exists.
    pub fn open_detail(&mut self, id: &str) -> bool {
        let Some(tweet) = self.store.find(id).cloned() else {
            tracing::warn!(id, "tweet not found");
            return false;
        };
        tracing::info!(path = %Route::TweetDetail(tweet.id.clone()).path(), "navigate");
        let cards = self.detail_cards(&tweet);
        self.details.push(DetailScreen {
            id: tweet.id,
            cards,
        });
        true
    }

    fn detail_cards(&self, tweet: &Tweet) -> CardList {
        let snapshot = self.store.snapshot();
        let mut cards = vec![TweetCard::new(
            tweet.clone(),
            DisplayMode::Detail,
            &snapshot,
            self.dispatch.clone(),
        )];
        cards.extend(tweet.comments.iter().flatten().map(|reply| {
            TweetCard::new(
                reply.clone(),
                DisplayMode::Reply,
                &snapshot,
                self.dispatch.clone(),
            )
        }));
        CardList::new(cards)
    }

    pub fn back(&mut self) {
        self.details.pop();
    }

    pub fn on_key(&mut self, key: KeyEvent) {
        if let Some(card) = self.current_mut().modal_card_mut() {
            card.handle_key(key);
            return;
        }
        self.store.clear_status();

        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.should_quit = true;
            }
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc | KeyCode::Backspace => self.back(),
            KeyCode::Down | KeyCode::Char('j') => self.current_mut().select_next(),
            KeyCode::Up | KeyCode::Char('k') => self.current_mut().select_prev(),
            _ => {
                let outcome = match self.current_mut().selected_card_mut() {
                    Some(card) => card.handle_key(key),
                    None => return,
                };
                self.follow(outcome);
            }
        }
    }

    pub fn on_mouse(&mut self, mouse: MouseEvent) {
        let screen = self.screen;
        let (column, row) = (mouse.column, mouse.row);
        match mouse.kind {
            MouseEventKind::ScrollDown => {
                if self.current().modal_card().is_none() {
                    self.current_mut().select_next();
                }
            }
            MouseEventKind::ScrollUp => {
                if self.current().modal_card().is_none() {
                    self.current_mut().select_prev();
                }
            }
            MouseEventKind::Down(MouseButton::Left) => {
                let list = self.current_mut();
                if let Some(card) = list.modal_card_mut() {
                    card.handle_click(Rect::default(), screen, column, row);
                    return;
                }
                let hit = list
                    .layout(ui::body_area(screen))
                    .into_iter()
                    .find(|(_, rect)| contains(*rect, column, row));
                let Some((index, rect)) = hit else {
                    return;
                };
                list.select(index);
                let outcome = match list.card_mut(index) {
                    Some(card) => card.handle_click(rect, screen, column, row),
                    None => return,
                };
                self.follow(outcome);
            }
            _ => {}
        }
    }

    fn follow(&mut self, outcome: CardOutcome) {
        if let CardOutcome::Navigate(id) = outcome {
            self.open_detail(&id);
        }
    }

    /// Run a service outcome through the store and push the new state into
    /// every mounted card.
    pub fn on_store_event(&mut self, event: TweetEvent) {
        let change = self.store.apply(event);
        let snapshot = self.store.snapshot();

        match change {
            StoreChange::Removed(id) => {
                self.feed.remove(&id);
                if let Some(pos) = self.details.iter().position(|detail| detail.id == id) {
                    self.details.truncate(pos);
                }
                for detail in &mut self.details {
                    detail.cards.remove(&id);
                }
            }
            StoreChange::Inserted { parent_id, tweet } => {
                self.feed.insert(
                    0,
                    TweetCard::new(
                        tweet.clone(),
                        DisplayMode::Normal,
                        &snapshot,
                        self.dispatch.clone(),
                    ),
                );
                let threaded = self
                    .store
                    .find(&parent_id)
                    .is_some_and(|parent| parent.comments.is_some());
                if threaded {
                    for detail in self.details.iter_mut().filter(|d| d.id == parent_id) {
                        detail.cards.push(TweetCard::new(
                            tweet.clone(),
                            DisplayMode::Reply,
                            &snapshot,
                            self.dispatch.clone(),
                        ));
                    }
                }
            }
            StoreChange::ActionResult(_) | StoreChange::Status => {}
        }

        self.feed.reload(&self.store);
        for detail in &mut self.details {
            detail.cards.reload(&self.store);
        }
    }
}

/// Load the feed, start the service worker and run the UI until quit.
pub async fn launch(config: Config, open: Option<TweetId>) -> Result<()> {
    let fetcher = feeds::create_fetcher(config.feed_path.clone());
    let feed = fetcher.fetch().await?;
    let user = UserState::new(config.username.clone());
    tracing::info!(user = %user.username, tweets = feed.len(), "starting");

    let service: Arc<dyn TweetService> =
        Arc::new(LocalTweetService::new(user.clone(), &feed, config.latency()));
    let (dispatch, actions) = Dispatcher::channel();
    let (events_tx, events_rx) = mpsc::unbounded_channel();
    let worker = spawn_worker(service, actions, events_tx);

    let mut app = App::new(Store::new(user, feed), dispatch);
    if let Some(id) = open {
        if !app.open_detail(&id) {
            app.store.set_status(format!("Tweet {} not found", id));
        }
    }

    let mut terminal = setup_terminal(config.mouse).context("failed to set up terminal")?;
    let result = run_app(&mut terminal, &mut app, events_rx, config.tick_rate()).await;
    let restored = restore_terminal(&mut terminal, config.mouse);
    worker.abort();
    result?;
    restored.context("failed to restore terminal")
}

/// Leave raw mode before a panic message is printed.
fn install_panic_hook(mouse: bool) {
    let default_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = disable_raw_mode();
        let mut stdout = io::stdout();
        if mouse {
            let _ = stdout.execute(DisableMouseCapture);
        }
        let _ = stdout.execute(LeaveAlternateScreen);
        default_hook(info);
    }));
}

fn setup_terminal(mouse: bool) -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    install_panic_hook(mouse);
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    stdout.execute(EnterAlternateScreen)?;
    if mouse {
        stdout.execute(EnableMouseCapture)?;
    }
    let mut terminal = Terminal::new(CrosstermBackend::new(stdout))?;
    terminal.clear()?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>, mouse: bool) -> io::Result<()> {
    disable_raw_mode()?;
    if mouse {
        terminal.backend_mut().execute(DisableMouseCapture)?;
    }
    terminal.backend_mut().execute(LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    mut events: UnboundedReceiver<TweetEvent>,
    tick_rate: Duration,
) -> Result<()> {
    let mut input = EventStream::new();
    let mut tick = tokio::time::interval(tick_rate);

    while !app.should_quit() {
        let size = terminal.size()?;
        app.resize(Rect::new(0, 0, size.width, size.height));
        terminal.draw(|frame| ui::draw(frame, app))?;

        tokio::select! {
            _ = tick.tick() => {}
            Some(event) = events.recv() => app.on_store_event(event),
            maybe_event = input.next() => match maybe_event {
                Some(Ok(Event::Key(key))) if key.kind == KeyEventKind::Press => app.on_key(key),
                Some(Ok(Event::Mouse(mouse))) => app.on_mouse(mouse),
                Some(Ok(_)) => {}
                Some(Err(e)) => return Err(e).context("failed to read terminal input"),
                None => break,
            },
        }
    }
    Ok(())
}
