//! Client-side store: the reducer over service events and the bound action
//! creators handed to cards.

use crate::tweet::{ActionResult, Tweet, TweetId, UserState};
use crate::tweet_message::{TweetAction, TweetEvent};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

/// Action creators bound to the store's action channel. Every call is
/// fire-and-forget.
#[derive(Debug, Clone)]
pub struct Dispatcher {
    tx: UnboundedSender<TweetAction>,
}

impl Dispatcher {
    pub fn new(tx: UnboundedSender<TweetAction>) -> Self {
        Self { tx }
    }

    pub fn channel() -> (Self, UnboundedReceiver<TweetAction>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self::new(tx), rx)
    }

    pub fn like_tweet(&self, id: &str) {
        self.send(TweetAction::Like(id.to_string()));
    }

    pub fn remove_like(&self, id: &str) {
        self.send(TweetAction::RemoveLike(id.to_string()));
    }

    pub fn retweet(&self, id: &str) {
        self.send(TweetAction::Retweet(id.to_string()));
    }

    pub fn remove_retweet(&self, id: &str) {
        self.send(TweetAction::RemoveRetweet(id.to_string()));
    }

    pub fn delete_tweet(&self, id: &str) {
        self.send(TweetAction::Delete(id.to_string()));
    }

    pub fn reply(&self, parent_id: &str, text: &str) {
        self.send(TweetAction::Reply {
            parent_id: parent_id.to_string(),
            text: text.to_string(),
        });
    }

    fn send(&self, action: TweetAction) {
        tracing::debug!(action = action.name(), id = action.tweet_id(), "dispatch");
        if self.tx.send(action).is_err() {
            tracing::warn!("service worker has stopped, action dropped");
        }
    }
}

/// The read-only part of the store a card subscribes to.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub user: UserState,
    pub tweet_action: Option<ActionResult>,
}

#[derive(Debug, Clone, Default)]
pub struct StoreState {
    pub user: UserState,
    pub tweet_action: Option<ActionResult>,
    pub feed: Vec<Tweet>,
    pub status: Option<String>,
}

/// What a reducer step changed, so views know what to rebuild.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreChange {
    ActionResult(TweetId),
    Removed(TweetId),
    Inserted { parent_id: TweetId, tweet: Tweet },
    Status,
}

#[derive(Debug, Default)]
pub struct Store {
    state: StoreState,
}

impl Store {
    pub fn new(user: UserState, feed: Vec<Tweet>) -> Self {
        Self {
            state: StoreState {
                user,
                feed,
                ..StoreState::default()
            },
        }
    }

    pub fn state(&self) -> &StoreState {
        &self.state
    }

    pub fn snapshot(&self) -> StoreSnapshot {
        StoreSnapshot {
            user: self.state.user.clone(),
            tweet_action: self.state.tweet_action.clone(),
        }
    }

    /// Look a tweet up anywhere in the feed, including comment threads.
    pub fn find(&self, id: &str) -> Option<&Tweet> {
        find(&self.state.feed, id)
    }

    pub fn set_status(&mut self, message: impl Into<String>) {
        self.state.status = Some(message.into());
    }

    pub fn clear_status(&mut self) {
        self.state.status = None;
    }

    pub fn apply(&mut self, event: TweetEvent) -> StoreChange {
        match event {
            TweetEvent::ActionResult(result) => {
                for_each_copy(&mut self.state.feed, &result.id, &mut |tweet| {
                    tweet.reconcile(Some(&result));
                });
                let id = result.id.clone();
                self.state.tweet_action = Some(result);
                StoreChange::ActionResult(id)
            }
            TweetEvent::Deleted(id) => {
                remove(&mut self.state.feed, &id);
                self.state.status = Some("Tweet deleted".to_string());
                StoreChange::Removed(id)
            }
            TweetEvent::Replied { parent_id, tweet } => {
                for_each_copy(&mut self.state.feed, &parent_id, &mut |parent| {
                    match parent.comments.as_mut() {
                        Some(comments) => comments.push(tweet.clone()),
                        None => parent.comments_count += 1,
                    }
                });
                self.state.feed.insert(0, tweet.clone());
                self.state.status = Some("Reply posted".to_string());
                StoreChange::Inserted { parent_id, tweet }
            }
            TweetEvent::Failed { action, reason } => {
                tracing::warn!(action = action.name(), id = action.tweet_id(), %reason, "action failed");
                self.state.status = Some(format!("Could not {}: {}", action.name(), reason));
                StoreChange::Status
            }
        }
    }
}

fn find<'a>(tweets: &'a [Tweet], id: &str) -> Option<&'a Tweet> {
    for tweet in tweets {
        if tweet.id == id {
            return Some(tweet);
        }
        if let Some(found) = tweet.comments.as_deref().and_then(|c| find(c, id)) {
            return Some(found);
        }
    }
    None
}

/// A reply lives both at the top of the feed and inside its parent's thread,
/// so updates visit every copy.
fn for_each_copy<F>(tweets: &mut [Tweet], id: &str, update: &mut F)
where
    F: FnMut(&mut Tweet),
{
    for tweet in tweets.iter_mut() {
        if tweet.id == id {
            update(tweet);
        }
        if let Some(comments) = tweet.comments.as_mut() {
            for_each_copy(comments, id, update);
        }
    }
}

fn remove(tweets: &mut Vec<Tweet>, id: &str) {
    tweets.retain(|tweet| tweet.id != id);
    for tweet in tweets.iter_mut() {
        if let Some(comments) = tweet.comments.as_mut() {
            remove(comments, id);
        }
    }
}
