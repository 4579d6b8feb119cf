use crate::tweet::{ActionResult, Tweet, TweetId};

/// A mutation requested by the UI. Sent fire-and-forget to the service worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TweetAction {
    Like(TweetId),
    RemoveLike(TweetId),
    Retweet(TweetId),
    RemoveRetweet(TweetId),
    Delete(TweetId),
    Reply { parent_id: TweetId, text: String },
}

impl TweetAction {
    pub fn tweet_id(&self) -> &str {
        match self {
            TweetAction::Like(id)
            | TweetAction::RemoveLike(id)
            | TweetAction::Retweet(id)
            | TweetAction::RemoveRetweet(id)
            | TweetAction::Delete(id) => id,
            TweetAction::Reply { parent_id, .. } => parent_id,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TweetAction::Like(_) => "like",
            TweetAction::RemoveLike(_) => "remove like",
            TweetAction::Retweet(_) => "retweet",
            TweetAction::RemoveRetweet(_) => "remove retweet",
            TweetAction::Delete(_) => "delete",
            TweetAction::Reply { .. } => "reply",
        }
    }
}

/// What the service worker reports back to the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TweetEvent {
    ActionResult(ActionResult),
    Deleted(TweetId),
    Replied { parent_id: TweetId, tweet: Tweet },
    Failed { action: TweetAction, reason: String },
}
