use crate::tweet::{ActionResult, Owner, Tweet, TweetId, UserState};
use crate::tweet_message::{TweetAction, TweetEvent};
use async_trait::async_trait;
use chrono::{SecondsFormat, Utc};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("tweet {0} not found")]
    NotFound(TweetId),
    #[error("tweet {0} belongs to another user")]
    NotOwner(TweetId),
    #[error("reply text is empty")]
    EmptyReply,
}

#[async_trait]
pub trait TweetService: Send + Sync {
    async fn like(&self, id: &str) -> Result<ActionResult, ServiceError>;
    async fn remove_like(&self, id: &str) -> Result<ActionResult, ServiceError>;
    async fn retweet(&self, id: &str) -> Result<ActionResult, ServiceError>;
    async fn remove_retweet(&self, id: &str) -> Result<ActionResult, ServiceError>;
    async fn delete(&self, id: &str) -> Result<(), ServiceError>;
    async fn reply(&self, parent_id: &str, text: &str) -> Result<Tweet, ServiceError>;
}

/// In-memory service acting on behalf of a single viewer.
pub struct LocalTweetService {
    viewer: UserState,
    tweets: Mutex<HashMap<TweetId, Tweet>>,
    latency: Duration,
    next_id: AtomicU64,
}

impl LocalTweetService {
    pub fn new(viewer: UserState, feed: &[Tweet], latency: Duration) -> Self {
        let mut tweets = HashMap::new();
        index(feed, &mut tweets);
        Self {
            viewer,
            tweets: Mutex::new(tweets),
            latency,
            next_id: AtomicU64::new(1),
        }
    }

    async fn simulate_latency(&self) {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
    }

    async fn update<F>(&self, id: &str, patch: F) -> Result<ActionResult, ServiceError>
    where
        F: FnOnce(&mut Tweet) + Send,
    {
        self.simulate_latency().await;
        let mut tweets = self.tweets.lock().await;
        let tweet = tweets
            .get_mut(id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        patch(tweet);
        Ok(tweet.action_result())
    }
}

fn index(tweets: &[Tweet], out: &mut HashMap<TweetId, Tweet>) {
    for tweet in tweets {
        out.insert(tweet.id.clone(), tweet.clone());
        if let Some(comments) = &tweet.comments {
            index(comments, out);
        }
    }
}

#[async_trait]
impl TweetService for LocalTweetService {
    async fn like(&self, id: &str) -> Result<ActionResult, ServiceError> {
        self.update(id, |tweet| {
            if !tweet.liked {
                tweet.liked = true;
                tweet.likes_count += 1;
            }
        })
        .await
    }

    async fn remove_like(&self, id: &str) -> Result<ActionResult, ServiceError> {
        self.update(id, |tweet| {
            if tweet.liked {
                tweet.liked = false;
                tweet.likes_count = tweet.likes_count.saturating_sub(1);
            }
        })
        .await
    }

    async fn retweet(&self, id: &str) -> Result<ActionResult, ServiceError> {
        self.update(id, |tweet| {
            if !tweet.retweeted {
                tweet.retweeted = true;
                tweet.retweets_count += 1;
            }
        })
        .await
    }

    async fn remove_retweet(&self, id: &str) -> Result<ActionResult, ServiceError> {
        self.update(id, |tweet| {
            if tweet.retweeted {
                tweet.retweeted = false;
                tweet.retweets_count = tweet.retweets_count.saturating_sub(1);
            }
        })
        .await
    }

    async fn delete(&self, id: &str) -> Result<(), ServiceError> {
        self.simulate_latency().await;
        let mut tweets = self.tweets.lock().await;
        let tweet = tweets
            .get(id)
            .ok_or_else(|| ServiceError::NotFound(id.to_string()))?;
        if !tweet.is_owned_by(&self.viewer) {
            return Err(ServiceError::NotOwner(id.to_string()));
        }
        tweets.remove(id);
        Ok(())
    }

    async fn reply(&self, parent_id: &str, text: &str) -> Result<Tweet, ServiceError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ServiceError::EmptyReply);
        }
        self.simulate_latency().await;

        let mut tweets = self.tweets.lock().await;
        let parent = tweets
            .get_mut(parent_id)
            .ok_or_else(|| ServiceError::NotFound(parent_id.to_string()))?;

        let reply = Tweet {
            id: format!("local-{}", self.next_id.fetch_add(1, Ordering::Relaxed)),
            text: text.to_string(),
            date: Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true),
            owner: Owner {
                username: self.viewer.username.clone(),
                name: self.viewer.username.clone(),
                profile_picture: None,
            },
            liked: false,
            retweeted: false,
            likes_count: 0,
            retweets_count: 0,
            comments: None,
            comments_count: 0,
        };

        match parent.comments.as_mut() {
            Some(comments) => comments.push(reply.clone()),
            None => parent.comments_count += 1,
        }
        tweets.insert(reply.id.clone(), reply.clone());
        Ok(reply)
    }
}

/// Run one action against the service and turn the outcome into a store event.
pub async fn perform(service: &dyn TweetService, action: TweetAction) -> TweetEvent {
    let outcome = match &action {
        TweetAction::Like(id) => service.like(id).await.map(TweetEvent::ActionResult),
        TweetAction::RemoveLike(id) => service.remove_like(id).await.map(TweetEvent::ActionResult),
        TweetAction::Retweet(id) => service.retweet(id).await.map(TweetEvent::ActionResult),
        TweetAction::RemoveRetweet(id) => service
            .remove_retweet(id)
            .await
            .map(TweetEvent::ActionResult),
        TweetAction::Delete(id) => service
            .delete(id)
            .await
            .map(|()| TweetEvent::Deleted(id.clone())),
        TweetAction::Reply { parent_id, text } => {
            service
                .reply(parent_id, text)
                .await
                .map(|tweet| TweetEvent::Replied {
                    parent_id: parent_id.clone(),
                    tweet,
                })
        }
    };

    match outcome {
        Ok(event) => event,
        Err(e) => TweetEvent::Failed {
            reason: e.to_string(),
            action,
        },
    }
}

/// Drain dispatched actions in order and forward their outcomes to the UI.
pub fn spawn_worker(
    service: Arc<dyn TweetService>,
    mut actions: UnboundedReceiver<TweetAction>,
    events: UnboundedSender<TweetEvent>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(action) = actions.recv().await {
            tracing::debug!(action = action.name(), id = action.tweet_id(), "performing");
            let event = perform(service.as_ref(), action).await;
            if events.send(event).is_err() {
                tracing::info!("ui has stopped, service worker exiting");
                break;
            }
        }
    })
}
