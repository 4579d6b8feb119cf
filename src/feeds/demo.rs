use super::{parse_feed, FeedFetcher};
use crate::tweet::Tweet;
use anyhow::Result;
use async_trait::async_trait;

const DEMO_FEED: &str = include_str!("../../assets/demo_feed.json");

/// Built-in feed used when no feed file is configured.
pub struct DemoFeedFetcher;

#[async_trait]
impl FeedFetcher for DemoFeedFetcher {
    async fn fetch(&self) -> Result<Vec<Tweet>> {
        parse_feed(DEMO_FEED)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_demo_feed_parses() {
        let tweets = DemoFeedFetcher.fetch().await.unwrap();
        assert!(!tweets.is_empty());
        // the default viewer owns at least one tweet so delete is reachable
        assert!(tweets.iter().any(|t| t.owner.username == "guest"));
        assert!(tweets.iter().any(|t| t.comments.is_some()));
    }
}
