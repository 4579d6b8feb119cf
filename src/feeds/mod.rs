pub mod demo;
pub mod file;

use crate::tweet::Tweet;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

#[async_trait]
pub trait FeedFetcher: Send + Sync {
    async fn fetch(&self) -> Result<Vec<Tweet>>;
}

/// Pick the feed source: a JSON file when one is configured, the built-in
/// demo feed otherwise.
pub fn create_fetcher(feed_path: Option<PathBuf>) -> Box<dyn FeedFetcher> {
    match feed_path {
        Some(path) => Box::new(file::FileFeedFetcher::new(path)),
        None => Box::new(demo::DemoFeedFetcher),
    }
}

/// Parse a JSON array of tweets.
pub fn parse_feed(json: &str) -> Result<Vec<Tweet>> {
    serde_json::from_str(json).context("feed is not a JSON array of tweets")
}
