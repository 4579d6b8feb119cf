use super::{parse_feed, FeedFetcher};
use crate::tweet::Tweet;
use anyhow::{Context, Result};
use async_trait::async_trait;
use std::path::PathBuf;

pub struct FileFeedFetcher {
    path: PathBuf,
}

impl FileFeedFetcher {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }
}

#[async_trait]
impl FeedFetcher for FileFeedFetcher {
    async fn fetch(&self) -> Result<Vec<Tweet>> {
        let json = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("failed to read feed {}", self.path.display()))?;
        let tweets = parse_feed(&json)
            .with_context(|| format!("failed to parse feed {}", self.path.display()))?;
        tracing::info!(path = %self.path.display(), count = tweets.len(), "loaded feed");
        Ok(tweets)
    }
}
