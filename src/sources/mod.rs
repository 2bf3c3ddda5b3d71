//! Topic sources supplying the hot-search list.
//!
//! A source returns an ordered list of [`TopicRecord`]s, most popular first.
//! Sources never fail loudly: transport or decode problems are logged and an
//! empty list is returned, which the driver reports as "no data".
//!
//! # Supported Sources
//!
//! | Source | Module | Method | Notes |
//! |--------|--------|--------|-------|
//! | TianAPI Weibo hot list | [`tianapi`] | JSON API | Requires an API key |
//! | Saved topic file | [`StaticSource`] | JSON file | Offline runs, `--topics-file` |

use crate::error::BoxError;
use crate::models::TopicRecord;
use std::future::Future;
use std::path::Path;
use tracing::{info, instrument};

pub mod tianapi;

pub use tianapi::TianApiSource;

/// Anything that can produce the current hot-search list.
pub trait TopicSource {
    /// Fetch at most `top_n` topics. Failure yields an empty list.
    fn fetch_topics(&self, top_n: usize) -> impl Future<Output = Vec<TopicRecord>> + Send;
}

/// Fixed in-memory list, used for offline runs from a saved topic file.
#[derive(Debug, Clone, Default)]
pub struct StaticSource {
    pub topics: Vec<TopicRecord>,
}

impl StaticSource {
    pub fn new(topics: Vec<TopicRecord>) -> Self {
        Self { topics }
    }

    /// Load a saved topic list: a JSON array of `{"name", "popularity"}` objects.
    #[instrument(level = "info")]
    pub async fn from_json_file(path: &Path) -> Result<Self, BoxError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let topics: Vec<TopicRecord> = serde_json::from_str(&raw)?;
        info!(count = topics.len(), "Loaded topics from file");
        Ok(Self::new(topics))
    }
}

impl TopicSource for StaticSource {
    async fn fetch_topics(&self, top_n: usize) -> Vec<TopicRecord> {
        self.topics.iter().take(top_n).cloned().collect()
    }
}
