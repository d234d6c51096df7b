use std::collections::HashSet;
use std::sync::Arc;

use time::Duration;

use crate::app::error::{EngagementError, EngagementResult};
use crate::domain::feed::{FeedSource, UpvoteWindow};
use crate::domain::thread::FeedThread;
use crate::infra::cache::Cache;
use crate::infra::store::EngagementStore;

/// Upvote counting windows per source family.
#[derive(Debug, Clone, Copy)]
pub struct FeedWindows {
    pub trending: UpvoteWindow,
    pub others: UpvoteWindow,
}

impl FeedWindows {
    pub fn with_trending_days(days: i64) -> Self {
        Self {
            trending: UpvoteWindow::Trailing(Duration::days(days)),
            others: UpvoteWindow::AllTime,
        }
    }
}

impl Default for FeedWindows {
    fn default() -> Self {
        Self::with_trending_days(7)
    }
}

#[derive(Clone)]
struct FeedCache {
    cache: Arc<dyn Cache>,
    ttl_seconds: u64,
}

#[derive(Clone)]
pub struct FeedComposer {
    store: Arc<dyn EngagementStore>,
    windows: FeedWindows,
    cache: Option<FeedCache>,
}

impl FeedComposer {
    pub fn new(store: Arc<dyn EngagementStore>, windows: FeedWindows) -> Self {
        Self {
            store,
            windows,
            cache: None,
        }
    }

    /// Caches the trending source for `ttl_seconds`; a zero TTL disables it.
    pub fn with_cache(mut self, cache: Arc<dyn Cache>, ttl_seconds: u64) -> Self {
        self.cache = (ttl_seconds > 0).then_some(FeedCache { cache, ttl_seconds });
        self
    }

    pub async fn trending(
        &self,
        viewer_id: i64,
        limit: Option<i64>,
    ) -> EngagementResult<Vec<FeedThread>> {
        if let Some(limit) = limit {
            if limit < 0 {
                return Err(EngagementError::bad_param("limit must not be negative"));
            }
        }

        let Some(feed_cache) = &self.cache else {
            return self
                .fetch(viewer_id, &FeedSource::Trending, self.windows.trending, limit)
                .await;
        };

        // The full ranking is cached so any limit can be served from it.
        let cache_key = trending_cache_key(viewer_id);
        if let Some(mut threads) = feed_cache.read(&cache_key).await {
            truncate(&mut threads, limit);
            return Ok(threads);
        }

        let mut threads = self
            .fetch(viewer_id, &FeedSource::Trending, self.windows.trending, None)
            .await?;
        feed_cache.write(&cache_key, &threads).await;

        truncate(&mut threads, limit);
        Ok(threads)
    }

    /// Drops the viewer's cached trending list.
    pub async fn refresh_trending(&self, viewer_id: i64) {
        if let Some(feed_cache) = &self.cache {
            feed_cache.cache.delete(&trending_cache_key(viewer_id)).await;
        }
    }

    pub async fn followed_communities(&self, viewer_id: i64) -> EngagementResult<Vec<FeedThread>> {
        self.fetch(viewer_id, &FeedSource::FollowedCommunities, self.windows.others, None)
            .await
    }

    pub async fn followed_users(&self, viewer_id: i64) -> EngagementResult<Vec<FeedThread>> {
        self.fetch(viewer_id, &FeedSource::FollowedUsers, self.windows.others, None)
            .await
    }

    pub async fn search(&self, viewer_id: i64, keyword: &str) -> EngagementResult<Vec<FeedThread>> {
        let keyword = keyword.trim();
        if keyword.is_empty() {
            return Err(EngagementError::bad_param("search keyword is required"));
        }
        let source = FeedSource::Search {
            keyword: keyword.to_string(),
        };
        self.fetch(viewer_id, &source, self.windows.others, None).await
    }

    pub async fn saved(&self, viewer_id: i64) -> EngagementResult<Vec<FeedThread>> {
        self.fetch(viewer_id, &FeedSource::Saved, self.windows.others, None)
            .await
    }

    pub async fn by_author(
        &self,
        viewer_id: i64,
        author_id: i64,
    ) -> EngagementResult<Vec<FeedThread>> {
        let source = FeedSource::ByAuthor { author_id };
        self.fetch(viewer_id, &source, self.windows.others, None).await
    }

    /// Followed communities and followed users merged, newest first.
    pub async fn home(&self, viewer_id: i64) -> EngagementResult<Vec<FeedThread>> {
        let (communities, users) = futures::try_join!(
            self.followed_communities(viewer_id),
            self.followed_users(viewer_id)
        )?;
        Ok(merge_sources(vec![communities, users]))
    }

    async fn fetch(
        &self,
        viewer_id: i64,
        source: &FeedSource,
        window: UpvoteWindow,
        limit: Option<i64>,
    ) -> EngagementResult<Vec<FeedThread>> {
        self.store
            .list_feed(viewer_id, source, window, limit)
            .await
            .map_err(|err| {
                tracing::error!(error = ?err, viewer_id, source = source.name(), "feed query failed");
                EngagementError::internal(err)
            })
    }
}

impl FeedCache {
    async fn read(&self, key: &str) -> Option<Vec<FeedThread>> {
        let payload = self.cache.get(key).await?;
        match serde_json::from_str(&payload) {
            Ok(threads) => Some(threads),
            Err(err) => {
                tracing::warn!(error = ?err, key, "discarding undecodable feed cache entry");
                None
            }
        }
    }

    async fn write(&self, key: &str, threads: &[FeedThread]) {
        match serde_json::to_string(threads) {
            Ok(payload) => self.cache.set(key, payload, self.ttl_seconds).await,
            Err(err) => tracing::warn!(error = ?err, key, "failed to encode feed cache entry"),
        }
    }
}

fn trending_cache_key(viewer_id: i64) -> String {
    format!("feed:trending:{}", viewer_id)
}

fn truncate(threads: &mut Vec<FeedThread>, limit: Option<i64>) {
    if let Some(limit) = limit {
        threads.truncate(limit.max(0) as usize);
    }
}

/// Keeps the first occurrence of each thread, then orders by creation time
/// descending with id as the tie-breaker.
fn merge_sources(sources: Vec<Vec<FeedThread>>) -> Vec<FeedThread> {
    let mut seen = HashSet::new();
    let mut merged: Vec<FeedThread> = sources
        .into_iter()
        .flatten()
        .filter(|row| seen.insert(row.thread.id))
        .collect();
    merged.sort_by(|a, b| {
        b.thread
            .created_at
            .cmp(&a.thread.created_at)
            .then_with(|| b.thread.id.cmp(&a.thread.id))
    });
    merged
}
