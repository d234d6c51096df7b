use std::sync::Arc;

use crate::app::comments::CommentManager;
use crate::app::error::{EngagementError, EngagementResult};
use crate::app::feed::{FeedComposer, FeedWindows};
use crate::app::notifications::NotificationOutbox;
use crate::app::reports::ReportWorkflow;
use crate::app::threads::ThreadService;
use crate::app::votes::VoteManager;
use crate::infra::cache::Cache;
use crate::infra::store::EngagementStore;

/// Single entry point handed to the delivery layer. Callers pass an already
/// authenticated viewer id.
#[derive(Clone)]
pub struct EngagementFacade {
    store: Arc<dyn EngagementStore>,
    threads: ThreadService,
    votes: VoteManager,
    comments: CommentManager,
    reports: ReportWorkflow,
    feed: FeedComposer,
}

impl EngagementFacade {
    pub fn new(
        store: Arc<dyn EngagementStore>,
        outbox: NotificationOutbox,
        windows: FeedWindows,
    ) -> Self {
        let feed = FeedComposer::new(store.clone(), windows);
        Self {
            threads: ThreadService::new(store.clone()),
            votes: VoteManager::new(store.clone(), outbox.clone(), feed.clone()),
            comments: CommentManager::new(store.clone(), outbox),
            reports: ReportWorkflow::new(store.clone()),
            feed,
            store,
        }
    }

    /// Enables the trending cache. Votes keep invalidating the voter's entry.
    pub fn with_feed_cache(mut self, cache: Arc<dyn Cache>, ttl_seconds: u64) -> Self {
        self.feed = self.feed.with_cache(cache, ttl_seconds);
        self.votes = self.votes.with_feed(self.feed.clone());
        self
    }

    pub fn threads(&self) -> &ThreadService {
        &self.threads
    }

    pub fn votes(&self) -> &VoteManager {
        &self.votes
    }

    pub fn comments(&self) -> &CommentManager {
        &self.comments
    }

    pub fn reports(&self) -> &ReportWorkflow {
        &self.reports
    }

    pub fn feed(&self) -> &FeedComposer {
        &self.feed
    }

    pub async fn ping(&self) -> EngagementResult<()> {
        self.store.ping().await.map_err(EngagementError::internal)
    }

    /// Deletes a comment on behalf of its author.
    pub async fn remove_comment(&self, comment_id: i64, actor_id: i64) -> EngagementResult<()> {
        let comment = self.comments.get_comment(comment_id).await?;
        if comment.user_id != actor_id {
            return Err(EngagementError::Forbidden("only the author can delete a comment"));
        }
        self.comments.delete_comment(comment_id).await
    }
}
