use std::sync::Arc;

use crate::app::error::{EngagementError, EngagementResult};
use crate::app::feed::FeedComposer;
use crate::app::notifications::{describe, NotificationOutbox};
use crate::domain::engagement::{Vote, VoteEvent, VoteStance};
use crate::domain::notification::{EngagementEvent, NotificationKind};
use crate::infra::store::{EngagementStore, StoreError};

#[derive(Clone)]
pub struct VoteManager {
    store: Arc<dyn EngagementStore>,
    outbox: NotificationOutbox,
    feed: FeedComposer,
}

impl VoteManager {
    /// Cached feed lists carry the viewer's vote flags, so the voter's entries
    /// in `feed` are dropped after every change.
    pub fn new(
        store: Arc<dyn EngagementStore>,
        outbox: NotificationOutbox,
        feed: FeedComposer,
    ) -> Self {
        Self {
            store,
            outbox,
            feed,
        }
    }

    pub(crate) fn with_feed(mut self, feed: FeedComposer) -> Self {
        self.feed = feed;
        self
    }

    /// An active downvote by the same user is replaced.
    pub async fn upvote(&self, thread_id: i64, user_id: i64) -> EngagementResult<Vote> {
        self.cast(thread_id, user_id, VoteStance::Up).await
    }

    pub async fn downvote(&self, thread_id: i64, user_id: i64) -> EngagementResult<Vote> {
        self.cast(thread_id, user_id, VoteStance::Down).await
    }

    pub async fn undo_upvote(&self, thread_id: i64, user_id: i64) -> EngagementResult<()> {
        self.retract(thread_id, user_id, VoteStance::Up).await
    }

    pub async fn undo_downvote(&self, thread_id: i64, user_id: i64) -> EngagementResult<()> {
        self.retract(thread_id, user_id, VoteStance::Down).await
    }

    pub async fn upvote_state(&self, thread_id: i64, user_id: i64) -> EngagementResult<Vote> {
        self.state_in(thread_id, user_id, VoteStance::Up).await
    }

    pub async fn downvote_state(&self, thread_id: i64, user_id: i64) -> EngagementResult<Vote> {
        self.state_in(thread_id, user_id, VoteStance::Down).await
    }

    /// `None` when the user holds no active vote on the thread.
    pub async fn stance(
        &self,
        thread_id: i64,
        user_id: i64,
    ) -> EngagementResult<Option<VoteStance>> {
        let vote = self
            .store
            .get_vote(thread_id, user_id)
            .await
            .map_err(EngagementError::internal)?;
        Ok(vote.map(|vote| vote.stance))
    }

    pub async fn history(&self, thread_id: i64, user_id: i64) -> EngagementResult<Vec<VoteEvent>> {
        self.store
            .vote_events(thread_id, user_id)
            .await
            .map_err(EngagementError::internal)
    }

    async fn cast(
        &self,
        thread_id: i64,
        user_id: i64,
        stance: VoteStance,
    ) -> EngagementResult<Vote> {
        let cast = self
            .store
            .cast_vote(thread_id, user_id, stance)
            .await
            .map_err(|err| match err {
                StoreError::MissingParent => EngagementError::NotFound("thread"),
                StoreError::Duplicate => match stance {
                    VoteStance::Up => EngagementError::Conflict("thread already upvoted"),
                    VoteStance::Down => EngagementError::Conflict("thread already downvoted"),
                },
                other => EngagementError::internal(other),
            })?;

        self.feed.refresh_trending(user_id).await;

        if let Some(replaced) = cast.replaced {
            tracing::debug!(thread_id, user_id, replaced = replaced.as_db(), "vote stance switched");
        }

        let kind = match stance {
            VoteStance::Up => NotificationKind::UpvoteThread,
            VoteStance::Down => NotificationKind::DownvoteThread,
        };
        self.outbox.publish(EngagementEvent::new(
            user_id,
            cast.thread_author_id,
            thread_id,
            kind,
            describe(kind),
        ));

        Ok(cast.vote)
    }

    async fn retract(
        &self,
        thread_id: i64,
        user_id: i64,
        stance: VoteStance,
    ) -> EngagementResult<()> {
        let retracted = self
            .store
            .retract_vote(thread_id, user_id, stance)
            .await
            .map_err(EngagementError::internal)?;
        if !retracted {
            return Err(not_found_for(stance));
        }
        self.feed.refresh_trending(user_id).await;
        Ok(())
    }

    async fn state_in(
        &self,
        thread_id: i64,
        user_id: i64,
        stance: VoteStance,
    ) -> EngagementResult<Vote> {
        self.store
            .get_vote(thread_id, user_id)
            .await
            .map_err(EngagementError::internal)?
            .filter(|vote| vote.stance == stance)
            .ok_or_else(|| not_found_for(stance))
    }
}

fn not_found_for(stance: VoteStance) -> EngagementError {
    match stance {
        VoteStance::Up => EngagementError::NotFound("upvote"),
        VoteStance::Down => EngagementError::NotFound("downvote"),
    }
}
