use std::sync::Arc;

use crate::app::error::{EngagementError, EngagementResult};
use crate::app::notifications::{describe, NotificationOutbox};
use crate::domain::engagement::{Comment, CommentDetails, CommentLike};
use crate::domain::notification::{EngagementEvent, NotificationKind};
use crate::infra::store::{EngagementStore, StoreError};

pub const MAX_COMMENT_CHARS: usize = 1000;

#[derive(Clone)]
pub struct CommentManager {
    store: Arc<dyn EngagementStore>,
    outbox: NotificationOutbox,
}

impl CommentManager {
    pub fn new(store: Arc<dyn EngagementStore>, outbox: NotificationOutbox) -> Self {
        Self { store, outbox }
    }

    pub async fn add_comment(
        &self,
        thread_id: i64,
        user_id: i64,
        body: String,
    ) -> EngagementResult<Comment> {
        let body = body.trim().to_string();
        if body.is_empty() {
            return Err(EngagementError::bad_param("comment body is required"));
        }
        if body.chars().count() > MAX_COMMENT_CHARS {
            return Err(EngagementError::bad_param(format!(
                "comment body exceeds {} characters",
                MAX_COMMENT_CHARS
            )));
        }

        let created = self
            .store
            .create_comment(thread_id, user_id, body)
            .await
            .map_err(|err| match err {
                StoreError::MissingParent => EngagementError::NotFound("thread"),
                other => EngagementError::internal(other),
            })?;

        let kind = NotificationKind::CommentThread;
        self.outbox.publish(EngagementEvent::new(
            user_id,
            created.thread_author_id,
            thread_id,
            kind,
            describe(kind),
        ));

        Ok(created.comment)
    }

    /// `NotFound` for missing comments and ones with a deletion already on
    /// record.
    pub async fn get_comment(&self, comment_id: i64) -> EngagementResult<Comment> {
        self.store
            .get_comment(comment_id)
            .await
            .map_err(EngagementError::internal)?
            .filter(|comment| comment.deleted_at.is_none())
            .ok_or(EngagementError::NotFound("comment"))
    }

    pub async fn delete_comment(&self, comment_id: i64) -> EngagementResult<()> {
        let deleted = self
            .store
            .soft_delete_comment(comment_id)
            .await
            .map_err(EngagementError::internal)?;
        if !deleted {
            return Err(EngagementError::NotFound("comment"));
        }
        Ok(())
    }

    pub async fn like_comment(
        &self,
        comment_id: i64,
        user_id: i64,
    ) -> EngagementResult<CommentLike> {
        self.store
            .like_comment(comment_id, user_id)
            .await
            .map_err(|err| match err {
                StoreError::MissingParent => EngagementError::NotFound("comment"),
                StoreError::Duplicate => EngagementError::Conflict("comment already liked"),
                other => EngagementError::internal(other),
            })
    }

    pub async fn unlike_comment(&self, comment_id: i64, user_id: i64) -> EngagementResult<()> {
        let retracted = self
            .store
            .retract_comment_like(comment_id, user_id)
            .await
            .map_err(EngagementError::internal)?;
        if !retracted {
            return Err(EngagementError::NotFound("comment like"));
        }
        Ok(())
    }

    pub async fn comments_by_thread(&self, thread_id: i64) -> EngagementResult<Vec<CommentDetails>> {
        self.store
            .list_comments(thread_id)
            .await
            .map_err(EngagementError::internal)
    }
}
