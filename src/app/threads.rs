use std::sync::Arc;

use crate::app::error::{EngagementError, EngagementResult};
use crate::domain::thread::{NewThread, Thread, ThreadPatch};
use crate::infra::store::{EngagementStore, StoreError};

pub const MAX_TITLE_CHARS: usize = 300;
pub const MAX_BODY_CHARS: usize = 10_000;

#[derive(Clone)]
pub struct ThreadService {
    store: Arc<dyn EngagementStore>,
}

impl ThreadService {
    pub fn new(store: Arc<dyn EngagementStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, mut thread: NewThread) -> EngagementResult<Thread> {
        thread.title = validate_title(&thread.title)?;
        thread.body = validate_body(&thread.body)?;

        self.store
            .create_thread(thread)
            .await
            .map_err(|err| match err {
                StoreError::MissingParent => EngagementError::NotFound("community"),
                other => EngagementError::internal(other),
            })
    }

    pub async fn get(&self, thread_id: i64) -> EngagementResult<Thread> {
        self.store
            .get_thread(thread_id)
            .await
            .map_err(EngagementError::internal)?
            .filter(|thread| !thread.is_deleted())
            .ok_or(EngagementError::NotFound("thread"))
    }

    pub async fn update(
        &self,
        thread_id: i64,
        editor_id: i64,
        mut patch: ThreadPatch,
    ) -> EngagementResult<Thread> {
        let current = self.get(thread_id).await?;
        if current.user_id != editor_id {
            return Err(EngagementError::Forbidden("only the author can edit a thread"));
        }

        patch.title = patch.title.as_deref().map(validate_title).transpose()?;
        patch.body = patch.body.as_deref().map(validate_body).transpose()?;

        self.store
            .update_thread(thread_id, patch)
            .await
            .map_err(|err| match err {
                StoreError::MissingParent => EngagementError::NotFound("community"),
                other => EngagementError::internal(other),
            })?
            .ok_or(EngagementError::NotFound("thread"))
    }

    pub async fn delete(&self, thread_id: i64, actor_id: i64) -> EngagementResult<()> {
        let current = self.get(thread_id).await?;
        if current.user_id != actor_id {
            return Err(EngagementError::Forbidden("only the author can delete a thread"));
        }
        let deleted = self
            .store
            .soft_delete_thread(thread_id)
            .await
            .map_err(EngagementError::internal)?;
        if !deleted {
            return Err(EngagementError::NotFound("thread"));
        }
        Ok(())
    }

    /// Returns whether a new bookmark was created.
    pub async fn save(&self, thread_id: i64, user_id: i64) -> EngagementResult<bool> {
        self.store
            .save_thread(thread_id, user_id)
            .await
            .map_err(|err| match err {
                StoreError::MissingParent => EngagementError::NotFound("thread"),
                other => EngagementError::internal(other),
            })
    }

    pub async fn unsave(&self, thread_id: i64, user_id: i64) -> EngagementResult<()> {
        let removed = self
            .store
            .unsave_thread(thread_id, user_id)
            .await
            .map_err(EngagementError::internal)?;
        if !removed {
            return Err(EngagementError::NotFound("saved thread"));
        }
        Ok(())
    }
}

fn validate_title(title: &str) -> EngagementResult<String> {
    let title = title.trim();
    if title.is_empty() {
        return Err(EngagementError::bad_param("title is required"));
    }
    if title.chars().count() > MAX_TITLE_CHARS {
        return Err(EngagementError::bad_param(format!(
            "title exceeds {} characters",
            MAX_TITLE_CHARS
        )));
    }
    Ok(title.to_string())
}

fn validate_body(body: &str) -> EngagementResult<String> {
    let body = body.trim();
    if body.is_empty() {
        return Err(EngagementError::bad_param("body is required"));
    }
    if body.chars().count() > MAX_BODY_CHARS {
        return Err(EngagementError::bad_param(format!(
            "body exceeds {} characters",
            MAX_BODY_CHARS
        )));
    }
    Ok(body.to_string())
}
