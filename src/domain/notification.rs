use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationKind {
    UpvoteThread,
    DownvoteThread,
    CommentThread,
}

impl NotificationKind {
    pub fn as_db(&self) -> &'static str {
        match self {
            Self::UpvoteThread => "upvote_thread",
            Self::DownvoteThread => "downvote_thread",
            Self::CommentThread => "comment_thread",
        }
    }
}

/// Engagement that the notification side should tell `target_user_id` about.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngagementEvent {
    pub id: Uuid,
    pub actor_id: i64,
    pub target_user_id: i64,
    /// Thread the engagement happened on.
    pub ref_id: i64,
    pub kind: NotificationKind,
    pub body: String,
}

impl EngagementEvent {
    pub fn new(
        actor_id: i64,
        target_user_id: i64,
        ref_id: i64,
        kind: NotificationKind,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            actor_id,
            target_user_id,
            ref_id,
            kind,
            body: body.into(),
        }
    }
}
