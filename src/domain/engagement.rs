use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::thread::AuthorSnippet;

/// Direction of a user's active vote on a thread. "No vote" is `Option::None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteStance {
    Up,
    Down,
}

impl VoteStance {
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "up" => Some(Self::Up),
            "down" => Some(Self::Down),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
        }
    }

    pub(crate) fn cast_action(&self) -> VoteAction {
        match self {
            Self::Up => VoteAction::Upvote,
            Self::Down => VoteAction::Downvote,
        }
    }

    pub(crate) fn retract_action(&self) -> VoteAction {
        match self {
            Self::Up => VoteAction::RetractUpvote,
            Self::Down => VoteAction::RetractDownvote,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vote {
    pub thread_id: i64,
    pub user_id: i64,
    pub stance: VoteStance,
    #[serde(with = "time::serde::rfc3339")]
    pub voted_at: OffsetDateTime,
}

/// Result of casting a vote.
#[derive(Debug, Clone)]
pub struct CastVote {
    pub vote: Vote,
    /// Opposite stance that was active before this vote and got replaced.
    pub replaced: Option<VoteStance>,
    pub thread_author_id: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VoteAction {
    Upvote,
    Downvote,
    RetractUpvote,
    RetractDownvote,
}

impl VoteAction {
    pub fn from_db(value: &str) -> Option<Self> {
        match value {
            "upvote" => Some(Self::Upvote),
            "downvote" => Some(Self::Downvote),
            "retract_upvote" => Some(Self::RetractUpvote),
            "retract_downvote" => Some(Self::RetractDownvote),
            _ => None,
        }
    }

    pub fn as_db(&self) -> &'static str {
        match self {
            Self::Upvote => "upvote",
            Self::Downvote => "downvote",
            Self::RetractUpvote => "retract_upvote",
            Self::RetractDownvote => "retract_downvote",
        }
    }
}

/// Append-only audit entry for vote changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VoteEvent {
    pub thread_id: i64,
    pub user_id: i64,
    pub action: VoteAction,
    #[serde(with = "time::serde::rfc3339")]
    pub at: OffsetDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Comment {
    pub id: i64,
    pub thread_id: i64,
    pub user_id: i64,
    pub body: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
pub struct CreatedComment {
    pub comment: Comment,
    pub thread_author_id: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentDetails {
    pub comment: Comment,
    pub like_count: i64,
    pub author: Option<AuthorSnippet>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CommentLike {
    pub comment_id: i64,
    pub user_id: i64,
    #[serde(with = "time::serde::rfc3339")]
    pub liked_at: OffsetDateTime,
}
