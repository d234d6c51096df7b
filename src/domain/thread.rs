use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Thread {
    pub id: i64,
    pub user_id: i64,
    pub community_id: i64,
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub deleted_at: Option<OffsetDateTime>,
}

impl Thread {
    pub fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }
}

#[derive(Debug, Clone)]
pub struct NewThread {
    pub user_id: i64,
    pub community_id: i64,
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
}

/// Partial update; `None` leaves the column untouched.
#[derive(Debug, Clone, Default)]
pub struct ThreadPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub community_id: Option<i64>,
    pub image_url: Option<String>,
}

/// Display fields of a thread or comment author, read from the identity side.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthorSnippet {
    pub id: i64,
    pub name: String,
    pub profile_image_url: Option<String>,
    pub profession: Option<String>,
}

/// A thread as seen by one viewer in a feed listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FeedThread {
    pub thread: Thread,
    pub upvote_count: i64,
    pub is_upvoted: bool,
    pub is_downvoted: bool,
    /// The viewer follows the thread's author.
    pub is_followed: bool,
    pub is_mine: bool,
    pub author: Option<AuthorSnippet>,
}
