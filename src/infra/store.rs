use async_trait::async_trait;
use thiserror::Error;

use crate::domain::engagement::{
    CastVote, CommentDetails, CommentLike, CreatedComment, Comment, Vote, VoteEvent, VoteStance,
};
use crate::domain::feed::{FeedSource, UpvoteWindow};
use crate::domain::moderation::{NewReport, Report, ReportCategory, ReportResolution};
use crate::domain::thread::{AuthorSnippet, FeedThread, NewThread, Thread, ThreadPatch};

/// Storage failures the engine knows how to interpret. Everything else is
/// carried opaquely in `Backend`.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("duplicate entry")]
    Duplicate,
    #[error("referenced row does not exist")]
    MissingParent,
    #[error(transparent)]
    Backend(#[from] anyhow::Error),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Durable storage for threads and everything hanging off them.
///
/// Implementations must enforce one active vote per (thread, user), one
/// active like per (comment, user), one bookmark per (thread, user), and
/// refuse engagement on missing or soft-deleted parents with
/// `StoreError::MissingParent`.
#[async_trait]
pub trait EngagementStore: Send + Sync {
    async fn ping(&self) -> StoreResult<()>;

    async fn create_thread(&self, thread: NewThread) -> StoreResult<Thread>;
    /// Returns soft-deleted threads too; callers decide visibility.
    async fn get_thread(&self, thread_id: i64) -> StoreResult<Option<Thread>>;
    async fn update_thread(&self, thread_id: i64, patch: ThreadPatch)
        -> StoreResult<Option<Thread>>;
    async fn soft_delete_thread(&self, thread_id: i64) -> StoreResult<bool>;

    /// Makes `stance` the user's active vote, replacing an opposite one.
    /// `Duplicate` if the same stance is already active.
    async fn cast_vote(
        &self,
        thread_id: i64,
        user_id: i64,
        stance: VoteStance,
    ) -> StoreResult<CastVote>;
    /// Retracts the active vote if it has this stance.
    async fn retract_vote(&self, thread_id: i64, user_id: i64, stance: VoteStance)
        -> StoreResult<bool>;
    async fn get_vote(&self, thread_id: i64, user_id: i64) -> StoreResult<Option<Vote>>;
    /// Oldest first.
    async fn vote_events(&self, thread_id: i64, user_id: i64) -> StoreResult<Vec<VoteEvent>>;

    async fn create_comment(
        &self,
        thread_id: i64,
        user_id: i64,
        body: String,
    ) -> StoreResult<CreatedComment>;
    async fn get_comment(&self, comment_id: i64) -> StoreResult<Option<Comment>>;
    async fn soft_delete_comment(&self, comment_id: i64) -> StoreResult<bool>;
    /// Non-deleted comments of a thread in creation order.
    async fn list_comments(&self, thread_id: i64) -> StoreResult<Vec<CommentDetails>>;
    async fn like_comment(&self, comment_id: i64, user_id: i64) -> StoreResult<CommentLike>;
    async fn retract_comment_like(&self, comment_id: i64, user_id: i64) -> StoreResult<bool>;

    /// `Ok(false)` when the bookmark already exists.
    async fn save_thread(&self, thread_id: i64, user_id: i64) -> StoreResult<bool>;
    async fn unsave_thread(&self, thread_id: i64, user_id: i64) -> StoreResult<bool>;

    async fn get_author(&self, user_id: i64) -> StoreResult<Option<AuthorSnippet>>;
    async fn get_report_category(&self, category_id: i64) -> StoreResult<Option<ReportCategory>>;
    async fn create_report(&self, report: NewReport) -> StoreResult<Report>;
    async fn get_report(&self, report_id: i64) -> StoreResult<Option<Report>>;
    async fn resolve_report(&self, report_id: i64, resolver_id: i64)
        -> StoreResult<ReportResolution>;
    /// Oldest first.
    async fn list_open_reports(&self) -> StoreResult<Vec<Report>>;

    /// Threads selected by `source`, annotated for `viewer_id`, with
    /// `upvote_count` restricted to `window`. `limit = None` means unlimited.
    async fn list_feed(
        &self,
        viewer_id: i64,
        source: &FeedSource,
        window: UpvoteWindow,
        limit: Option<i64>,
    ) -> StoreResult<Vec<FeedThread>>;
}
