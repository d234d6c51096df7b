//! In-process `EngagementStore` with the same constraints as the Postgres
//! schema. Tests seed the collaborator-owned data (users, follows,
//! communities, report categories) directly.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use async_trait::async_trait;
use time::OffsetDateTime;
use tokio::sync::Mutex;

use crate::domain::engagement::{
    CastVote, Comment, CommentDetails, CommentLike, CreatedComment, Vote, VoteAction, VoteEvent,
    VoteStance,
};
use crate::domain::feed::{FeedSource, UpvoteWindow};
use crate::domain::moderation::{NewReport, Report, ReportCategory, ReportResolution};
use crate::domain::thread::{AuthorSnippet, FeedThread, NewThread, Thread, ThreadPatch};
use crate::infra::store::{EngagementStore, StoreError, StoreResult};

#[derive(Debug, Clone)]
struct VoteRow {
    stance: VoteStance,
    voted_at: OffsetDateTime,
    retracted_at: Option<OffsetDateTime>,
}

#[derive(Debug, Clone)]
struct LikeRow {
    liked_at: OffsetDateTime,
    retracted_at: Option<OffsetDateTime>,
}

#[derive(Default)]
struct State {
    next_id: i64,
    clock: Option<OffsetDateTime>,
    users: BTreeMap<i64, AuthorSnippet>,
    communities: BTreeSet<i64>,
    // (community_id, user_id)
    community_followers: BTreeSet<(i64, i64)>,
    // (followed user_id, follower_id)
    user_followers: BTreeSet<(i64, i64)>,
    categories: BTreeMap<i64, ReportCategory>,
    threads: BTreeMap<i64, Thread>,
    votes: HashMap<(i64, i64), VoteRow>,
    vote_events: Vec<VoteEvent>,
    comments: BTreeMap<i64, Comment>,
    likes: HashMap<(i64, i64), LikeRow>,
    // (thread_id, user_id, saved_at) in save order
    saved: Vec<(i64, i64, OffsetDateTime)>,
    reports: BTreeMap<i64, Report>,
}

impl State {
    fn now(&self) -> OffsetDateTime {
        self.clock.unwrap_or_else(OffsetDateTime::now_utc)
    }

    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }

    fn active_thread(&self, thread_id: i64) -> Option<&Thread> {
        self.threads.get(&thread_id).filter(|thread| !thread.is_deleted())
    }

    fn active_vote(&self, thread_id: i64, user_id: i64) -> Option<&VoteRow> {
        self.votes
            .get(&(thread_id, user_id))
            .filter(|row| row.retracted_at.is_none())
    }

    fn record(&mut self, thread_id: i64, user_id: i64, action: VoteAction) {
        let at = self.now();
        self.vote_events.push(VoteEvent {
            thread_id,
            user_id,
            action,
            at,
        });
    }

    fn upvote_count(&self, thread_id: i64, window: UpvoteWindow) -> i64 {
        let cutoff = match window {
            UpvoteWindow::AllTime => None,
            UpvoteWindow::Trailing(duration) => Some(self.now() - duration),
        };
        self.votes
            .iter()
            .filter(|((voted_thread, _), row)| {
                *voted_thread == thread_id
                    && row.stance == VoteStance::Up
                    && row.retracted_at.is_none()
                    && cutoff.map_or(true, |cutoff| row.voted_at > cutoff)
            })
            .count() as i64
    }

    fn annotate(&self, viewer_id: i64, thread: &Thread, window: UpvoteWindow) -> FeedThread {
        let stance = self.active_vote(thread.id, viewer_id).map(|row| row.stance);
        FeedThread {
            thread: thread.clone(),
            upvote_count: self.upvote_count(thread.id, window),
            is_upvoted: stance == Some(VoteStance::Up),
            is_downvoted: stance == Some(VoteStance::Down),
            is_followed: self.user_followers.contains(&(thread.user_id, viewer_id)),
            is_mine: thread.user_id == viewer_id,
            author: self.users.get(&thread.user_id).cloned(),
        }
    }

    fn matches_keyword(&self, thread: &Thread, needle: &str) -> bool {
        let contains = |text: &str| text.to_lowercase().contains(needle);
        contains(&thread.title)
            || contains(&thread.body)
            || self.comments.values().any(|comment| {
                comment.thread_id == thread.id
                    && comment.deleted_at.is_none()
                    && contains(&comment.body)
            })
    }
}

#[derive(Default)]
pub struct MemoryStore {
    state: Mutex<State>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins the store's notion of "now"; `None` returns to the wall clock.
    pub async fn set_clock(&self, now: Option<OffsetDateTime>) {
        self.state.lock().await.clock = now;
    }

    pub async fn insert_user(&self, author: AuthorSnippet) {
        self.state.lock().await.users.insert(author.id, author);
    }

    pub async fn insert_community(&self, community_id: i64) {
        self.state.lock().await.communities.insert(community_id);
    }

    pub async fn follow_community(&self, user_id: i64, community_id: i64) {
        self.state
            .lock()
            .await
            .community_followers
            .insert((community_id, user_id));
    }

    pub async fn follow_user(&self, follower_id: i64, user_id: i64) {
        self.state
            .lock()
            .await
            .user_followers
            .insert((user_id, follower_id));
    }

    pub async fn insert_report_category(&self, category: ReportCategory) {
        self.state
            .lock()
            .await
            .categories
            .insert(category.id, category);
    }
}

#[async_trait]
impl EngagementStore for MemoryStore {
    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }

    async fn create_thread(&self, thread: NewThread) -> StoreResult<Thread> {
        let mut state = self.state.lock().await;
        if !state.communities.contains(&thread.community_id) {
            return Err(StoreError::MissingParent);
        }
        let now = state.now();
        let id = state.next_id();
        let thread = Thread {
            id,
            user_id: thread.user_id,
            community_id: thread.community_id,
            title: thread.title,
            body: thread.body,
            image_url: thread.image_url,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.threads.insert(id, thread.clone());
        Ok(thread)
    }

    async fn get_thread(&self, thread_id: i64) -> StoreResult<Option<Thread>> {
        Ok(self.state.lock().await.threads.get(&thread_id).cloned())
    }

    async fn update_thread(
        &self,
        thread_id: i64,
        patch: ThreadPatch,
    ) -> StoreResult<Option<Thread>> {
        let mut state = self.state.lock().await;
        if let Some(community_id) = patch.community_id {
            if !state.communities.contains(&community_id) {
                return Err(StoreError::MissingParent);
            }
        }
        let now = state.now();
        let Some(thread) = state
            .threads
            .get_mut(&thread_id)
            .filter(|thread| !thread.is_deleted())
        else {
            return Ok(None);
        };
        if let Some(title) = patch.title {
            thread.title = title;
        }
        if let Some(body) = patch.body {
            thread.body = body;
        }
        if let Some(community_id) = patch.community_id {
            thread.community_id = community_id;
        }
        if let Some(image_url) = patch.image_url {
            thread.image_url = Some(image_url);
        }
        thread.updated_at = now;
        Ok(Some(thread.clone()))
    }

    async fn soft_delete_thread(&self, thread_id: i64) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let now = state.now();
        match state.threads.get_mut(&thread_id) {
            Some(thread) if !thread.is_deleted() => {
                thread.deleted_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn cast_vote(
        &self,
        thread_id: i64,
        user_id: i64,
        stance: VoteStance,
    ) -> StoreResult<CastVote> {
        let mut state = self.state.lock().await;
        let thread_author_id = state
            .active_thread(thread_id)
            .map(|thread| thread.user_id)
            .ok_or(StoreError::MissingParent)?;

        let previous = state.active_vote(thread_id, user_id).map(|row| row.stance);
        if previous == Some(stance) {
            return Err(StoreError::Duplicate);
        }

        let voted_at = state.now();
        state.votes.insert(
            (thread_id, user_id),
            VoteRow {
                stance,
                voted_at,
                retracted_at: None,
            },
        );
        if let Some(previous) = previous {
            state.record(thread_id, user_id, previous.retract_action());
        }
        state.record(thread_id, user_id, stance.cast_action());

        Ok(CastVote {
            vote: Vote {
                thread_id,
                user_id,
                stance,
                voted_at,
            },
            replaced: previous,
            thread_author_id,
        })
    }

    async fn retract_vote(
        &self,
        thread_id: i64,
        user_id: i64,
        stance: VoteStance,
    ) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let now = state.now();
        match state.votes.get_mut(&(thread_id, user_id)) {
            Some(row) if row.stance == stance && row.retracted_at.is_none() => {
                row.retracted_at = Some(now);
            }
            _ => return Ok(false),
        }
        state.record(thread_id, user_id, stance.retract_action());
        Ok(true)
    }

    async fn get_vote(&self, thread_id: i64, user_id: i64) -> StoreResult<Option<Vote>> {
        let state = self.state.lock().await;
        Ok(state.active_vote(thread_id, user_id).map(|row| Vote {
            thread_id,
            user_id,
            stance: row.stance,
            voted_at: row.voted_at,
        }))
    }

    async fn vote_events(&self, thread_id: i64, user_id: i64) -> StoreResult<Vec<VoteEvent>> {
        let state = self.state.lock().await;
        Ok(state
            .vote_events
            .iter()
            .filter(|event| event.thread_id == thread_id && event.user_id == user_id)
            .cloned()
            .collect())
    }

    async fn create_comment(
        &self,
        thread_id: i64,
        user_id: i64,
        body: String,
    ) -> StoreResult<CreatedComment> {
        let mut state = self.state.lock().await;
        let thread_author_id = state
            .active_thread(thread_id)
            .map(|thread| thread.user_id)
            .ok_or(StoreError::MissingParent)?;
        let now = state.now();
        let id = state.next_id();
        let comment = Comment {
            id,
            thread_id,
            user_id,
            body,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        state.comments.insert(id, comment.clone());
        Ok(CreatedComment {
            comment,
            thread_author_id,
        })
    }

    async fn get_comment(&self, comment_id: i64) -> StoreResult<Option<Comment>> {
        Ok(self.state.lock().await.comments.get(&comment_id).cloned())
    }

    async fn soft_delete_comment(&self, comment_id: i64) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let now = state.now();
        match state.comments.get_mut(&comment_id) {
            Some(comment) if comment.deleted_at.is_none() => {
                comment.deleted_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn list_comments(&self, thread_id: i64) -> StoreResult<Vec<CommentDetails>> {
        let state = self.state.lock().await;
        let mut comments: Vec<CommentDetails> = state
            .comments
            .values()
            .filter(|comment| comment.thread_id == thread_id && comment.deleted_at.is_none())
            .map(|comment| CommentDetails {
                comment: comment.clone(),
                like_count: state
                    .likes
                    .iter()
                    .filter(|((liked, _), row)| *liked == comment.id && row.retracted_at.is_none())
                    .count() as i64,
                author: state.users.get(&comment.user_id).cloned(),
            })
            .collect();
        comments.sort_by_key(|details| (details.comment.created_at, details.comment.id));
        Ok(comments)
    }

    async fn like_comment(&self, comment_id: i64, user_id: i64) -> StoreResult<CommentLike> {
        let mut state = self.state.lock().await;
        let exists = state
            .comments
            .get(&comment_id)
            .map_or(false, |comment| comment.deleted_at.is_none());
        if !exists {
            return Err(StoreError::MissingParent);
        }
        let active = state
            .likes
            .get(&(comment_id, user_id))
            .map_or(false, |row| row.retracted_at.is_none());
        if active {
            return Err(StoreError::Duplicate);
        }
        let liked_at = state.now();
        state.likes.insert(
            (comment_id, user_id),
            LikeRow {
                liked_at,
                retracted_at: None,
            },
        );
        Ok(CommentLike {
            comment_id,
            user_id,
            liked_at,
        })
    }

    async fn retract_comment_like(&self, comment_id: i64, user_id: i64) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let now = state.now();
        match state.likes.get_mut(&(comment_id, user_id)) {
            Some(row) if row.retracted_at.is_none() => {
                row.retracted_at = Some(now);
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn save_thread(&self, thread_id: i64, user_id: i64) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        if state.active_thread(thread_id).is_none() {
            return Err(StoreError::MissingParent);
        }
        if state
            .saved
            .iter()
            .any(|(saved, saver, _)| *saved == thread_id && *saver == user_id)
        {
            return Ok(false);
        }
        let now = state.now();
        state.saved.push((thread_id, user_id, now));
        Ok(true)
    }

    async fn unsave_thread(&self, thread_id: i64, user_id: i64) -> StoreResult<bool> {
        let mut state = self.state.lock().await;
        let before = state.saved.len();
        state
            .saved
            .retain(|(saved, saver, _)| !(*saved == thread_id && *saver == user_id));
        Ok(state.saved.len() < before)
    }

    async fn get_author(&self, user_id: i64) -> StoreResult<Option<AuthorSnippet>> {
        Ok(self.state.lock().await.users.get(&user_id).cloned())
    }

    async fn get_report_category(&self, category_id: i64) -> StoreResult<Option<ReportCategory>> {
        Ok(self.state.lock().await.categories.get(&category_id).cloned())
    }

    async fn create_report(&self, report: NewReport) -> StoreResult<Report> {
        let mut state = self.state.lock().await;
        if !state.categories.contains_key(&report.category_id) {
            return Err(StoreError::MissingParent);
        }
        let created_at = state.now();
        let id = state.next_id();
        let report = Report {
            id,
            target: report.target,
            reporter_id: report.reporter_id,
            category_id: report.category_id,
            created_at,
            resolved_by: None,
            resolved_at: None,
        };
        state.reports.insert(id, report.clone());
        Ok(report)
    }

    async fn get_report(&self, report_id: i64) -> StoreResult<Option<Report>> {
        Ok(self.state.lock().await.reports.get(&report_id).cloned())
    }

    async fn resolve_report(
        &self,
        report_id: i64,
        resolver_id: i64,
    ) -> StoreResult<ReportResolution> {
        let mut state = self.state.lock().await;
        let now = state.now();
        let Some(report) = state.reports.get_mut(&report_id) else {
            return Ok(ReportResolution::Missing);
        };
        if report.resolved_by.is_some() {
            return Ok(ReportResolution::AlreadyResolved);
        }
        report.resolved_by = Some(resolver_id);
        report.resolved_at = Some(now);
        Ok(ReportResolution::Resolved(report.clone()))
    }

    async fn list_open_reports(&self) -> StoreResult<Vec<Report>> {
        let state = self.state.lock().await;
        let mut reports: Vec<Report> = state
            .reports
            .values()
            .filter(|report| report.resolved_by.is_none())
            .cloned()
            .collect();
        reports.sort_by_key(|report| (report.created_at, report.id));
        Ok(reports)
    }

    async fn list_feed(
        &self,
        viewer_id: i64,
        source: &FeedSource,
        window: UpvoteWindow,
        limit: Option<i64>,
    ) -> StoreResult<Vec<FeedThread>> {
        let state = self.state.lock().await;
        let live = || state.threads.values().filter(|thread| !thread.is_deleted());

        let mut selected: Vec<&Thread> = match source {
            FeedSource::Trending => live().collect(),
            FeedSource::FollowedCommunities => live()
                .filter(|thread| {
                    state
                        .community_followers
                        .contains(&(thread.community_id, viewer_id))
                })
                .collect(),
            FeedSource::FollowedUsers => live()
                .filter(|thread| state.user_followers.contains(&(thread.user_id, viewer_id)))
                .collect(),
            FeedSource::Search { keyword } => {
                let needle = keyword.to_lowercase();
                live()
                    .filter(|thread| state.matches_keyword(thread, &needle))
                    .collect()
            }
            FeedSource::Saved => state
                .saved
                .iter()
                .filter(|(_, saver, _)| *saver == viewer_id)
                .filter_map(|(thread_id, _, _)| state.active_thread(*thread_id))
                .collect(),
            FeedSource::ByAuthor { author_id } => {
                let mut threads: Vec<&Thread> =
                    live().filter(|thread| thread.user_id == *author_id).collect();
                threads.sort_by(|a, b| (b.created_at, b.id).cmp(&(a.created_at, a.id)));
                threads
            }
        };

        let mut rows: Vec<FeedThread> = selected
            .drain(..)
            .map(|thread| state.annotate(viewer_id, thread, window))
            .collect();

        if matches!(source, FeedSource::Trending) {
            rows.sort_by(|a, b| {
                b.upvote_count
                    .cmp(&a.upvote_count)
                    .then_with(|| b.thread.created_at.cmp(&a.thread.created_at))
                    .then_with(|| b.thread.id.cmp(&a.thread.id))
            });
        }
        if let Some(limit) = limit {
            rows.truncate(limit.max(0) as usize);
        }

        Ok(rows)
    }
}
