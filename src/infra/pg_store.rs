use anyhow::anyhow;
use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{Postgres, Row, Transaction};

use crate::domain::engagement::{
    CastVote, Comment, CommentDetails, CommentLike, CreatedComment, Vote, VoteAction, VoteEvent,
    VoteStance,
};
use crate::domain::feed::{FeedSource, UpvoteWindow};
use crate::domain::moderation::{
    NewReport, Report, ReportCategory, ReportResolution, ReportTarget, ReportTargetKind,
};
use crate::domain::thread::{AuthorSnippet, FeedThread, NewThread, Thread, ThreadPatch};
use crate::infra::db::Db;
use crate::infra::store::{EngagementStore, StoreError, StoreResult};

const UNIQUE_VIOLATION: &str = "23505";
const FOREIGN_KEY_VIOLATION: &str = "23503";

const THREAD_COLUMNS: &str =
    "id, user_id, community_id, title, body, image_url, created_at, updated_at, deleted_at";
const COMMENT_COLUMNS: &str = "id, thread_id, user_id, body, created_at, updated_at, deleted_at";
const REPORT_COLUMNS: &str = "id, target_kind, target_id, reporter_id, category_id, created_at, \
                              resolved_by, resolved_at";

// $1 = viewer, $2 = upvote window in seconds (NULL = all time).
const FEED_COLUMNS: &str = "t.id, t.user_id, t.community_id, t.title, t.body, t.image_url, \
     t.created_at, t.updated_at, t.deleted_at, \
     COALESCE(uc.upvote_count, 0) AS upvote_count, \
     EXISTS (SELECT 1 FROM thread_votes v \
             WHERE v.thread_id = t.id AND v.user_id = $1 \
               AND v.stance = 'up' AND v.retracted_at IS NULL) AS is_upvoted, \
     EXISTS (SELECT 1 FROM thread_votes v \
             WHERE v.thread_id = t.id AND v.user_id = $1 \
               AND v.stance = 'down' AND v.retracted_at IS NULL) AS is_downvoted, \
     EXISTS (SELECT 1 FROM user_followers f \
             WHERE f.user_id = t.user_id AND f.follower_id = $1) AS is_followed, \
     (t.user_id = $1) AS is_mine, \
     u.name AS author_name, u.profile_image_url AS author_profile_image_url, \
     u.profession AS author_profession";

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let Some(db_err) = err.as_database_error() {
            if let Some(classified) = classify_code(db_err.code().as_deref()) {
                return classified;
            }
        }
        StoreError::Backend(err.into())
    }
}

fn classify_code(code: Option<&str>) -> Option<StoreError> {
    match code? {
        UNIQUE_VIOLATION => Some(StoreError::Duplicate),
        FOREIGN_KEY_VIOLATION => Some(StoreError::MissingParent),
        _ => None,
    }
}

#[derive(Clone)]
pub struct PgEngagementStore {
    db: Db,
}

impl PgEngagementStore {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    async fn thread_is_active(&self, thread_id: i64) -> StoreResult<bool> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM threads WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(thread_id)
        .fetch_one(self.db.pool())
        .await?;
        Ok(exists)
    }
}

#[async_trait]
impl EngagementStore for PgEngagementStore {
    async fn ping(&self) -> StoreResult<()> {
        self.db.ping().await.map_err(StoreError::Backend)
    }

    async fn create_thread(&self, thread: NewThread) -> StoreResult<Thread> {
        let row = sqlx::query(&format!(
            "INSERT INTO threads (user_id, community_id, title, body, image_url) \
             VALUES ($1, $2, $3, $4, $5) \
             RETURNING {THREAD_COLUMNS}"
        ))
        .bind(thread.user_id)
        .bind(thread.community_id)
        .bind(thread.title)
        .bind(thread.body)
        .bind(thread.image_url)
        .fetch_one(self.db.pool())
        .await?;

        Ok(thread_from_row(&row))
    }

    async fn get_thread(&self, thread_id: i64) -> StoreResult<Option<Thread>> {
        let row = sqlx::query(&format!("SELECT {THREAD_COLUMNS} FROM threads WHERE id = $1"))
            .bind(thread_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(thread_from_row))
    }

    async fn update_thread(
        &self,
        thread_id: i64,
        patch: ThreadPatch,
    ) -> StoreResult<Option<Thread>> {
        let row = sqlx::query(&format!(
            "UPDATE threads \
             SET title = COALESCE($2, title), \
                 body = COALESCE($3, body), \
                 community_id = COALESCE($4, community_id), \
                 image_url = COALESCE($5, image_url), \
                 updated_at = now() \
             WHERE id = $1 AND deleted_at IS NULL \
             RETURNING {THREAD_COLUMNS}"
        ))
        .bind(thread_id)
        .bind(patch.title)
        .bind(patch.body)
        .bind(patch.community_id)
        .bind(patch.image_url)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.as_ref().map(thread_from_row))
    }

    async fn soft_delete_thread(&self, thread_id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE threads SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(thread_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn cast_vote(
        &self,
        thread_id: i64,
        user_id: i64,
        stance: VoteStance,
    ) -> StoreResult<CastVote> {
        let mut tx = self.db.pool().begin().await?;

        let author: Option<i64> = sqlx::query_scalar(
            "SELECT user_id FROM threads WHERE id = $1 AND deleted_at IS NULL FOR SHARE",
        )
        .bind(thread_id)
        .fetch_optional(&mut *tx)
        .await?;
        let Some(thread_author_id) = author else {
            tx.rollback().await?;
            return Err(StoreError::MissingParent);
        };

        // Row locks cannot cover a pair that has no vote row yet.
        lock_vote_pair(&mut tx, thread_id, user_id).await?;

        let previous: Option<String> = sqlx::query_scalar(
            "SELECT stance::text FROM thread_votes \
             WHERE thread_id = $1 AND user_id = $2 AND retracted_at IS NULL",
        )
        .bind(thread_id)
        .bind(user_id)
        .fetch_optional(&mut *tx)
        .await?;
        let previous = previous.as_deref().and_then(VoteStance::from_db);
        if previous == Some(stance) {
            tx.rollback().await?;
            return Err(StoreError::Duplicate);
        }

        // The guard makes a concurrent identical vote fall through to "no row".
        let row = sqlx::query(
            "INSERT INTO thread_votes (thread_id, user_id, stance) \
             VALUES ($1, $2, $3::vote_stance) \
             ON CONFLICT (thread_id, user_id) DO UPDATE \
             SET stance = EXCLUDED.stance, voted_at = now(), retracted_at = NULL \
             WHERE thread_votes.retracted_at IS NOT NULL \
                OR thread_votes.stance <> EXCLUDED.stance \
             RETURNING thread_id, user_id, stance::text AS stance, voted_at",
        )
        .bind(thread_id)
        .bind(user_id)
        .bind(stance.as_db())
        .fetch_optional(&mut *tx)
        .await?;
        let Some(row) = row else {
            tx.rollback().await?;
            return Err(StoreError::Duplicate);
        };
        let vote = vote_from_row(&row)?;

        if let Some(previous) = previous {
            record_vote_event(&mut tx, thread_id, user_id, previous.retract_action()).await?;
        }
        record_vote_event(&mut tx, thread_id, user_id, stance.cast_action()).await?;

        tx.commit().await?;

        Ok(CastVote {
            vote,
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
        let mut tx = self.db.pool().begin().await?;
        lock_vote_pair(&mut tx, thread_id, user_id).await?;
        let result = sqlx::query(
            "UPDATE thread_votes SET retracted_at = now() \
             WHERE thread_id = $1 AND user_id = $2 \
               AND stance = $3::vote_stance AND retracted_at IS NULL",
        )
        .bind(thread_id)
        .bind(user_id)
        .bind(stance.as_db())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            tx.rollback().await?;
            return Ok(false);
        }

        record_vote_event(&mut tx, thread_id, user_id, stance.retract_action()).await?;
        tx.commit().await?;
        Ok(true)
    }

    async fn get_vote(&self, thread_id: i64, user_id: i64) -> StoreResult<Option<Vote>> {
        let row = sqlx::query(
            "SELECT thread_id, user_id, stance::text AS stance, voted_at \
             FROM thread_votes \
             WHERE thread_id = $1 AND user_id = $2 AND retracted_at IS NULL",
        )
        .bind(thread_id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        row.as_ref().map(vote_from_row).transpose()
    }

    async fn vote_events(&self, thread_id: i64, user_id: i64) -> StoreResult<Vec<VoteEvent>> {
        let rows = sqlx::query(
            "SELECT thread_id, user_id, action, at \
             FROM thread_vote_events \
             WHERE thread_id = $1 AND user_id = $2 \
             ORDER BY id",
        )
        .bind(thread_id)
        .bind(user_id)
        .fetch_all(self.db.pool())
        .await?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let action: String = row.get("action");
            let action = VoteAction::from_db(&action)
                .ok_or_else(|| anyhow!("unknown vote action: {}", action))?;
            events.push(VoteEvent {
                thread_id: row.get("thread_id"),
                user_id: row.get("user_id"),
                action,
                at: row.get("at"),
            });
        }

        Ok(events)
    }

    async fn create_comment(
        &self,
        thread_id: i64,
        user_id: i64,
        body: String,
    ) -> StoreResult<CreatedComment> {
        let row = sqlx::query(
            "WITH parent AS ( \
                 SELECT id, user_id FROM threads WHERE id = $1 AND deleted_at IS NULL \
             ), inserted AS ( \
                 INSERT INTO comments (thread_id, user_id, body) \
                 SELECT parent.id, $2, $3 FROM parent \
                 RETURNING id, thread_id, user_id, body, created_at, updated_at, deleted_at \
             ) \
             SELECT inserted.*, parent.user_id AS thread_author_id \
             FROM inserted JOIN parent ON parent.id = inserted.thread_id",
        )
        .bind(thread_id)
        .bind(user_id)
        .bind(body)
        .fetch_optional(self.db.pool())
        .await?;

        let row = row.ok_or(StoreError::MissingParent)?;
        Ok(CreatedComment {
            comment: comment_from_row(&row),
            thread_author_id: row.get("thread_author_id"),
        })
    }

    async fn get_comment(&self, comment_id: i64) -> StoreResult<Option<Comment>> {
        let row = sqlx::query(&format!("SELECT {COMMENT_COLUMNS} FROM comments WHERE id = $1"))
            .bind(comment_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.as_ref().map(comment_from_row))
    }

    async fn soft_delete_comment(&self, comment_id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE comments SET deleted_at = now() WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(comment_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_comments(&self, thread_id: i64) -> StoreResult<Vec<CommentDetails>> {
        let rows = sqlx::query(
            "SELECT c.id, c.thread_id, c.user_id, c.body, c.created_at, c.updated_at, c.deleted_at, \
                    COALESCE(lc.like_count, 0) AS like_count, \
                    u.name AS author_name, u.profile_image_url AS author_profile_image_url, \
                    u.profession AS author_profession \
             FROM comments c \
             LEFT JOIN ( \
                 SELECT comment_id, COUNT(*) AS like_count FROM comment_likes \
                 WHERE retracted_at IS NULL GROUP BY comment_id \
             ) lc ON lc.comment_id = c.id \
             LEFT JOIN users u ON u.id = c.user_id AND u.deleted_at IS NULL \
             WHERE c.thread_id = $1 AND c.deleted_at IS NULL \
             ORDER BY c.created_at, c.id",
        )
        .bind(thread_id)
        .fetch_all(self.db.pool())
        .await?;

        let mut comments = Vec::with_capacity(rows.len());
        for row in rows {
            let comment = comment_from_row(&row);
            let author = author_from_row(&row, comment.user_id);
            comments.push(CommentDetails {
                comment,
                like_count: row.get("like_count"),
                author,
            });
        }

        Ok(comments)
    }

    async fn like_comment(&self, comment_id: i64, user_id: i64) -> StoreResult<CommentLike> {
        let exists: bool = sqlx::query_scalar(
            "SELECT EXISTS (SELECT 1 FROM comments WHERE id = $1 AND deleted_at IS NULL)",
        )
        .bind(comment_id)
        .fetch_one(self.db.pool())
        .await?;
        if !exists {
            return Err(StoreError::MissingParent);
        }

        let row = sqlx::query(
            "INSERT INTO comment_likes (comment_id, user_id) VALUES ($1, $2) \
             ON CONFLICT (comment_id, user_id) DO UPDATE \
             SET liked_at = now(), retracted_at = NULL \
             WHERE comment_likes.retracted_at IS NOT NULL \
             RETURNING comment_id, user_id, liked_at",
        )
        .bind(comment_id)
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        let row = row.ok_or(StoreError::Duplicate)?;
        Ok(CommentLike {
            comment_id: row.get("comment_id"),
            user_id: row.get("user_id"),
            liked_at: row.get("liked_at"),
        })
    }

    async fn retract_comment_like(&self, comment_id: i64, user_id: i64) -> StoreResult<bool> {
        let result = sqlx::query(
            "UPDATE comment_likes SET retracted_at = now() \
             WHERE comment_id = $1 AND user_id = $2 AND retracted_at IS NULL",
        )
        .bind(comment_id)
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn save_thread(&self, thread_id: i64, user_id: i64) -> StoreResult<bool> {
        if !self.thread_is_active(thread_id).await? {
            return Err(StoreError::MissingParent);
        }

        let result = sqlx::query(
            "INSERT INTO saved_threads (thread_id, user_id) VALUES ($1, $2) \
             ON CONFLICT DO NOTHING",
        )
        .bind(thread_id)
        .bind(user_id)
        .execute(self.db.pool())
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn unsave_thread(&self, thread_id: i64, user_id: i64) -> StoreResult<bool> {
        let result = sqlx::query("DELETE FROM saved_threads WHERE thread_id = $1 AND user_id = $2")
            .bind(thread_id)
            .bind(user_id)
            .execute(self.db.pool())
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn get_author(&self, user_id: i64) -> StoreResult<Option<AuthorSnippet>> {
        let row = sqlx::query(
            "SELECT id, name, profile_image_url, profession \
             FROM users WHERE id = $1 AND deleted_at IS NULL",
        )
        .bind(user_id)
        .fetch_optional(self.db.pool())
        .await?;

        Ok(row.map(|row| AuthorSnippet {
            id: row.get("id"),
            name: row.get("name"),
            profile_image_url: row.get("profile_image_url"),
            profession: row.get("profession"),
        }))
    }

    async fn get_report_category(&self, category_id: i64) -> StoreResult<Option<ReportCategory>> {
        let row = sqlx::query("SELECT id, name FROM report_categories WHERE id = $1")
            .bind(category_id)
            .fetch_optional(self.db.pool())
            .await?;

        Ok(row.map(|row| ReportCategory {
            id: row.get("id"),
            name: row.get("name"),
        }))
    }

    async fn create_report(&self, report: NewReport) -> StoreResult<Report> {
        let row = sqlx::query(&format!(
            "INSERT INTO reports (target_kind, target_id, reporter_id, category_id) \
             VALUES ($1, $2, $3, $4) \
             RETURNING {REPORT_COLUMNS}"
        ))
        .bind(report.target.kind.as_db())
        .bind(report.target.id)
        .bind(report.reporter_id)
        .bind(report.category_id)
        .fetch_one(self.db.pool())
        .await?;

        report_from_row(&row)
    }

    async fn get_report(&self, report_id: i64) -> StoreResult<Option<Report>> {
        let row = sqlx::query(&format!("SELECT {REPORT_COLUMNS} FROM reports WHERE id = $1"))
            .bind(report_id)
            .fetch_optional(self.db.pool())
            .await?;

        row.as_ref().map(report_from_row).transpose()
    }

    async fn resolve_report(
        &self,
        report_id: i64,
        resolver_id: i64,
    ) -> StoreResult<ReportResolution> {
        let row = sqlx::query(&format!(
            "UPDATE reports SET resolved_by = $2, resolved_at = now() \
             WHERE id = $1 AND resolved_by IS NULL \
             RETURNING {REPORT_COLUMNS}"
        ))
        .bind(report_id)
        .bind(resolver_id)
        .fetch_optional(self.db.pool())
        .await?;

        if let Some(row) = row {
            return Ok(ReportResolution::Resolved(report_from_row(&row)?));
        }

        let exists: bool = sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM reports WHERE id = $1)")
            .bind(report_id)
            .fetch_one(self.db.pool())
            .await?;

        Ok(if exists {
            ReportResolution::AlreadyResolved
        } else {
            ReportResolution::Missing
        })
    }

    async fn list_open_reports(&self) -> StoreResult<Vec<Report>> {
        let rows = sqlx::query(&format!(
            "SELECT {REPORT_COLUMNS} FROM reports \
             WHERE resolved_by IS NULL \
             ORDER BY created_at, id"
        ))
        .fetch_all(self.db.pool())
        .await?;

        rows.iter().map(report_from_row).collect()
    }

    async fn list_feed(
        &self,
        viewer_id: i64,
        source: &FeedSource,
        window: UpvoteWindow,
        limit: Option<i64>,
    ) -> StoreResult<Vec<FeedThread>> {
        let sql = feed_query(source);
        let query = sqlx::query(&sql)
            .bind(viewer_id)
            .bind(window.as_seconds())
            .bind(limit);
        let query = match source {
            FeedSource::Search { keyword } => {
                query.bind(format!("%{}%", escape_like_pattern(keyword)))
            }
            FeedSource::ByAuthor { author_id } => query.bind(*author_id),
            _ => query,
        };

        let rows = query.fetch_all(self.db.pool()).await?;

        let mut threads = Vec::with_capacity(rows.len());
        for row in rows {
            let thread = thread_from_row(&row);
            let author = author_from_row(&row, thread.user_id);
            threads.push(FeedThread {
                thread,
                upvote_count: row.get("upvote_count"),
                is_upvoted: row.get("is_upvoted"),
                is_downvoted: row.get("is_downvoted"),
                is_followed: row.get("is_followed"),
                is_mine: row.get("is_mine"),
                author,
            });
        }

        Ok(threads)
    }
}

// $3 = limit (NULL = unlimited), $4 = source parameter when the source has one.
fn feed_query(source: &FeedSource) -> String {
    let (join, filter, order) = match source {
        FeedSource::Trending => ("", "", "upvote_count DESC, t.created_at DESC, t.id DESC"),
        FeedSource::FollowedCommunities => (
            "JOIN community_followers cf ON cf.community_id = t.community_id AND cf.user_id = $1",
            "",
            "t.id",
        ),
        FeedSource::FollowedUsers => (
            "JOIN user_followers fu ON fu.user_id = t.user_id AND fu.follower_id = $1",
            "",
            "t.id",
        ),
        FeedSource::Search { .. } => (
            "",
            "AND (t.title ILIKE $4 ESCAPE '\\' \
                  OR t.body ILIKE $4 ESCAPE '\\' \
                  OR EXISTS (SELECT 1 FROM comments c \
                             WHERE c.thread_id = t.id AND c.deleted_at IS NULL \
                               AND c.body ILIKE $4 ESCAPE '\\'))",
            "t.id",
        ),
        FeedSource::Saved => (
            "JOIN saved_threads st ON st.thread_id = t.id AND st.user_id = $1",
            "",
            "st.saved_at, t.id",
        ),
        FeedSource::ByAuthor { .. } => ("", "AND t.user_id = $4", "t.created_at DESC, t.id DESC"),
    };

    format!(
        "SELECT {FEED_COLUMNS} \
         FROM threads t \
         LEFT JOIN ( \
             SELECT thread_id, COUNT(*) AS upvote_count FROM thread_votes \
             WHERE stance = 'up' AND retracted_at IS NULL \
               AND ($2::bigint IS NULL OR voted_at > now() - interval '1 second' * $2::bigint) \
             GROUP BY thread_id \
         ) uc ON uc.thread_id = t.id \
         LEFT JOIN users u ON u.id = t.user_id AND u.deleted_at IS NULL \
         {join} \
         WHERE t.deleted_at IS NULL {filter} \
         ORDER BY {order} \
         LIMIT $3"
    )
}

/// Serializes vote changes for one (thread, user) pair until the transaction ends.
const VOTE_PAIR_LOCK: &str =
    "SELECT pg_advisory_xact_lock(hashtextextended($1::text || ':' || $2::text, 0))";

async fn lock_vote_pair(
    tx: &mut Transaction<'_, Postgres>,
    thread_id: i64,
    user_id: i64,
) -> StoreResult<()> {
    sqlx::query(VOTE_PAIR_LOCK)
        .bind(thread_id)
        .bind(user_id)
        .execute(&mut **tx)
        .await?;
    Ok(())
}

async fn record_vote_event(
    tx: &mut Transaction<'_, Postgres>,
    thread_id: i64,
    user_id: i64,
    action: VoteAction,
) -> StoreResult<()> {
    sqlx::query("INSERT INTO thread_vote_events (thread_id, user_id, action) VALUES ($1, $2, $3)")
        .bind(thread_id)
        .bind(user_id)
        .bind(action.as_db())
        .execute(&mut **tx)
        .await?;
    Ok(())
}

fn thread_from_row(row: &PgRow) -> Thread {
    Thread {
        id: row.get("id"),
        user_id: row.get("user_id"),
        community_id: row.get("community_id"),
        title: row.get("title"),
        body: row.get("body"),
        image_url: row.get("image_url"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        deleted_at: row.get("deleted_at"),
    }
}

fn comment_from_row(row: &PgRow) -> Comment {
    Comment {
        id: row.get("id"),
        thread_id: row.get("thread_id"),
        user_id: row.get("user_id"),
        body: row.get("body"),
        created_at: row.get("created_at"),
        updated_at: row.get("updated_at"),
        deleted_at: row.get("deleted_at"),
    }
}

fn vote_from_row(row: &PgRow) -> StoreResult<Vote> {
    let stance: String = row.get("stance");
    let stance =
        VoteStance::from_db(&stance).ok_or_else(|| anyhow!("unknown vote stance: {}", stance))?;
    Ok(Vote {
        thread_id: row.get("thread_id"),
        user_id: row.get("user_id"),
        stance,
        voted_at: row.get("voted_at"),
    })
}

fn report_from_row(row: &PgRow) -> StoreResult<Report> {
    let kind: String = row.get("target_kind");
    let kind = ReportTargetKind::from_db(&kind)
        .ok_or_else(|| anyhow!("unknown report target kind: {}", kind))?;
    Ok(Report {
        id: row.get("id"),
        target: ReportTarget {
            kind,
            id: row.get("target_id"),
        },
        reporter_id: row.get("reporter_id"),
        category_id: row.get("category_id"),
        created_at: row.get("created_at"),
        resolved_by: row.get("resolved_by"),
        resolved_at: row.get("resolved_at"),
    })
}

// Author columns come from a LEFT JOIN, so a missing user yields no snippet.
fn author_from_row(row: &PgRow, user_id: i64) -> Option<AuthorSnippet> {
    let name: Option<String> = row.get("author_name");
    name.map(|name| AuthorSnippet {
        id: user_id,
        name,
        profile_image_url: row.get("author_profile_image_url"),
        profession: row.get("author_profession"),
    })
}

fn escape_like_pattern(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '%' | '_' | '\\' => {
                escaped.push('\\');
                escaped.push(ch);
            }
            _ => escaped.push(ch),
        }
    }
    escaped
}
