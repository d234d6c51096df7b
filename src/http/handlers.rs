use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

use crate::domain::engagement::{
    Comment, CommentDetails, CommentLike, Vote, VoteEvent, VoteStance,
};
use crate::domain::moderation::{Report, ReportStatus, ReportTarget, ReportTargetKind};
use crate::domain::thread::{FeedThread, NewThread, Thread, ThreadPatch};
use crate::http::{AdminToken, AppError, AuthUser};
use crate::AppState;

#[derive(Serialize)]
pub(crate) struct HealthResponse {
    status: &'static str,
}

#[derive(Serialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
}

pub(crate) async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let store = state.engagement.ping().await.is_ok();
    let cache = match &state.cache {
        Some(cache) => cache.ping().await.is_ok(),
        None => true,
    };
    let status = if store && cache { "ok" } else { "degraded" };

    Json(HealthResponse { status })
}

// ---------------------------------------------------------------------------
// Threads
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CreateThreadRequest {
    pub community_id: i64,
    pub title: String,
    pub body: String,
    pub image_url: Option<String>,
}

pub async fn create_thread(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateThreadRequest>,
) -> Result<(StatusCode, Json<Thread>), AppError> {
    let thread = state
        .engagement
        .threads()
        .create(NewThread {
            user_id: auth.user_id,
            community_id: payload.community_id,
            title: payload.title,
            body: payload.body,
            image_url: payload.image_url,
        })
        .await
        .map_err(|err| AppError::engagement(err, "failed to create thread"))?;

    Ok((StatusCode::CREATED, Json(thread)))
}

pub async fn get_thread(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<Thread>, AppError> {
    let thread = state
        .engagement
        .threads()
        .get(id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to fetch thread"))?;

    Ok(Json(thread))
}

#[derive(Deserialize)]
pub struct UpdateThreadRequest {
    pub community_id: Option<i64>,
    pub title: Option<String>,
    pub body: Option<String>,
    pub image_url: Option<String>,
}

pub async fn update_thread(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<UpdateThreadRequest>,
) -> Result<Json<Thread>, AppError> {
    let patch = ThreadPatch {
        title: payload.title,
        body: payload.body,
        community_id: payload.community_id,
        image_url: payload.image_url,
    };
    let thread = state
        .engagement
        .threads()
        .update(id, auth.user_id, patch)
        .await
        .map_err(|err| AppError::engagement(err, "failed to update thread"))?;

    Ok(Json(thread))
}

pub async fn delete_thread(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state
        .engagement
        .threads()
        .delete(id, auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to delete thread"))?;

    Ok(StatusCode::NO_CONTENT)
}

#[derive(Serialize)]
pub struct SaveResponse {
    pub created: bool,
}

pub async fn save_thread(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<SaveResponse>, AppError> {
    let created = state
        .engagement
        .threads()
        .save(id, auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to save thread"))?;

    Ok(Json(SaveResponse { created }))
}

pub async fn unsave_thread(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state
        .engagement
        .threads()
        .unsave(id, auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to unsave thread"))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Votes
// ---------------------------------------------------------------------------

#[derive(Serialize)]
pub struct VoteResponse {
    pub thread_id: i64,
    pub stance: VoteStance,
    #[serde(with = "time::serde::rfc3339")]
    pub voted_at: OffsetDateTime,
}

impl From<Vote> for VoteResponse {
    fn from(vote: Vote) -> Self {
        Self {
            thread_id: vote.thread_id,
            stance: vote.stance,
            voted_at: vote.voted_at,
        }
    }
}

#[derive(Serialize)]
pub struct StanceResponse {
    pub thread_id: i64,
    pub stance: Option<VoteStance>,
}

pub async fn upvote_thread(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<VoteResponse>, AppError> {
    let vote = state
        .engagement
        .votes()
        .upvote(id, auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to upvote thread"))?;

    Ok(Json(vote.into()))
}

pub async fn undo_upvote(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state
        .engagement
        .votes()
        .undo_upvote(id, auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to undo upvote"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn downvote_thread(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<VoteResponse>, AppError> {
    let vote = state
        .engagement
        .votes()
        .downvote(id, auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to downvote thread"))?;

    Ok(Json(vote.into()))
}

pub async fn undo_downvote(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state
        .engagement
        .votes()
        .undo_downvote(id, auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to undo downvote"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn upvote_state(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<VoteResponse>, AppError> {
    let vote = state
        .engagement
        .votes()
        .upvote_state(id, auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to fetch upvote"))?;

    Ok(Json(vote.into()))
}

pub async fn downvote_state(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<VoteResponse>, AppError> {
    let vote = state
        .engagement
        .votes()
        .downvote_state(id, auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to fetch downvote"))?;

    Ok(Json(vote.into()))
}

pub async fn vote_stance(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<StanceResponse>, AppError> {
    let stance = state
        .engagement
        .votes()
        .stance(id, auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to fetch vote"))?;

    Ok(Json(StanceResponse {
        thread_id: id,
        stance,
    }))
}

pub async fn vote_history(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ListResponse<VoteEvent>>, AppError> {
    let items = state
        .engagement
        .votes()
        .history(id, auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to fetch vote history"))?;

    Ok(Json(ListResponse { items }))
}

// ---------------------------------------------------------------------------
// Comments
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CommentRequest {
    pub body: String,
}

pub async fn add_comment(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CommentRequest>,
) -> Result<(StatusCode, Json<Comment>), AppError> {
    let comment = state
        .engagement
        .comments()
        .add_comment(id, auth.user_id, payload.body)
        .await
        .map_err(|err| AppError::engagement(err, "failed to add comment"))?;

    Ok((StatusCode::CREATED, Json(comment)))
}

pub async fn list_thread_comments(
    Path(id): Path<i64>,
    State(state): State<AppState>,
) -> Result<Json<ListResponse<CommentDetails>>, AppError> {
    let items = state
        .engagement
        .comments()
        .comments_by_thread(id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to list comments"))?;

    Ok(Json(ListResponse { items }))
}

pub async fn delete_comment(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state
        .engagement
        .remove_comment(id, auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to delete comment"))?;

    Ok(StatusCode::NO_CONTENT)
}

pub async fn like_comment(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<CommentLike>, AppError> {
    let like = state
        .engagement
        .comments()
        .like_comment(id, auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to like comment"))?;

    Ok(Json(like))
}

pub async fn unlike_comment(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<StatusCode, AppError> {
    state
        .engagement
        .comments()
        .unlike_comment(id, auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to unlike comment"))?;

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Reports
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct CreateReportRequest {
    pub target_type: ReportTargetKind,
    pub target_id: i64,
    pub category_id: i64,
}

#[derive(Serialize)]
pub struct ReportResponse {
    pub id: i64,
    pub target_type: ReportTargetKind,
    pub target_id: i64,
    pub reporter_id: i64,
    pub category_id: i64,
    pub status: ReportStatus,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    pub resolved_by: Option<i64>,
    #[serde(with = "time::serde::rfc3339::option")]
    pub resolved_at: Option<OffsetDateTime>,
}

impl From<Report> for ReportResponse {
    fn from(report: Report) -> Self {
        Self {
            id: report.id,
            target_type: report.target.kind,
            target_id: report.target.id,
            reporter_id: report.reporter_id,
            category_id: report.category_id,
            status: report.status(),
            created_at: report.created_at,
            resolved_by: report.resolved_by,
            resolved_at: report.resolved_at,
        }
    }
}

pub async fn create_report(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(payload): Json<CreateReportRequest>,
) -> Result<(StatusCode, Json<ReportResponse>), AppError> {
    let target = ReportTarget {
        kind: payload.target_type,
        id: payload.target_id,
    };
    let report = state
        .engagement
        .reports()
        .report(auth.user_id, target, payload.category_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to create report"))?;

    Ok((StatusCode::CREATED, Json(report.into())))
}

pub async fn list_open_reports(
    _admin: AdminToken,
    State(state): State<AppState>,
) -> Result<Json<ListResponse<ReportResponse>>, AppError> {
    let reports = state
        .engagement
        .reports()
        .list_open()
        .await
        .map_err(|err| AppError::engagement(err, "failed to list reports"))?;

    Ok(Json(ListResponse {
        items: reports.into_iter().map(ReportResponse::from).collect(),
    }))
}

pub async fn get_report(
    Path(id): Path<i64>,
    _admin: AdminToken,
    State(state): State<AppState>,
) -> Result<Json<ReportResponse>, AppError> {
    let report = state
        .engagement
        .reports()
        .get(id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to fetch report"))?;

    Ok(Json(report.into()))
}

pub async fn resolve_report(
    Path(id): Path<i64>,
    _admin: AdminToken,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ReportResponse>, AppError> {
    let report = state
        .engagement
        .reports()
        .resolve(id, auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to resolve report"))?;

    tracing::info!(report_id = id, resolver_id = auth.user_id, "report resolved");
    Ok(Json(report.into()))
}

// ---------------------------------------------------------------------------
// Feeds
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct TrendingQuery {
    pub limit: Option<i64>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: Option<String>,
}

pub async fn trending_feed(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<TrendingQuery>,
) -> Result<Json<ListResponse<FeedThread>>, AppError> {
    let items = state
        .engagement
        .feed()
        .trending(auth.user_id, query.limit)
        .await
        .map_err(|err| AppError::engagement(err, "failed to load trending feed"))?;

    Ok(Json(ListResponse { items }))
}

pub async fn community_feed(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ListResponse<FeedThread>>, AppError> {
    let items = state
        .engagement
        .feed()
        .followed_communities(auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to load community feed"))?;

    Ok(Json(ListResponse { items }))
}

pub async fn following_feed(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ListResponse<FeedThread>>, AppError> {
    let items = state
        .engagement
        .feed()
        .followed_users(auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to load following feed"))?;

    Ok(Json(ListResponse { items }))
}

pub async fn search_feed(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ListResponse<FeedThread>>, AppError> {
    let keyword = query.q.unwrap_or_default();
    let items = state
        .engagement
        .feed()
        .search(auth.user_id, &keyword)
        .await
        .map_err(|err| AppError::engagement(err, "failed to search threads"))?;

    Ok(Json(ListResponse { items }))
}

pub async fn saved_feed(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ListResponse<FeedThread>>, AppError> {
    let items = state
        .engagement
        .feed()
        .saved(auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to load saved threads"))?;

    Ok(Json(ListResponse { items }))
}

pub async fn home_feed(
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ListResponse<FeedThread>>, AppError> {
    let items = state
        .engagement
        .feed()
        .home(auth.user_id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to load home feed"))?;

    Ok(Json(ListResponse { items }))
}

pub async fn refresh_feed(auth: AuthUser, State(state): State<AppState>) -> StatusCode {
    state.engagement.feed().refresh_trending(auth.user_id).await;
    StatusCode::NO_CONTENT
}

pub async fn list_user_threads(
    Path(id): Path<i64>,
    auth: AuthUser,
    State(state): State<AppState>,
) -> Result<Json<ListResponse<FeedThread>>, AppError> {
    let items = state
        .engagement
        .feed()
        .by_author(auth.user_id, id)
        .await
        .map_err(|err| AppError::engagement(err, "failed to list user threads"))?;

    Ok(Json(ListResponse { items }))
}
