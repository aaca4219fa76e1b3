/*
 * Responsibility
 * - /posts/{post_id}/comments CRUD handlers
 * - every operation resolves the parent post first
 *   - list: missing parent -> 400 {"error": ...} (kept for existing clients)
 *   - everything else: missing parent -> 404
 * - post and author come from the URL and AuthCtx, never from the body
 * - the body is only inspected after the post/comment/ownership checks
 */
use axum::{Json, extract::State, http::StatusCode};
use validator::Validate;

use crate::{
    api::v1::{
        dto::comments::{CommentPatchRequest, CommentRequest, CommentResponse},
        extractors::{ApiJson, AuthCtx, AuthCtxExtractor, CommentId, PostId},
        handlers::ensure_owner,
    },
    error::{AppError, REQUIRED},
    repos::{comment_repo::CommentRow, comment_repo::NewComment, post_repo::PostRow},
    state::AppState,
};

const MISSING_POST: &str = "Possibly the post does not exist.";

fn row_to_response(row: CommentRow) -> CommentResponse {
    CommentResponse {
        id: row.id,
        author: row.author,
        text: row.text,
        post: row.post_id,
        created: row.created,
    }
}

async fn find_post(state: &AppState, post_id: i64) -> Result<Option<PostRow>, AppError> {
    Ok(state.repos.posts.get(post_id).await?)
}

async fn require_post(state: &AppState, post_id: i64) -> Result<PostRow, AppError> {
    find_post(state, post_id).await?.ok_or(AppError::NotFound)
}

async fn require_comment(
    state: &AppState,
    post_id: i64,
    comment_id: i64,
) -> Result<CommentRow, AppError> {
    require_post(state, post_id).await?;
    state
        .repos
        .comments
        .get(post_id, comment_id)
        .await?
        .ok_or(AppError::NotFound)
}

pub async fn list_comments(
    State(state): State<AppState>,
    post_id: PostId,
) -> Result<Json<Vec<CommentResponse>>, AppError> {
    if find_post(&state, post_id.id).await?.is_none() {
        return Err(AppError::bad_request("error", MISSING_POST));
    }

    let rows = state.repos.comments.list_by_post(post_id.id).await?;
    Ok(Json(rows.into_iter().map(row_to_response).collect()))
}

pub async fn create_comment(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    post_id: PostId,
    body: Result<ApiJson<CommentRequest>, AppError>,
) -> Result<(StatusCode, Json<CommentResponse>), AppError> {
    let post = require_post(&state, post_id.id).await?;

    let ApiJson(req) = body?;
    let req = req.normalized();
    req.validate()?;
    let Some(text) = req.text.into_value() else {
        return Err(AppError::field("text", REQUIRED));
    };

    let row = state
        .repos
        .comments
        .create(NewComment {
            post_id: post.id,
            author_id: auth.user_id,
            text,
        })
        .await?;

    tracing::info!(
        post_id = post.id,
        comment_id = row.id,
        user_id = auth.user_id,
        "comment created"
    );
    Ok((StatusCode::CREATED, Json(row_to_response(row))))
}

pub async fn get_comment(
    State(state): State<AppState>,
    post_id: PostId,
    comment_id: CommentId,
) -> Result<Json<CommentResponse>, AppError> {
    let row = require_comment(&state, post_id.id, comment_id.id).await?;
    Ok(Json(row_to_response(row)))
}

/// PUT: `text` required.
pub async fn update_comment(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    post_id: PostId,
    comment_id: CommentId,
    body: Result<ApiJson<CommentRequest>, AppError>,
) -> Result<Json<CommentResponse>, AppError> {
    let current = owned_comment(&state, &auth, post_id.id, comment_id.id).await?;

    let ApiJson(req) = body?;
    let req = req.normalized();
    req.validate()?;

    save_text(&state, &current, req.text.into_value()).await
}

/// PATCH: `text` optional.
pub async fn partial_update_comment(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    post_id: PostId,
    comment_id: CommentId,
    body: Result<ApiJson<CommentPatchRequest>, AppError>,
) -> Result<Json<CommentResponse>, AppError> {
    let current = owned_comment(&state, &auth, post_id.id, comment_id.id).await?;

    let ApiJson(req) = body?;
    let req = req.normalized();
    req.validate()?;

    save_text(&state, &current, req.text.into_value()).await
}

/// 404 when the post or comment is missing, 403 when the caller is not the author.
async fn owned_comment(
    state: &AppState,
    auth: &AuthCtx,
    post_id: i64,
    comment_id: i64,
) -> Result<CommentRow, AppError> {
    let current = require_comment(state, post_id, comment_id).await?;
    ensure_owner(auth, current.author_id, "comment")?;
    Ok(current)
}

async fn save_text(
    state: &AppState,
    current: &CommentRow,
    text: Option<String>,
) -> Result<Json<CommentResponse>, AppError> {
    let row = state
        .repos
        .comments
        .update(current.post_id, current.id, text)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(row_to_response(row)))
}

pub async fn delete_comment(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    post_id: PostId,
    comment_id: CommentId,
) -> Result<StatusCode, AppError> {
    owned_comment(&state, &auth, post_id.id, comment_id.id).await?;

    if state
        .repos
        .comments
        .delete(post_id.id, comment_id.id)
        .await?
    {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
