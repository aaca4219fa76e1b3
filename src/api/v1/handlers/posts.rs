/*
 * Responsibility
 * - /posts CRUD handlers
 * - author comes from AuthCtx, never from the body
 * - write order: 404 (missing) -> 403 (not author) -> 400/415 (body), so the body
 *   is extracted as a Result and only inspected after the row checks
 */
use axum::{Json, extract::State, http::StatusCode};
use validator::{Validate, ValidationErrors};

use crate::{
    api::v1::{
        dto::{
            Field,
            posts::{PostPatchRequest, PostRequest, PostResponse},
        },
        extractors::{ApiJson, AuthCtx, AuthCtxExtractor, PostId},
        handlers::ensure_owner,
    },
    error::{AppError, FieldErrors, REQUIRED, field_errors},
    repos::post_repo::{NewPost, PostChanges, PostRow},
    state::AppState,
};

fn row_to_response(state: &AppState, row: PostRow) -> PostResponse {
    PostResponse {
        id: row.id,
        text: row.text,
        pub_date: row.pub_date,
        author: row.author,
        image: row.image.as_deref().and_then(|path| state.media.url_for(path)),
        group: row.group_id,
    }
}

/// Field validation plus the group reference check, reported together.
async fn check_payload(
    state: &AppState,
    validation: Result<(), ValidationErrors>,
    group: &Field<i64>,
) -> Result<(), AppError> {
    let mut errors = match validation {
        Ok(()) => FieldErrors::new(),
        Err(e) => field_errors(&e),
    };

    if let Field::Value(group_id) = *group
        && state.repos.groups.get(group_id).await?.is_none()
    {
        errors
            .entry("group".to_string())
            .or_default()
            .push(format!("Invalid pk \"{group_id}\" - object does not exist."));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(AppError::Validation(errors))
    }
}

pub async fn list_posts(
    State(state): State<AppState>,
) -> Result<Json<Vec<PostResponse>>, AppError> {
    let rows = state.repos.posts.list().await?;

    let res = rows
        .into_iter()
        .map(|row| row_to_response(&state, row))
        .collect();

    Ok(Json(res))
}

pub async fn create_post(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    ApiJson(req): ApiJson<PostRequest>,
) -> Result<(StatusCode, Json<PostResponse>), AppError> {
    let req = req.normalized();
    check_payload(&state, req.validate(), &req.group).await?;

    let Some(text) = req.text.into_value() else {
        return Err(AppError::field("text", REQUIRED));
    };

    let row = state
        .repos
        .posts
        .create(NewPost {
            text,
            author_id: auth.user_id,
            group_id: req.group.into_value(),
        })
        .await?;

    tracing::info!(post_id = row.id, user_id = auth.user_id, "post created");
    Ok((StatusCode::CREATED, Json(row_to_response(&state, row))))
}

pub async fn get_post(
    State(state): State<AppState>,
    post_id: PostId,
) -> Result<Json<PostResponse>, AppError> {
    let row = state
        .repos
        .posts
        .get(post_id.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(row_to_response(&state, row)))
}

/// PUT: `text` required, `group` optional.
pub async fn update_post(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    post_id: PostId,
    body: Result<ApiJson<PostRequest>, AppError>,
) -> Result<Json<PostResponse>, AppError> {
    let current = owned_post(&state, &auth, post_id.id).await?;

    let ApiJson(req) = body?;
    let req = req.normalized();
    check_payload(&state, req.validate(), &req.group).await?;

    let changes = PostChanges {
        text: req.text.into_value(),
        group_id: req.group.into_update(),
    };
    save_changes(&state, current.id, changes).await
}

/// PATCH: every field optional.
pub async fn partial_update_post(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    post_id: PostId,
    body: Result<ApiJson<PostPatchRequest>, AppError>,
) -> Result<Json<PostResponse>, AppError> {
    let current = owned_post(&state, &auth, post_id.id).await?;

    let ApiJson(req) = body?;
    let req = req.normalized();
    check_payload(&state, req.validate(), &req.group).await?;

    let changes = PostChanges {
        text: req.text.into_value(),
        group_id: req.group.into_update(),
    };
    save_changes(&state, current.id, changes).await
}

/// 404 when missing, 403 when the caller is not the author.
async fn owned_post(state: &AppState, auth: &AuthCtx, post_id: i64) -> Result<PostRow, AppError> {
    let current = state
        .repos
        .posts
        .get(post_id)
        .await?
        .ok_or(AppError::NotFound)?;
    ensure_owner(auth, current.author_id, "post")?;
    Ok(current)
}

async fn save_changes(
    state: &AppState,
    post_id: i64,
    changes: PostChanges,
) -> Result<Json<PostResponse>, AppError> {
    let row = state
        .repos
        .posts
        .update(post_id, changes)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(row_to_response(state, row)))
}

pub async fn delete_post(
    State(state): State<AppState>,
    AuthCtxExtractor(auth): AuthCtxExtractor,
    post_id: PostId,
) -> Result<StatusCode, AppError> {
    owned_post(&state, &auth, post_id.id).await?;

    let deleted = state.repos.posts.delete(post_id.id).await?;

    if deleted {
        tracing::info!(post_id = post_id.id, user_id = auth.user_id, "post deleted");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound)
    }
}
