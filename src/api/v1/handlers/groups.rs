/*
 * Responsibility
 * - /groups handlers (read-only; write methods get the router's 405)
 */
use axum::{Json, extract::State};

use crate::{
    api::v1::{dto::groups::GroupResponse, extractors::GroupId},
    error::AppError,
    repos::group_repo::GroupRow,
    state::AppState,
};

fn row_to_response(row: GroupRow) -> GroupResponse {
    GroupResponse {
        id: row.id,
        title: row.title,
        slug: row.slug,
        description: row.description,
    }
}

pub async fn list_groups(
    State(state): State<AppState>,
) -> Result<Json<Vec<GroupResponse>>, AppError> {
    let rows = state.repos.groups.list().await?;
    Ok(Json(rows.into_iter().map(row_to_response).collect()))
}

pub async fn get_group(
    State(state): State<AppState>,
    group_id: GroupId,
) -> Result<Json<GroupResponse>, AppError> {
    let row = state
        .repos
        .groups
        .get(group_id.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(row_to_response(row)))
}
