/*
 * Responsibility
 * - v1 handlers, one module per resource
 * - the ownership rule shared by posts and comments
 */
pub mod comments;
pub mod groups;
pub mod health;
pub mod posts;
pub mod token;

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;

/// Only the stored author may modify or delete an entity.
pub(crate) fn ensure_owner(
    auth: &AuthCtx,
    author_id: i64,
    resource: &'static str,
) -> Result<(), AppError> {
    if auth.is_owner(author_id) {
        return Ok(());
    }
    tracing::warn!(
        user_id = auth.user_id,
        author_id,
        resource,
        "write rejected: caller is not the author"
    );
    Err(AppError::Forbidden)
}
