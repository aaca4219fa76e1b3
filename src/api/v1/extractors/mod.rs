/*
 * Responsibility
 * - request extractors shared by the v1 handlers
 */
pub mod auth_ctx;
pub mod json;
pub mod resource_id;

pub use auth_ctx::{AuthCtx, AuthCtxExtractor};
pub use json::ApiJson;
pub use resource_id::{CommentId, GroupId, PostId};
