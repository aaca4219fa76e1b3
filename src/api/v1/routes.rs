/*
 * Responsibility
 * - v1 URL structure
 * - /posts, /posts/{post_id}/comments, /groups, /api-token-auth
 * - the access middleware wraps every v1 route; handlers decide whether auth is required
 */
use axum::{
    Router,
    routing::{get, post},
};

use crate::middleware;
use crate::state::AppState;

use crate::api::v1::handlers::{
    comments::{
        create_comment, delete_comment, get_comment, list_comments, partial_update_comment,
        update_comment,
    },
    groups::{get_group, list_groups},
    posts::{create_post, delete_post, get_post, list_posts, partial_update_post, update_post},
    token::obtain_token,
};

pub fn routes(state: AppState) -> Router<AppState> {
    let router = Router::new()
        .route("/posts", get(list_posts).post(create_post))
        .route(
            "/posts/{post_id}",
            get(get_post)
                .put(update_post)
                .patch(partial_update_post)
                .delete(delete_post),
        )
        .route(
            "/posts/{post_id}/comments",
            get(list_comments).post(create_comment),
        )
        .route(
            "/posts/{post_id}/comments/{comment_id}",
            get(get_comment)
                .put(update_comment)
                .patch(partial_update_comment)
                .delete(delete_comment),
        )
        // read-only: other methods fall through to 405
        .route("/groups", get(list_groups))
        .route("/groups/{group_id}", get(get_group))
        .route("/api-token-auth", post(obtain_token));

    middleware::auth::access::apply(router, state)
}
