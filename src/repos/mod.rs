/*
 * Responsibility
 * - one repository trait per entity (posts, groups, comments, users)
 * - `Repos` bundles the trait objects handed to AppState
 * - backends: PostgreSQL (sqlx) and the in-memory store
 */
use std::sync::Arc;

use sqlx::PgPool;

pub mod comment_repo;
pub mod error;
pub mod group_repo;
pub mod memory;
pub mod post_repo;
pub mod user_repo;

use comment_repo::{CommentRepo, PgCommentRepo};
use group_repo::{GroupRepo, PgGroupRepo};
use memory::MemoryStore;
use post_repo::{PgPostRepo, PostRepo};
use user_repo::{PgUserRepo, UserRepo};

#[derive(Clone)]
pub struct Repos {
    pub posts: Arc<dyn PostRepo>,
    pub groups: Arc<dyn GroupRepo>,
    pub comments: Arc<dyn CommentRepo>,
    pub users: Arc<dyn UserRepo>,
}

impl Repos {
    pub fn postgres(pool: PgPool) -> Self {
        Self {
            posts: Arc::new(PgPostRepo::new(pool.clone())),
            groups: Arc::new(PgGroupRepo::new(pool.clone())),
            comments: Arc::new(PgCommentRepo::new(pool.clone())),
            users: Arc::new(PgUserRepo::new(pool)),
        }
    }

    pub fn memory(store: Arc<MemoryStore>) -> Self {
        Self {
            posts: store.clone(),
            groups: store.clone(),
            comments: store.clone(),
            users: store,
        }
    }
}

impl std::fmt::Debug for Repos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Repos").finish_non_exhaustive()
    }
}
