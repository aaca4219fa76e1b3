/*
 * Responsibility
 * - the "authenticated caller" type handlers see
 * - the access middleware verifies the token and stores this in request extensions
 *
 * Notes
 * - token parsing/verification belongs to middleware/services
 * - ownership (author == caller) is decided by handlers through `is_owner`
 */

/// Context attached to an authenticated request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub user_id: i64,
    pub username: String,
}

impl AuthCtx {
    pub fn new(user_id: i64, username: impl Into<String>) -> Self {
        Self {
            user_id,
            username: username.into(),
        }
    }

    pub fn is_owner(&self, author_id: i64) -> bool {
        self.user_id == author_id
    }
}
