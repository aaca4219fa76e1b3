/*
 * Responsibility
 * - shared context attached to the Router (AppState)
 *   - repos (trait objects), token service, media url builder
 * - cheap to Clone (Arc inside)
 */
use std::sync::Arc;

use crate::repos::Repos;
use crate::services::{auth::TokenService, media::MediaUrls};

#[derive(Clone, Debug)]
pub struct AppState {
    pub repos: Repos,
    pub auth: Arc<TokenService>,
    pub media: MediaUrls,
}

impl AppState {
    pub fn new(repos: Repos, auth: Arc<TokenService>, media: MediaUrls) -> Self {
        Self { repos, auth, media }
    }
}
