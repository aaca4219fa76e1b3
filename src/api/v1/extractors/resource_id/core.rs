/*
 * Responsibility
 *  - read one named path segment and parse it into an internal id
 *  - Axum FromRequestParts implementation
 *  - anything that is not a non-negative integer is an unknown resource (404)
 * Keeps out
 *  - concrete resource names (Post / Group / Comment live in types.rs)
 */
use std::collections::HashMap;
use std::marker::PhantomData;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::error::AppError;
use crate::state::AppState;

/// Names the path parameter a tag type is read from.
pub trait PathParam {
    const NAME: &'static str;
}

#[derive(Clone, Copy)]
pub struct ResourceId<T> {
    pub id: i64,
    _marker: PhantomData<T>,
}

impl<T> ResourceId<T> {
    fn new(id: i64) -> Self {
        Self {
            id,
            _marker: PhantomData,
        }
    }
}

fn parse_id(raw: &str) -> Option<i64> {
    raw.parse::<i64>().ok().filter(|id| *id >= 0)
}

impl<T> FromRequestParts<AppState> for ResourceId<T>
where
    T: PathParam + Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Path(params) = Path::<HashMap<String, String>>::from_request_parts(parts, state)
            .await
            .map_err(|_| AppError::NotFound)?;

        let Some(raw) = params.get(T::NAME) else {
            // route and extractor disagree: programming error
            tracing::error!(param = T::NAME, "path parameter missing from route");
            return Err(AppError::Internal);
        };

        parse_id(raw).map(Self::new).ok_or(AppError::NotFound)
    }
}

impl<T: PathParam> std::fmt::Debug for ResourceId<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceId")
            .field("param", &T::NAME)
            .field("id", &self.id)
            .finish()
    }
}
