//! access token verification → AuthCtx in request extensions
//!
//! - No `Authorization` header: the request continues anonymously; handlers that need a caller
//!   reject it through `AuthCtxExtractor` (401).
//! - `Authorization: Token <jwt>` or `Authorization: Bearer <jwt>`: the token must verify and
//!   its subject must still exist, otherwise 401.

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Apply the access middleware to every route of `router`.
///
/// ```ignore
/// let v1 = middleware::auth::access::apply(v1, state.clone());
/// app = app.nest("/api/v1", v1);
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // axum 0.8 from_fn cannot take a State extractor; pass state explicitly with from_fn_with_state
    router.layer(middleware::from_fn_with_state(state, access_middleware))
}

/// Accepts both the `Token` and `Bearer` schemes.
fn extract_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.split_once(' ')?;
    if !(scheme.eq_ignore_ascii_case("token") || scheme.eq_ignore_ascii_case("bearer")) {
        return None;
    }
    let token = token.trim();
    (!token.is_empty() && !token.contains(' ')).then_some(token)
}

async fn access_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let Some(value) = req.headers().get(header::AUTHORIZATION) else {
        return Ok(next.run(req).await);
    };

    let token = value
        .to_str()
        .ok()
        .and_then(extract_token)
        .ok_or(AppError::Unauthorized("Invalid token header."))?;

    let verified = match state.auth.verify(token) {
        Ok(verified) => verified,
        Err(err) => {
            tracing::warn!(error = %err, "access token verification failed");
            return Err(AppError::Unauthorized("Invalid token."));
        }
    };

    let Some(user) = state.repos.users.get(verified.user_id).await? else {
        tracing::warn!(
            user_id = verified.user_id,
            jti = %verified.jti,
            "token subject no longer exists"
        );
        return Err(AppError::Unauthorized("User inactive or deleted."));
    };

    let auth_ctx = AuthCtx::new(user.id, user.username);

    // middleware → extractor
    req.extensions_mut().insert(auth_ctx);

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::extract_token;

    #[test]
    fn token_and_bearer_schemes_are_accepted() {
        assert_eq!(extract_token("Token abc.def.ghi"), Some("abc.def.ghi"));
        assert_eq!(extract_token("Bearer abc"), Some("abc"));
        assert_eq!(extract_token("token abc"), Some("abc"));
    }

    #[test]
    fn malformed_headers_are_rejected() {
        assert_eq!(extract_token("Basic dXNlcjpwdw=="), None);
        assert_eq!(extract_token("Token"), None);
        assert_eq!(extract_token("Token "), None);
        assert_eq!(extract_token("Token a b"), None);
    }
}
