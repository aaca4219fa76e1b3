use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

// Errors returned by token issuance + verification.
#[derive(Debug, Error)]
pub enum TokenError {
    #[error("jwt error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("invalid 'sub' (expected a numeric user id)")]
    InvalidSubject,
    #[error("token lifetime does not fit in a timestamp")]
    TtlOutOfRange,
}

/// Access token (JWT) claims.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccessTokenClaims {
    pub iss: String,
    pub sub: String,
    pub iat: i64,
    pub exp: i64,
    pub jti: String,
}

/// What the middleware needs after a token has been verified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifiedAccessToken {
    pub user_id: i64,
    pub jti: String,
}

/// HS256 token issuer/verifier shared by the token endpoint and the access middleware.
///
/// - Key material is intentionally not printable via Debug.
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    issuer: String,
    ttl_seconds: u64,
}

impl std::fmt::Debug for TokenService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print key material
        f.debug_struct("TokenService")
            .field("issuer", &self.issuer)
            .field("ttl_seconds", &self.ttl_seconds)
            .finish()
    }
}

impl TokenService {
    pub fn new(secret: &str, issuer: &str, ttl_seconds: u64, leeway_seconds: u64) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[issuer]);
        validation.set_required_spec_claims(&["exp", "iss", "sub"]);
        validation.leeway = leeway_seconds;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer: issuer.to_string(),
            ttl_seconds,
        }
    }

    pub fn ttl_seconds(&self) -> u64 {
        self.ttl_seconds
    }

    /// Issue an access token for `user_id`.
    pub fn issue(&self, user_id: i64) -> Result<String, TokenError> {
        let now = chrono::Utc::now().timestamp();
        let exp = i64::try_from(self.ttl_seconds)
            .ok()
            .and_then(|ttl| now.checked_add(ttl))
            .ok_or(TokenError::TtlOutOfRange)?;
        let claims = AccessTokenClaims {
            iss: self.issuer.clone(),
            sub: user_id.to_string(),
            iat: now,
            exp,
            jti: Uuid::new_v4().to_string(),
        };
        self.sign(&claims)
    }

    fn sign(&self, claims: &AccessTokenClaims) -> Result<String, TokenError> {
        let mut header = Header::new(Algorithm::HS256);
        header.typ = Some("JWT".to_string());
        Ok(jsonwebtoken::encode(&header, claims, &self.encoding_key)?)
    }

    /// Verify signature, `iss` and `exp` (with leeway), then lift `sub` into a user id.
    pub fn verify(&self, token: &str) -> Result<VerifiedAccessToken, TokenError> {
        let data = jsonwebtoken::decode::<AccessTokenClaims>(
            token,
            &self.decoding_key,
            &self.validation,
        )?;
        let claims = data.claims;

        let user_id = claims
            .sub
            .parse::<i64>()
            .map_err(|_| TokenError::InvalidSubject)?;

        Ok(VerifiedAccessToken {
            user_id,
            jti: claims.jti,
        })
    }
}
