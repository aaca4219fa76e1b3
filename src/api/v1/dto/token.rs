use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Field, required_text, text_field};

/// Body of POST /api-token-auth. The password is taken verbatim (no trimming).
#[derive(Debug, Deserialize, Validate)]
pub struct TokenRequest {
    #[serde(default, deserialize_with = "text_field")]
    #[validate(custom(function = "required_text"))]
    pub username: Field<String>,
    #[serde(default, deserialize_with = "text_field")]
    #[validate(custom(function = "required_text"))]
    pub password: Field<String>,
}

impl TokenRequest {
    pub fn normalized(mut self) -> Self {
        self.username = self.username.trimmed();
        self
    }
}

#[derive(Debug, Serialize)]
pub struct TokenResponse {
    pub token: String,
}
