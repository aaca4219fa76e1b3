/*
 * Responsibility
 * - Comments request/response DTOs
 * - author / post come from the caller and the URL, never from the body
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Field, optional_text, required_text, text_field};

/// Body of POST and PUT on comments.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentRequest {
    #[serde(default, deserialize_with = "text_field")]
    #[validate(custom(function = "required_text"))]
    pub text: Field<String>,
}

impl CommentRequest {
    pub fn normalized(mut self) -> Self {
        self.text = self.text.trimmed();
        self
    }
}

/// Body of PATCH on comments.
#[derive(Debug, Deserialize, Validate)]
pub struct CommentPatchRequest {
    #[serde(default, deserialize_with = "text_field")]
    #[validate(custom(function = "optional_text"))]
    pub text: Field<String>,
}

impl CommentPatchRequest {
    pub fn normalized(mut self) -> Self {
        self.text = self.text.trimmed();
        self
    }
}

#[derive(Debug, Serialize)]
pub struct CommentResponse {
    pub id: i64,
    pub author: String, // username
    pub text: String,
    pub post: i64,
    pub created: DateTime<Utc>,
}
