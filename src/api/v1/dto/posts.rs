/*
 * Responsibility
 * - Posts request/response DTOs
 * - author / image / pub_date / id are never read from the request body
 */
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::{Field, optional_text, pk_field, pk_reference, required_text, text_field};

/// Body of POST /posts and PUT /posts/{post_id}.
#[derive(Debug, Deserialize, Validate)]
pub struct PostRequest {
    #[serde(default, deserialize_with = "text_field")]
    #[validate(custom(function = "required_text"))]
    pub text: Field<String>,
    // Missing: keep, Null: no group, Value(id): group id
    #[serde(default, deserialize_with = "pk_field")]
    #[validate(custom(function = "pk_reference"))]
    pub group: Field<i64>,
}

impl PostRequest {
    pub fn normalized(mut self) -> Self {
        self.text = self.text.trimmed();
        self
    }
}

/// Body of PATCH /posts/{post_id}: every field optional.
#[derive(Debug, Deserialize, Validate)]
pub struct PostPatchRequest {
    #[serde(default, deserialize_with = "text_field")]
    #[validate(custom(function = "optional_text"))]
    pub text: Field<String>,
    #[serde(default, deserialize_with = "pk_field")]
    #[validate(custom(function = "pk_reference"))]
    pub group: Field<i64>,
}

impl PostPatchRequest {
    pub fn normalized(mut self) -> Self {
        self.text = self.text.trimmed();
        self
    }
}

#[derive(Debug, Serialize)]
pub struct PostResponse {
    pub id: i64,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub author: String, // username
    pub image: Option<String>, // absolute url
    pub group: Option<i64>,
}
