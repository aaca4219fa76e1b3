//! In-process test harness: the full v1 Router over the in-memory store.
#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    Router,
    body::Body,
    http::{Method, Request, StatusCode, header},
};
use serde_json::Value;
use tower::ServiceExt;

use yatube_api::app::api_router;
use yatube_api::repos::{Repos, memory::MemoryStore};
use yatube_api::services::auth::{TokenService, password::hash_password};
use yatube_api::services::media::MediaUrls;
use yatube_api::state::AppState;

pub const PASSWORD: &str = "correct horse";

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryStore>,
    pub tokens: Arc<TokenService>,
}

pub struct TestUser {
    pub id: i64,
    pub username: String,
    pub token: String,
}

pub struct TestResponse {
    pub status: StatusCode,
    pub headers: axum::http::HeaderMap,
    pub body: Value,
    pub raw: Vec<u8>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryStore::new());
        let tokens = Arc::new(TokenService::new("test-secret", "yatube-api", 3600, 0));
        let media = MediaUrls::new("http://testserver/media/").unwrap();
        let state = AppState::new(Repos::memory(store.clone()), tokens.clone(), media);

        Self {
            router: api_router(state),
            store,
            tokens,
        }
    }

    pub async fn user(&self, username: &str) -> TestUser {
        let hash = hash_password(PASSWORD).unwrap();
        let row = self.store.insert_user(username, &hash).await;
        TestUser {
            id: row.id,
            username: row.username,
            token: self.tokens.issue(row.id).unwrap(),
        }
    }

    pub async fn group(&self, slug: &str) -> i64 {
        self.store
            .insert_group(&format!("Group {slug}"), slug, "about")
            .await
            .id
    }

    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        user: Option<&TestUser>,
        body: Option<Value>,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Token {}", user.token));
        }
        let req = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };
        self.send(req).await
    }

    /// Body sent verbatim, with an optional content type.
    pub async fn raw(
        &self,
        method: Method,
        uri: &str,
        user: Option<&TestUser>,
        content_type: Option<&str>,
        body: &str,
    ) -> TestResponse {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(user) = user {
            builder = builder.header(header::AUTHORIZATION, format!("Token {}", user.token));
        }
        if let Some(content_type) = content_type {
            builder = builder.header(header::CONTENT_TYPE, content_type);
        }
        self.send(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    pub async fn send(&self, req: Request<Body>) -> TestResponse {
        let res = self.router.clone().oneshot(req).await.unwrap();
        let status = res.status();
        let headers = res.headers().clone();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX)
            .await
            .unwrap();
        let body = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        TestResponse {
            status,
            headers,
            body,
            raw: bytes.to_vec(),
        }
    }

    pub async fn get(&self, uri: &str) -> TestResponse {
        self.request(Method::GET, uri, None, None).await
    }

    pub async fn post_as(&self, user: &TestUser, text: &str) -> i64 {
        let res = self
            .request(
                Method::POST,
                "/api/v1/posts",
                Some(user),
                Some(serde_json::json!({ "text": text })),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
        res.body["id"].as_i64().unwrap()
    }

    pub async fn comment_as(&self, user: &TestUser, post_id: i64, text: &str) -> i64 {
        let res = self
            .request(
                Method::POST,
                &format!("/api/v1/posts/{post_id}/comments"),
                Some(user),
                Some(serde_json::json!({ "text": text })),
            )
            .await;
        assert_eq!(res.status, StatusCode::CREATED);
        res.body["id"].as_i64().unwrap()
    }
}
