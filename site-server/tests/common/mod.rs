//! Shared helpers for the HTTP-level tests

#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use http::{Method, Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use site_server::auth::ADMIN_ROLE;
use site_server::{Config, ServerState};
use tower::ServiceExt;

pub const SECRET: &str = "integration-test-secret-0123456789abcdef";

pub struct TestApp {
    pub app: Router,
    pub state: ServerState,
}

impl TestApp {
    pub async fn new() -> Self {
        let config = Config::for_tests(SECRET);
        let state = ServerState::initialize(&config)
            .await
            .expect("initialize state");
        let app = site_server::api::build_app(&state);
        Self { app, state }
    }

    pub fn admin_token(&self) -> String {
        self.token_with_role(ADMIN_ROLE)
    }

    pub fn token_with_role(&self, role: &str) -> String {
        self.state
            .get_jwt_service()
            .generate_token("1", "host", role)
            .expect("generate token")
    }

    /// Send a request and return the status plus the parsed JSON body
    pub async fn send(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .expect("build request"),
            None => builder.body(Body::empty()).expect("build request"),
        };

        let response = self
            .app
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");
        let status = response.status();
        let bytes = response
            .into_body()
            .collect()
            .await
            .expect("read body")
            .to_bytes();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("json body")
        };
        (status, json)
    }
}
