#![allow(dead_code)]

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::Value;
use tower::ServiceExt;
use userauth::{
    app::build_app,
    config::{AppConfig, JwtConfig, LogConfig, LogFormat, PasswordConfig},
    state::AppState,
    users::MemoryUserStore,
};

pub const SECRET: &str = "integration-secret";
pub const ISSUER: &str = "userauth-test";
pub const AUDIENCE: &str = "userauth-test-clients";

pub fn test_config() -> AppConfig {
    AppConfig {
        host: "127.0.0.1".into(),
        port: 0,
        log: LogConfig {
            filter: "off".into(),
            format: LogFormat::Pretty,
        },
        database: None,
        jwt: JwtConfig {
            secret: SECRET.into(),
            issuer: ISSUER.into(),
            audience: AUDIENCE.into(),
            ttl_minutes: 5,
        },
        // cheapest argon2id cost so the suite stays fast
        password: PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
    }
}

pub struct TestApp {
    pub router: Router,
    pub store: Arc<MemoryUserStore>,
}

impl TestApp {
    pub fn new() -> Self {
        let store = Arc::new(MemoryUserStore::new());
        let state = AppState::from_parts(&test_config(), store.clone()).expect("test state builds");
        Self {
            router: build_app(state),
            store,
        }
    }

    pub async fn send(&self, req: Request<Body>) -> (StatusCode, Value) {
        let res = self.router.clone().oneshot(req).await.expect("router is infallible");
        let status = res.status();
        let bytes = to_bytes(res.into_body(), usize::MAX).await.expect("read body");
        let body = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, body)
    }

    pub async fn post_json(&self, uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(req).await
    }

    pub async fn me(&self, authorization: Option<&str>) -> (StatusCode, Value) {
        let mut req = Request::builder().method("GET").uri("/api/auth/me");
        if let Some(value) = authorization {
            req = req.header(header::AUTHORIZATION, value);
        }
        self.send(req.body(Body::empty()).unwrap()).await
    }
}
