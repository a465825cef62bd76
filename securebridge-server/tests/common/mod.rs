#![allow(dead_code)]

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use http_body_util::BodyExt;
use securebridge_crypto::{KeyManager, SubmissionPayload, SubmissionSealer};
use securebridge_server::{AppState, routes};
use securebridge_storage::MemoryRecordStore;
use std::sync::{Arc, LazyLock};
use tower::ServiceExt;

static KEYS: LazyLock<Arc<KeyManager>> =
    LazyLock::new(|| Arc::new(KeyManager::generate().expect("key generation must succeed")));

pub struct TestApp {
    pub router: Router,
    pub store: MemoryRecordStore,
}

impl TestApp {
    pub fn new() -> Self {
        let store = MemoryRecordStore::new();
        let state = AppState::from_parts(Arc::clone(&KEYS), Arc::new(store.clone()));
        Self {
            router: routes::router(state),
            store,
        }
    }

    pub async fn get(&self, uri: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
        self.send(request).await
    }

    pub async fn post_json(&self, uri: &str, body: serde_json::Value) -> (StatusCode, serde_json::Value) {
        let request = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, serde_json::Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let json = serde_json::from_slice(&bytes).unwrap_or(serde_json::Value::Null);
        (status, json)
    }

    /// Fetches the public key over HTTP and seals `identifier` with it, the
    /// way a browser client would.
    pub async fn seal(&self, identifier: &str) -> SubmissionPayload {
        let (status, body) = self.get("/public-key").await;
        assert_eq!(status, StatusCode::OK);
        let pem = body["public_key"].as_str().expect("public_key must be a string");
        SubmissionSealer::from_public_key_pem(pem)
            .unwrap()
            .seal(identifier)
            .unwrap()
    }
}
