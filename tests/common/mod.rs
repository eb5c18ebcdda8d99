#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use bytes::Bytes;
use http_body_util::BodyExt;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use tower::ServiceExt;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};
use upload_gateway::config::UploadConfig;
use upload_gateway::services::storage::StorageService;
use upload_gateway::{AppState, create_app};

pub const BOUNDARY: &str = "---------------------------123456789012345678901234567";

#[derive(Debug, Clone, PartialEq)]
pub struct PutCall {
    pub key: String,
    pub body: Bytes,
    pub content_type: String,
}

/// In-memory stand-in for S3 that records every write.
#[derive(Default)]
pub struct MockStorageService {
    pub objects: Mutex<HashMap<String, (Bytes, String)>>,
    pub calls: Mutex<Vec<PutCall>>,
    pub put_count: AtomicUsize,
    pub fail_puts: AtomicBool,
    pub unreachable: AtomicBool,
}

impl MockStorageService {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn puts(&self) -> usize {
        self.put_count.load(Ordering::SeqCst)
    }

    pub fn object(&self, key: &str) -> Option<(Bytes, String)> {
        self.objects.lock().unwrap().get(key).cloned()
    }
}

#[async_trait]
impl StorageService for MockStorageService {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> anyhow::Result<()> {
        self.put_count.fetch_add(1, Ordering::SeqCst);
        self.calls.lock().unwrap().push(PutCall {
            key: key.to_string(),
            body: body.clone(),
            content_type: content_type.to_string(),
        });

        if self.fail_puts.load(Ordering::SeqCst) {
            return Err(anyhow::anyhow!("dispatch failure: connection refused (os error 111)"));
        }

        self.objects
            .lock()
            .unwrap()
            .insert(key.to_string(), (body, content_type.to_string()));
        Ok(())
    }

    async fn ping(&self) -> anyhow::Result<()> {
        if self.unreachable.load(Ordering::SeqCst) {
            Err(anyhow::anyhow!("HeadBucket uploads: timed out"))
        } else {
            Ok(())
        }
    }
}

pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(EnvFilter::new("upload_gateway=debug"))
        .with(fmt::layer().with_test_writer())
        .try_init();
}

pub fn setup_app(storage: Arc<MockStorageService>) -> Router {
    init_tracing();
    create_app(AppState::new(storage, UploadConfig::default()))
}

/// Appends one multipart file part.
pub fn file_part(body: &mut Vec<u8>, field: &str, filename: &str, content_type: &str, content: &[u8]) {
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
            Content-Disposition: form-data; name=\"{field}\"; filename=\"{filename}\"\r\n\
            Content-Type: {content_type}\r\n\r\n"
        )
        .as_bytes(),
    );
    body.extend_from_slice(content);
    body.extend_from_slice(b"\r\n");
}

/// Appends one plain multipart form field.
pub fn text_part(body: &mut Vec<u8>, field: &str, value: &str) {
    body.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\n\
            Content-Disposition: form-data; name=\"{field}\"\r\n\r\n\
            {value}\r\n"
        )
        .as_bytes(),
    );
}

pub fn finish(mut body: Vec<u8>) -> Vec<u8> {
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub fn single_file(filename: &str, content_type: &str, content: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    file_part(&mut body, "file", filename, content_type, content);
    finish(body)
}

pub async fn post_upload(app: &Router, body: Vec<u8>) -> Response<Body> {
    app.clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/upload")
                .header(
                    "Content-Type",
                    format!("multipart/form-data; boundary={}", BOUNDARY),
                )
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap()
}

pub async fn get(app: &Router, uri: &str) -> Response<Body> {
    app.clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn json_body(response: Response<Body>) -> Value {
    let body = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&body).unwrap()
}
