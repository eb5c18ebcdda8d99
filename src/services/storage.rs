use anyhow::{Context, Result};
use async_trait::async_trait;
use aws_sdk_s3::Client;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use std::sync::Arc;
use std::time::Duration;

use crate::utils::hash::StorageKey;

#[async_trait]
pub trait StorageService: Send + Sync {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> Result<()>;
    /// Confirms the configured bucket is reachable.
    async fn ping(&self) -> Result<()>;
}

pub struct S3StorageService {
    client: Client,
    bucket: String,
}

impl S3StorageService {
    pub fn new(client: Client, bucket: String) -> Self {
        Self { client, bucket }
    }

    pub fn bucket(&self) -> &str {
        &self.bucket
    }
}

#[async_trait]
impl StorageService for S3StorageService {
    async fn put_object(&self, key: &str, body: Bytes, content_type: &str) -> Result<()> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .with_context(|| format!("PutObject {}/{}", self.bucket, key))?;
        Ok(())
    }

    async fn ping(&self) -> Result<()> {
        self.client
            .head_bucket()
            .bucket(&self.bucket)
            .send()
            .await
            .with_context(|| format!("HeadBucket {}", self.bucket))?;
        Ok(())
    }
}

/// Result of a single object store write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PutOutcome {
    Success,
    /// Operator-facing diagnostic, never returned to clients.
    Failure(String),
}

/// Single-attempt, time-bounded writes against a shared [`StorageService`].
#[derive(Clone)]
pub struct ObjectStoreGateway {
    storage: Arc<dyn StorageService>,
    timeout: Duration,
}

impl ObjectStoreGateway {
    pub fn new(storage: Arc<dyn StorageService>, timeout: Duration) -> Self {
        Self { storage, timeout }
    }

    pub async fn put_object(&self, key: &StorageKey, body: Bytes, content_type: &str) -> PutOutcome {
        let write = self.storage.put_object(key.as_str(), body, content_type);
        match tokio::time::timeout(self.timeout, write).await {
            Ok(Ok(())) => PutOutcome::Success,
            Ok(Err(e)) => PutOutcome::Failure(format!("{:#}", e)),
            Err(_) => PutOutcome::Failure(format!(
                "object store write for {} timed out after {:?}",
                key, self.timeout
            )),
        }
    }
}
