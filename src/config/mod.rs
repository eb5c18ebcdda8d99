use anyhow::{Context, Result};
use std::env;
use std::time::Duration;

use crate::utils::validation::{MAX_FILE_SIZE, ValidationRules};

/// Upload limits and store-call behaviour
#[derive(Debug, Clone)]
pub struct UploadConfig {
    /// Maximum file size in bytes (default: 10 MiB)
    pub max_file_size: u64,

    /// Upper bound on a single object store write (default: 30 s)
    pub store_timeout: Duration,
}

impl Default for UploadConfig {
    fn default() -> Self {
        Self {
            max_file_size: MAX_FILE_SIZE,
            store_timeout: Duration::from_secs(30),
        }
    }
}

impl UploadConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            store_timeout: env::var("STORE_TIMEOUT_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.store_timeout),
        }
    }

    pub fn validation_rules(&self) -> ValidationRules {
        ValidationRules::new(self.max_file_size)
    }

    /// Request body limit for `/upload`. Leaves room for multipart framing so
    /// slightly oversized files still reach the validator.
    pub fn body_limit(&self) -> usize {
        usize::try_from(self.max_file_size)
            .unwrap_or(usize::MAX)
            .saturating_add(10 * 1024 * 1024)
    }
}

/// Static access key pair for the object store
#[derive(Clone)]
pub struct StorageCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
}

impl std::fmt::Debug for StorageCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .finish()
    }
}

/// Object store location and credentials
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub bucket: String,
    pub region: String,
    /// Custom endpoint for S3-compatible stores such as MinIO
    pub endpoint_url: Option<String>,
    /// Falls back to the AWS default credential chain when unset
    pub credentials: Option<StorageCredentials>,
}

impl StorageConfig {
    pub const DEFAULT_REGION: &'static str = "us-east-1";

    pub fn new(bucket: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            region: Self::DEFAULT_REGION.to_string(),
            endpoint_url: None,
            credentials: None,
        }
    }

    /// Load configuration from environment variables. `S3_BUCKET_NAME` is required.
    pub fn from_env() -> Result<Self> {
        let bucket = non_empty_var("S3_BUCKET_NAME").context("S3_BUCKET_NAME must be set")?;

        let credentials = match (
            non_empty_var("AWS_ACCESS_KEY_ID"),
            non_empty_var("AWS_SECRET_ACCESS_KEY"),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StorageCredentials {
                access_key_id,
                secret_access_key,
            }),
            (None, None) => None,
            _ => anyhow::bail!(
                "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together"
            ),
        };

        Ok(Self {
            bucket,
            region: non_empty_var("S3_REGION").unwrap_or_else(|| Self::DEFAULT_REGION.to_string()),
            endpoint_url: non_empty_var("S3_ENDPOINT"),
            credentials,
        })
    }
}

fn non_empty_var(key: &str) -> Option<String> {
    env::var(key).ok().filter(|v| !v.trim().is_empty())
}
