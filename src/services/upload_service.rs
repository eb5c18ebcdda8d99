use crate::config::UploadConfig;
use crate::models::UploadRequest;
use crate::services::storage::{ObjectStoreGateway, PutOutcome, StorageService};
use crate::utils::hash::{StorageKey, derive_key};
use crate::utils::validation::{
    RejectReason, ValidationResult, ValidationRules, sanitize_filename, validate,
};
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info};

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("Upload rejected: {0}")]
    Rejected(RejectReason),

    #[error("Object store write failed: {0}")]
    StoreFailed(String),
}

/// Runs validate → sanitize → derive key → store for one upload.
/// Nothing touches the network until validation has passed.
pub struct UploadService {
    gateway: ObjectStoreGateway,
    rules: ValidationRules,
}

impl UploadService {
    pub fn new(storage: Arc<dyn StorageService>, config: &UploadConfig) -> Self {
        Self {
            gateway: ObjectStoreGateway::new(storage, config.store_timeout),
            rules: config.validation_rules(),
        }
    }

    pub fn rules(&self) -> &ValidationRules {
        &self.rules
    }

    pub async fn upload(&self, file: Option<UploadRequest>) -> Result<StorageKey, UploadError> {
        let file = match (validate(file.as_ref(), &self.rules), file) {
            (ValidationResult::Accepted, Some(file)) => file,
            (ValidationResult::Rejected(reason), _) => {
                debug!("Upload rejected: {}", reason);
                return Err(UploadError::Rejected(reason));
            }
            (ValidationResult::Accepted, None) => {
                return Err(UploadError::Rejected(RejectReason::MissingFile));
            }
        };

        let sanitized = sanitize_filename(&file.raw_filename);
        let key = derive_key(&sanitized);
        debug!(
            "Derived key {} for {:?} (sanitized {:?})",
            key, file.raw_filename, sanitized
        );

        match self
            .gateway
            .put_object(&key, file.content, &file.mime_type)
            .await
        {
            PutOutcome::Success => {
                info!(
                    key = %key,
                    size = file.size_bytes,
                    content_type = %file.mime_type,
                    "✅ Stored upload"
                );
                Ok(key)
            }
            PutOutcome::Failure(detail) => {
                error!(key = %key, detail = %detail, "❌ Failed to store upload");
                Err(UploadError::StoreFailed(detail))
            }
        }
    }
}
