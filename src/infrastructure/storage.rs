use crate::config::StorageConfig;
use crate::services::storage::{S3StorageService, StorageService};
use aws_sdk_s3::config::Region;
use std::sync::Arc;
use tracing::{info, warn};

/// Builds the one S3 client shared by every request.
pub async fn setup_storage(config: &StorageConfig) -> Arc<S3StorageService> {
    info!(
        "☁️  S3 Storage: {} (Bucket: {}, Region: {})",
        config.endpoint_url.as_deref().unwrap_or("aws"),
        config.bucket,
        config.region
    );

    let mut loader = aws_config::from_env().region(Region::new(config.region.clone()));
    if let Some(endpoint_url) = &config.endpoint_url {
        loader = loader.endpoint_url(endpoint_url);
    }
    if let Some(credentials) = &config.credentials {
        loader = loader.credentials_provider(aws_sdk_s3::config::Credentials::new(
            credentials.access_key_id.clone(),
            credentials.secret_access_key.clone(),
            None,
            None,
            "static",
        ));
    }
    let aws_config = loader.load().await;

    let s3_config = aws_sdk_s3::config::Builder::from(&aws_config)
        .force_path_style(config.endpoint_url.is_some())
        .build();

    let storage = Arc::new(S3StorageService::new(
        aws_sdk_s3::Client::from_conf(s3_config),
        config.bucket.clone(),
    ));

    // The bucket is provisioned elsewhere; only report whether it is reachable
    match storage.ping().await {
        Ok(()) => info!("✅ Bucket '{}' is ready", storage.bucket()),
        Err(e) => warn!("⚠️  Bucket '{}' is not reachable yet: {:#}", storage.bucket(), e),
    }

    storage
}
