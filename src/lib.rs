pub mod api;
pub mod config;
pub mod infrastructure;
pub mod models;
pub mod services;
pub mod utils;

use crate::config::UploadConfig;
use crate::services::storage::StorageService;
use crate::services::upload_service::UploadService;
use axum::{
    Router,
    extract::DefaultBodyLimit,
    middleware::from_fn,
    routing::{get, post},
};
use std::sync::Arc;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[derive(OpenApi)]
#[openapi(
    paths(
        api::handlers::upload::upload_file,
        api::handlers::health::health_check,
        api::handlers::health::get_validation_rules,
    ),
    components(
        schemas(
            api::handlers::upload::UploadForm,
            api::handlers::upload::UploadResponse,
            api::handlers::upload::ErrorResponse,
            api::handlers::health::HealthResponse,
            utils::validation::ValidationRules,
        )
    ),
    tags(
        (name = "files", description = "File upload endpoints"),
        (name = "system", description = "Health and configuration")
    )
)]
pub struct ApiDoc;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn StorageService>,
    pub upload_service: Arc<UploadService>,
    pub config: UploadConfig,
}

impl AppState {
    pub fn new(storage: Arc<dyn StorageService>, config: UploadConfig) -> Self {
        Self {
            upload_service: Arc::new(UploadService::new(storage.clone(), &config)),
            storage,
            config,
        }
    }
}

pub fn create_app(state: AppState) -> Router {
    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/health", get(api::handlers::health::health_check))
        .route(
            "/system/validation-rules",
            get(api::handlers::health::get_validation_rules),
        )
        .route(
            "/upload",
            post(api::handlers::upload::upload_file)
                .layer(DefaultBodyLimit::max(state.config.body_limit())),
        )
        .layer(from_fn(api::middleware::metrics::metrics_middleware))
        .layer(from_fn(api::middleware::request_id::request_id_middleware))
        .with_state(state)
}
