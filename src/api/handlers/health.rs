use crate::AppState;
use crate::utils::validation::ValidationRules;
use axum::{Json, extract::State, response::IntoResponse};
use serde::Serialize;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub storage: String,
    pub version: String,
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "System health status", body = HealthResponse)
    ),
    tag = "system"
)]
pub async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let storage_status = match state.storage.ping().await {
        Ok(()) => "connected",
        Err(e) => {
            tracing::warn!("Object store unreachable: {:#}", e);
            "unreachable"
        }
    };

    Json(HealthResponse {
        status: "ok".to_string(),
        storage: storage_status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

#[utoipa::path(
    get,
    path = "/system/validation-rules",
    responses(
        (status = 200, description = "Upload validation rules", body = ValidationRules)
    ),
    tag = "system"
)]
pub async fn get_validation_rules(State(state): State<AppState>) -> Json<ValidationRules> {
    Json(state.upload_service.rules().clone())
}
