use crate::api::error::AppError;
use crate::models::UploadRequest;
use crate::utils::hash::StorageKey;
use crate::utils::validation::{RejectReason, ValidationRules};
use axum::{
    Extension, Json,
    extract::{
        Multipart, State,
        multipart::{MultipartError, MultipartRejection},
    },
    http::StatusCode,
};
use serde::Serialize;
use utoipa::ToSchema;

/// Multipart form accepted by `POST /upload`. Only the `file` part is read.
#[derive(ToSchema, Default)]
pub struct UploadForm {
    #[schema(value_type = String, format = Binary)]
    pub file: Option<UploadRequest>,
}

#[derive(Serialize, ToSchema)]
pub struct UploadResponse {
    pub message: String,
    /// Key the object was stored under
    #[serde(rename = "fileName")]
    #[schema(example = "5eb63bbbe01eeed093cb22bb8f5acdc3")]
    pub file_name: String,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    #[schema(example = "Invalid file type")]
    pub error: String,
}

fn multipart_error(e: MultipartError) -> AppError {
    if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::Rejected(RejectReason::InvalidSize)
    } else {
        AppError::BadRequest(e.body_text())
    }
}

/// Reads the first `file` part that carries a filename. The declared type is
/// checked before the body is buffered, so a disallowed type is reported as
/// such even when the body would overflow the size limit.
async fn read_upload_form(
    multipart: &mut Multipart,
    rules: &ValidationRules,
) -> Result<UploadForm, AppError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart.next_field().await.map_err(multipart_error)? {
        if field.name() != Some("file") || form.file.is_some() {
            continue;
        }
        // A plain form value named `file` is not an upload
        let Some(raw_filename) = field.file_name().map(str::to_string) else {
            continue;
        };

        let mime_type = field.content_type().unwrap_or_default().to_string();
        if !rules.allows_mime(&mime_type) {
            return Err(AppError::Rejected(RejectReason::InvalidType));
        }

        let content = field.bytes().await.map_err(multipart_error)?;
        form.file = Some(UploadRequest::new(raw_filename, mime_type, content));
    }

    Ok(form)
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = UploadForm, description = "File upload", content_type = "multipart/form-data"),
    responses(
        (status = 200, description = "File uploaded successfully", body = UploadResponse),
        (status = 400, description = "No file, disallowed type or file too large", body = ErrorResponse),
        (status = 500, description = "Object store write failed", body = ErrorResponse)
    ),
    tag = "files"
)]
pub async fn upload_file(
    State(state): State<crate::AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<(Extension<StorageKey>, Json<UploadResponse>), AppError> {
    let mut multipart = match multipart {
        Ok(multipart) => multipart,
        Err(e) => {
            tracing::debug!("Request carried no multipart body: {}", e);
            return Err(AppError::Rejected(RejectReason::MissingFile));
        }
    };

    let form = match read_upload_form(&mut multipart, state.upload_service.rules()).await {
        Ok(form) => form,
        Err(e) => {
            // Drain whatever is left so the client sees the response instead of a reset
            tracing::debug!("Upload failed early: {}. Consuming remaining stream...", e);
            while let Ok(Some(mut field)) = multipart.next_field().await {
                while let Ok(Some(_)) = field.chunk().await {}
            }
            return Err(e);
        }
    };

    let key = state.upload_service.upload(form.file).await?;

    Ok((
        Extension(key.clone()),
        Json(UploadResponse {
            message: "File uploaded successfully".to_string(),
            file_name: key.into_string(),
        }),
    ))
}
