use bytes::Bytes;

/// A single file received on `POST /upload`, owned by the handler for the
/// lifetime of the request.
#[derive(Debug, Clone)]
pub struct UploadRequest {
    pub raw_filename: String,
    pub mime_type: String,
    pub size_bytes: u64,
    pub content: Bytes,
}

impl UploadRequest {
    pub fn new(
        raw_filename: impl Into<String>,
        mime_type: impl Into<String>,
        content: Bytes,
    ) -> Self {
        Self {
            raw_filename: raw_filename.into(),
            mime_type: mime_type.into(),
            size_bytes: content.len() as u64,
            content,
        }
    }
}
