use crate::models::UploadRequest;
use serde::Serialize;
use utoipa::ToSchema;

/// Maximum file size: 10 MiB
pub const MAX_FILE_SIZE: u64 = 10 * 1024 * 1024;

/// Longest sanitized filename, in bytes.
const MAX_FILENAME_LEN: usize = 255;

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ValidationRules {
    pub allowed_mimes: Vec<String>,
    pub max_file_size: u64,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self::new(MAX_FILE_SIZE)
    }
}

impl ValidationRules {
    pub fn new(max_file_size: u64) -> Self {
        Self {
            allowed_mimes: [mime::IMAGE_JPEG, mime::IMAGE_PNG, mime::APPLICATION_PDF]
                .iter()
                .map(|m| m.essence_str().to_string())
                .collect(),
            max_file_size,
        }
    }

    pub fn allows_mime(&self, content_type: &str) -> bool {
        let normalized = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_lowercase();

        self.allowed_mimes
            .iter()
            .any(|allowed| allowed == &normalized)
    }
}

/// Why an upload was turned away before reaching the object store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    MissingFile,
    InvalidType,
    InvalidSize,
}

impl RejectReason {
    pub fn message(self) -> &'static str {
        match self {
            RejectReason::MissingFile => "No file uploaded",
            RejectReason::InvalidType => "Invalid file type",
            RejectReason::InvalidSize => "Invalid file size",
        }
    }
}

impl std::fmt::Display for RejectReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationResult {
    Accepted,
    Rejected(RejectReason),
}

/// Checks presence, then MIME type, then size. The first failing check wins,
/// so an oversized file of a disallowed type is reported as `InvalidType`.
pub fn validate(file: Option<&UploadRequest>, rules: &ValidationRules) -> ValidationResult {
    let Some(file) = file else {
        return ValidationResult::Rejected(RejectReason::MissingFile);
    };

    if !rules.allows_mime(&file.mime_type) {
        return ValidationResult::Rejected(RejectReason::InvalidType);
    }

    if file.size_bytes > rules.max_file_size {
        return ValidationResult::Rejected(RejectReason::InvalidSize);
    }

    ValidationResult::Accepted
}

/// Sanitizes a client-supplied filename so it can be used as an opaque identifier.
/// Directory components, control characters and leading dots are removed and
/// reserved characters replaced. May return an empty string.
pub fn sanitize_filename(filename: &str) -> String {
    // Get only the last path component, whichever separator the client used
    let name = filename.rsplit(['/', '\\']).next().unwrap_or(filename);

    if name.len() != filename.len() || filename.contains("..") {
        tracing::debug!("Path components stripped from filename: {:?}", filename);
    }

    let sanitized: String = name
        .chars()
        .filter(|c| !c.is_control())
        .map(|c| match c {
            ':' | '*' | '?' | '"' | '<' | '>' | '|' | ';' => '_',
            c => c,
        })
        .collect();

    let sanitized = sanitized.trim().trim_start_matches('.').trim_start();

    // Limit length safely for UTF-8
    if sanitized.len() > MAX_FILENAME_LEN {
        let mut end = MAX_FILENAME_LEN;
        while !sanitized.is_char_boundary(end) {
            end -= 1;
        }
        sanitized[..end].to_string()
    } else {
        sanitized.to_string()
    }
}
