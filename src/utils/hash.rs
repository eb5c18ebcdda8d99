use serde::Serialize;
use std::fmt;

/// Object store key: 32 lowercase hex characters derived from a sanitized filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct StorageKey(String);

impl StorageKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }
}

impl AsRef<str> for StorageKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StorageKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Derives the storage key from the sanitized name only, never from content.
/// MD5 names objects here; it is not an integrity check.
pub fn derive_key(sanitized_name: &str) -> StorageKey {
    StorageKey(format!("{:x}", md5::compute(sanitized_name.as_bytes())))
}
