// src/models/upload.rs

use serde::Serialize;

/// File received from an admin upload form
#[derive(Debug, Clone, Serialize)]
pub struct UploadFile {
    /// Original file name as sent by the browser
    pub name: String,
    pub content_type: String,
    #[serde(skip)]
    pub bytes: Vec<u8>,
}

impl UploadFile {
    pub fn new(name: &str, content_type: Option<&str>, bytes: Vec<u8>) -> Self {
        Self {
            name: name.to_string(),
            content_type: content_type
                .filter(|ct| !ct.is_empty())
                .unwrap_or("application/octet-stream")
                .to_string(),
            bytes,
        }
    }

    /// Browsers send an empty, nameless part for an untouched file input
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty() && self.name.is_empty()
    }
}
