//! File input boundary — accepts one PDF and encodes it for transport.

use base64::{engine::general_purpose::STANDARD, Engine as _};
use thiserror::Error;

use crate::models::resume::UploadedFile;

pub const PDF_MIME_TYPE: &str = "application/pdf";

#[derive(Debug, Error)]
pub enum UploadError {
    #[error("Only PDF files are supported.")]
    UnsupportedType(String),

    #[error("The uploaded file is empty.")]
    Empty,

    #[error("The uploaded file is {size} bytes; the limit is {limit} bytes.")]
    TooLarge { size: usize, limit: usize },
}

/// Validates an uploaded document and base64-encodes its bytes.
/// Rejections leave no trace; callers only store the returned file.
pub fn encode_upload(
    name: &str,
    content_type: Option<&str>,
    bytes: &[u8],
    max_bytes: usize,
) -> Result<UploadedFile, UploadError> {
    let mime_type = content_type
        .and_then(|ct| ct.split(';').next())
        .map(|ct| ct.trim().to_ascii_lowercase())
        .unwrap_or_default();

    if mime_type != PDF_MIME_TYPE {
        return Err(UploadError::UnsupportedType(mime_type));
    }
    if bytes.is_empty() {
        return Err(UploadError::Empty);
    }
    if bytes.len() > max_bytes {
        return Err(UploadError::TooLarge {
            size: bytes.len(),
            limit: max_bytes,
        });
    }

    Ok(UploadedFile {
        name: name.to_string(),
        mime_type,
        data: STANDARD.encode(bytes),
        size_bytes: bytes.len(),
    })
}
