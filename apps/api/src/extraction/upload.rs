//! Validation of uploaded resume and job-description documents.
//!
//! Runs before any network call: a rejected upload never reaches the extractor.

use bytes::Bytes;
use thiserror::Error;

pub const PDF: &str = "application/pdf";
pub const MS_WORD: &str = "application/msword";
pub const WORD_OPENXML: &str =
    "application/vnd.openxmlformats-officedocument.wordprocessingml.document";

/// Accepted file extensions and the MIME type each one implies.
const ACCEPTED: [(&str, &str); 3] = [("pdf", PDF), ("doc", MS_WORD), ("docx", WORD_OPENXML)];

/// Default per-file limit (10 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 10 * 1024 * 1024;

#[derive(Debug, Error, PartialEq)]
pub enum UploadError {
    #[error("Please select a resume to analyze")]
    MissingResume,

    #[error("'{0}' is not a valid PDF or Word document")]
    UnsupportedType(String),

    #[error("'{0}' is empty")]
    Empty(String),

    #[error("'{name}' is {size} bytes; files must be under {limit} bytes")]
    TooLarge {
        name: String,
        size: usize,
        limit: usize,
    },

    #[error("Malformed upload: {0}")]
    Malformed(String),
}

/// A validated document ready to be sent upstream.
#[derive(Debug, Clone)]
pub struct DocumentUpload {
    pub file_name: String,
    pub mime_type: &'static str,
    pub data: Bytes,
}

/// Accepts PDF, legacy Word and Word OpenXML documents, by declared MIME type
/// first and file extension second.
pub fn validate_document(
    file_name: Option<&str>,
    content_type: Option<&str>,
    data: Bytes,
    max_bytes: usize,
) -> Result<DocumentUpload, UploadError> {
    let file_name = file_name.unwrap_or("upload").to_string();
    let mime_type = content_type
        .and_then(accepted_mime)
        .or_else(|| mime_from_extension(&file_name))
        .ok_or_else(|| UploadError::UnsupportedType(file_name.clone()))?;

    if data.is_empty() {
        return Err(UploadError::Empty(file_name));
    }
    if data.len() > max_bytes {
        return Err(UploadError::TooLarge {
            name: file_name,
            size: data.len(),
            limit: max_bytes,
        });
    }

    Ok(DocumentUpload {
        file_name,
        mime_type,
        data,
    })
}

fn accepted_mime(content_type: &str) -> Option<&'static str> {
    // Drop parameters such as `; charset=binary`.
    let essence = content_type.split(';').next()?.trim();
    ACCEPTED
        .iter()
        .map(|(_, mime)| *mime)
        .find(|mime| mime.eq_ignore_ascii_case(essence))
}

fn mime_from_extension(file_name: &str) -> Option<&'static str> {
    let (_, ext) = file_name.rsplit_once('.')?;
    ACCEPTED
        .iter()
        .find(|(accepted, _)| accepted.eq_ignore_ascii_case(ext))
        .map(|(_, mime)| *mime)
}
