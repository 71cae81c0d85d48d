use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::editing::ops::EditError;
use crate::export::ExportError;
use crate::extraction::upload::UploadError;
use crate::extraction::ExtractionError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
/// Every variant is turned into a message the user can act on; internal detail
/// is logged, never returned.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Upload error: {0}")]
    Upload(#[from] UploadError),

    #[error("Extraction error: {0}")]
    Extraction(#[from] ExtractionError),

    #[error("Edit error: {0}")]
    Edit(#[from] EditError),

    #[error("Export error: {0}")]
    Export(#[from] ExportError),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    fn parts(&self) -> (StatusCode, &'static str, String) {
        match self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, "NOT_FOUND", msg.clone()),
            AppError::Conflict(msg) => (StatusCode::CONFLICT, "BUSY", msg.clone()),
            AppError::Upload(e) => match e {
                UploadError::TooLarge { .. } => {
                    (StatusCode::PAYLOAD_TOO_LARGE, "FILE_TOO_LARGE", e.to_string())
                }
                UploadError::UnsupportedType(_) => (
                    StatusCode::UNSUPPORTED_MEDIA_TYPE,
                    "UNSUPPORTED_FILE_TYPE",
                    e.to_string(),
                ),
                _ => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
            },
            AppError::Extraction(e) => extraction_parts(e),
            AppError::Edit(e) => match e {
                EditError::NoReport => (StatusCode::NOT_FOUND, "NO_REPORT", e.to_string()),
                EditError::IndexOutOfRange { .. } => {
                    (StatusCode::NOT_FOUND, "NOT_FOUND", e.to_string())
                }
                _ => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", e.to_string()),
            },
            AppError::Export(e) => match e {
                ExportError::MissingRegion(region) => {
                    tracing::error!("Export aborted, missing region: {region}");
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "EXPORT_UNAVAILABLE",
                        "The report could not be prepared for export".to_string(),
                    )
                }
                ExportError::BandsExceedPage { .. } => {
                    tracing::error!("Export aborted: {e}");
                    (
                        StatusCode::UNPROCESSABLE_ENTITY,
                        "EXPORT_LAYOUT",
                        "The report header and footer do not fit on the page".to_string(),
                    )
                }
                ExportError::Capture(msg) => {
                    tracing::error!("Export failed: {msg}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "EXPORT_FAILED",
                        "Sorry, there was an error creating the PDF report".to_string(),
                    )
                }
                ExportError::Template(_) => {
                    tracing::error!("Export failed: {e}");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        "EXPORT_FAILED",
                        "Sorry, there was an error creating the document".to_string(),
                    )
                }
            },
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        }
    }
}

fn extraction_parts(e: &ExtractionError) -> (StatusCode, &'static str, String) {
    match e {
        ExtractionError::MissingCredential => (
            StatusCode::SERVICE_UNAVAILABLE,
            "MISSING_CREDENTIAL",
            "The extraction service is not configured; set GEMINI_API_KEY".to_string(),
        ),
        ExtractionError::RateLimited(msg) => {
            tracing::warn!("Extraction rate limited: {msg}");
            (
                StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                "The AI service is receiving too many requests. Please wait a moment and try again"
                    .to_string(),
            )
        }
        ExtractionError::PayloadTooLarge(msg) => {
            tracing::warn!("Extraction payload rejected: {msg}");
            (
                StatusCode::PAYLOAD_TOO_LARGE,
                "PAYLOAD_TOO_LARGE",
                "The documents are too large for the AI service. Please upload smaller files"
                    .to_string(),
            )
        }
        ExtractionError::EmptyResponse => (
            StatusCode::BAD_GATEWAY,
            "EMPTY_RESPONSE",
            "Received an empty response from the AI service. Please try again".to_string(),
        ),
        ExtractionError::BadFormat(msg) => {
            tracing::error!("Extraction response rejected: {msg}");
            (
                StatusCode::BAD_GATEWAY,
                "BAD_FORMAT",
                "The AI returned an invalid data format. Please try again".to_string(),
            )
        }
        ExtractionError::Http(_) | ExtractionError::Api { .. } => {
            tracing::error!("Extraction error: {e}");
            (
                StatusCode::BAD_GATEWAY,
                "EXTRACTION_FAILED",
                "Failed to analyze the document. Please try again".to_string(),
            )
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();

        let body = Json(json!({
            "error": {
                "code": code,
                "message": message
            }
        }));

        (status, body).into_response()
    }
}
