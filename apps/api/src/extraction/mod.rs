//! Résumé extraction: turns an uploaded resume (and optional job description)
//! into a structured `Report` through an external generative model.
//!
//! Nothing here retries. Every failure is returned as a distinguishable
//! `ExtractionError` so the caller can tell the user what to fix.

pub mod client;
pub mod handlers;
pub mod prompts;
pub mod schema;
pub mod upload;

use async_trait::async_trait;
use thiserror::Error;

use crate::extraction::upload::DocumentUpload;
use crate::models::Report;

pub use client::GeminiClient;

#[derive(Debug, Error)]
pub enum ExtractionError {
    #[error("GEMINI_API_KEY is not configured")]
    MissingCredential,

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Received an empty response from the API")]
    EmptyResponse,

    #[error("Response is not a valid report: {0}")]
    BadFormat(String),
}

/// Produces a report from a resume and an optional job description.
#[async_trait]
pub trait ReportExtractor: Send + Sync {
    async fn extract(
        &self,
        resume: &DocumentUpload,
        job_description: Option<&DocumentUpload>,
    ) -> Result<Report, ExtractionError>;
}
