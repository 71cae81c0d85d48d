use axum::{
    extract::{multipart::Field, Multipart, State},
    http::StatusCode,
    Json,
};
use bytes::Bytes;
use tracing::{debug, info};
use uuid::Uuid;

use crate::editing::handlers::ReportSnapshotResponse;
use crate::errors::AppError;
use crate::extraction::upload::{validate_document, DocumentUpload, UploadError};
use crate::state::AppState;

/// The parsed multipart body of an extraction request.
pub struct ExtractionUpload {
    pub resume: DocumentUpload,
    pub job_description: Option<DocumentUpload>,
    /// Set when the client re-submits a known extraction, so its persisted
    /// edits are picked up instead of the fresh result.
    pub extraction_id: Option<Uuid>,
}

/// POST /api/v1/extractions
///
/// Multipart fields: `resume` (required), `jobDescription` (optional),
/// `extractionId` (optional).
pub async fn handle_extract(
    State(state): State<AppState>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<ReportSnapshotResponse>), AppError> {
    let _busy = state
        .extraction_busy
        .try_acquire()
        .ok_or_else(|| AppError::Conflict("An extraction is already in progress".into()))?;

    let upload = read_upload(multipart, state.config.max_upload_bytes).await?;
    let extraction_id = upload.extraction_id.unwrap_or_else(Uuid::new_v4);
    info!(
        %extraction_id,
        resume = %upload.resume.file_name,
        job_description = upload.job_description.as_ref().map(|d| d.file_name.as_str()),
        "Starting extraction"
    );

    let report = state
        .extractor
        .extract(&upload.resume, upload.job_description.as_ref())
        .await?;

    let snapshot = state.session.lock().await.open(extraction_id, report).await;
    Ok((StatusCode::CREATED, Json(snapshot.into())))
}

pub async fn read_upload(
    mut multipart: Multipart,
    max_bytes: usize,
) -> Result<ExtractionUpload, UploadError> {
    let mut resume = None;
    let mut job_description = None;
    let mut extraction_id = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Malformed(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            // An empty file input still posts a part; it counts as no file.
            Some("resume") => {
                let part = read_part(field).await?;
                if !part.is_blank() {
                    resume = Some(part.validate(max_bytes)?);
                }
            }
            Some("jobDescription") => {
                let part = read_part(field).await?;
                if !part.is_blank() {
                    job_description = Some(part.validate(max_bytes)?);
                }
            }
            Some("extractionId") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| UploadError::Malformed(e.to_string()))?;
                let id = Uuid::parse_str(text.trim())
                    .map_err(|_| UploadError::Malformed(format!("'{text}' is not an extraction id")))?;
                extraction_id = Some(id);
            }
            other => debug!(field = ?other, "Ignoring unknown upload field"),
        }
    }

    Ok(ExtractionUpload {
        resume: resume.ok_or(UploadError::MissingResume)?,
        job_description,
        extraction_id,
    })
}

struct FilePart {
    file_name: Option<String>,
    content_type: Option<String>,
    data: Bytes,
}

impl FilePart {
    fn is_blank(&self) -> bool {
        self.data.is_empty() && self.file_name.as_deref().map_or(true, str::is_empty)
    }

    fn validate(self, max_bytes: usize) -> Result<DocumentUpload, UploadError> {
        validate_document(
            self.file_name.as_deref(),
            self.content_type.as_deref(),
            self.data,
            max_bytes,
        )
    }
}

async fn read_part(field: Field<'_>) -> Result<FilePart, UploadError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = field.content_type().map(str::to_string);
    let data = field
        .bytes()
        .await
        .map_err(|e| UploadError::Malformed(e.to_string()))?;
    Ok(FilePart {
        file_name,
        content_type,
        data,
    })
}
