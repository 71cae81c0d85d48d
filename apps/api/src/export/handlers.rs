use anyhow::Context;
use axum::{
    extract::State,
    http::{header, HeaderMap, HeaderName, HeaderValue},
    response::IntoResponse,
};
use tracing::info;

use crate::editing::session::SessionSnapshot;
use crate::errors::AppError;
use crate::export::doc::{render_doc, DOC_CONTENT_TYPE};
use crate::export::{doc_filename, pdf_filename, render_pdf};
use crate::render::view::render_report;
use crate::state::{AppState, BusyGuard};

const PDF_CONTENT_TYPE: &str = "application/pdf";
const PAGE_COUNT_HEADER: HeaderName = HeaderName::from_static("x-page-count");

#[derive(Clone, Copy)]
enum Disposition {
    Attachment,
    Inline,
}

impl Disposition {
    fn as_str(self) -> &'static str {
        match self {
            Disposition::Attachment => "attachment",
            Disposition::Inline => "inline",
        }
    }
}

/// GET /api/v1/report/export/pdf
pub async fn handle_export_pdf(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    export_pdf(&state, Disposition::Attachment).await
}

/// GET /api/v1/report/export/print
///
/// Same document as the download, served inline for the browser's own viewer.
pub async fn handle_export_print(
    State(state): State<AppState>,
) -> Result<impl IntoResponse, AppError> {
    export_pdf(&state, Disposition::Inline).await
}

/// GET /api/v1/report/export/doc
pub async fn handle_export_doc(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let (_busy, snapshot) = begin_export(&state).await?;
    let filename = doc_filename(&snapshot.report);
    let body = render_doc(&snapshot.report)?;
    info!(extraction_id = %snapshot.extraction_id, bytes = body.len(), "Rendered DOC export");

    let headers = artifact_headers(DOC_CONTENT_TYPE, Disposition::Attachment, &filename)?;
    Ok((headers, body))
}

async fn export_pdf(state: &AppState, disposition: Disposition) -> Result<impl IntoResponse, AppError> {
    let (_busy, snapshot) = begin_export(state).await?;
    let filename = pdf_filename(&snapshot.report);
    let title = filename.trim_end_matches(".pdf");

    let mut view = render_report(&snapshot.report);
    let artifact = render_pdf(&mut view, &state.export, title).await?;

    let mut headers = artifact_headers(PDF_CONTENT_TYPE, disposition, &filename)?;
    headers.insert(PAGE_COUNT_HEADER, HeaderValue::from(artifact.page_count));
    Ok((headers, artifact.bytes))
}

/// Claims the export flag and takes a copy of the current report. Edits made
/// after this point do not reach the running export.
async fn begin_export(state: &AppState) -> Result<(BusyGuard, SessionSnapshot), AppError> {
    let busy = state
        .export_busy
        .try_acquire()
        .ok_or_else(|| AppError::Conflict("An export is already in progress".into()))?;

    let snapshot = state
        .session
        .lock()
        .await
        .current()
        .cloned()
        .ok_or_else(|| AppError::NotFound("No report is loaded; upload a resume first".into()))?;

    Ok((busy, snapshot))
}

fn artifact_headers(
    content_type: &'static str,
    disposition: Disposition,
    filename: &str,
) -> Result<HeaderMap, AppError> {
    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(content_type));
    let value = content_disposition(disposition, filename);
    headers.insert(
        header::CONTENT_DISPOSITION,
        HeaderValue::try_from(value).context("building Content-Disposition")?,
    );
    Ok(headers)
}

/// Quoted ASCII `filename` for old clients plus an RFC 5987 `filename*` carrying
/// the exact UTF-8 name.
fn content_disposition(disposition: Disposition, filename: &str) -> String {
    let fallback: String = filename
        .chars()
        .map(|c| match c {
            ' '..='~' if c != '"' && c != '\\' => c,
            _ => '_',
        })
        .collect();
    format!(
        "{}; filename=\"{fallback}\"; filename*=UTF-8''{}",
        disposition.as_str(),
        percent_encode(filename)
    )
}

fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                out.push(byte as char)
            }
            _ => out.push_str(&format!("%{byte:02X}")),
        }
    }
    out
}
