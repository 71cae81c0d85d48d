use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::editing::ops::{ListItem, ReportList, ScalarField, NEW_DETAIL};
use crate::editing::session::SessionSnapshot;
use crate::errors::AppError;
use crate::models::Report;
use crate::state::AppState;

/// Wire form of a session snapshot.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportSnapshotResponse {
    pub extraction_id: Uuid,
    pub revision: u64,
    pub report: Report,
}

impl From<SessionSnapshot> for ReportSnapshotResponse {
    fn from(snapshot: SessionSnapshot) -> Self {
        Self {
            extraction_id: snapshot.extraction_id,
            revision: snapshot.revision,
            report: Report::clone(&snapshot.report),
        }
    }
}

#[derive(Deserialize)]
pub struct TextValue {
    pub value: String,
}

#[derive(Deserialize, Default)]
pub struct OptionalTextValue {
    pub value: Option<String>,
}

type SnapshotResult = Result<Json<ReportSnapshotResponse>, AppError>;

/// GET /api/v1/report
pub async fn handle_get_report(State(state): State<AppState>) -> SnapshotResult {
    let session = state.session.lock().await;
    let snapshot = session
        .current()
        .cloned()
        .ok_or_else(|| AppError::NotFound("No report is loaded; upload a resume first".into()))?;
    Ok(Json(snapshot.into()))
}

/// DELETE /api/v1/report
pub async fn handle_reset(State(state): State<AppState>) -> StatusCode {
    state.session.lock().await.reset().await;
    StatusCode::NO_CONTENT
}

/// PUT /api/v1/report/fields/:field
pub async fn handle_set_field(
    State(state): State<AppState>,
    Path(field): Path<ScalarField>,
    Json(body): Json<TextValue>,
) -> SnapshotResult {
    let snapshot = state
        .session
        .lock()
        .await
        .set_field(field, body.value)
        .await?;
    Ok(Json(snapshot.into()))
}

/// PUT /api/v1/report/lists/:list/:index
pub async fn handle_upsert_list_item(
    State(state): State<AppState>,
    Path((list, index)): Path<(ReportList, usize)>,
    Json(body): Json<Value>,
) -> SnapshotResult {
    let item = ListItem::from_json(list, body)?;
    let snapshot = state
        .session
        .lock()
        .await
        .upsert_list_item(list, index, item)
        .await?;
    Ok(Json(snapshot.into()))
}

/// POST /api/v1/report/lists/:list
///
/// Without a body the list's placeholder item is appended, as the "Add …"
/// controls do.
pub async fn handle_append_list_item(
    State(state): State<AppState>,
    Path(list): Path<ReportList>,
    body: Option<Json<Value>>,
) -> Result<(StatusCode, Json<ReportSnapshotResponse>), AppError> {
    let item = match body {
        Some(Json(value)) => ListItem::from_json(list, value)?,
        None => ListItem::placeholder(list)?,
    };
    let snapshot = state.session.lock().await.append_list_item(item).await?;
    Ok((StatusCode::CREATED, Json(snapshot.into())))
}

/// DELETE /api/v1/report/lists/:list/:index
pub async fn handle_remove_list_item(
    State(state): State<AppState>,
    Path((list, index)): Path<(ReportList, usize)>,
) -> SnapshotResult {
    let snapshot = state
        .session
        .lock()
        .await
        .remove_list_item(list, index)
        .await?;
    Ok(Json(snapshot.into()))
}

/// PUT /api/v1/report/experience/:index/details/:detail
pub async fn handle_set_detail(
    State(state): State<AppState>,
    Path((index, detail)): Path<(usize, usize)>,
    Json(body): Json<TextValue>,
) -> SnapshotResult {
    let snapshot = state
        .session
        .lock()
        .await
        .set_detail(index, detail, body.value)
        .await?;
    Ok(Json(snapshot.into()))
}

/// POST /api/v1/report/experience/:index/details
pub async fn handle_append_detail(
    State(state): State<AppState>,
    Path(index): Path<usize>,
    body: Option<Json<OptionalTextValue>>,
) -> Result<(StatusCode, Json<ReportSnapshotResponse>), AppError> {
    let value = body
        .and_then(|Json(b)| b.value)
        .unwrap_or_else(|| NEW_DETAIL.to_string());
    let snapshot = state
        .session
        .lock()
        .await
        .append_detail(index, value)
        .await?;
    Ok((StatusCode::CREATED, Json(snapshot.into())))
}

/// DELETE /api/v1/report/experience/:index/details/:detail
pub async fn handle_remove_detail(
    State(state): State<AppState>,
    Path((index, detail)): Path<(usize, usize)>,
) -> SnapshotResult {
    let snapshot = state
        .session
        .lock()
        .await
        .remove_detail(index, detail)
        .await?;
    Ok(Json(snapshot.into()))
}

/// PUT /api/v1/report/evaluation/:category/questions/:question/answer
pub async fn handle_set_answer(
    State(state): State<AppState>,
    Path((category, question)): Path<(usize, usize)>,
    Json(body): Json<TextValue>,
) -> SnapshotResult {
    let snapshot = state
        .session
        .lock()
        .await
        .set_answer(category, question, body.value)
        .await?;
    Ok(Json(snapshot.into()))
}
