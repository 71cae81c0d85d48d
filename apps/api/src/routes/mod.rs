pub mod health;

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};

use crate::editing::handlers as editing;
use crate::export::handlers as export;
use crate::extraction::handlers as extraction;
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let body_limit = state.config.body_limit();

    Router::new()
        .route("/health", get(health::health_handler))
        // Extraction
        .route("/api/v1/extractions", post(extraction::handle_extract))
        // Editable report
        .route(
            "/api/v1/report",
            get(editing::handle_get_report).delete(editing::handle_reset),
        )
        .route(
            "/api/v1/report/fields/:field",
            put(editing::handle_set_field),
        )
        .route(
            "/api/v1/report/lists/:list",
            post(editing::handle_append_list_item),
        )
        .route(
            "/api/v1/report/lists/:list/:index",
            put(editing::handle_upsert_list_item).delete(editing::handle_remove_list_item),
        )
        .route(
            "/api/v1/report/experience/:index/details",
            post(editing::handle_append_detail),
        )
        .route(
            "/api/v1/report/experience/:index/details/:detail",
            put(editing::handle_set_detail).delete(editing::handle_remove_detail),
        )
        .route(
            "/api/v1/report/evaluation/:category/questions/:question/answer",
            put(editing::handle_set_answer),
        )
        // Export
        .route("/api/v1/report/export/pdf", get(export::handle_export_pdf))
        .route(
            "/api/v1/report/export/print",
            get(export::handle_export_print),
        )
        .route("/api/v1/report/export/doc", get(export::handle_export_doc))
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(state)
}
