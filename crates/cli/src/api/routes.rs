//! HTTP endpoints of the sync service.

use super::error::ApiError;
use axum::{
    Json, Router,
    body::Bytes,
    extract::{DefaultBodyLimit, Path, State, rejection::BytesRejection},
    routing::{get, post},
};
use engine_core::{
    error::SyncError,
    orchestrator::{StatusReport, SyncRequest, SyncService, SyncSummary, TableInfo},
};
use serde_json::{Value, json};

/// `body_limit` caps the bytes buffered for one request.
pub fn sync_routes(service: SyncService, body_limit: usize) -> Router {
    Router::new()
        .route("/", get(welcome_handler))
        .route("/health", get(health_handler))
        .route("/sync", post(sync_handler))
        .route("/status", get(status_handler))
        .route("/reset-session", post(reset_session_handler))
        .route(
            "/tables/:name",
            get(table_info_handler).delete(clear_table_handler),
        )
        .layer(DefaultBodyLimit::max(body_limit))
        .with_state(service)
}

async fn welcome_handler() -> &'static str {
    "Welcome to the Omega sync API. POST batches to /sync."
}

async fn health_handler() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "message": "Omega API is running",
    }))
}

/// The body is read raw so that an empty body and invalid JSON both come
/// back as structured `MalformedRequest` errors.
pub fn parse_sync_body(body: &[u8]) -> Result<SyncRequest, SyncError> {
    if body.iter().all(u8::is_ascii_whitespace) {
        return Err(SyncError::MalformedRequest("No data provided".into()));
    }

    let value: Value = serde_json::from_slice(body)
        .map_err(|e| SyncError::MalformedRequest(format!("Invalid JSON body: {e}")))?;

    SyncRequest::from_json(&value)
}

async fn sync_handler(
    State(service): State<SyncService>,
    body: Result<Bytes, BytesRejection>,
) -> Result<Json<SyncSummary>, ApiError> {
    let body = body.map_err(ApiError::body_rejected)?;
    let request = parse_sync_body(&body)?;
    let summary = service.sync(request).await?;
    Ok(Json(summary))
}

async fn status_handler(
    State(service): State<SyncService>,
) -> Result<Json<StatusReport>, ApiError> {
    Ok(Json(service.status().await?))
}

async fn reset_session_handler(State(service): State<SyncService>) -> Json<Value> {
    let cleared = service.reset_session().await;
    Json(json!({
        "success": true,
        "message": "Sync session reset",
        "tables_cleared": cleared,
    }))
}

async fn table_info_handler(
    State(service): State<SyncService>,
    Path(name): Path<String>,
) -> Result<Json<TableInfo>, ApiError> {
    let info = service
        .table_info(&name)
        .await
        .map_err(ApiError::table_route)?;
    Ok(Json(info))
}

async fn clear_table_handler(
    State(service): State<SyncService>,
    Path(name): Path<String>,
) -> Result<Json<Value>, ApiError> {
    let table = name.trim().to_lowercase();
    let outcome = service.clear_table(&table).await?;

    Ok(Json(json!({
        "success": true,
        "message": format!("Successfully cleared {table}"),
        "records_deleted": outcome,
    })))
}
