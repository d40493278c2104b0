use axum::extract::{Path, State};
use axum::Json;

use crate::error::AppError;
use crate::state::AppState;
use coach_core::payload::{RecordId, RecordSnapshot};

/// GET /api/records: all stored records, newest first.
pub async fn list_records(
    State(app): State<AppState>,
) -> Result<Json<Vec<RecordSnapshot>>, AppError> {
    let gateway = app.gateway.clone();
    let records = tokio::task::spawn_blocking(move || gateway.list())
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(records))
}

/// GET /api/records/{id}: one stored record.
pub async fn get_record(
    State(app): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<RecordSnapshot>, AppError> {
    let id = RecordId::parse(&id)?;
    let gateway = app.gateway.clone();
    let record = tokio::task::spawn_blocking(move || gateway.load(&id))
        .await
        .map_err(|e| AppError(anyhow::anyhow!("task join error: {e}")))??;
    Ok(Json(record))
}
