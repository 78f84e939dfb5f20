//! Answer retrieval and saving

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::Value;
use survey_common::{id::is_valid_participant_id, merge, record::SaveAck, time, SavePayload};
use tracing::info;

use super::JsonBody;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// GET /api/answers/:participantId
///
/// Returns the stored document as written.
pub async fn fetch_answers(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
) -> ApiResult<Json<Value>> {
    // an ID that could never have been stored
    if !is_valid_participant_id(&participant_id) {
        return Err(ApiError::NotFound);
    }

    let document = state
        .store
        .read_document(&participant_id)
        .await
        .map_err(ApiError::storage("Failed to read data"))?;

    Ok(Json(document))
}

/// POST /api/answers/:participantId
///
/// Merges the payload into the stored record, creating it when absent.
pub async fn save_answers(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
    JsonBody(payload): JsonBody<SavePayload>,
) -> ApiResult<Json<SaveAck>> {
    let record = state
        .store
        .save_with(&participant_id, |existing| {
            merge(existing, &participant_id, payload, time::now())
        })
        .await
        .map_err(ApiError::storage("Failed to save data"))?;

    let updated_at = record.updated_at.unwrap_or(record.created_at);
    info!(
        "Saved participant {} ({} answers)",
        participant_id,
        record.answers.len()
    );

    Ok(Json(SaveAck {
        ok: true,
        updated_at,
    }))
}
