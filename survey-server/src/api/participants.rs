//! Participant creation

use axum::{extract::State, Json};
use survey_common::{
    id,
    record::{CreateParticipantRequest, CreatedParticipant},
    time, Error, ParticipantRecord, Result,
};
use tracing::info;

use super::JsonBody;
use crate::error::{ApiError, ApiResult};
use crate::store::ParticipantStore;
use crate::AppState;

const CREATE_FAILED: &str = "Failed to create participant";

/// Fresh IDs tried before giving up
const MAX_ID_ATTEMPTS: usize = 5;

/// POST /api/participants
///
/// Writes a fresh record (no answers, null roles, empty photo map) under a
/// newly generated ID.
pub async fn create_participant(
    State(state): State<AppState>,
    JsonBody(body): JsonBody<CreateParticipantRequest>,
) -> ApiResult<Json<CreatedParticipant>> {
    let id = unused_id(&state.store)
        .await
        .map_err(ApiError::storage(CREATE_FAILED))?;

    let record = ParticipantRecord::new(id, body.name, time::now());
    state
        .store
        .write_participant(&record)
        .await
        .map_err(ApiError::storage(CREATE_FAILED))?;

    info!("Created participant {}", record.id);
    Ok(Json(CreatedParticipant::from(&record)))
}

async fn unused_id(store: &ParticipantStore) -> Result<String> {
    for _ in 0..MAX_ID_ATTEMPTS {
        let candidate = id::generate();
        if !store.exists(&candidate).await? {
            return Ok(candidate);
        }
    }
    Err(Error::Internal(format!(
        "no unused participant id after {} attempts",
        MAX_ID_ATTEMPTS
    )))
}
