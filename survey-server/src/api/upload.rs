//! Photo upload endpoint

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, State},
    Json,
};
use survey_common::record::UploadResponse;

use crate::error::ApiResult;
use crate::upload;
use crate::AppState;

/// POST /api/upload/:participantId
///
/// Multipart field `photos`, at most 20 files.
pub async fn upload_photos(
    State(state): State<AppState>,
    Path(participant_id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<UploadResponse>> {
    let uploaded = upload::ingest(
        &state.store,
        &state.config.base_url,
        &participant_id,
        multipart?,
    )
    .await?;

    Ok(Json(UploadResponse { uploaded }))
}
