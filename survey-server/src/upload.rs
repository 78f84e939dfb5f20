//! Photo upload handling
//!
//! Each file in the `photos` field of a multipart request is written to
//! `<upload-root>/<participantId>/<epoch-millis>_<id><ext>` and answered with a
//! URL under `/uploads`. URLs come back in the order the files were received.

use axum::extract::Multipart;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use survey_common::{id, time};
use tracing::{debug, info, warn};

use crate::error::{ApiError, ApiResult};
use crate::store::ParticipantStore;

/// Multipart field carrying the photos
pub const PHOTOS_FIELD: &str = "photos";

/// Files accepted per request
pub const MAX_FILES_PER_REQUEST: usize = 20;

/// Path prefix under which the upload root is served
pub const UPLOADS_PREFIX: &str = "/uploads";

/// Extension used when the original filename has none
pub const FALLBACK_EXTENSION: &str = ".bin";

const UPLOAD_FAILED: &str = "Upload failed";

/// `.ext` from the client's filename, or `.bin`
///
/// Only a non-empty ASCII alphanumeric extension is kept.
pub fn upload_extension(original_name: Option<&str>) -> String {
    original_name
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .filter(|ext| !ext.is_empty() && ext.bytes().all(|b| b.is_ascii_alphanumeric()))
        .map(|ext| format!(".{}", ext))
        .unwrap_or_else(|| FALLBACK_EXTENSION.to_string())
}

/// Stored filename: `<epoch-millis>_<suffix><ext>`
pub fn upload_filename(original_name: Option<&str>, at: DateTime<Utc>, suffix: &str) -> String {
    format!(
        "{}_{}{}",
        time::epoch_millis(at),
        suffix,
        upload_extension(original_name)
    )
}

/// Public URL of a stored upload; root-relative when `base_url` is empty
pub fn upload_url(base_url: &str, participant_id: &str, filename: &str) -> String {
    format!("{}{}/{}/{}", base_url, UPLOADS_PREFIX, participant_id, filename)
}

/// Store every photo in `multipart` for `participant_id` and return their URLs
///
/// All or nothing: when the batch fails (too many files, unreadable part,
/// storage error) the files already written for this request are removed.
pub async fn ingest(
    store: &ParticipantStore,
    base_url: &str,
    participant_id: &str,
    mut multipart: Multipart,
) -> ApiResult<Vec<String>> {
    store
        .upload_dir_for(participant_id)
        .map_err(ApiError::storage(UPLOAD_FAILED))?;

    let mut written = Vec::new();
    match receive(store, base_url, participant_id, &mut multipart, &mut written).await {
        Ok(urls) => {
            info!("Stored {} upload(s) for participant {}", urls.len(), participant_id);
            Ok(urls)
        }
        Err(e) => {
            discard(&written).await;
            Err(e)
        }
    }
}

async fn receive(
    store: &ParticipantStore,
    base_url: &str,
    participant_id: &str,
    multipart: &mut Multipart,
    written: &mut Vec<PathBuf>,
) -> ApiResult<Vec<String>> {
    let mut urls = Vec::new();

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(PHOTOS_FIELD) || field.file_name().is_none() {
            continue;
        }
        if urls.len() == MAX_FILES_PER_REQUEST {
            return Err(ApiError::BadRequest(format!(
                "At most {} files per request",
                MAX_FILES_PER_REQUEST
            )));
        }

        let original_name = field.file_name().map(str::to_string);
        let bytes = field.bytes().await?;

        let filename = upload_filename(original_name.as_deref(), time::now(), &id::generate());
        let path = store
            .store_upload(participant_id, &filename, &bytes)
            .await
            .map_err(ApiError::storage(UPLOAD_FAILED))?;
        written.push(path);

        urls.push(upload_url(base_url, participant_id, &filename));
    }

    Ok(urls)
}

/// Remove files written by a failed batch
async fn discard(written: &[PathBuf]) {
    for path in written {
        if let Err(e) = tokio::fs::remove_file(path).await {
            warn!("Failed to remove {} after aborted upload: {}", path.display(), e);
        }
    }
    if !written.is_empty() {
        debug!("Removed {} file(s) from aborted upload", written.len());
    }
}
