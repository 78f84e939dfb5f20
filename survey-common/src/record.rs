//! Participant record model and API bodies
//!
//! A participant's whole state is one JSON document. Saves combine the stored
//! document with an incoming partial payload using whole-field replacement
//! with fallback (see [`merge`]).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Persisted state of one participant
///
/// Stored as `<data-root>/<id>.json`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParticipantRecord {
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(with = "crate::time::iso_millis")]
    pub created_at: DateTime<Utc>,
    #[serde(
        default,
        with = "crate::time::iso_millis_option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub answers: Vec<Value>,
    #[serde(default)]
    pub roles: Value,
    #[serde(default, rename = "photoMap")]
    pub photo_map: Map<String, Value>,
}

impl ParticipantRecord {
    /// Fresh record for a newly created participant
    pub fn new(id: impl Into<String>, name: Option<String>, now: DateTime<Utc>) -> Self {
        Self {
            id: id.into(),
            name: name.filter(|n| !n.is_empty()),
            created_at: now,
            updated_at: Some(now),
            answers: Vec::new(),
            roles: Value::Null,
            photo_map: Map::new(),
        }
    }
}

/// Body of `POST /api/answers/:participantId`
///
/// Every field is optional. JSON `null` counts as absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SavePayload {
    #[serde(default)]
    pub name: Option<String>,
    /// Kept raw so a non-array value falls back instead of failing the request
    #[serde(default)]
    pub answers: Option<Value>,
    #[serde(default)]
    pub roles: Option<Value>,
    /// Kept raw so a non-object value falls back instead of failing the request
    #[serde(default, rename = "photoMap")]
    pub photo_map: Option<Value>,
}

/// Compute the record to persist from the stored record and a save payload
///
/// - `id` always comes from the caller (the path parameter).
/// - `name`: non-empty payload name, else stored name, else null.
/// - `created_at`: stored value, else `now`.
/// - `updated_at`: always `now`.
/// - `answers`: payload array, else stored answers, else `[]`.
/// - `roles`: payload value, else stored roles, else null.
/// - `photoMap`: payload object, else stored map, else `{}`.
///
/// Fields are replaced whole; nothing is merged recursively.
pub fn merge(
    existing: Option<&ParticipantRecord>,
    id: &str,
    payload: SavePayload,
    now: DateTime<Utc>,
) -> ParticipantRecord {
    let name = payload
        .name
        .filter(|n| !n.is_empty())
        .or_else(|| existing.and_then(|e| e.name.clone()))
        .filter(|n| !n.is_empty());

    let answers = match payload.answers {
        Some(Value::Array(answers)) => answers,
        _ => existing.map(|e| e.answers.clone()).unwrap_or_default(),
    };

    let roles = payload
        .roles
        .or_else(|| existing.map(|e| e.roles.clone()))
        .unwrap_or(Value::Null);

    let photo_map = match payload.photo_map {
        Some(Value::Object(map)) => map,
        _ => existing.map(|e| e.photo_map.clone()).unwrap_or_default(),
    };

    ParticipantRecord {
        id: id.to_string(),
        name,
        created_at: existing.map(|e| e.created_at).unwrap_or(now),
        updated_at: Some(now),
        answers,
        roles,
        photo_map,
    }
}

/// Body of `POST /api/participants`
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CreateParticipantRequest {
    #[serde(default)]
    pub name: Option<String>,
}

/// Response of `POST /api/participants`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedParticipant {
    pub id: String,
    pub name: Option<String>,
    #[serde(with = "crate::time::iso_millis")]
    pub created_at: DateTime<Utc>,
}

impl From<&ParticipantRecord> for CreatedParticipant {
    fn from(record: &ParticipantRecord) -> Self {
        Self {
            id: record.id.clone(),
            name: record.name.clone(),
            created_at: record.created_at,
        }
    }
}

/// Response of `POST /api/answers/:participantId`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAck {
    pub ok: bool,
    #[serde(with = "crate::time::iso_millis")]
    pub updated_at: DateTime<Utc>,
}

/// Response of `POST /api/upload/:participantId`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UploadResponse {
    pub uploaded: Vec<String>,
}
