//! # Survey Common Library
//!
//! Shared code for the survey backend:
//! - Participant record model and merge-with-fallback
//! - Request/response bodies for the HTTP API
//! - Participant identifier generation
//! - Timestamp helpers
//! - Common error type

pub mod error;
pub mod id;
pub mod record;
pub mod time;

pub use error::{Error, Result};
pub use record::{merge, ParticipantRecord, SavePayload};
