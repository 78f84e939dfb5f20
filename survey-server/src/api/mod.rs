//! HTTP API handlers for survey-server

pub mod answers;
pub mod extract;
pub mod health;
pub mod participants;
pub mod upload;

pub use answers::{fetch_answers, save_answers};
pub use extract::JsonBody;
pub use health::health_routes;
pub use participants::create_participant;
pub use upload::upload_photos;
