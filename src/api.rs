pub mod admin;
pub mod api_error;
pub mod email;
pub mod health_checks;
pub mod journal_entries;
pub mod public;
pub mod user;
pub mod validated_json;
pub mod weather;

pub use api_error::ApiError;
pub use validated_json::ValidatedJson;
