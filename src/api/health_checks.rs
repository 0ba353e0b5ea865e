use axum::extract::State;

use crate::app::{App, ReadinessError};

pub async fn ok() -> &'static str {
    "OK"
}

pub async fn health_check() -> &'static str {
    "Health is ok !"
}

/// Ready once the database answers.
pub async fn readiness(State(app): State<App>) -> Result<&'static str, ReadinessError> {
    app.db.ping().await?;

    Ok("OK")
}
