use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
    api::{ApiError, ValidatedJson},
    app::App,
    auth::CurrentUser,
    database::models::journal_entry,
    journal,
};

#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct JournalEntryRequest {
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 1))]
    pub content: String,
}

pub async fn index(
    State(app): State<App>,
    current_user: CurrentUser,
) -> Result<Json<Vec<journal_entry::Model>>, ApiError> {
    Ok(Json(journal::list(&app.db, &current_user).await?))
}

pub async fn create(
    State(app): State<App>,
    current_user: CurrentUser,
    ValidatedJson(request): ValidatedJson<JournalEntryRequest>,
) -> Result<(StatusCode, Json<journal_entry::Model>), ApiError> {
    let entry = journal::create(&app.db, &current_user, &request.title, &request.content).await?;

    Ok((StatusCode::CREATED, Json(entry)))
}

pub async fn show(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<journal_entry::Model>, ApiError> {
    journal::find(&app.db, &current_user, id)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn update(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<JournalEntryRequest>,
) -> Result<Json<journal_entry::Model>, ApiError> {
    journal::update(&app.db, &current_user, id, &request.title, &request.content)
        .await?
        .map(Json)
        .ok_or(ApiError::NotFound)
}

pub async fn destroy(
    State(app): State<App>,
    current_user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if journal::delete(&app.db, &current_user, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
