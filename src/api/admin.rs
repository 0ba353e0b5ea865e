use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    api::{public::CredentialsRequest, ApiError, ValidatedJson},
    app::App,
    auth::AdminUser,
    database::models::user::UserView,
    users,
};

pub async fn all_users(
    State(app): State<App>,
    _admin: AdminUser,
) -> Result<Json<Vec<UserView>>, ApiError> {
    let all = users::list_all(&app.db).await?;

    Ok(Json(all.into_iter().map(UserView::from).collect()))
}

pub async fn create_admin_user(
    State(app): State<App>,
    _admin: AdminUser,
    ValidatedJson(request): ValidatedJson<CredentialsRequest>,
) -> Result<(StatusCode, &'static str), ApiError> {
    users::create_admin(&app.db, &request.username, &request.password).await?;

    Ok((StatusCode::CREATED, "Admin user created successfully"))
}

pub async fn show(
    State(app): State<App>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<Json<UserView>, ApiError> {
    users::find_by_id(&app.db, id)
        .await?
        .map(|user| Json(user.into()))
        .ok_or(ApiError::NotFound)
}

pub async fn destroy(
    State(app): State<App>,
    _admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    if users::delete_by_id(&app.db, id).await? {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::NotFound)
    }
}
