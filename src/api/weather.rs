use axum::{
    extract::{Path, State},
    Json,
};

use crate::{api::ApiError, app::App, auth::CurrentUser, weather::WeatherObservation};

pub async fn show(
    State(app): State<App>,
    _current_user: CurrentUser,
    Path(city): Path<String>,
) -> Result<Json<WeatherObservation>, ApiError> {
    Ok(Json(app.weather.get_weather(&city).await?))
}
