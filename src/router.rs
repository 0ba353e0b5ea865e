use axum::{
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;

use crate::{
    api::{admin, email, health_checks, journal_entries, public, user, weather},
    app::App,
};

pub fn router(app: App) -> Router {
    let public_routes = Router::new()
        .route("/", post(public::login))
        .route("/health-check", get(health_checks::health_check))
        .route("/signup", post(public::signup));

    let admin_routes = Router::new()
        .route("/all-users", get(admin::all_users))
        .route("/create-admin-user", post(admin::create_admin_user))
        .route("/users/{id}", get(admin::show).delete(admin::destroy));

    Router::new()
        .route("/liveness", get(health_checks::ok))
        .route("/readiness", get(health_checks::readiness))
        .nest("/public", public_routes)
        .nest("/admin", admin_routes)
        .route(
            "/user",
            get(user::greeting).put(user::update).delete(user::destroy),
        )
        .route(
            "/journal",
            get(journal_entries::index).post(journal_entries::create),
        )
        .route(
            "/journal/id/{id}",
            get(journal_entries::show)
                .put(journal_entries::update)
                .delete(journal_entries::destroy),
        )
        .route("/weather/{city}", get(weather::show))
        .route("/email/send", post(email::send))
        .with_state(app)
        .layer(TraceLayer::new_for_http())
}
