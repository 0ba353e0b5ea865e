use std::{net::SocketAddr, process, time::Duration};

use axum::{routing::get, Router};
use tokio::net::TcpListener;
use tracing::{error, info, warn};

use crate::{
    api::health_checks::ok,
    app::App,
    auth::LoginThrottle,
    bootstrap::ensure_admin,
    config::Config,
    database::setup_database,
    environment::Environment,
    mailer::Mailer,
    router::router,
    weather::WeatherService,
};

/// Shortest signing secret accepted without a warning in production.
const MIN_PRODUCTION_SECRET_LEN: usize = 32;

const THROTTLE_CLEANUP_INTERVAL: Duration = Duration::from_secs(60);

fn fail(message: &str, cause: &dyn std::fmt::Display) -> ! {
    error!("❌ {}: {}", message, cause);
    process::exit(1);
}

pub async fn handle_serve_command(environment: Environment, config: Config) {
    let port = config.server.port;

    if environment.is_production() && config.jwt.secret.len() < MIN_PRODUCTION_SECRET_LEN {
        warn!(
            "JWT secret is shorter than {} characters, run generate-jwt-secret",
            MIN_PRODUCTION_SECRET_LEN
        );
    }

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| fail("Failed to bind server address", &e));

    // Kubernetes keeps probing liveness while migrations run
    let liveness_router = Router::new().route("/liveness", get(ok));
    let (stop_liveness, liveness_stopped) = tokio::sync::oneshot::channel::<()>();
    let liveness_server_task = tokio::spawn(async move {
        let served = axum::serve(listener, liveness_router)
            .with_graceful_shutdown(async move {
                let _ = liveness_stopped.await;
            })
            .await;

        if let Err(e) = served {
            error!("Liveness server failed: {}", e);
        }
    });

    let (db, migration_receiver) = setup_database(&config.database)
        .await
        .unwrap_or_else(|e| fail("Failed to connect to the database", &e));

    match migration_receiver.await {
        Ok(Ok(())) => info!("✅ Database is ready!"),
        Ok(Err(e)) => fail("Database setup failed", &e),
        Err(e) => fail("Database setup channel closed unexpectedly", &e),
    }

    if let Err(e) = ensure_admin(&db, &config.bootstrap).await {
        fail("Failed to create bootstrap admin", &e);
    }

    let mailer = Mailer::from_config(&config.email)
        .unwrap_or_else(|e| fail("Failed to create mailer transport", &e));

    let weather = WeatherService::from_config(&config.weather)
        .unwrap_or_else(|e| fail("Failed to create weather client", &e));

    let login_throttle = LoginThrottle::new(config.login_throttle.clone());
    tokio::spawn(clean_up_login_throttle(login_throttle.clone()));

    let app = App {
        config,
        environment,
        db,
        mailer,
        weather,
        login_throttle,
    };

    // Hand the port over from the liveness server to the full one
    let _ = stop_liveness.send(());
    let _ = liveness_server_task.await;

    start_server(router(app), addr).await;
}

async fn clean_up_login_throttle(login_throttle: LoginThrottle) {
    let mut interval = tokio::time::interval(THROTTLE_CLEANUP_INTERVAL);

    loop {
        interval.tick().await;
        login_throttle.cleanup_expired_entries();
    }
}

async fn start_server(router: Router, addr: SocketAddr) {
    let listener = TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| fail("Failed to bind server address", &e));

    info!("🌐 Server starting on http://{}", addr);

    if let Err(e) = axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await
    {
        fail("Server error", &e);
    }
}
