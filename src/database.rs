use sea_orm::{ConnectOptions, DatabaseConnection, DbErr};
use sea_orm_migration::MigratorTrait;
use tokio::sync::oneshot;
use tracing::debug;

use crate::config::DatabaseConfig;

pub mod migrations;
pub mod models;

pub use migrations::Migrator;

/// Connects to the database and starts running migrations in the background.
///
/// The receiver resolves once the migrations finish, so callers can keep a
/// liveness endpoint answering in the meantime.
pub async fn setup_database(
    db_config: &DatabaseConfig,
) -> Result<(DatabaseConnection, oneshot::Receiver<Result<(), DbErr>>), DbErr> {
    let connection = setup_database_connection(db_config).await?;
    let migrations_connection = connection.clone();

    let (sender, receiver) = oneshot::channel();

    tokio::spawn(async move {
        let migration_result = Migrator::up(&migrations_connection, None).await;
        let _ = sender.send(migration_result);
    });

    Ok((connection, receiver))
}

pub async fn setup_database_connection(
    db_config: &DatabaseConfig,
) -> Result<DatabaseConnection, DbErr> {
    let mut options = ConnectOptions::new(db_config.url.clone());

    options.sqlx_logging(false); // Disable SQL query logging to reduce noise
    options.max_connections(db_config.pool_size);

    debug!("Connecting to database at: {}", &db_config.url);

    sea_orm::Database::connect(options).await
}

/// True when the error is a unique constraint violation, on any backend.
pub fn is_unique_violation(error: &DbErr) -> bool {
    matches!(
        error.sql_err(),
        Some(sea_orm::SqlErr::UniqueConstraintViolation(_))
    )
}
