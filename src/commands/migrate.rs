use std::{cmp, error::Error, process};

use sea_orm::DatabaseConnection;
use sea_orm_migration::MigratorTrait;

use crate::{
    cli::MigrateAction,
    config::Config,
    database::{setup_database_connection, Migrator},
};

pub async fn handle_migrate_command(config: &Config, action: MigrateAction) {
    let db = match setup_database_connection(&config.database).await {
        Ok(db) => db,
        Err(e) => {
            eprintln!("❌ Failed to connect to the database: {e}");
            process::exit(1);
        }
    };

    if let Err(e) = handle_migration_command(&db, action).await {
        eprintln!("❌ Migration failed: {e}");
        process::exit(1);
    }
}

fn print_names<'a>(names: impl IntoIterator<Item = &'a str>) {
    for name in names {
        println!("  📄 {name}");
    }
    println!();
}

/// Apply `action` to the schema, printing what changes.
pub async fn handle_migration_command(
    db: &DatabaseConnection,
    action: MigrateAction,
) -> Result<(), Box<dyn Error>> {
    match action {
        MigrateAction::Up { steps } => {
            let pending = Migrator::get_pending_migrations(db).await?;

            if pending.is_empty() {
                println!("✅ All migrations are already up to date");
                return Ok(());
            }

            let count = steps.map_or(pending.len(), |steps| {
                cmp::min(steps as usize, pending.len())
            });
            println!("Running {count} of {} pending migration(s) up:", pending.len());
            print_names(pending[..count].iter().map(|m| m.name()));

            Migrator::up(db, steps).await?;
            println!("✅ Migrations completed successfully");
        }
        MigrateAction::Down { steps } => {
            let applied = Migrator::get_applied_migrations(db).await?;

            if applied.is_empty() {
                println!("❌ No migrations to roll back");
                return Ok(());
            }

            let count = cmp::min(steps as usize, applied.len());
            println!("Rolling back {count} migration(s):");
            print_names(applied[applied.len() - count..].iter().rev().map(|m| m.name()));

            Migrator::down(db, Some(steps)).await?;
            println!("✅ Rollback completed successfully");
        }
        MigrateAction::Status => {
            let pending = Migrator::get_pending_migrations(db).await?;
            let applied = Migrator::get_applied_migrations(db).await?;

            println!("📋 Applied migrations:");
            for migration in &applied {
                println!("  ✓ {}", migration.name());
            }

            if pending.is_empty() {
                println!("✅ All migrations are up to date");
            } else {
                println!("📋 Pending migrations:");
                for migration in &pending {
                    println!("  - {}", migration.name());
                }
            }
        }
        MigrateAction::Reset => {
            println!("🔄 Resetting database (this will drop all data!)...");

            Migrator::reset(db).await?;
            println!("✅ All migrations rolled back");

            Migrator::up(db, None).await?;
            println!(
                "✅ Database reset completed, {} migration(s) applied",
                Migrator::get_applied_migrations(db).await?.len()
            );
        }
        MigrateAction::Reapply { steps } => {
            let applied = Migrator::get_applied_migrations(db).await?;

            if applied.is_empty() {
                println!("❌ No migrations to reapply");
                return Ok(());
            }

            let count = cmp::min(steps as usize, applied.len());
            let steps = u32::try_from(count).map_err(|_| "Too many migrations to reapply")?;
            println!("🔄 Reapplying {count} migration(s):");
            print_names(applied[applied.len() - count..].iter().rev().map(|m| m.name()));

            Migrator::down(db, Some(steps)).await?;
            Migrator::up(db, Some(steps)).await?;
            println!("✅ Reapply completed successfully");
        }
    }

    Ok(())
}
