use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = env!("CARGO_PKG_NAME"))]
#[command(about = env!("CARGO_PKG_DESCRIPTION"))]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run migrations, create the bootstrap admin and start the web server (default)
    Serve,
    /// Database migration commands
    Migrate {
        #[command(subcommand)]
        action: MigrateAction,
    },
    /// Generate a JWT secret for configuration
    GenerateJwtSecret,
    /// Show version information
    Version,
}

#[derive(Subcommand)]
pub enum MigrateAction {
    /// Run migrations up
    Up {
        /// Number of migrations to run (default: all)
        #[arg(short, long)]
        steps: Option<u32>,
    },
    /// Run migrations down
    Down {
        /// Number of migrations to rollback (default: 1)
        #[arg(short, long, default_value = "1")]
        steps: u32,
    },
    /// Show migration status
    Status,
    /// Reset database (down all, then up all)
    Reset,
    /// Reapply recent migrations (down then up)
    Reapply {
        /// Number of migrations to reapply (default: 1)
        #[arg(short, long, default_value = "1")]
        steps: u32,
    },
}

#[cfg(test)]
mod tests {
    use clap::{CommandFactory, Parser};

    use super::*;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["journal"]).expect("Failed to parse");

        assert!(cli.command.is_none());
    }

    #[test]
    fn test_parses_migrate_down_steps() {
        let cli = Cli::try_parse_from(["journal", "migrate", "down", "--steps", "2"])
            .expect("Failed to parse");

        assert!(matches!(
            cli.command,
            Some(Commands::Migrate {
                action: MigrateAction::Down { steps: 2 }
            })
        ));
    }

    #[test]
    fn test_parses_generate_jwt_secret() {
        let cli = Cli::try_parse_from(["journal", "generate-jwt-secret"]).expect("Failed to parse");

        assert!(matches!(cli.command, Some(Commands::GenerateJwtSecret)));
    }
}
