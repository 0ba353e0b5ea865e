use std::{env, process, str::FromStr as _};

use clap::Parser as _;
use config_rs::{Config as ConfigRs, ConfigError};
use tracing::{debug, trace};

use crate::{
    cli::{Cli, Commands},
    commands::{generate_secret, migrate, serve, version},
    config::Config,
    environment::Environment,
    setup_tracing::setup_tracing_for_command,
};

const ENVIRONMENT_VARIABLE: &str = "APP_ENVIRONMENT";

/// Parse the command line, load configuration and run the chosen command.
pub async fn boot() {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Version) => {
            version::print_version_info();
            return;
        }
        Some(Commands::GenerateJwtSecret) => {
            generate_secret::handle_generate_secret_command();
            return;
        }
        _ => {}
    }

    let environment = set_environment();

    let app_config = match read_config(&environment) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("❌ Failed to load configuration for {environment}: {e}");
            process::exit(1);
        }
    };

    setup_tracing_for_command(&cli.command, &app_config.tracing.log_level);

    debug!("Environment set to: {:?}", environment);
    trace!("Configuration loaded: {:?}", app_config);

    handle_command(environment, app_config, cli).await;
}

#[must_use]
pub fn set_environment() -> Environment {
    env::var(ENVIRONMENT_VARIABLE)
        .ok()
        .and_then(|s| Environment::from_str(&s).ok())
        .unwrap_or_default()
}

/// Read `config/{environment}` overlaid with `APP_`-prefixed variables.
///
/// Nested keys use a double underscore, e.g. `APP_JWT__SECRET`.
pub fn read_config(environment: &Environment) -> Result<Config, ConfigError> {
    let config_file_name = format!("config/{environment}");

    trace!("Reading configuration from: {}", config_file_name);

    ConfigRs::builder()
        .add_source(config_rs::File::with_name(&config_file_name))
        .add_source(
            config_rs::Environment::with_prefix("APP")
                .prefix_separator("_")
                .separator("__"),
        )
        .build()?
        .try_deserialize()
}

pub async fn handle_command(environment: Environment, config: Config, cli: Cli) {
    match cli.command {
        Some(Commands::Migrate { action }) => {
            migrate::handle_migrate_command(&config, action).await;
        }
        Some(Commands::GenerateJwtSecret) => {
            generate_secret::handle_generate_secret_command();
        }
        Some(Commands::Version) => {
            version::print_version_info();
        }
        Some(Commands::Serve) | None => {
            serve::handle_serve_command(environment, config).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reads_test_configuration() {
        let config = read_config(&Environment::Test).expect("Failed to read config");

        assert_eq!(config.database.url, "sqlite::memory:");
        assert_eq!(config.bootstrap.admin_username, "admin");
        assert!(config.login_throttle.enabled);
        assert_eq!(config.weather.default_city, "Mumbai");
    }
}
