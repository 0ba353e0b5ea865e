use time::{format_description::parse, UtcOffset};
use tracing_subscriber::{filter::Directive, fmt::time::OffsetTime, EnvFilter};

use crate::cli::Commands;

pub fn setup_tracing_for_command(command: &Option<Commands>, server_log_level: &str) {
    // One-shot commands stay quiet unless RUST_LOG asks otherwise
    let default_level = match command {
        Some(Commands::Migrate { .. }) => "warn",
        Some(Commands::Version | Commands::GenerateJwtSecret) => "error",
        Some(Commands::Serve) | None => server_log_level,
    };

    let mut env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    for directive in ["sqlx::query=warn", "sea_orm_migration::migrator=warn"] {
        if let Ok(directive) = directive.parse::<Directive>() {
            env_filter = env_filter.add_directive(directive);
        }
    }

    let timer = parse("[hour]:[minute]:[second].[subsecond digits:2]")
        .map(|format| {
            OffsetTime::new(
                UtcOffset::current_local_offset().unwrap_or(UtcOffset::UTC),
                format,
            )
        })
        .ok();

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_level(true)
        .with_ansi(true)
        .compact();

    match timer {
        Some(timer) => subscriber.with_timer(timer).init(),
        None => subscriber.init(),
    }
}
