//! One-shot schema runner, run before the API rolls out.
//!
//! Connects the same way the API does: `DATABASE_URL`, or the discrete
//! `DATABASE_HOST`/`DATABASE_PORT`/`DATABASE_USER`/`DATABASE_PASSWORD`/
//! `DATABASE_NAME`/`DATABASE_OPTION` set handed out by the platform.

use clap::{Parser, Subcommand};
use core_config::tracing::{init_tracing, install_color_eyre};
use core_config::{ConfigError, Environment, FromEnv};
use database::postgres::{self, DatabaseConnection, PostgresConfig};
use eyre::{Result, WrapErr};
use migration::{Migrator, MigratorTrait};
use tracing::info;

#[derive(Parser, Debug)]
#[command(name = "migration")]
#[command(about = "Apply or inspect the bulletin board schema")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
enum Command {
    /// Apply pending migrations (the default)
    Up {
        /// Number of pending migrations to apply. Defaults to all.
        #[arg(short, long)]
        num: Option<u32>,
    },
    /// Roll back applied migrations
    Down {
        #[arg(short, long, default_value_t = 1)]
        num: u32,
    },
    /// Show which migrations are applied
    Status,
    /// Drop every table, then reapply all migrations
    Fresh,
    /// Roll back every migration, then reapply them
    Refresh,
    /// Roll back every migration
    Reset,
}

/// Single connection; the runner does one thing and exits.
fn connection_config() -> Result<PostgresConfig, ConfigError> {
    Ok(PostgresConfig::from_env()?.with_pool_size(1, 1))
}

async fn run(command: Command, db: &DatabaseConnection) -> Result<()> {
    match command {
        Command::Up { num } => Migrator::up(db, num).await?,
        Command::Down { num } => Migrator::down(db, Some(num)).await?,
        Command::Status => Migrator::status(db).await?,
        Command::Fresh => Migrator::fresh(db).await?,
        Command::Refresh => Migrator::refresh(db).await?,
        Command::Reset => Migrator::reset(db).await?,
    }
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    install_color_eyre();
    init_tracing(&Environment::from_env());

    let cli = Cli::parse();
    let command = cli.command.unwrap_or(Command::Up { num: None });

    let config = connection_config().wrap_err("Database is not configured")?;
    info!(url = %config.redacted_url(), ?command, "Running migration command");

    let db = postgres::connect_from_config(config)
        .await
        .wrap_err("Database connection failed")?;

    let result = run(command, &db).await;
    db.close().await?;
    result
}
