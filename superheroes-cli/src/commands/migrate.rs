//! Run database migrations without starting the server

use anyhow::{Context, Result};
use clap::Parser;
use superheroes_core::AppConfig;
use superheroes_server::db::{create_pool, migrations};

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides config and DATABASE_URL)
    #[arg(long)]
    pub database_url: Option<String>,
}

pub async fn run_migrate(args: MigrateArgs, config: AppConfig) -> Result<()> {
    let url = args.database_url.unwrap_or(config.database.url);

    let pool = create_pool(&url)
        .await
        .with_context(|| format!("Failed to open database {}", url))?;

    migrations::run(&pool)
        .await
        .context("Failed to run migrations")?;

    println!("Migrations applied to {}", url);
    Ok(())
}
