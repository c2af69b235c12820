//! superheroes CLI - run the superheroes server and talk to its API
//!
//! Subcommands:
//! - `serve`: run the HTTP server (API, auth, dashboard)
//! - `migrate`: create or update the database schema
//! - `heroes`: list/add superheroes through a running server
//! - `config`: manage ~/.superheroes/config.toml

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use superheroes_core::AppConfig;

mod client;
mod commands;
mod config;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "superheroes",
    author,
    version,
    about = "Superheroes CRUD demo: list/create API with session-gated dashboard"
)]
struct Cli {
    /// Config file (default: ~/.superheroes/config.toml)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server
    Serve(commands::serve::ServeArgs),
    /// Apply database migrations and exit
    Migrate(commands::migrate::MigrateArgs),
    /// List or add superheroes via the HTTP API
    Heroes(commands::heroes::HeroesArgs),
    /// Manage superheroes configuration (init, show, path)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, load_config(&cli.config)?).await?,
        Commands::Migrate(args) => commands::run_migrate(args, load_config(&cli.config)?).await?,
        Commands::Heroes(args) => commands::run_heroes(args, load_config(&cli.config)?).await?,
        Commands::Config(args) => config::run_config(args, cli.config.as_deref())?,
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

fn load_config(path: &Option<PathBuf>) -> Result<AppConfig> {
    AppConfig::load(path.as_deref()).context("Failed to load configuration")
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
