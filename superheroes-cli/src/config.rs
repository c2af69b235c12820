use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use superheroes_core::AppConfig;

#[derive(Parser, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a config file with default values
    Init(InitArgs),
    /// Print the effective config (file + environment) as TOML
    Show,
    /// Show config file path
    Path,
}

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Force overwrite existing config
    #[arg(long, short)]
    pub force: bool,
}

/// `path` is the `--config` override, if any
pub fn run_config(args: ConfigArgs, path: Option<&Path>) -> Result<()> {
    let config_path = path
        .map(Path::to_path_buf)
        .unwrap_or_else(AppConfig::config_path);

    match args.command {
        ConfigCommands::Init(args) => run_init(args, &config_path),
        ConfigCommands::Show => run_show(&config_path),
        ConfigCommands::Path => {
            println!("{}", config_path.display());
            Ok(())
        }
    }
}

fn run_init(args: InitArgs, config_path: &PathBuf) -> Result<()> {
    if config_path.exists() && !args.force {
        anyhow::bail!(
            "Config already exists at {:?}\n\nUse --force to overwrite",
            config_path
        );
    }

    AppConfig::default()
        .save_to(config_path)
        .with_context(|| format!("Failed to write config file: {:?}", config_path))?;

    println!("Created config at: {:?}", config_path);
    println!("\nNext steps:");
    println!("  1. Set auth.secret (or export AUTH_SECRET)");
    println!("  2. Run: superheroes serve");

    Ok(())
}

fn run_show(config_path: &Path) -> Result<()> {
    let mut config = AppConfig::load(Some(config_path)).context("Failed to load config")?;
    config.auth.secret = mask(&config.auth.secret);

    print!("{}", config.to_toml_string()?);
    Ok(())
}

/// Keep the first few characters of a secret so it can be recognized
fn mask(secret: &str) -> String {
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}
