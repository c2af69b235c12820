//! `superheroes heroes` - list and add superheroes through the HTTP API

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use superheroes_core::AppConfig;

use crate::client::{HeroesClient, Superhero};

#[derive(Parser, Debug)]
pub struct HeroesArgs {
    /// Server base URL (default from config or SUPERHEROES_SERVER_URL)
    #[arg(long, global = true)]
    pub server: Option<String>,

    #[command(subcommand)]
    pub command: HeroesCommands,
}

#[derive(Subcommand, Debug)]
pub enum HeroesCommands {
    /// List all superheroes
    List {
        /// Print raw JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add a superhero
    Add {
        /// Display name of the new hero
        name: String,
    },
}

pub async fn run_heroes(args: HeroesArgs, config: AppConfig) -> Result<()> {
    let base_url = args.server.unwrap_or(config.server.public_url);
    let client = HeroesClient::new(&base_url);

    match args.command {
        HeroesCommands::List { json } => {
            let heroes = client
                .list()
                .await
                .with_context(|| format!("Failed to list superheroes from {}", base_url))?;

            if json {
                println!("{}", serde_json::to_string_pretty(&heroes)?);
            } else if heroes.is_empty() {
                println!("No superheroes found. Add your first one!");
            } else {
                for hero in &heroes {
                    println!("{}", format_row(hero));
                }
            }
        }
        HeroesCommands::Add { name } => {
            let hero = client
                .create(&name)
                .await
                .context("Failed to add superhero")?;
            println!("Added {}", format_row(&hero));
        }
    }

    Ok(())
}

fn format_row(hero: &Superhero) -> String {
    format!(
        "#{:<4} {}  (added {})",
        hero.id,
        hero.name,
        hero.created_at.format("%Y-%m-%d")
    )
}
