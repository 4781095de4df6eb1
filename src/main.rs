//! Equation Challengers - CLI
//!
//! Runs scripted games against the in-memory store and inspects
//! configuration.

#![warn(missing_docs)]

mod cli;

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Result, bail};
use clap::Parser;
use cli::{Cli, Command};
use equation_challengers::{
    Contestant, EngineConfig, GameEngine, LlmClient, PALETTE_SIZE, ScriptedBot, simulate,
};
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

const BOT_NAMES: [&str; PALETTE_SIZE] = ["Ada", "Blaise", "Carl", "Dora", "Emmy"];

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,equation_challengers=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Simulate {
            players,
            seed,
            accuracy,
            config,
            llm,
        } => run_simulation(players, seed, accuracy, config, llm).await,
        Command::Config { config } => print_config(config),
    }
}

/// Loads the config file, or defaults when no path is given.
fn load_config(path: Option<PathBuf>) -> Result<EngineConfig> {
    match path {
        Some(path) => Ok(EngineConfig::from_file(path)?),
        None => Ok(EngineConfig::default()),
    }
}

/// Run a scripted game and print the standings
#[instrument]
async fn run_simulation(
    players: usize,
    seed: Option<u64>,
    accuracy: f64,
    config: Option<PathBuf>,
    llm: bool,
) -> Result<()> {
    if !(2..=PALETTE_SIZE).contains(&players) {
        bail!("Players must be between 2 and {}", PALETTE_SIZE);
    }
    let mut config = load_config(config)?;
    if let Some(seed) = seed {
        config = config.with_seed(seed);
    }
    let base_seed = (*config.seed()).unwrap_or_else(rand::random);

    let (mut engine, _store) = GameEngine::in_memory(config.clone());
    if llm {
        let client = LlmClient::new(config.create_llm_config()?);
        engine = engine.with_completion(Arc::new(client));
    }

    let contestants: Vec<Box<dyn Contestant>> = BOT_NAMES
        .iter()
        .take(players)
        .zip(0u64..)
        .map(|(name, offset)| {
            Box::new(ScriptedBot::new(*name, accuracy, base_seed.wrapping_add(offset)))
                as Box<dyn Contestant>
        })
        .collect();

    info!(players, base_seed, "Running simulation");
    let report = simulate(&engine, contestants).await?;

    println!("Equation Challengers - game {}", report.game.id);
    println!(
        "{} turns, {} rolls, {} answers judged, bank ${}",
        report.game.turn_count, report.rolls, report.answers, report.game.bank_money
    );
    for player in &report.game.players {
        let rewards = report
            .profiles
            .iter()
            .find(|p| p.id == player.user_id)
            .map(|p| {
                p.rewards
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(", ")
            })
            .unwrap_or_default();
        println!(
            "  {:<8} {:<7} ${:<6} {} properties  [{}]",
            player.display_name, player.color.to_string(), player.money, player.property_count, rewards
        );
    }
    if let Some(winner) = &report.game.winner {
        println!("{}", winner);
    }
    if let Some(summary) = &report.game.final_summary {
        println!("\n{}", summary);
    }
    Ok(())
}

/// Print the effective configuration
fn print_config(path: Option<PathBuf>) -> Result<()> {
    let config = load_config(path)?;
    print!("{}", config.to_toml()?);
    Ok(())
}
