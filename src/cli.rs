//! Command-line interface for equation_challengers.

use clap::{Parser, Subcommand};

/// Equation Challengers - multiplayer board game engine
#[derive(Parser, Debug)]
#[command(name = "equation_challengers")]
#[command(about = "Dice, properties and arithmetic challenges over a shared game store", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Subcommand to run
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Play a full game in-process with scripted bots
    Simulate {
        /// Number of bots (2-5)
        #[arg(short, long, default_value = "3")]
        players: usize,

        /// Seed for dice, equations and bot answers
        #[arg(long)]
        seed: Option<u64>,

        /// Probability that a bot answers an equation correctly
        #[arg(long, default_value = "0.7")]
        accuracy: f64,

        /// Path to engine config (TOML)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,

        /// Use the configured LLM provider for hints and the recap
        #[arg(long)]
        llm: bool,
    },

    /// Print the effective engine configuration as TOML
    Config {
        /// Path to engine config (TOML)
        #[arg(short, long)]
        config: Option<std::path::PathBuf>,
    },
}
