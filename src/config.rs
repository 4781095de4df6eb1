//! Engine configuration loaded from TOML.

use std::path::Path;
use std::time::Duration;

use challengers_rules::{BoardLayout, GameRules};
use derive_getters::Getters;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::llm_client::{LlmConfig, LlmProvider};

/// Everything tunable about an engine instance.
///
/// Every field has a default, so an empty file is a valid configuration.
#[derive(Debug, Clone, PartialEq, Getters, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Game constants.
    rules: GameRules,

    /// Explicit color of every square; uniform `index mod 5` when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    board_layout: Option<BoardLayout>,

    /// Conditional write attempts before an operation reports contention.
    commit_attempts: u32,

    /// Seconds a player may sit on a pending decision; unlimited when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    decision_timeout_secs: Option<u64>,

    /// Resolved invitations kept per game; unbounded when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    invitation_retention: Option<usize>,

    /// Upper bound on one text-completion call.
    completion_timeout_secs: u64,

    /// LLM provider (openai, anthropic or gemini).
    llm_provider: LlmProvider,

    /// LLM model name.
    llm_model: String,

    /// Maximum tokens for LLM responses.
    llm_max_tokens: u32,

    /// Seed for dice and equations; entropy when absent.
    #[serde(skip_serializing_if = "Option::is_none")]
    seed: Option<u64>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            rules: GameRules::default(),
            board_layout: None,
            commit_attempts: 5,
            decision_timeout_secs: None,
            invitation_retention: None,
            completion_timeout_secs: 10,
            llm_provider: LlmProvider::Gemini,
            llm_model: "gemini-2.0-flash".to_string(),
            llm_max_tokens: 300,
            seed: None,
        }
    }
}

impl EngineConfig {
    /// Loads configuration from TOML file.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;
        let config = Self::from_toml(&content)?;
        info!(
            board_size = config.rules.board_size(),
            turn_limit = config.rules.turn_limit(),
            "Config loaded successfully"
        );
        Ok(config)
    }

    /// Parses configuration from TOML text.
    #[instrument(skip(content))]
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))
    }

    /// Renders this configuration as TOML.
    #[instrument(skip(self))]
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self)
            .map_err(|e| ConfigError::new(format!("Failed to render config: {}", e)))
    }

    /// The board the engine plays on.
    pub fn layout(&self) -> BoardLayout {
        self.board_layout
            .clone()
            .unwrap_or_else(|| BoardLayout::uniform(*self.rules.board_size()))
    }

    /// Decision deadline, if enabled.
    pub fn decision_timeout(&self) -> Option<Duration> {
        self.decision_timeout_secs.map(Duration::from_secs)
    }

    /// Text-completion bound.
    pub fn completion_timeout(&self) -> Duration {
        Duration::from_secs(self.completion_timeout_secs)
    }

    /// Replaces the game constants.
    pub fn with_rules(mut self, rules: GameRules) -> Self {
        self.rules = rules;
        self
    }

    /// Plays on an explicit board.
    pub fn with_board_layout(mut self, layout: BoardLayout) -> Self {
        self.board_layout = Some(layout);
        self
    }

    /// Sets the conditional write budget.
    pub fn with_commit_attempts(mut self, attempts: u32) -> Self {
        self.commit_attempts = attempts;
        self
    }

    /// Enables decision deadlines.
    pub fn with_decision_timeout_secs(mut self, secs: u64) -> Self {
        self.decision_timeout_secs = Some(secs);
        self
    }

    /// Enables pruning of resolved invitations.
    pub fn with_invitation_retention(mut self, keep: usize) -> Self {
        self.invitation_retention = Some(keep);
        self
    }

    /// Fixes the random seed.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Creates LLM configuration from the provider's API key variable.
    #[instrument(skip(self), fields(provider = %self.llm_provider, model = %self.llm_model))]
    pub fn create_llm_config(&self) -> Result<LlmConfig, ConfigError> {
        debug!("Creating LLM config");
        let var = self.llm_provider.api_key_var();
        let api_key = std::env::var(var)
            .map_err(|_| ConfigError::new(format!("{} environment variable not set", var)))?;

        Ok(LlmConfig::new(
            self.llm_provider,
            api_key,
            self.llm_model.clone(),
            self.llm_max_tokens,
        ))
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}
