//! Game configuration loaded from TOML.

use crate::board::Board;
use crate::error::ConfigError;
use crate::types::Symbols;
use derive_getters::Getters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, info, instrument};

/// Who sits in the second seat.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    clap::ValueEnum,
    strum::Display,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GameMode {
    /// Two people share the board.
    #[default]
    PlayerVsPlayer,
    /// The bot plays O.
    PlayerVsBot,
}

/// Settings for a match.
#[derive(Debug, Clone, PartialEq, Eq, Getters, Serialize, Deserialize)]
pub struct GameConfig {
    /// Board side length.
    #[serde(default = "default_size")]
    size: usize,

    /// Seat assignment.
    #[serde(default)]
    mode: GameMode,

    /// Seed for the bot's random choices. Random if absent.
    #[serde(default)]
    bot_seed: Option<u64>,

    /// Display symbols for X and O.
    #[serde(default)]
    symbols: Symbols,
}

#[instrument]
fn default_size() -> usize {
    3
}

impl Default for GameConfig {
    fn default() -> Self {
        Self {
            size: default_size(),
            mode: GameMode::default(),
            bot_seed: None,
            symbols: Symbols::default(),
        }
    }
}

impl GameConfig {
    /// Loads configuration from a TOML file and validates it.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_toml(&content)?;
        info!(size = config.size, mode = %config.mode, "Config loaded successfully");
        Ok(config)
    }

    /// Parses configuration from TOML text and validates it.
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the settings describe a playable game.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if Board::cell_count(self.size).is_err() {
            return Err(ConfigError::new(format!(
                "Board size must be at least {} and at most {}, got {}",
                Board::MIN_SIZE,
                Board::MAX_SIZE,
                self.size
            )));
        }
        if self.symbols.x == self.symbols.o {
            return Err(ConfigError::new(format!(
                "Player symbols must differ, both are '{}'",
                self.symbols.x
            )));
        }
        if self.symbols.x == '_' || self.symbols.o == '_' {
            return Err(ConfigError::new(
                "'_' is reserved for empty cells".to_string(),
            ));
        }
        Ok(())
    }

    /// Replaces the board size.
    pub fn with_size(mut self, size: usize) -> Self {
        self.size = size;
        self
    }

    /// Replaces the game mode.
    pub fn with_mode(mut self, mode: GameMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replaces the bot seed.
    pub fn with_bot_seed(mut self, seed: u64) -> Self {
        self.bot_seed = Some(seed);
        self
    }
}
