//! Simulation configuration with documented defaults
//!
//! Configuration is read once at startup: built-in defaults, optionally
//! overlaid by a TOML file, then by command-line overrides. The result is
//! validated before any grid is built and passed explicitly to the model.

use crate::core::error::{Result, SchellingError};
use crate::entity::personality::{
    default_personalities, PersonalityConfig, PersonalityTable, ThresholdPolicy,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Largest accepted `grid_size`; keeps `grid_size²` cells allocatable
pub const MAX_GRID_SIZE: usize = 1024;

/// Configuration for the grid model
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    /// Width and height of the square grid
    pub grid_size: usize,

    /// Fraction of cells left empty, in [0, 1]
    ///
    /// The empty count is `round(empty_ratio * grid_size²)`; the rest is
    /// split between Red and Blue with Red taking the odd agent.
    pub empty_ratio: f64,

    /// Global tolerance threshold
    ///
    /// Applies to every agent when `dynamic_thresholds` is off, and is the
    /// fallback for unmapped personalities when it is on.
    pub threshold: f64,

    /// Use per-personality thresholds instead of the global one
    pub dynamic_thresholds: bool,

    /// Seed for grid layout and personality assignment
    ///
    /// `None` draws a fresh seed per run.
    pub seed: Option<u64>,

    /// Personality options and their thresholds
    pub personalities: Vec<PersonalityConfig>,

    /// External text-generation service
    pub llm: LlmConfig,
}

/// Settings for the perspective text-generation service
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Model identifier sent with every request
    pub model: String,
    /// Endpoint; URLs on anthropic.com use the Anthropic message format,
    /// everything else the OpenAI chat-completions format
    pub api_url: String,
    /// Name of the environment variable holding the API key
    pub api_key_env: String,
    /// Response length cap; perspectives are meant to be a sentence or two
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            model: "gpt-3.5-turbo".into(),
            api_url: "https://api.openai.com/v1/chat/completions".into(),
            api_key_env: "OPENAI_API_KEY".into(),
            max_tokens: 60,
            temperature: 0.7,
        }
    }
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            grid_size: 20,
            empty_ratio: 0.1,
            threshold: 0.3,
            dynamic_thresholds: true,
            seed: None,
            personalities: default_personalities(),
            llm: LlmConfig::default(),
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a TOML document; missing keys keep their defaults
    pub fn from_toml_str(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Load configuration from a TOML file
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config = Self::from_toml_str(&contents)?;
        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Validate configuration before a grid is built
    pub fn validate(&self) -> Result<()> {
        if self.grid_size == 0 {
            return Err(SchellingError::InvalidConfig(
                "grid_size must be at least 1".into(),
            ));
        }

        if self.grid_size > MAX_GRID_SIZE {
            return Err(SchellingError::InvalidConfig(format!(
                "grid_size ({}) must be at most {}",
                self.grid_size, MAX_GRID_SIZE
            )));
        }

        if !(0.0..=1.0).contains(&self.empty_ratio) {
            return Err(SchellingError::InvalidConfig(format!(
                "empty_ratio ({}) must be within [0, 1]",
                self.empty_ratio
            )));
        }

        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(SchellingError::InvalidConfig(format!(
                "threshold ({}) must be within [0, 1]",
                self.threshold
            )));
        }

        let table = PersonalityTable::from_config(&self.personalities)?;

        if self.dynamic_thresholds {
            let unmapped: Vec<&str> = table.unmapped().collect();
            if !unmapped.is_empty() {
                return Err(SchellingError::InvalidConfig(format!(
                    "dynamic thresholds enabled but no threshold mapped for: {}",
                    unmapped.join("; ")
                )));
            }
        }

        if self.llm.model.trim().is_empty() {
            return Err(SchellingError::InvalidConfig("llm.model must not be empty".into()));
        }

        if self.llm.max_tokens == 0 {
            return Err(SchellingError::InvalidConfig(
                "llm.max_tokens must be positive".into(),
            ));
        }

        if !(0.0..=2.0).contains(&self.llm.temperature) {
            return Err(SchellingError::InvalidConfig(format!(
                "llm.temperature ({}) must be within [0, 2]",
                self.llm.temperature
            )));
        }

        Ok(())
    }

    pub fn threshold_policy(&self) -> ThresholdPolicy {
        ThresholdPolicy {
            global: self.threshold,
            dynamic: self.dynamic_thresholds,
        }
    }

    pub fn personality_table(&self) -> Result<PersonalityTable> {
        PersonalityTable::from_config(&self.personalities)
    }
}
