//! Agent personalities and the personality → tolerance threshold mapping
//!
//! Each occupied cell is given one personality when the grid is built.
//! Under dynamic thresholds the personality decides how many same-type
//! neighbors the agent wants; otherwise every agent shares one threshold.

use crate::core::error::{Result, SchellingError};
use rand::Rng;
use serde::{Deserialize, Serialize};

/// One entry of the configured personality list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonalityConfig {
    /// Free-text description, embedded verbatim in prompts
    pub label: String,
    /// Threshold used under dynamic thresholds
    ///
    /// Lower = more tolerant of different neighbors.
    #[serde(default)]
    pub threshold: Option<f64>,
}

impl PersonalityConfig {
    pub fn new(label: impl Into<String>, threshold: Option<f64>) -> Self {
        Self {
            label: label.into(),
            threshold,
        }
    }
}

/// Built-in personality set with its threshold mapping
pub fn default_personalities() -> Vec<PersonalityConfig> {
    vec![
        PersonalityConfig::new(
            "very sociable, loves meeting new people, and embraces diversity",
            Some(0.1),
        ),
        PersonalityConfig::new("shy and introverted, prefers a quiet neighborhood", Some(0.5)),
        PersonalityConfig::new("adventurous and curious about different cultures", Some(0.2)),
        PersonalityConfig::new(
            "cautious and family-oriented, values close-knit communities",
            Some(0.4),
        ),
        PersonalityConfig::new("artistic, enjoys creative, lively surroundings", Some(0.25)),
        PersonalityConfig::new("academic, values intellectual discussions with neighbors", Some(0.3)),
    ]
}

/// Index into a [`PersonalityTable`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PersonalityId(pub usize);

/// Validated, immutable personality list
#[derive(Debug, Clone)]
pub struct PersonalityTable {
    labels: Vec<String>,
    thresholds: Vec<Option<f64>>,
}

impl PersonalityTable {
    /// Build a table from config entries
    ///
    /// Labels must be non-blank and unique, and any mapped threshold must lie
    /// in [0, 1]. Whether every entry needs a threshold depends on the
    /// threshold mode and is checked by `SimulationConfig::validate`.
    pub fn from_config(entries: &[PersonalityConfig]) -> Result<Self> {
        if entries.is_empty() {
            return Err(SchellingError::InvalidConfig(
                "personality list must not be empty".into(),
            ));
        }

        let mut labels: Vec<String> = Vec::with_capacity(entries.len());
        let mut thresholds = Vec::with_capacity(entries.len());

        for entry in entries {
            let label = entry.label.trim();
            if label.is_empty() {
                return Err(SchellingError::InvalidConfig(
                    "personality labels must not be blank".into(),
                ));
            }
            if labels.iter().any(|l| l == label) {
                return Err(SchellingError::InvalidConfig(format!(
                    "duplicate personality '{}'",
                    label
                )));
            }
            if let Some(t) = entry.threshold {
                if !(0.0..=1.0).contains(&t) {
                    return Err(SchellingError::InvalidConfig(format!(
                        "threshold {} for personality '{}' must be within [0, 1]",
                        t, label
                    )));
                }
            }
            labels.push(label.to_string());
            thresholds.push(entry.threshold);
        }

        Ok(Self { labels, thresholds })
    }

    pub fn len(&self) -> usize {
        self.labels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    pub fn label(&self, id: PersonalityId) -> Option<&str> {
        self.labels.get(id.0).map(String::as_str)
    }

    /// Mapped threshold, `None` when the personality has no entry
    pub fn threshold(&self, id: PersonalityId) -> Option<f64> {
        self.thresholds.get(id.0).copied().flatten()
    }

    pub fn find(&self, label: &str) -> Option<PersonalityId> {
        self.labels.iter().position(|l| l == label).map(PersonalityId)
    }

    /// Labels that have no mapped threshold
    pub fn unmapped(&self) -> impl Iterator<Item = &str> {
        self.labels
            .iter()
            .zip(&self.thresholds)
            .filter(|(_, t)| t.is_none())
            .map(|(l, _)| l.as_str())
    }

    /// Pick a personality uniformly at random
    pub fn choose<R: Rng + ?Sized>(&self, rng: &mut R) -> PersonalityId {
        PersonalityId(rng.gen_range(0..self.labels.len()))
    }
}

/// How an agent's tolerance threshold is decided
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThresholdPolicy {
    /// Global threshold, and the fallback for unmapped personalities
    pub global: f64,
    /// Use the per-personality mapping
    pub dynamic: bool,
}

impl ThresholdPolicy {
    pub fn fixed(global: f64) -> Self {
        Self {
            global,
            dynamic: false,
        }
    }

    pub fn dynamic(fallback: f64) -> Self {
        Self {
            global: fallback,
            dynamic: true,
        }
    }

    /// Threshold for an agent with the given personality
    ///
    /// An unmapped personality under dynamic mode falls back to the global
    /// threshold instead of failing.
    pub fn resolve(&self, table: &PersonalityTable, id: PersonalityId) -> f64 {
        if !self.dynamic {
            return self.global;
        }
        match table.threshold(id) {
            Some(t) => t,
            None => {
                tracing::warn!(
                    personality = table.label(id).unwrap_or("<unknown>"),
                    fallback = self.global,
                    "No threshold mapped for personality, using global threshold"
                );
                self.global
            }
        }
    }
}
