//! Configuration for the extraction pipeline.
//!
//! The thresholds in here are empirical values observed on real statements.
//! They are plain config fields rather than inline constants so that an
//! institution that needs different tuning can get it without code changes.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Main configuration for the extracto pipeline.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractoConfig {
    /// Document profiling configuration.
    pub profiler: ProfilerConfig,

    /// Structural parsing configuration.
    pub parser: ParserConfig,

    /// Balance validation configuration.
    pub validation: ValidationConfig,
}

/// Document profiling configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfilerConfig {
    /// Number of leading pages sampled for text hints. Sampling keeps
    /// profiling cheap on long statements.
    pub sample_pages: usize,

    /// Language hint recorded on the profile.
    pub language_hint: String,
}

impl Default for ProfilerConfig {
    fn default() -> Self {
        Self {
            sample_pages: 2,
            language_hint: "es-AR".to_string(),
        }
    }
}

/// Structural parsing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ParserConfig {
    /// Date tokens in the sample needed for the generic line parser to
    /// consider itself fully applicable. Score = hits / target, capped at 1.
    pub date_density_target: u32,

    /// Currency assumed when the document does not state one.
    pub default_currency: String,
}

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            date_density_target: 3,
            default_currency: "ARS".to_string(),
        }
    }
}

/// Balance validation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Maximum absolute difference, in currency units, for two balances to
    /// be considered equal, and for a balance delta to be accepted as the
    /// corrected sign of a raw amount.
    pub amount_tolerance: Decimal,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            amount_tolerance: Decimal::new(2, 2), // 0.02
        }
    }
}

impl ExtractoConfig {
    /// Load configuration from a JSON file.
    pub fn from_file(path: &std::path::Path) -> Result<Self, std::io::Error> {
        let content = std::fs::read_to_string(path)?;
        serde_json::from_str(&content)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))
    }

    /// Save configuration to a JSON file.
    pub fn save(&self, path: &std::path::Path) -> Result<(), std::io::Error> {
        let content = serde_json::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e.to_string()))?;
        std::fs::write(path, content)
    }
}
