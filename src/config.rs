//! # Configuration
//!
//! Optional YAML file describing the playback target:
//!
//! ```yaml
//! max-steps: 100        # steps the driver can buffer
//! max-line-bytes: 4096  # largest single write the driver accepts
//! enforce-limits: false # fail instead of warning when a limit is exceeded
//! tempo: 120            # quarter notes per minute (1-1000), for length reporting
//! ```
//!
//! Every key is optional; missing keys take the defaults above.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use tracing::warn;

use crate::error::BuzzError;
use crate::melody::Melody;

/// Fastest tempo accepted, in quarter notes per minute
pub const MAX_TEMPO: u32 = 1000;

/// Raw configuration for YAML deserialization
#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct RawConfig {
    pub max_steps: Option<usize>,
    pub max_line_bytes: Option<usize>,
    pub enforce_limits: Option<bool>,
    pub tempo: Option<u32>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub max_steps: usize,
    pub max_line_bytes: usize,
    pub enforce_limits: bool,
    pub tempo: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_steps: 100,
            max_line_bytes: 4096,
            enforce_limits: false,
            tempo: 120,
        }
    }
}

impl Config {
    pub fn from_yaml_str(content: &str) -> Result<Self, BuzzError> {
        // An empty file deserializes to null rather than an empty map
        if content.trim().is_empty() {
            return Ok(Config::default());
        }

        let raw: RawConfig =
            serde_yaml::from_str(content).map_err(|e| BuzzError::Config(e.to_string()))?;
        let defaults = Config::default();

        let config = Config {
            max_steps: raw.max_steps.unwrap_or(defaults.max_steps),
            max_line_bytes: raw.max_line_bytes.unwrap_or(defaults.max_line_bytes),
            enforce_limits: raw.enforce_limits.unwrap_or(defaults.enforce_limits),
            tempo: raw.tempo.unwrap_or(defaults.tempo),
        };

        if config.max_steps == 0 {
            return Err(BuzzError::Config("max-steps must be at least 1".to_string()));
        }
        if config.max_line_bytes == 0 {
            return Err(BuzzError::Config("max-line-bytes must be at least 1".to_string()));
        }
        if config.tempo == 0 || config.tempo > MAX_TEMPO {
            return Err(BuzzError::Config(format!(
                "tempo must be between 1 and {}, got {}",
                MAX_TEMPO, config.tempo
            )));
        }

        Ok(config)
    }

    pub fn load(path: &Path) -> Result<Self, BuzzError> {
        let content = fs::read_to_string(path).map_err(|source| BuzzError::Io {
            what: "config file",
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Check a melody against the target's step buffer and write size.
    ///
    /// Violations are errors when `enforce_limits` is set, warnings otherwise.
    pub fn check_limits(&self, melody: &Melody) -> Result<(), BuzzError> {
        let mut problems = Vec::new();

        if melody.len() > self.max_steps {
            problems.push(format!(
                "{} steps, target holds {}",
                melody.len(),
                self.max_steps
            ));
        }
        let bytes = melody.payload().len();
        if bytes > self.max_line_bytes {
            problems.push(format!(
                "{} bytes, target accepts {}",
                bytes, self.max_line_bytes
            ));
        }

        if problems.is_empty() {
            return Ok(());
        }
        let message = problems.join("; ");
        if self.enforce_limits {
            return Err(BuzzError::LimitExceeded(message));
        }
        warn!("Melody exceeds target limits: {}", message);
        Ok(())
    }
}
