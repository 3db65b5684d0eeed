//! Configuration loaded from `sjf.toml`.
//!
//! Every field is optional and falls back to a default. The `SJF_SPEED`
//! environment variable overrides the file's `speed`; command-line flags are
//! applied on top by the caller.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::simulator::DEFAULT_MAX_WORKERS;

pub const DEFAULT_CONFIG_FILE: &str = "sjf.toml";
pub const SPEED_ENV_VAR: &str = "SJF_SPEED";

#[derive(Debug, Clone, Deserialize)]
pub struct SjfConfig {
    /// Simulated seconds per burst unit.
    #[serde(default = "default_speed")]
    pub speed: f64,

    /// Upper bound on concurrently launched simulation workers.
    #[serde(default = "default_max_workers")]
    pub max_workers: usize,

    /// Whether to run the simulation; unset means ask.
    #[serde(default)]
    pub simulate: Option<bool>,

    /// Default log filter when neither `RUST_LOG` nor `--verbose` is given.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_speed() -> f64 {
    0.2
}

fn default_max_workers() -> usize {
    DEFAULT_MAX_WORKERS
}

fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for SjfConfig {
    fn default() -> Self {
        Self {
            speed: default_speed(),
            max_workers: default_max_workers(),
            simulate: None,
            log_level: default_log_level(),
        }
    }
}

impl SjfConfig {
    /// Loads `path`, or `sjf.toml` in the current directory when no path is
    /// given. A missing default file yields defaults; a missing explicit file
    /// is an error.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.exists() {
                    Self::from_file(path)?
                } else {
                    Self::default()
                }
            }
        };

        config.apply_speed_override(std::env::var(SPEED_ENV_VAR).ok().as_deref());
        Ok(config)
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        toml::from_str::<SjfConfig>(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))
    }

    // Unparseable values are ignored so a stray variable cannot block a run.
    fn apply_speed_override(&mut self, value: Option<&str>) {
        let Some(raw) = value else { return };
        match raw.trim().parse::<f64>() {
            Ok(speed) => self.speed = speed,
            Err(_) => tracing::warn!(value = raw, "ignoring unparseable {SPEED_ENV_VAR}"),
        }
    }
}
