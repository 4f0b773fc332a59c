use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use anyhow::{anyhow, Result, Context};

use crate::account::{DEFAULT_LOAN_RATIO, INTEREST_THRESHOLD};
use crate::session::DEFAULT_TIMEOUT_SECONDS;

/// Session configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SessionConfig {
    /// Inactivity countdown length in ticks
    pub timeout_seconds: u32,
    /// Length of one tick in milliseconds
    pub tick_millis: u64,
}

/// Ledger rules configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct LedgerConfig {
    /// A loan needs an earlier movement above `amount * loan_ratio`
    pub loan_ratio: f64,
    /// Per-deposit interest below this is not paid
    pub interest_threshold: f64,
    /// Optional JSON seed file replacing the built-in demo accounts
    pub seed_path: Option<String>,
}

/// Global application configuration
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Config {
    /// Application name
    pub app_name: String,
    /// Application version
    pub version: String,
    /// Session configuration
    pub session: SessionConfig,
    /// Ledger configuration
    pub ledger: LedgerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            app_name: "Bankist".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            session: SessionConfig {
                timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
                tick_millis: 1000,
            },
            ledger: LedgerConfig {
                loan_ratio: DEFAULT_LOAN_RATIO,
                interest_threshold: INTEREST_THRESHOLD,
                seed_path: None,
            },
        }
    }
}

impl Config {
    /// Reject settings the session timer or loan rule cannot work with
    pub fn validate(&self) -> Result<()> {
        if self.session.timeout_seconds == 0 {
            return Err(anyhow!("session.timeout_seconds must be at least 1"));
        }
        if self.session.tick_millis == 0 {
            return Err(anyhow!("session.tick_millis must be at least 1"));
        }
        if !self.ledger.loan_ratio.is_finite() || self.ledger.loan_ratio < 0.0 {
            return Err(anyhow!(
                "ledger.loan_ratio must be a non-negative number, got {}",
                self.ledger.loan_ratio
            ));
        }
        Ok(())
    }
}

/// Load configuration from file, creating it with defaults if missing
pub fn load_config(path: &str) -> Result<Config> {
    if !Path::new(path).exists() {
        let default_config = Config::default();
        save_config(path, &default_config)?;
        return Ok(default_config);
    }

    let mut file = File::open(path).context(format!("Failed to open config file: {}", path))?;
    let mut contents = String::new();
    file.read_to_string(&mut contents).context("Failed to read config file")?;

    let config: Config = match path.ends_with(".toml") {
        true => toml::from_str(&contents).context("Failed to parse TOML config")?,
        false => serde_json::from_str(&contents).context("Failed to parse JSON config")?,
    };

    config
        .validate()
        .context(format!("Invalid configuration in {}", path))?;

    Ok(config)
}

/// Save configuration to file
pub fn save_config(path: &str, config: &Config) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent).context("Failed to create config directory")?;
        }
    }

    let serialized = match path.ends_with(".toml") {
        true => toml::to_string_pretty(config).context("Failed to serialize config to TOML")?,
        false => serde_json::to_string_pretty(config).context("Failed to serialize config to JSON")?,
    };

    std::fs::write(path, serialized).context(format!("Failed to write config to file: {}", path))?;

    Ok(())
}
