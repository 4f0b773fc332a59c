use anyhow::{Context, Result};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::account::{Account, AccountRepository, Movement};
use crate::error::LedgerError;

const DEMO_ACCOUNTS: &str = include_str!("../data/demo_accounts.json");

/// Account as written in a seed file. The username is always derived.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct SeedAccount {
    pub owner: String,
    pub pin: u32,
    pub interest_rate: f64,
    pub currency: String,
    pub locale: String,
    #[serde(default)]
    pub movements: Vec<Movement>,
}

impl From<SeedAccount> for Account {
    fn from(seed: SeedAccount) -> Self {
        Account::new(&seed.owner, seed.pin, seed.interest_rate, &seed.currency, &seed.locale)
            .with_movements(seed.movements)
    }
}

/// Parse a JSON array of seed accounts
pub fn parse_accounts(json: &str) -> Result<Vec<Account>, LedgerError> {
    let seeds: Vec<SeedAccount> =
        serde_json::from_str(json).map_err(|e| LedgerError::InvalidSeed(e.to_string()))?;

    Ok(seeds.into_iter().map(Account::from).collect())
}

/// The two built-in demo accounts
pub fn demo_accounts() -> Result<Vec<Account>, LedgerError> {
    parse_accounts(DEMO_ACCOUNTS)
}

/// Read accounts from a JSON seed file
pub fn load_accounts(path: &Path) -> Result<Vec<Account>> {
    debug!("Loading seed accounts from {}", path.display());

    let contents = std::fs::read_to_string(path)
        .context(format!("Failed to read seed file: {}", path.display()))?;
    let accounts = parse_accounts(&contents)
        .context(format!("Failed to parse seed file: {}", path.display()))?;

    info!("Loaded {} accounts from {}", accounts.len(), path.display());
    Ok(accounts)
}

/// Build the repository from a seed file, or the demo accounts without one
pub fn load_repository(path: Option<&Path>) -> Result<AccountRepository> {
    let accounts = match path {
        Some(path) => load_accounts(path)?,
        None => demo_accounts().context("Built-in demo accounts are invalid")?,
    };

    AccountRepository::new(accounts).context("Failed to build account repository")
}
