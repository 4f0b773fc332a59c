use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Movement kind, decided by the sign of the amount
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    Deposit,
    Withdrawal,
}

impl MovementKind {
    pub fn as_str(&self) -> &str {
        match self {
            MovementKind::Deposit => "deposit",
            MovementKind::Withdrawal => "withdrawal",
        }
    }

    /// Positive amounts are deposits; everything else is shown as a withdrawal
    pub fn from_amount(amount: f64) -> Self {
        if amount > 0.0 {
            MovementKind::Deposit
        } else {
            MovementKind::Withdrawal
        }
    }
}

/// One entry of an account's history: a signed amount and when it happened
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Movement {
    pub amount: f64,
    pub date: DateTime<Utc>,
}

impl Movement {
    pub fn new(amount: f64, date: DateTime<Utc>) -> Self {
        Self { amount, date }
    }

    pub fn kind(&self) -> MovementKind {
        MovementKind::from_amount(self.amount)
    }
}

/// Account model
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct Account {
    /// Full display name
    pub owner: String,
    /// Login handle derived from `owner` when the account is created
    pub username: String,
    pub pin: u32,
    /// Interest rate in percent (1.2 means 1.2%)
    pub interest_rate: f64,
    pub currency: String,
    pub locale: String,
    movements: Vec<Movement>,
}

impl Account {
    pub fn new(owner: &str, pin: u32, interest_rate: f64, currency: &str, locale: &str) -> Self {
        Self {
            owner: owner.to_string(),
            username: derive_username(owner),
            pin,
            interest_rate,
            currency: currency.to_string(),
            locale: locale.to_string(),
            movements: Vec::new(),
        }
    }

    pub fn with_movements(mut self, movements: Vec<Movement>) -> Self {
        self.movements = movements;
        self
    }

    /// Movements in chronological (insertion) order
    pub fn movements(&self) -> &[Movement] {
        &self.movements
    }

    pub fn push_movement(&mut self, amount: f64, date: DateTime<Utc>) {
        self.movements.push(Movement::new(amount, date));
    }

    /// Sum of all movements
    pub fn balance(&self) -> f64 {
        super::ledger::balance(&self.movements)
    }
}

/// Derive a login handle from an owner's full name.
///
/// Takes the lowercase initial of every whitespace separated word, in order:
/// "Jonas Schmedtmann" becomes "js". An empty name yields an empty handle.
pub fn derive_username(owner: &str) -> String {
    owner
        .to_lowercase()
        .split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

/// Set the username of every account from its owner name
pub fn create_usernames(accounts: &mut [Account]) {
    for account in accounts.iter_mut() {
        account.username = derive_username(&account.owner);
    }
}
