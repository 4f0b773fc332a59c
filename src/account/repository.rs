use chrono::{DateTime, Utc};
use log::{debug, info, warn};

use crate::account::model::Account;
use crate::clock::Clock;
use crate::error::LedgerError;

/// An authenticated session, returned by [`AccountRepository::authenticate`]
#[derive(Debug, Clone, PartialEq)]
pub struct Session {
    username: String,
    logged_in_at: DateTime<Utc>,
}

impl Session {
    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn logged_in_at(&self) -> DateTime<Utc> {
        self.logged_in_at
    }
}

/// The in-memory account collection.
///
/// Usernames are unique: construction and [`insert`](Self::insert) reject an
/// account whose derived username is empty or already present.
#[derive(Debug, Default, Clone)]
pub struct AccountRepository {
    accounts: Vec<Account>,
}

impl AccountRepository {
    pub fn new(accounts: Vec<Account>) -> Result<Self, LedgerError> {
        let mut repo = Self::default();
        for account in accounts {
            repo.insert(account)?;
        }

        debug!("Account repository created with {} accounts", repo.len());
        Ok(repo)
    }

    pub fn insert(&mut self, account: Account) -> Result<(), LedgerError> {
        if account.username.is_empty() {
            return Err(LedgerError::EmptyUsername(account.owner));
        }

        if self.position(&account.username).is_some() {
            warn!(
                "Rejecting {}: username '{}' is already in use",
                account.owner, account.username
            );
            return Err(LedgerError::DuplicateUsername {
                username: account.username,
                owner: account.owner,
            });
        }

        self.accounts.push(account);
        Ok(())
    }

    pub fn find_by_username(&self, username: &str) -> Option<&Account> {
        self.accounts.iter().find(|acc| acc.username == username)
    }

    pub fn find_by_username_mut(&mut self, username: &str) -> Option<&mut Account> {
        self.accounts.iter_mut().find(|acc| acc.username == username)
    }

    /// Index of the first account with this username
    pub fn position(&self, username: &str) -> Option<usize> {
        self.accounts.iter().position(|acc| acc.username == username)
    }

    /// Look up an account and check its pin
    pub fn authenticate(&self, username: &str, pin: u32, clock: &dyn Clock) -> Option<Session> {
        match self.find_by_username(username) {
            Some(account) if account.pin == pin => {
                info!("User {} logged in", username);
                Some(Session {
                    username: account.username.clone(),
                    logged_in_at: clock.now(),
                })
            }
            Some(_) => {
                warn!("Wrong pin for user {}", username);
                None
            }
            None => {
                warn!("Login attempt for unknown user {}", username);
                None
            }
        }
    }

    /// The account behind a session, if it still exists
    pub fn account(&self, session: &Session) -> Option<&Account> {
        self.find_by_username(session.username())
    }

    /// Remove the first account with this username
    pub fn remove(&mut self, username: &str) -> Option<Account> {
        let index = self.position(username)?;
        Some(self.accounts.remove(index))
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Account> {
        self.accounts.iter()
    }

    pub fn usernames(&self) -> Vec<&str> {
        self.accounts.iter().map(|acc| acc.username.as_str()).collect()
    }
}
