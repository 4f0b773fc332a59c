use log::{debug, info, warn};

use crate::account::model::Account;
use crate::account::repository::{AccountRepository, Session};
use crate::clock::Clock;

/// Share of a requested loan that some earlier movement must exceed
pub const DEFAULT_LOAN_RATIO: f64 = 0.1;

/// Why a transfer was not admitted
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum TransferRejection {
    #[error("The logged in account no longer exists")]
    SessionAccountMissing,

    #[error("Transfer amount must be greater than zero")]
    InvalidAmount,

    #[error("No account with username '{0}'")]
    RecipientNotFound(String),

    #[error("Insufficient funds: balance {balance:.2}, requested {requested:.2}")]
    InsufficientFunds { balance: f64, requested: f64 },

    #[error("Cannot transfer to your own account")]
    SelfTransfer,
}

/// Why a loan was not admitted
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoanRejection {
    #[error("The logged in account no longer exists")]
    SessionAccountMissing,

    #[error("Loan amount must be greater than zero")]
    InvalidAmount,

    #[error("Loan requires a movement above {required:.2}")]
    InsufficientHistory { required: f64 },
}

/// Why an account was not closed
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum CloseRejection {
    #[error("The logged in account no longer exists")]
    SessionAccountMissing,

    #[error("Username does not match the logged in account")]
    UsernameMismatch,

    #[error("Incorrect pin")]
    IncorrectPin,
}

fn is_positive(amount: f64) -> bool {
    amount.is_finite() && amount > 0.0
}

/// Move `amount` from the session's account to `to_username`.
///
/// Checks run in order: positive amount, recipient exists, amount covered by
/// the sender's balance, recipient differs from the sender. Nothing is
/// changed unless every check passes. Each side then gets one movement
/// stamped with its own reading of the clock.
pub fn try_transfer(
    repo: &mut AccountRepository,
    session: &Session,
    to_username: &str,
    amount: f64,
    clock: &dyn Clock,
) -> Result<(), TransferRejection> {
    debug!(
        "Initiating transfer of {:.2} from {} to {}",
        amount,
        session.username(),
        to_username
    );

    if let Err(rejection) = check_transfer(repo, session, to_username, amount) {
        warn!("Transfer from {} rejected: {}", session.username(), rejection);
        return Err(rejection);
    }

    if let Some(source) = repo.find_by_username_mut(session.username()) {
        source.push_movement(-amount, clock.now());
    }
    if let Some(target) = repo.find_by_username_mut(to_username) {
        target.push_movement(amount, clock.now());
    }

    info!(
        "Transferred {:.2} from {} to {}",
        amount,
        session.username(),
        to_username
    );
    Ok(())
}

fn check_transfer(
    repo: &AccountRepository,
    session: &Session,
    to_username: &str,
    amount: f64,
) -> Result<(), TransferRejection> {
    let source = repo
        .account(session)
        .ok_or(TransferRejection::SessionAccountMissing)?;

    if !is_positive(amount) {
        return Err(TransferRejection::InvalidAmount);
    }

    let recipient = repo
        .find_by_username(to_username)
        .ok_or_else(|| TransferRejection::RecipientNotFound(to_username.to_string()))?;

    let balance = source.balance();
    if amount > balance {
        return Err(TransferRejection::InsufficientFunds {
            balance,
            requested: amount,
        });
    }

    if recipient.username == source.username {
        return Err(TransferRejection::SelfTransfer);
    }

    Ok(())
}

/// Boolean form of [`try_transfer`]
pub fn transfer(
    repo: &mut AccountRepository,
    session: &Session,
    to_username: &str,
    amount: f64,
    clock: &dyn Clock,
) -> bool {
    try_transfer(repo, session, to_username, amount, clock).is_ok()
}

/// Grant a loan when some earlier movement exceeds `amount * ratio`
pub fn try_request_loan(
    repo: &mut AccountRepository,
    session: &Session,
    amount: f64,
    ratio: f64,
    clock: &dyn Clock,
) -> Result<(), LoanRejection> {
    debug!("Loan of {:.2} requested by {}", amount, session.username());

    let account = match repo.find_by_username_mut(session.username()) {
        Some(account) => account,
        None => {
            warn!("Loan rejected: account {} is gone", session.username());
            return Err(LoanRejection::SessionAccountMissing);
        }
    };

    if !is_positive(amount) {
        warn!("Loan rejected for {}: invalid amount {}", account.username, amount);
        return Err(LoanRejection::InvalidAmount);
    }

    let required = amount * ratio;
    if !account.movements().iter().any(|m| m.amount > required) {
        warn!(
            "Loan of {:.2} rejected for {}: no movement above {:.2}",
            amount, account.username, required
        );
        return Err(LoanRejection::InsufficientHistory { required });
    }

    account.push_movement(amount, clock.now());

    info!("Loan of {:.2} granted to {}", amount, account.username);
    Ok(())
}

/// Boolean form of [`try_request_loan`] using [`DEFAULT_LOAN_RATIO`]
pub fn request_loan(
    repo: &mut AccountRepository,
    session: &Session,
    amount: f64,
    clock: &dyn Clock,
) -> bool {
    try_request_loan(repo, session, amount, DEFAULT_LOAN_RATIO, clock).is_ok()
}

/// Remove the session's account after confirming its username and pin.
///
/// Returns the removed account. The session must not be used afterwards;
/// every operation on it is rejected once its account is gone.
pub fn try_close_account(
    repo: &mut AccountRepository,
    session: &Session,
    username: &str,
    pin: u32,
) -> Result<Account, CloseRejection> {
    let account = repo
        .account(session)
        .ok_or(CloseRejection::SessionAccountMissing)?;

    if username != session.username() {
        warn!("Close rejected for {}: username mismatch", session.username());
        return Err(CloseRejection::UsernameMismatch);
    }

    if pin != account.pin {
        warn!("Close rejected for {}: incorrect pin", session.username());
        return Err(CloseRejection::IncorrectPin);
    }

    let removed = repo
        .remove(username)
        .ok_or(CloseRejection::SessionAccountMissing)?;

    info!("Account {} closed, {} accounts remain", removed.username, repo.len());
    Ok(removed)
}

/// Boolean form of [`try_close_account`]
pub fn close_account(
    repo: &mut AccountRepository,
    session: &Session,
    username: &str,
    pin: u32,
) -> bool {
    try_close_account(repo, session, username, pin).is_ok()
}
