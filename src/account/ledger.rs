use log::debug;
use serde::Serialize;

use crate::account::model::{Account, Movement};
use crate::format::format_amount;

/// Smallest per-deposit interest that is paid out
pub const INTEREST_THRESHOLD: f64 = 1.0;

/// Signed sum of all movements
pub fn balance(movements: &[Movement]) -> f64 {
    movements.iter().map(|m| m.amount).sum()
}

/// Sum of deposits
pub fn income(movements: &[Movement]) -> f64 {
    movements
        .iter()
        .map(|m| m.amount)
        .filter(|amount| *amount > 0.0)
        .sum()
}

/// Sum of withdrawals (never positive)
pub fn outgoing(movements: &[Movement]) -> f64 {
    movements
        .iter()
        .map(|m| m.amount)
        .filter(|amount| *amount < 0.0)
        .sum()
}

/// Interest earned on deposits at `rate` percent.
///
/// Interest is computed per deposit. A deposit only contributes when its own
/// interest reaches [`INTEREST_THRESHOLD`]; smaller ones contribute nothing.
pub fn qualifying_interest(movements: &[Movement], rate: f64) -> f64 {
    interest_above(movements, rate, INTEREST_THRESHOLD)
}

/// Same as [`qualifying_interest`] with an explicit threshold
pub fn interest_above(movements: &[Movement], rate: f64, threshold: f64) -> f64 {
    movements
        .iter()
        .map(|m| m.amount)
        .filter(|amount| *amount > 0.0)
        .map(|deposit| deposit * rate / 100.0)
        .filter(|interest| *interest >= threshold)
        .sum()
}

/// Balance, income, outgoing and interest of one account
#[derive(Debug, Serialize, Clone, Copy, PartialEq)]
pub struct Summary {
    pub balance: f64,
    pub income: f64,
    pub outgoing: f64,
    pub interest: f64,
}

/// Two-decimal strings for each summary value
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct SummaryDisplay {
    pub balance: String,
    pub income: String,
    pub outgoing: String,
    pub interest: String,
}

impl Summary {
    pub fn for_account(account: &Account, interest_threshold: f64) -> Self {
        let movements = account.movements();
        let summary = Self {
            balance: balance(movements),
            income: income(movements),
            outgoing: outgoing(movements),
            interest: interest_above(movements, account.interest_rate, interest_threshold),
        };

        debug!(
            "Summary for {}: balance {:.2}, in {:.2}, out {:.2}, interest {:.2}",
            account.username, summary.balance, summary.income, summary.outgoing, summary.interest
        );

        summary
    }

    pub fn display(&self) -> SummaryDisplay {
        SummaryDisplay {
            balance: format_amount(self.balance),
            income: format_amount(self.income),
            outgoing: format_amount(self.outgoing),
            interest: format_amount(self.interest),
        }
    }
}

/// Summary using the default interest threshold
pub fn summary(account: &Account) -> Summary {
    Summary::for_account(account, INTEREST_THRESHOLD)
}
