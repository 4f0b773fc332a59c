// Bankist ledger library
// In-memory demo accounts, the ledger arithmetic over their movements,
// transfer/loan/close validation, display formatting and the session timer.

pub mod account;
pub mod cli;
pub mod clock;
pub mod config;
pub mod error;
pub mod format;
pub mod seed;
pub mod session;

pub use account::{
    Account, AccountRepository, Movement, MovementKind, MovementRow, Session, SortToggle, Summary,
};
pub use clock::{Clock, FixedClock, SystemClock};
pub use error::LedgerError;
pub use session::{SessionTimer, TimerHandle};
