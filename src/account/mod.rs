// Account module
// This module provides the account model, the ledger arithmetic over its
// movements, the in-memory repository and the transfer/loan/close
// operations.

pub mod ledger;
pub mod model;
pub mod movements;
pub mod operations;
pub mod repository;

pub use ledger::{summary, Summary, SummaryDisplay, INTEREST_THRESHOLD};
pub use model::{create_usernames, derive_username, Account, Movement, MovementKind};
pub use movements::{list_movements, MovementRow, SortToggle};
pub use operations::{
    close_account, request_loan, transfer, try_close_account, try_request_loan, try_transfer,
    CloseRejection, LoanRejection, TransferRejection, DEFAULT_LOAN_RATIO,
};
pub use repository::{AccountRepository, Session};
