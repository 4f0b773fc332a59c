/// Errors raised while building the account collection
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LedgerError {
    #[error("Username '{username}' derived for {owner} is already taken")]
    DuplicateUsername { username: String, owner: String },

    #[error("Owner name '{0}' does not produce a username")]
    EmptyUsername(String),

    #[error("Invalid seed data: {0}")]
    InvalidSeed(String),
}
