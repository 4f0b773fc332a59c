// Display formatting
// Amount strings, timer labels and the welcome banner. Date labels live in
// the `dates` submodule.

pub mod dates;

pub use dates::{days_passed, format_date, format_login_timestamp, relative_date, DateStyle};

/// Banner shown while nobody is logged in
pub const LOGGED_OUT_MESSAGE: &str = "Log in to get started";

/// Two-decimal amount, sign kept
pub fn format_amount(value: f64) -> String {
    format!("{:.2}", value)
}

/// Two-decimal amount followed by the currency code
pub fn format_currency(value: f64, currency: &str) -> String {
    format!("{} {}", format_amount(value), currency)
}

/// Remaining session time as `mm:ss`
pub fn timer_label(remaining_seconds: u32) -> String {
    format!("{:02}:{:02}", remaining_seconds / 60, remaining_seconds % 60)
}

pub fn welcome_message(owner: &str) -> String {
    let first_name = owner.split_whitespace().next().unwrap_or("");
    format!("Welcome back, {}!", first_name)
}
