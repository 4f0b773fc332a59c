use anyhow::{anyhow, bail, Result};
use std::str::FromStr;

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Login { username: String, pin: u32 },
    Transfer { to: String, amount: f64 },
    Loan { amount: f64 },
    Close { username: String, pin: u32 },
    Sort,
    Summary,
    Movements,
    Logout,
    Help,
    Quit,
}

pub const HELP: &str = "\
Commands:
  login <username> <pin>      Log in
  transfer <username> <amount> Send money to another account
  loan <amount>               Request a loan
  close <username> <pin>      Close the logged in account
  movements                   Show movements
  sort                        Toggle sorting movements by amount
  summary                     Show balance and totals
  logout                      Log out
  help                        Show this help
  quit                        Exit";

fn parse_pin(value: &str) -> Result<u32> {
    value
        .parse::<u32>()
        .map_err(|_| anyhow!("Invalid pin: {}", value))
}

fn parse_amount(value: &str) -> Result<f64> {
    match value.parse::<f64>() {
        Ok(amount) if amount.is_finite() => Ok(amount),
        _ => Err(anyhow!("Invalid amount: {}", value)),
    }
}

impl FromStr for Command {
    type Err = anyhow::Error;

    fn from_str(line: &str) -> Result<Self> {
        let words: Vec<&str> = line.split_whitespace().collect();
        let (name, args) = match words.split_first() {
            Some((name, args)) => (name.to_lowercase(), args),
            None => bail!("Empty command"),
        };

        let command = match (name.as_str(), args) {
            ("login", [username, pin]) => Command::Login {
                username: username.to_string(),
                pin: parse_pin(pin)?,
            },
            ("transfer", [to, amount]) => Command::Transfer {
                to: to.to_string(),
                amount: parse_amount(amount)?,
            },
            ("loan", [amount]) => Command::Loan {
                amount: parse_amount(amount)?,
            },
            ("close", [username, pin]) => Command::Close {
                username: username.to_string(),
                pin: parse_pin(pin)?,
            },
            ("sort", []) => Command::Sort,
            ("summary", []) => Command::Summary,
            ("movements", []) => Command::Movements,
            ("logout", []) => Command::Logout,
            ("help", []) => Command::Help,
            ("quit", []) | ("exit", []) => Command::Quit,
            ("login", _) | ("close", _) => bail!("Usage: {} <username> <pin>", name),
            ("transfer", _) => bail!("Usage: transfer <username> <amount>"),
            ("loan", _) => bail!("Usage: loan <amount>"),
            _ => bail!("Unknown command '{}'. Type 'help' for a list of commands", line.trim()),
        };

        Ok(command)
    }
}
