// Terminal front end
// An interactive prompt standing in for the browser page: it reads
// commands, drives the ledger and prints the account view.

pub mod app;
pub mod commands;
pub mod utils;

pub use app::{App, Flow};
pub use commands::Command;

use anyhow::Result;
use log::debug;
use std::io;

use crate::cli::utils::{print_error, read_line};

/// Run the prompt loop until `quit` or end of input
pub fn run(app: &mut App) -> Result<()> {
    let stdout = io::stdout();

    loop {
        app.check_expiry(&mut stdout.lock())?;

        let line = match read_line(&app.prompt())? {
            Some(line) => line,
            None => {
                debug!("End of input, leaving prompt loop");
                return Ok(());
            }
        };

        if line.is_empty() {
            continue;
        }

        let mut out = stdout.lock();
        match line.parse::<Command>() {
            Ok(command) => match app.execute(command, &mut out) {
                Ok(Flow::Quit) => return Ok(()),
                Ok(Flow::Continue) => {}
                Err(e) => print_error(&mut out, &e.to_string())?,
            },
            Err(e) => print_error(&mut out, &e.to_string())?,
        }
    }
}
