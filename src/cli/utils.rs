use anyhow::Result;
use std::io::{self, BufRead, Write};

/// Read a line of input from the terminal.
///
/// Returns `None` once stdin is closed.
pub fn read_line(prompt: &str) -> Result<Option<String>> {
    print!("{}", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    let read = io::stdin().lock().read_line(&mut input)?;
    if read == 0 {
        return Ok(None);
    }

    // Trim whitespace and newlines
    Ok(Some(input.trim().to_string()))
}

pub fn print_success(out: &mut dyn Write, message: &str) -> Result<()> {
    writeln!(out, "✅ {}", message)?;
    Ok(())
}

pub fn print_error(out: &mut dyn Write, message: &str) -> Result<()> {
    writeln!(out, "❌ {}", message)?;
    Ok(())
}

pub fn print_warning(out: &mut dyn Write, message: &str) -> Result<()> {
    writeln!(out, "⚠️ {}", message)?;
    Ok(())
}

pub fn print_info(out: &mut dyn Write, message: &str) -> Result<()> {
    writeln!(out, "{}", message)?;
    Ok(())
}

pub fn print_header(out: &mut dyn Write, title: &str) -> Result<()> {
    writeln!(out)?;
    writeln!(out, "{}", title)?;
    writeln!(out, "{}", "-".repeat(title.chars().count()))?;
    Ok(())
}
