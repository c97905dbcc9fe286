use std::io::{self, BufRead, Write};

use lottery_core::UserInterface;

fn write_line(out: &mut impl Write, message: &str) -> io::Result<()> {
    writeln!(out, "{message}")?;
    out.flush()
}

/// Reads player input from stdin and writes the game dialogue to stdout.
#[derive(Debug, Default)]
pub struct ConsoleUi;

impl UserInterface for ConsoleUi {
    fn write(&mut self, message: &str) {
        if let Err(err) = write_line(&mut io::stdout().lock(), message) {
            tracing::warn!(%err, "failed to write to stdout");
        }
    }

    fn read(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(err) => {
                tracing::warn!(%err, "failed to read from stdin");
                None
            }
        }
    }
}
