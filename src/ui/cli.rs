use crate::ui::io::{IO, NoteRow};
use crate::{MenuError, NoteError, Result};

use colored::Colorize;
use log::trace;
use std::io::{self, Write};
use tabled::{Table, settings::Style};

pub struct Cli;

impl Cli {
    fn prompt() -> Result<()> {
        print!("> ");
        io::stdout()
            .flush()
            .map_err(|e| NoteError::Menu(MenuError::StdoutWriteError(e)))?;
        trace!("Flushed stdout");
        Ok(())
    }

    /// Reads one raw line. `MenuError::EndOfInput` once stdin is closed.
    fn read_line() -> Result<String> {
        let mut line = String::new();
        let read = io::stdin()
            .read_line(&mut line)
            .map_err(|e| NoteError::Menu(MenuError::StdinReadError(e)))?;
        if read == 0 {
            return Err(MenuError::EndOfInput.into());
        }
        Ok(line)
    }
}

impl IO for Cli {
    /// Reads a single line of text and returns it trimmed.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout or reading from stdin fails, or
    /// stdin is closed.
    fn get_input(&self) -> Result<String> {
        Self::prompt()?;
        let input = Self::read_line()?.trim().to_string();
        println!();
        trace!("Got input: {input}");
        Ok(input)
    }

    /// Reads lines from stdin until a line exactly matching `stop_at` (trimmed) is entered,
    /// concatenates the preceding lines and returns them without the final newline.
    ///
    /// # Errors
    ///
    /// Returns an error if writing to stdout or reading from stdin fails, or
    /// stdin is closed before `stop_at`.
    fn get_input_until(&self, stop_at: &str) -> Result<String> {
        let mut input = String::new();
        loop {
            Self::prompt()?;
            let line = Self::read_line()?;
            trace!("Got input: {}", line.trim_end());

            if line.trim() == stop_at {
                break;
            }
            input += &line;
        }
        println!();
        Ok(input.trim_end_matches(['\n', '\r']).to_string())
    }

    fn show_menu(&self, options: &[impl std::fmt::Display]) {
        self.show_title("Choose an option");
        for o in options {
            println!("{o}");
        }
        println!();
    }

    /// Renders the notes in `psql` style
    fn show_notes_list(&self, rows: Vec<NoteRow>) {
        let mut table = Table::new(rows);
        table.with(Style::psql());
        println!("{table}");
    }

    fn show_title(&self, title: &str) {
        println!("\n{}\n", title.bold());
    }

    fn show_text(&self, msg: &str) {
        println!("{msg}");
    }
}
