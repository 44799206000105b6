//! User interaction seam.
//!
//! The rare interactive inputs (bucket name, action selection) go through a
//! capability trait chosen at process startup and injected into the action
//! pipelines, instead of platform branching inside them.

use std::io::{self, BufRead, Write};

pub trait UserPrompt {
    /// Ask the user for a line of input.
    fn input(&self, title: &str) -> io::Result<String>;
}

/// Interactive terminal implementation (stdin/stdout).
pub struct TerminalPrompt;

impl UserPrompt for TerminalPrompt {
    fn input(&self, title: &str) -> io::Result<String> {
        print!("{title}");
        io::stdout().flush()?;
        let mut line = String::new();
        io::stdin().lock().read_line(&mut line)?;
        Ok(line.trim().to_string())
    }
}
