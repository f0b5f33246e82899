use anyhow::{bail, Result};
use colored::Colorize;
use console::Term;

use crate::domain::entities::shared_source::SourceSpec;

/// Interactive selection of a single shared source
pub struct EntryPrompt {
    terminal: Term,
}

impl EntryPrompt {
    pub fn new() -> Self {
        Self {
            terminal: Term::stderr(),
        }
    }

    /// Ask which entry to pull; returns its index in `specs`
    ///
    /// Fails when stdin/stderr is not an interactive terminal.
    pub fn select(&self, specs: &[SourceSpec]) -> Result<usize> {
        if !self.terminal.features().is_attended() {
            bail!("no terminal to choose a shared source from; pass --all or --target <outDir>");
        }

        self.terminal
            .write_line(&format!("{} Which shared source do you want to pull?", "?".yellow().bold()))?;
        for (index, spec) in specs.iter().enumerate() {
            self.terminal
                .write_line(&format!("  {}) {}", index + 1, spec.display_name()))?;
        }

        loop {
            self.terminal
                .write_str(&format!("Select [1-{}]: ", specs.len()))?;
            let input = self.terminal.read_line()?;
            match parse_choice(&input, specs.len()) {
                Some(index) => return Ok(index),
                None => self
                    .terminal
                    .write_line(&format!("{}", "Please enter a number from the list.".red()))?,
            }
        }
    }
}

impl Default for EntryPrompt {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse a 1-based menu choice into a 0-based index
fn parse_choice(input: &str, len: usize) -> Option<usize> {
    input
        .trim()
        .parse::<usize>()
        .ok()
        .filter(|choice| (1..=len).contains(choice))
        .map(|choice| choice - 1)
}
