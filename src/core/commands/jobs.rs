use std::io::Write;

use super::{Command, CommandError};
use crate::core::state::ShellState;

#[derive(Clone)]
pub struct JobsCommand;

impl Default for JobsCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl JobsCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for JobsCommand {
    fn execute(
        &self,
        _args: &[String],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let listing: Vec<String> = state.jobs.lock().table.iter().map(|j| j.listing()).collect();
        for row in listing {
            writeln!(out, "{}", row)?;
        }
        out.flush()?;
        Ok(())
    }
}
