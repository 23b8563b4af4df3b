use std::io::Write;

use super::{Command, CommandError};
use crate::core::state::ShellState;

#[derive(Clone)]
pub struct EchoCommand;

impl Default for EchoCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl EchoCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for EchoCommand {
    fn execute(
        &self,
        args: &[String],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        match args {
            [only] if only == "$?" => writeln!(out, "{}", state.last_status)?,
            _ => writeln!(out, "{}", args.join(" "))?,
        }
        out.flush()?;
        Ok(())
    }
}
