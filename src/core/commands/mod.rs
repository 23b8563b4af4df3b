use std::collections::BTreeMap;
use std::io::{self, Write};

mod bg;
mod echo;
mod exit;
mod fg;
mod jobs;

pub use bg::BgCommand;
pub use echo::EchoCommand;
pub use exit::{exit_code, ExitCommand};
pub use fg::FgCommand;
pub use jobs::JobsCommand;

use tracing::trace;

use super::parse::{parse, ParsedCommand};
use super::state::ShellState;
use crate::jobs::JobError;
use crate::process::executor::ProcessExecutor;
use crate::process::redirect::RedirectGuard;
use crate::process::ProcessError;

#[derive(Debug)]
pub enum CommandError {
    IoError(std::io::Error),
    ProcessError(ProcessError),
    JobError(JobError),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::IoError(err) => write!(f, "IO error: {}", err),
            CommandError::ProcessError(err) => write!(f, "{}", err),
            CommandError::JobError(err) => write!(f, "{}", err),
        }
    }
}

impl std::error::Error for CommandError {}

impl From<std::io::Error> for CommandError {
    fn from(err: std::io::Error) -> Self {
        CommandError::IoError(err)
    }
}

impl From<ProcessError> for CommandError {
    fn from(err: ProcessError) -> Self {
        match err {
            ProcessError::Job(e) => CommandError::JobError(e),
            other => CommandError::ProcessError(other),
        }
    }
}

impl From<JobError> for CommandError {
    fn from(err: JobError) -> Self {
        CommandError::JobError(err)
    }
}

pub trait Command {
    fn execute(
        &self,
        args: &[String],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), CommandError>;
}

#[derive(Clone)]
enum CommandType {
    Echo(EchoCommand),
    Exit(ExitCommand),
    Jobs(JobsCommand),
    Fg(FgCommand),
    Bg(BgCommand),
}

impl Command for CommandType {
    fn execute(
        &self,
        args: &[String],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        match self {
            CommandType::Echo(cmd) => cmd.execute(args, state, out),
            CommandType::Exit(cmd) => cmd.execute(args, state, out),
            CommandType::Jobs(cmd) => cmd.execute(args, state, out),
            CommandType::Fg(cmd) => cmd.execute(args, state, out),
            CommandType::Bg(cmd) => cmd.execute(args, state, out),
        }
    }
}

/// Routes a command line to a builtin or to an external process.
#[derive(Clone)]
pub struct CommandExecutor {
    commands: BTreeMap<String, CommandType>,
}

impl Default for CommandExecutor {
    fn default() -> Self {
        Self::new()
    }
}

impl CommandExecutor {
    pub fn new() -> Self {
        let mut commands = BTreeMap::new();
        commands.insert("echo".to_string(), CommandType::Echo(EchoCommand::new()));
        commands.insert("exit".to_string(), CommandType::Exit(ExitCommand::new()));
        commands.insert("jobs".to_string(), CommandType::Jobs(JobsCommand::new()));
        commands.insert("fg".to_string(), CommandType::Fg(FgCommand::new()));
        commands.insert("bg".to_string(), CommandType::Bg(BgCommand::new()));
        Self { commands }
    }

    pub fn dispatch(&self, line: &str, state: &mut ShellState) -> Result<(), CommandError> {
        let Some(cmd) = parse(line) else {
            return Ok(());
        };
        trace!(?cmd, "dispatching");
        match self.commands.get(&cmd.program) {
            Some(builtin) => self.run_builtin(builtin, &cmd, state),
            None => Ok(ProcessExecutor::run(&cmd, state, &mut io::stdout())?),
        }
    }

    /// Builtins run in the shell's own process, so redirection is applied to
    /// the shell's descriptors and undone by the guard afterwards.
    fn run_builtin(
        &self,
        builtin: &CommandType,
        cmd: &ParsedCommand,
        state: &mut ShellState,
    ) -> Result<(), CommandError> {
        let guard = RedirectGuard::apply(cmd.input.as_deref(), cmd.output.as_deref())?;
        let result = builtin.execute(&cmd.args, state, &mut io::stdout());
        drop(guard);
        result
    }
}
