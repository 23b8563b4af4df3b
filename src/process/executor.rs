use std::io::{self, Write};
use std::os::unix::process::CommandExt;
use std::process::{Command, Stdio};

use tracing::{debug, warn};

use super::redirect::{open_input, open_output};
use super::{Pid, ProcessError};
use crate::core::parse::ParsedCommand;
use crate::core::state::ShellState;
use crate::jobs::JobError;

/// Runs a non-builtin command, in the background or synchronously.
pub struct ProcessExecutor;

impl ProcessExecutor {
    /// A foreground command that cannot be started leaves `last_status` at 1.
    /// Background launch failures are reported without touching it.
    pub fn run(
        cmd: &ParsedCommand,
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), ProcessError> {
        match Self::launch(cmd, state, out) {
            Ok(Some(pid)) => state.wait_foreground(pid),
            Ok(None) => Ok(()),
            Err(e) => {
                if !cmd.background && !matches!(e, ProcessError::Job(_)) {
                    state.last_status = 1;
                }
                Err(e)
            }
        }
    }

    /// Returns the pid to wait on for a foreground command.
    fn launch(
        cmd: &ParsedCommand,
        state: &ShellState,
        out: &mut dyn Write,
    ) -> Result<Option<Pid>, ProcessError> {
        let mut command = Command::new(&cmd.program);
        command.args(&cmd.args);
        if let Some(path) = &cmd.input {
            command.stdin(Stdio::from(open_input(path)?));
        }
        if let Some(path) = &cmd.output {
            command.stdout(Stdio::from(open_output(path)?));
        }
        if cmd.background {
            // keep Ctrl-C/Ctrl-Z from the terminal away from background jobs
            command.process_group(0);
        }

        // The reaper cannot waitpid while this lock is held, so the child is
        // either registered or attached before any of its changes are seen.
        let mut jobs = state.jobs.lock();
        if cmd.background && jobs.table.is_full() {
            return Err(JobError::TableFull.into());
        }

        if let Err(e) = io::stdout().flush() {
            warn!("failed to flush stdout before spawn: {}", e);
        }
        let child = command.spawn().map_err(|e| match e.kind() {
            io::ErrorKind::NotFound => ProcessError::CommandNotFound(cmd.program.clone()),
            io::ErrorKind::PermissionDenied => ProcessError::ExecFailed(cmd.program.clone(), e),
            _ => ProcessError::ForkFailed(e),
        })?;
        let pid = Pid::from_raw(child.id() as libc::pid_t);

        if cmd.background {
            let id = jobs.table.add(pid, &cmd.line)?;
            drop(jobs);
            debug!(%pid, id, line = %cmd.line, "background job started");
            if let Err(e) = writeln!(out, "[{}] {}", id, pid) {
                warn!(%pid, "failed to announce job: {}", e);
            }
            return Ok(None);
        }

        jobs.attach(pid, &cmd.line);
        debug!(%pid, line = %cmd.line, "foreground process started");
        Ok(Some(pid))
    }
}
