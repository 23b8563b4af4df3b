use std::io::Write;

use tracing::debug;

use super::{Command, CommandError};
use crate::core::state::ShellState;
use crate::jobs::{JobError, JobRef, JobState};
use crate::process::signal;

/// Brings a job back to the foreground and waits on it.
#[derive(Clone)]
pub struct FgCommand;

impl Default for FgCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl FgCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for FgCommand {
    fn execute(
        &self,
        args: &[String],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let job_ref = JobRef::parse(args.first().map(String::as_str))?;

        // Detach from the table and attach as foreground in one critical
        // section so the reaper sees the process in exactly one of them.
        let (pid, command_line) = {
            let mut jobs = state.jobs.lock();
            let index = jobs.table.resolve(&job_ref)?;
            let job = jobs.table.get(index).cloned().ok_or(JobError::NoCurrentJob)?;
            if job.state == JobState::Stopped {
                signal::resume(job.pid)?;
            }
            jobs.table.remove(index);
            jobs.attach(job.pid, &job.command_line);
            (job.pid, job.command_line)
        };

        debug!(%pid, "job moved to foreground");
        writeln!(out, "{}", command_line)?;
        out.flush()?;
        state.wait_foreground(pid)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::commands::tests::detached_state;
    use crate::process::Pid;

    #[test]
    fn test_fg_without_jobs() {
        let mut state = detached_state(4);
        state.last_status = 5;
        let mut out = Vec::new();

        let result = FgCommand::new().execute(&[], &mut state, &mut out);
        assert!(matches!(result, Err(CommandError::JobError(JobError::NoCurrentJob))));
        assert_eq!(state.last_status, 5);
        assert_eq!(state.jobs.foreground_pid(), None);
        assert!(out.is_empty());
    }

    #[test]
    fn test_fg_unknown_reference() {
        let mut state = detached_state(4);
        state.jobs.lock().table.add(Pid::from_raw(10), "sleep 5").unwrap();
        let mut out = Vec::new();

        for arg in ["%7", "seven"] {
            let result = FgCommand::new().execute(&[arg.to_string()], &mut state, &mut out);
            assert!(matches!(
                result,
                Err(CommandError::JobError(JobError::UnknownJobReference(_)))
            ));
        }
        assert_eq!(state.jobs.lock().table.len(), 1);
        assert_eq!(state.jobs.foreground_pid(), None);
    }
}
