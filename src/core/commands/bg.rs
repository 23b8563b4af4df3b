use std::io::Write;

use super::{Command, CommandError};
use crate::core::state::ShellState;
use crate::jobs::{JobError, JobRef, JobState};
use crate::process::signal;

#[derive(Clone)]
pub struct BgCommand;

impl Default for BgCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl BgCommand {
    pub fn new() -> Self {
        Self
    }
}

impl Command for BgCommand {
    fn execute(
        &self,
        args: &[String],
        state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let job_ref = JobRef::parse(args.first().map(String::as_str))?;

        let announcement = {
            let mut jobs = state.jobs.lock();
            let index = jobs.table.resolve(&job_ref)?;
            let job = jobs.table.get_mut(index).ok_or(JobError::NoCurrentJob)?;
            if job.state == JobState::Running {
                return Err(JobError::AlreadyRunning(job.id).into());
            }
            signal::resume(job.pid)?;
            job.state = JobState::Running;
            format!("[{}] {} &", job.id, job.command_line)
        };

        writeln!(out, "{}", announcement)?;
        out.flush()?;
        Ok(())
    }
}
