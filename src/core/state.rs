use std::sync::mpsc::Receiver;

use tracing::debug;

use crate::process::control::{ForegroundOutcome, JobControl};
use crate::process::reaper::StatusPrinter;
use crate::process::{Pid, ProcessError};

/// Everything the dispatcher mutates, owned by the main flow.
///
/// The job table and foreground slot live behind `jobs` because the reaper
/// thread updates them too; `last_status` is only ever touched here.
pub struct ShellState {
    pub last_status: i32,
    pub jobs: JobControl,
    pub printer: StatusPrinter,
    outcomes: Receiver<ForegroundOutcome>,
}

impl ShellState {
    pub fn new(
        jobs: JobControl,
        outcomes: Receiver<ForegroundOutcome>,
        printer: StatusPrinter,
    ) -> Self {
        ShellState {
            last_status: 0,
            jobs,
            printer,
            outcomes,
        }
    }

    /// Blocks until `pid` exits or stops, then settles `last_status` or the
    /// stop report. The reaper has already cleared the foreground slot.
    pub fn wait_foreground(&mut self, pid: Pid) -> Result<(), ProcessError> {
        loop {
            match self.outcomes.recv() {
                Ok(outcome) if outcome.pid() == pid => {
                    self.settle(outcome);
                    return Ok(());
                }
                Ok(stale) => debug!(pid = %stale.pid(), "discarding stale foreground outcome"),
                Err(_) => {
                    self.jobs.lock().detach();
                    return Err(ProcessError::WaitFailed(format!(
                        "lost track of process {}",
                        pid
                    )));
                }
            }
        }
    }

    fn settle(&mut self, outcome: ForegroundOutcome) {
        match outcome {
            ForegroundOutcome::Exited { pid, status } => {
                debug!(%pid, status, "foreground process finished");
                self.last_status = status;
            }
            ForegroundOutcome::Stopped { pid, line } => {
                debug!(%pid, id = line.id, "foreground process stopped");
                self.printer.report(&line);
            }
        }
    }
}
