use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tracing::{debug, trace};

use super::{ChildChange, Pid};
use crate::jobs::{JobState, JobStatus, JobTable, StatusLine};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Foreground {
    pub pid: Pid,
    pub command_line: String,
}

/// How a foreground process stopped being the foreground process.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ForegroundOutcome {
    Exited { pid: Pid, status: i32 },
    Stopped { pid: Pid, line: StatusLine },
}

impl ForegroundOutcome {
    pub fn pid(&self) -> Pid {
        match self {
            ForegroundOutcome::Exited { pid, .. } | ForegroundOutcome::Stopped { pid, .. } => *pid,
        }
    }
}

/// Where a reaped state change has to go.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Routed {
    Report(StatusLine),
    Foreground(ForegroundOutcome),
    /// The foreground process stopped but there is no room to keep it as a job.
    Overflow(Pid),
    Ignored,
}

/// Job table plus the foreground slot, guarded together so the reaper never
/// sees a child that is in neither.
#[derive(Debug)]
pub struct Jobs {
    pub table: JobTable,
    foreground: Option<Foreground>,
    relay: Arc<AtomicI32>,
}

impl Jobs {
    #[cfg(test)]
    fn foreground(&self) -> Option<&Foreground> {
        self.foreground.as_ref()
    }

    pub fn attach(&mut self, pid: Pid, command_line: &str) {
        trace!(%pid, "attaching foreground process");
        self.relay.store(pid.as_raw(), Ordering::SeqCst);
        self.foreground = Some(Foreground {
            pid,
            command_line: command_line.to_string(),
        });
    }

    pub fn detach(&mut self) -> Option<Foreground> {
        self.relay.store(0, Ordering::SeqCst);
        self.foreground.take()
    }

    pub fn route(&mut self, pid: Pid, change: ChildChange) -> Routed {
        if let Some(index) = self.table.find_by_pid(pid) {
            return self.route_job(index, change);
        }

        let is_foreground = self.foreground.as_ref().is_some_and(|fg| fg.pid == pid);
        if !is_foreground {
            debug!(%pid, ?change, "state change for untracked process");
            return Routed::Ignored;
        }

        if change.is_terminal() {
            self.detach();
            return Routed::Foreground(ForegroundOutcome::Exited {
                pid,
                status: change.exit_status().unwrap_or(1),
            });
        }

        match change {
            ChildChange::Stopped(_) => {
                let command_line = self
                    .foreground
                    .as_ref()
                    .map(|fg| fg.command_line.clone())
                    .unwrap_or_default();
                match self.table.insert(pid, &command_line, JobState::Stopped) {
                    Ok(id) => {
                        self.detach();
                        let line = StatusLine {
                            id,
                            status: JobStatus::Stopped,
                            command_line,
                        };
                        Routed::Foreground(ForegroundOutcome::Stopped { pid, line })
                    }
                    Err(_) => Routed::Overflow(pid),
                }
            }
            _ => Routed::Ignored,
        }
    }

    fn route_job(&mut self, index: usize, change: ChildChange) -> Routed {
        match change {
            ChildChange::Exited(_) | ChildChange::Signaled(_) => match self.table.remove(index) {
                Some(job) => Routed::Report(StatusLine::new(&job, JobStatus::Done)),
                None => Routed::Ignored,
            },
            ChildChange::Stopped(_) => match self.table.get_mut(index) {
                Some(job) => {
                    job.state = JobState::Stopped;
                    Routed::Report(StatusLine::new(job, JobStatus::Stopped))
                }
                None => Routed::Ignored,
            },
            ChildChange::Continued => match self.table.get_mut(index) {
                Some(job) => {
                    job.state = JobState::Running;
                    Routed::Report(StatusLine::new(job, JobStatus::Continued))
                }
                None => Routed::Ignored,
            },
        }
    }
}

/// Shared handle on the job table and the foreground slot.
///
/// The foreground pid is mirrored into an atomic so the signal relay can read
/// it without taking the lock.
#[derive(Debug, Clone)]
pub struct JobControl {
    inner: Arc<Mutex<Jobs>>,
    relay: Arc<AtomicI32>,
}

impl JobControl {
    pub fn new(capacity: usize) -> Self {
        let relay = Arc::new(AtomicI32::new(0));
        let jobs = Jobs {
            table: JobTable::with_capacity(capacity),
            foreground: None,
            relay: Arc::clone(&relay),
        };
        JobControl {
            inner: Arc::new(Mutex::new(jobs)),
            relay,
        }
    }

    pub fn lock(&self) -> MutexGuard<'_, Jobs> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn foreground_handle(&self) -> Arc<AtomicI32> {
        Arc::clone(&self.relay)
    }

    pub fn foreground_pid(&self) -> Option<Pid> {
        match self.relay.load(Ordering::SeqCst) {
            0 => None,
            raw => Some(Pid::from_raw(raw)),
        }
    }
}
