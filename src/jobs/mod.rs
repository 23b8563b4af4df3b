use std::fmt;

mod reference;

pub use reference::JobRef;

use crate::process::Pid;

pub const DEFAULT_CAPACITY: usize = 64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobState {
    Running,
    Stopped,
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobState::Running => write!(f, "Running"),
            JobState::Stopped => write!(f, "Stopped"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Job {
    pub id: usize,
    pub pid: Pid,
    pub state: JobState,
    pub command_line: String,
}

impl Job {
    /// Row printed by the `jobs` builtin.
    pub fn listing(&self) -> String {
        format!("[{}]  {}     {} &", self.id, self.state, self.command_line)
    }
}

/// Asynchronous status change announced for a job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobStatus {
    Done,
    Stopped,
    Continued,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobStatus::Done => write!(f, "Done"),
            JobStatus::Stopped => write!(f, "Stopped"),
            JobStatus::Continued => write!(f, "Continued"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusLine {
    pub id: usize,
    pub status: JobStatus,
    pub command_line: String,
}

impl StatusLine {
    pub fn new(job: &Job, status: JobStatus) -> Self {
        StatusLine {
            id: job.id,
            status,
            command_line: job.command_line.clone(),
        }
    }

    /// Carriage return first so a half-typed line gets overwritten, then the
    /// prompt again so the user can keep typing.
    pub fn render(&self, prompt: &str) -> String {
        format!(
            "\r[{}]  {}     {}\n{}",
            self.id, self.status, self.command_line, prompt
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobError {
    TableFull,
    NoCurrentJob,
    UnknownJobReference(String),
    AlreadyRunning(usize),
}

impl fmt::Display for JobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobError::TableFull => write!(f, "job table full"),
            JobError::NoCurrentJob => write!(f, "no current job"),
            JobError::UnknownJobReference(r) => write!(f, "{}: no such job", r),
            JobError::AlreadyRunning(id) => write!(f, "job {} already in background", id),
        }
    }
}

impl std::error::Error for JobError {}

/// Bounded, insertion-ordered registry of background and stopped jobs.
///
/// Ids come from a counter that only moves forward, so an id is never handed
/// out twice even after its job is removed. The last entry is the "current"
/// job used when `fg`/`bg` get no argument.
#[derive(Debug)]
pub struct JobTable {
    jobs: Vec<Job>,
    capacity: usize,
    next_id: usize,
}

impl Default for JobTable {
    fn default() -> Self {
        Self::new()
    }
}

impl JobTable {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        JobTable {
            jobs: Vec::with_capacity(capacity),
            capacity,
            next_id: 1,
        }
    }

    pub fn add(&mut self, pid: Pid, command_line: &str) -> Result<usize, JobError> {
        self.insert(pid, command_line, JobState::Running)
    }

    pub fn insert(
        &mut self,
        pid: Pid,
        command_line: &str,
        state: JobState,
    ) -> Result<usize, JobError> {
        if self.is_full() {
            return Err(JobError::TableFull);
        }
        let id = self.next_id;
        self.next_id += 1;
        self.jobs.push(Job {
            id,
            pid,
            state,
            command_line: command_line.to_string(),
        });
        Ok(id)
    }

    pub fn find_by_pid(&self, pid: Pid) -> Option<usize> {
        self.jobs.iter().position(|j| j.pid == pid)
    }

    pub fn find_by_id(&self, id: usize) -> Option<usize> {
        self.jobs.iter().position(|j| j.id == id)
    }

    pub fn most_recent(&self) -> Option<usize> {
        self.jobs.len().checked_sub(1)
    }

    pub fn resolve(&self, job_ref: &JobRef) -> Result<usize, JobError> {
        match job_ref {
            JobRef::Current => self.most_recent().ok_or(JobError::NoCurrentJob),
            JobRef::Id(id) => self
                .find_by_id(*id)
                .ok_or_else(|| JobError::UnknownJobReference(job_ref.to_string())),
        }
    }

    pub fn get(&self, index: usize) -> Option<&Job> {
        self.jobs.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Job> {
        self.jobs.get_mut(index)
    }

    pub fn remove(&mut self, index: usize) -> Option<Job> {
        if index < self.jobs.len() {
            Some(self.jobs.remove(index))
        } else {
            None
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Job> {
        self.jobs.iter()
    }

    pub fn len(&self) -> usize {
        self.jobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.jobs.len() >= self.capacity
    }
}
