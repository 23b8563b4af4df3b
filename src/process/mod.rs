use std::fmt;
use std::path::PathBuf;

pub mod control;
pub mod executor;
pub mod reaper;
pub mod redirect;
pub mod signal;

use crate::jobs::JobError;

/// Raw OS process id of a child spawned by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pid(libc::pid_t);

impl Pid {
    pub fn from_raw(raw: libc::pid_t) -> Self {
        Pid(raw)
    }

    pub fn as_raw(self) -> libc::pid_t {
        self.0
    }
}

impl fmt::Display for Pid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A state change reported by `waitpid` for one child.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChildChange {
    Exited(i32),
    Signaled(i32),
    Stopped(i32),
    Continued,
}

impl ChildChange {
    pub fn from_wait_status(status: libc::c_int) -> Option<Self> {
        if libc::WIFEXITED(status) {
            Some(ChildChange::Exited(libc::WEXITSTATUS(status)))
        } else if libc::WIFSIGNALED(status) {
            Some(ChildChange::Signaled(libc::WTERMSIG(status)))
        } else if libc::WIFSTOPPED(status) {
            Some(ChildChange::Stopped(libc::WSTOPSIG(status)))
        } else if libc::WIFCONTINUED(status) {
            Some(ChildChange::Continued)
        } else {
            None
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, ChildChange::Exited(_) | ChildChange::Signaled(_))
    }

    /// Status recorded in `$?`: the exit code, or 1 for a signal death.
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            ChildChange::Exited(code) => Some(*code),
            ChildChange::Signaled(_) => Some(1),
            _ => None,
        }
    }
}

#[derive(Debug)]
pub enum ProcessError {
    CommandNotFound(String),
    ExecFailed(String, std::io::Error),
    ForkFailed(std::io::Error),
    WaitFailed(String),
    SignalError(String),
    RedirectFailed(PathBuf, std::io::Error),
    StdoutUnavailable(std::io::Error),
    Job(JobError),
}

impl From<JobError> for ProcessError {
    fn from(e: JobError) -> Self {
        ProcessError::Job(e)
    }
}

impl fmt::Display for ProcessError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProcessError::CommandNotFound(cmd) => write!(f, "command not found: {}", cmd),
            ProcessError::ExecFailed(cmd, e) => write!(f, "{}: {}", cmd, e),
            ProcessError::ForkFailed(e) => write!(f, "fork failed: {}", e),
            ProcessError::WaitFailed(msg) => write!(f, "wait failed: {}", msg),
            ProcessError::SignalError(msg) => write!(f, "Signal error: {}", msg),
            ProcessError::RedirectFailed(path, e) => write!(f, "{}: {}", path.display(), e),
            ProcessError::StdoutUnavailable(e) => write!(f, "cannot duplicate stdout: {}", e),
            ProcessError::Job(e) => write!(f, "{}", e),
        }
    }
}

impl std::error::Error for ProcessError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_exit() {
        assert_eq!(ChildChange::from_wait_status(3 << 8), Some(ChildChange::Exited(3)));
        assert_eq!(ChildChange::from_wait_status(0), Some(ChildChange::Exited(0)));
    }

    #[test]
    fn test_decode_signal_and_stop() {
        assert_eq!(
            ChildChange::from_wait_status(libc::SIGKILL),
            Some(ChildChange::Signaled(libc::SIGKILL))
        );
        assert_eq!(
            ChildChange::from_wait_status((libc::SIGTSTP << 8) | 0x7f),
            Some(ChildChange::Stopped(libc::SIGTSTP))
        );
        assert_eq!(ChildChange::from_wait_status(0xffff), Some(ChildChange::Continued));
    }

    #[test]
    fn test_exit_status() {
        assert_eq!(ChildChange::Exited(42).exit_status(), Some(42));
        assert_eq!(ChildChange::Signaled(libc::SIGINT).exit_status(), Some(1));
        assert_eq!(ChildChange::Stopped(libc::SIGTSTP).exit_status(), None);
        assert!(!ChildChange::Continued.is_terminal());
        assert!(ChildChange::Signaled(9).is_terminal());
    }
}
