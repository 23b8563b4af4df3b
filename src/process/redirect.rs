use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::os::fd::{AsRawFd, FromRawFd, OwnedFd, RawFd};
use std::path::Path;

use tracing::{trace, warn};

use super::ProcessError;

pub fn open_input(path: &str) -> Result<File, ProcessError> {
    File::open(path).map_err(|e| ProcessError::RedirectFailed(Path::new(path).to_path_buf(), e))
}

pub fn open_output(path: &str) -> Result<File, ProcessError> {
    OpenOptions::new()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)
        .map_err(|e| ProcessError::RedirectFailed(Path::new(path).to_path_buf(), e))
}

/// Points the shell's own stdin/stdout at files for the length of a builtin.
///
/// Each replaced descriptor is saved with `dup` first and put back with
/// `dup2` when the guard drops, whether the builtin succeeded or not.
#[derive(Debug, Default)]
pub struct RedirectGuard {
    saved: Vec<(RawFd, OwnedFd)>,
}

impl RedirectGuard {
    /// On error the descriptors already swapped are restored before returning.
    pub fn apply(input: Option<&str>, output: Option<&str>) -> Result<Self, ProcessError> {
        let mut guard = RedirectGuard::default();
        if let Some(path) = input {
            guard.replace(libc::STDIN_FILENO, open_input(path)?, path)?;
        }
        if let Some(path) = output {
            let file = open_output(path)?;
            flush_stdout();
            guard.replace(libc::STDOUT_FILENO, file, path)?;
        }
        Ok(guard)
    }

    fn replace(&mut self, target: RawFd, file: File, path: &str) -> Result<(), ProcessError> {
        let failed = |e: io::Error| ProcessError::RedirectFailed(Path::new(path).to_path_buf(), e);

        let saved = unsafe { libc::dup(target) };
        if saved == -1 {
            return Err(failed(io::Error::last_os_error()));
        }
        // SAFETY: `saved` is a fresh descriptor nothing else owns.
        let saved = unsafe { OwnedFd::from_raw_fd(saved) };

        if unsafe { libc::dup2(file.as_raw_fd(), target) } == -1 {
            return Err(failed(io::Error::last_os_error()));
        }
        trace!(fd = target, path, "descriptor redirected");
        self.saved.push((target, saved));
        Ok(())
    }
}

impl Drop for RedirectGuard {
    fn drop(&mut self) {
        if self.saved.is_empty() {
            return;
        }
        flush_stdout();
        while let Some((target, saved)) = self.saved.pop() {
            if unsafe { libc::dup2(saved.as_raw_fd(), target) } == -1 {
                warn!(fd = target, "failed to restore descriptor: {}", io::Error::last_os_error());
            }
        }
    }
}

/// Called before fd 1 is swapped in either direction.
fn flush_stdout() {
    if let Err(e) = io::stdout().flush() {
        warn!("failed to flush stdout: {}", e);
    }
}
