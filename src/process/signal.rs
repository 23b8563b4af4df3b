use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use libc::{SIGCONT, SIGINT, SIGTSTP};
use tracing::debug;

use super::{Pid, ProcessError};

/// Forwards Ctrl-C and Ctrl-Z to whatever process is in the foreground.
///
/// Both handlers only load an atomic and call `kill(2)`; with nothing in the
/// foreground the signal is dropped so the shell itself never dies or stops.
pub fn install_relay(foreground: Arc<AtomicI32>) -> Result<(), ProcessError> {
    let interrupt = Arc::clone(&foreground);
    ctrlc::set_handler(move || forward(&interrupt, SIGINT))
        .map_err(|e| ProcessError::SignalError(e.to_string()))?;

    // SAFETY: the closure is async-signal-safe, it does an atomic load and kill(2).
    unsafe { signal_hook::low_level::register(SIGTSTP, move || forward(&foreground, SIGTSTP)) }
        .map_err(|e| ProcessError::SignalError(e.to_string()))?;

    debug!("signal relay installed");
    Ok(())
}

fn forward(foreground: &AtomicI32, signal: libc::c_int) {
    let pid = foreground.load(Ordering::SeqCst);
    if pid > 0 {
        unsafe {
            libc::kill(pid, signal);
        }
    }
}

pub fn send(pid: Pid, signal: libc::c_int) -> Result<(), ProcessError> {
    if unsafe { libc::kill(pid.as_raw(), signal) } == -1 {
        let err = std::io::Error::last_os_error();
        return Err(ProcessError::SignalError(format!("{}: {}", pid, err)));
    }
    Ok(())
}

pub fn resume(pid: Pid) -> Result<(), ProcessError> {
    debug!(%pid, "sending SIGCONT");
    send(pid, SIGCONT)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forward_without_foreground_is_noop() {
        // pid 0 would signal our own process group; the relay must skip it
        let foreground = AtomicI32::new(0);
        forward(&foreground, SIGTSTP);
        forward(&foreground, SIGINT);
    }

    #[test]
    fn test_send_to_missing_process() {
        // pid_max on Linux is at most 2^22
        let result = send(Pid::from_raw(i32::MAX), 0);
        assert!(matches!(result, Err(ProcessError::SignalError(_))));
    }
}
