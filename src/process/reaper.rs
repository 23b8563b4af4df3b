use std::fs::File;
use std::io::{self, Write};
use std::os::fd::AsFd;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use signal_hook::consts::SIGCHLD;
use signal_hook::iterator::Signals;
use tracing::{debug, trace, warn};

use super::control::{ForegroundOutcome, JobControl, Routed};
use super::{signal, ChildChange, Pid, ProcessError};
use crate::jobs::{JobError, StatusLine};

/// Writes asynchronous job reports using the carriage-return-then-prompt
/// convention.
///
/// Reports go to a copy of stdout taken at construction, so a builtin that
/// has fd 1 redirected (`fg > out.txt`) does not capture them.
#[derive(Debug, Clone)]
pub struct StatusPrinter {
    prompt: String,
    out: Arc<File>,
}

impl StatusPrinter {
    pub fn new(prompt: impl Into<String>) -> Result<Self, ProcessError> {
        let out = io::stdout()
            .as_fd()
            .try_clone_to_owned()
            .map_err(ProcessError::StdoutUnavailable)?;
        Ok(StatusPrinter {
            prompt: prompt.into(),
            out: Arc::new(File::from(out)),
        })
    }

    /// Report from outside the main flow: the prompt is printed again.
    pub fn announce(&self, line: &StatusLine) {
        self.emit(&line.render(&self.prompt));
    }

    /// Report from the main flow, which prints its own prompt next.
    pub fn report(&self, line: &StatusLine) {
        self.emit(&line.render(""));
    }

    fn emit(&self, text: &str) {
        let mut out: &File = &self.out;
        if let Err(e) = out.write_all(text.as_bytes()) {
            warn!("failed to write job status: {}", e);
        }
    }
}

/// Collects one pending child state change without blocking.
fn poll_child() -> Option<(Pid, ChildChange)> {
    loop {
        let mut status: libc::c_int = 0;
        let flags = libc::WNOHANG | libc::WUNTRACED | libc::WCONTINUED;
        let ret = unsafe { libc::waitpid(-1, &mut status, flags) };
        if ret > 0 {
            match ChildChange::from_wait_status(status) {
                Some(change) => return Some((Pid::from_raw(ret), change)),
                None => continue,
            }
        }
        if ret == -1 && io::Error::last_os_error().raw_os_error() == Some(libc::EINTR) {
            continue;
        }
        // 0: children exist but none changed; -1/ECHILD: no children at all
        return None;
    }
}

/// The only place in the shell that calls `waitpid`.
///
/// Woken by SIGCHLD on its own thread, it drains every pending change while
/// holding the job lock, updates the table, announces background jobs and
/// hands foreground outcomes to the main flow over a channel.
pub struct Reaper {
    control: JobControl,
    outcomes: Sender<ForegroundOutcome>,
    printer: StatusPrinter,
}

impl Reaper {
    pub fn spawn(
        control: JobControl,
        printer: StatusPrinter,
    ) -> Result<Receiver<ForegroundOutcome>, ProcessError> {
        let mut signals = Signals::new([SIGCHLD])
            .map_err(|e| ProcessError::SignalError(e.to_string()))?;
        let (outcomes, receiver) = mpsc::channel();
        let reaper = Reaper {
            control,
            outcomes,
            printer,
        };

        thread::Builder::new()
            .name("icsh-reaper".to_string())
            .spawn(move || {
                for _ in signals.forever() {
                    reaper.drain();
                }
            })
            .map_err(|e| ProcessError::SignalError(e.to_string()))?;

        debug!("reaper started");
        Ok(receiver)
    }

    pub fn drain(&self) {
        let mut reports = Vec::new();
        {
            let mut jobs = self.control.lock();
            while let Some((pid, change)) = poll_child() {
                trace!(%pid, ?change, "reaped");
                match jobs.route(pid, change) {
                    Routed::Report(line) => reports.push(line),
                    Routed::Foreground(outcome) => {
                        if self.outcomes.send(outcome).is_err() {
                            warn!(%pid, "foreground outcome dropped, nobody is waiting");
                        }
                    }
                    Routed::Overflow(pid) => {
                        eprintln!("icsh: {}", JobError::TableFull);
                        if let Err(e) = signal::resume(pid) {
                            eprintln!("icsh: {}", e);
                        }
                    }
                    Routed::Ignored => {}
                }
            }
        }

        for line in &reports {
            self.printer.announce(line);
        }
    }
}
