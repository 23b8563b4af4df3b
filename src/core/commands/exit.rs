use std::io::Write;

use tracing::debug;

use super::{Command, CommandError};
use crate::core::state::ShellState;

#[derive(Clone)]
pub struct ExitCommand;

impl Default for ExitCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl ExitCommand {
    pub fn new() -> Self {
        Self
    }
}

/// `exit` status wrapped into 0..=255.
///
/// Like `atoi`, only an optional sign and the leading digits count, so
/// `12abc` is 12 and an argument with no leading digits is 0.
pub fn exit_code(arg: Option<&str>) -> i32 {
    let Some(arg) = arg else {
        return 0;
    };
    let arg = arg.trim_start();
    let (negative, digits) = match arg.as_bytes().first() {
        Some(b'-') => (true, &arg[1..]),
        Some(b'+') => (false, &arg[1..]),
        _ => (false, arg),
    };
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i32, |acc, b| (acc * 10 + i32::from(b - b'0')) % 256);
    if negative {
        (256 - magnitude) % 256
    } else {
        magnitude
    }
}

impl Command for ExitCommand {
    fn execute(
        &self,
        args: &[String],
        _state: &mut ShellState,
        out: &mut dyn Write,
    ) -> Result<(), CommandError> {
        let code = exit_code(args.first().map(String::as_str));
        writeln!(out, "bye")?;
        out.flush()?;
        debug!(code, "exiting");
        std::process::exit(code);
    }
}
