use std::fmt;

use super::JobError;

/// Argument of `fg`/`bg`: nothing (the current job), `n` or `%n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobRef {
    Current,
    Id(usize),
}

impl JobRef {
    pub fn parse(arg: Option<&str>) -> Result<Self, JobError> {
        let Some(arg) = arg else {
            return Ok(JobRef::Current);
        };
        let digits = arg.strip_prefix('%').unwrap_or(arg);
        let unknown = || JobError::UnknownJobReference(arg.to_string());
        // `usize::from_str` would also take a leading `+`
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(unknown());
        }
        digits.parse::<usize>().map(JobRef::Id).map_err(|_| unknown())
    }
}

impl fmt::Display for JobRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobRef::Current => write!(f, "%%"),
            JobRef::Id(id) => write!(f, "%{}", id),
        }
    }
}
