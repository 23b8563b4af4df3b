use std::env;
use std::fmt;
use std::path::PathBuf;

use crate::flags::Flags;
use crate::jobs::DEFAULT_CAPACITY;

pub const PROMPT: &str = "icsh $ ";
pub const HISTORY_FILE: &str = ".icsh_history";
pub const MAX_JOBS_VAR: &str = "ICSH_MAX_JOBS";

#[derive(Debug, Clone)]
pub struct Config {
    pub script: Option<PathBuf>,
    pub quiet: bool,
    pub debug: bool,
    pub history_file: Option<PathBuf>,
    pub job_capacity: usize,
}

impl Config {
    pub fn from_flags(flags: &Flags) -> Result<Self, ConfigError> {
        let script = flags.positional().first().map(PathBuf::from);
        let history_file = match script {
            Some(_) => None,
            None => dirs::home_dir().map(|home| home.join(HISTORY_FILE)),
        };

        Ok(Config {
            script,
            quiet: flags.is_set("quiet"),
            debug: flags.is_set("debug"),
            history_file,
            job_capacity: job_capacity(env::var(MAX_JOBS_VAR).ok().as_deref())?,
        })
    }

    pub fn is_interactive(&self) -> bool {
        self.script.is_none()
    }

    /// Prompt reprinted after asynchronous job reports; scripts have none.
    pub fn prompt(&self) -> &'static str {
        if self.is_interactive() {
            PROMPT
        } else {
            ""
        }
    }
}

fn job_capacity(value: Option<&str>) -> Result<usize, ConfigError> {
    match value {
        None => Ok(DEFAULT_CAPACITY),
        Some(raw) => match raw.trim().parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ConfigError::InvalidValue(MAX_JOBS_VAR, raw.to_string())),
        },
    }
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidValue(&'static str, String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidValue(name, value) => {
                write!(f, "invalid value for {}: {:?}", name, value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
