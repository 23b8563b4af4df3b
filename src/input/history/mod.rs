mod file_ops;

use std::path::PathBuf;

use crate::error::ShellError;
use self::file_ops::FileOps;

/// A line ready to dispatch after `!!` handling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Expanded {
    pub line: String,
    /// Came from `!!`; the shell echoes it before running it.
    pub replayed: bool,
}

/// Session memory for `!!` plus the optional on-disk history file.
pub struct History {
    last: Option<String>,
    file_ops: Option<FileOps>,
    max_entries: usize,
}

impl History {
    pub fn new(history_file: Option<PathBuf>, max_entries: usize) -> Self {
        History {
            last: None,
            file_ops: history_file.map(FileOps::new),
            max_entries,
        }
    }

    /// Entries from previous sessions for the line editor.
    pub fn load(&self) -> Result<Vec<String>, ShellError> {
        match &self.file_ops {
            Some(file_ops) => file_ops.load_entries(self.max_entries),
            None => Ok(Vec::new()),
        }
    }

    /// Resolves `!!` to the previous command. `None` means there is nothing
    /// to run: a blank line, or `!!` before any command.
    pub fn expand(&mut self, line: &str) -> Option<Expanded> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if line == "!!" {
            return self.last.clone().map(|line| Expanded {
                line,
                replayed: true,
            });
        }
        self.last = Some(line.to_string());
        Some(Expanded {
            line: line.to_string(),
            replayed: false,
        })
    }

    pub fn persist(&self, line: &str) -> Result<(), ShellError> {
        match &self.file_ops {
            Some(file_ops) => file_ops.append_entry(line),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bang_bang_before_any_command() {
        let mut history = History::new(None, 10);
        assert_eq!(history.expand("!!"), None);
        assert_eq!(history.expand("   "), None);
    }

    #[test]
    fn test_bang_bang_replays_last() {
        let mut history = History::new(None, 10);
        let first = history.expand("  echo hi ").unwrap();
        assert_eq!(first.line, "echo hi");
        assert!(!first.replayed);

        let again = history.expand("!!").unwrap();
        assert_eq!(again.line, "echo hi");
        assert!(again.replayed);

        // replaying does not replace what `!!` refers to
        assert_eq!(history.expand("!!").unwrap().line, "echo hi");
        history.expand("jobs");
        assert_eq!(history.expand("!!").unwrap().line, "jobs");
    }

    #[test]
    fn test_persist_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history");
        let history = History::new(Some(path.clone()), 2);

        for line in ["one", "two", "three"] {
            history.persist(line).unwrap();
        }
        assert_eq!(history.load().unwrap(), vec!["two", "three"]);
    }

    #[test]
    fn test_no_file() {
        let history = History::new(None, 2);
        history.persist("ignored").unwrap();
        assert!(history.load().unwrap().is_empty());
    }
}
