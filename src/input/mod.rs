use std::fs::File;
use std::io::{BufRead, BufReader, Lines};
use std::path::Path;

use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;

pub mod history;

pub use history::{Expanded, History};

use crate::error::ShellError;

pub enum ReadOutcome {
    Line(String),
    Interrupted,
    Eof,
}

/// Where command lines come from: the terminal or a script file.
pub enum LineSource {
    Interactive {
        editor: DefaultEditor,
        prompt: String,
    },
    Script {
        lines: Lines<BufReader<File>>,
    },
}

impl LineSource {
    pub fn interactive(prompt: &str, past: &[String]) -> Result<Self, ShellError> {
        let mut editor = DefaultEditor::new()?;
        for entry in past {
            editor.add_history_entry(entry.as_str())?;
        }
        Ok(LineSource::Interactive {
            editor,
            prompt: prompt.to_string(),
        })
    }

    pub fn script(path: &Path) -> Result<Self, ShellError> {
        let file = File::open(path).map_err(|e| ShellError::Script(path.to_path_buf(), e))?;
        Ok(LineSource::Script {
            lines: BufReader::new(file).lines(),
        })
    }

    pub fn read_line(&mut self) -> Result<ReadOutcome, ShellError> {
        match self {
            LineSource::Interactive { editor, prompt } => match editor.readline(prompt) {
                Ok(line) => Ok(ReadOutcome::Line(line)),
                Err(ReadlineError::Interrupted) => Ok(ReadOutcome::Interrupted),
                Err(ReadlineError::Eof) => Ok(ReadOutcome::Eof),
                Err(e) => Err(e.into()),
            },
            LineSource::Script { lines } => match lines.next() {
                Some(line) => Ok(ReadOutcome::Line(line?)),
                None => Ok(ReadOutcome::Eof),
            },
        }
    }

    pub fn remember(&mut self, line: &str) -> Result<(), ShellError> {
        if let LineSource::Interactive { editor, .. } = self {
            editor.add_history_entry(line)?;
        }
        Ok(())
    }
}
