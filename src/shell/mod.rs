use std::fmt::Display;

mod executor;

use crate::{
    core::{
        commands::CommandExecutor,
        config::{Config, PROMPT},
        state::ShellState,
    },
    error::ShellError,
    highlight::Highlighter,
    input::{History, LineSource, ReadOutcome},
    process::{control::JobControl, reaper::Reaper, reaper::StatusPrinter, signal},
};

use executor::CommandHandler;

const HISTORY_LIMIT: usize = 1000;

pub struct Shell {
    pub(crate) source: LineSource,
    pub(crate) history: History,
    pub(crate) executor: CommandExecutor,
    pub(crate) state: ShellState,
    pub(crate) config: Config,
    pub(crate) highlighter: Highlighter,
}

impl Shell {
    pub fn new(config: Config) -> Result<Self, ShellError> {
        let history = History::new(config.history_file.clone(), HISTORY_LIMIT);
        let source = match &config.script {
            Some(path) => LineSource::script(path)?,
            None => {
                let past = history.load().unwrap_or_else(|e| {
                    if !config.quiet {
                        eprintln!("Warning: Couldn't load history: {}", e);
                    }
                    Vec::new()
                });
                LineSource::interactive(PROMPT, &past)?
            }
        };

        let jobs = JobControl::new(config.job_capacity);
        signal::install_relay(jobs.foreground_handle())?;
        let printer = StatusPrinter::new(config.prompt())?;
        let outcomes = Reaper::spawn(jobs.clone(), printer.clone())?;

        Ok(Shell {
            source,
            history,
            executor: CommandExecutor::new(),
            state: ShellState::new(jobs, outcomes, printer),
            highlighter: Highlighter::new(config.is_interactive()),
            config,
        })
    }

    pub fn run(&mut self) -> Result<(), ShellError> {
        if self.config.is_interactive() {
            println!("Starting IC shell");
        }

        loop {
            match self.source.read_line() {
                Ok(ReadOutcome::Line(line)) => self.handle_line(&line),
                // the editor prints a fresh prompt on the next read
                Ok(ReadOutcome::Interrupted) => continue,
                Ok(ReadOutcome::Eof) => break,
                Err(e) => {
                    if !self.config.is_interactive() {
                        return Err(e);
                    }
                    self.report(&e);
                }
            }
        }
        Ok(())
    }

    fn handle_line(&mut self, line: &str) {
        let Some(expanded) = self.history.expand(line) else {
            return;
        };

        if expanded.replayed {
            println!("{}", self.highlighter.hint(&expanded.line));
        }
        if let Err(e) = self.record(&expanded.line) {
            if !self.config.quiet {
                eprintln!("Warning: Couldn't add to history: {}", e);
            }
        }

        if let Err(e) = self.execute_command(&expanded.line) {
            self.report(&e);
        }
    }

    fn record(&mut self, line: &str) -> Result<(), ShellError> {
        self.source.remember(line)?;
        self.history.persist(line)
    }

    fn report(&self, error: &dyn Display) {
        eprintln!("{}", self.highlighter.error(&format!("icsh: {}", error)));
    }
}
