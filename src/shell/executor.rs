use tracing::debug;

use crate::core::commands::CommandError;

pub(crate) trait CommandHandler {
    fn execute_command(&mut self, command: &str) -> Result<(), CommandError>;
}

impl CommandHandler for super::Shell {
    fn execute_command(&mut self, command: &str) -> Result<(), CommandError> {
        // Skip empty commands early
        if command.trim().is_empty() {
            return Ok(());
        }

        let start_time = std::time::Instant::now();
        let result = self.executor.dispatch(command, &mut self.state);
        debug!(
            command,
            status = self.state.last_status,
            elapsed_ms = start_time.elapsed().as_millis() as u64,
            ok = result.is_ok(),
            "command finished"
        );
        result
    }
}
