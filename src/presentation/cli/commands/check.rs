use anyhow::Result;
use std::process::ExitCode;

use super::CommandContext;
use crate::application::use_cases::batch_runner::{BatchResult, Selection};
use crate::domain::entities::sync_outcome::RunMode;
use crate::presentation::cli::OutputFormat;

/// Compare every selected shared source against its remote
pub struct CheckCommand {
    pub all: bool,
    pub target: Option<String>,
    pub output: OutputFormat,
}

impl CheckCommand {
    pub fn new(all: bool, target: Option<String>, output: OutputFormat) -> Self {
        Self {
            all,
            target,
            output,
        }
    }

    /// Execute the check command; exits 1 when any entry needs attention
    pub async fn execute(&self, ctx: &CommandContext) -> Result<ExitCode> {
        let config = ctx.load_config().await?;

        // Without --target every entry is checked
        let selection =
            Selection::from_flags(self.all, self.target.clone()).unwrap_or(Selection::All);

        let result = if selection.apply(&config.shared).is_empty() {
            BatchResult::empty(RunMode::Check)
        } else {
            ctx.batch_runner(&self.output, false)
                .await?
                .run_all(&config.shared, RunMode::Check, &selection)
                .await
        };

        ctx.print_result(&result, &self.output)?;
        Ok(ExitCode::from(result.exit_code()))
    }
}
