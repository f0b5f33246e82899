use anyhow::Result;
use std::process::ExitCode;

use super::CommandContext;
use crate::application::use_cases::batch_runner::{BatchResult, Selection};
use crate::domain::entities::neox_config::NeoxConfig;
use crate::domain::entities::sync_outcome::RunMode;
use crate::presentation::cli::OutputFormat;
use crate::presentation::ui::prompt::EntryPrompt;

/// Clone or update the selected shared sources
pub struct PullCommand {
    pub debug: bool,
    pub all: bool,
    pub target: Option<String>,
    pub output: OutputFormat,
}

impl PullCommand {
    pub fn new(debug: bool, all: bool, target: Option<String>, output: OutputFormat) -> Self {
        Self {
            debug,
            all,
            target,
            output,
        }
    }

    /// Resolve the selection, asking interactively when more than one entry could be meant
    fn resolve_selection(&self, config: &NeoxConfig) -> Result<Selection> {
        if let Some(selection) = Selection::from_flags(self.all, self.target.clone()) {
            return Ok(selection);
        }
        if config.shared.len() == 1 {
            return Ok(Selection::Entry(0));
        }
        let index = EntryPrompt::new().select(&config.shared)?;
        Ok(Selection::Entry(index))
    }

    /// Execute the pull command; exits 1 when any entry failed
    pub async fn execute(&self, ctx: &CommandContext) -> Result<ExitCode> {
        let config = ctx.load_config().await?;
        let selection = self.resolve_selection(&config)?;

        let result = if selection.apply(&config.shared).is_empty() {
            BatchResult::empty(RunMode::Pull)
        } else {
            ctx.batch_runner(&self.output, self.debug)
                .await?
                .run_all(&config.shared, RunMode::Pull, &selection)
                .await
        };

        ctx.print_result(&result, &self.output)?;
        Ok(ExitCode::from(result.exit_code()))
    }
}
