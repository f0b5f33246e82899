pub mod check;
pub mod init;
pub mod pull;

pub use check::*;
pub use init::*;
pub use pull::*;

use anyhow::{Context, Result};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::application::services::progress::ProgressReporter;
use crate::application::use_cases::batch_runner::{BatchResult, BatchRunner};
use crate::common::error::NeoxError;
use crate::domain::entities::neox_config::NeoxConfig;
use crate::infrastructure::filesystem::config_store::ConfigStore;
use crate::infrastructure::scm::GitScm;
use crate::presentation::cli::OutputFormat;
use crate::presentation::ui::progress::TerminalProgress;
use crate::presentation::ui::report::ReportFormatter;

/// Settings shared by every command, resolved from the global CLI options
#[derive(Debug, Clone)]
pub struct CommandContext {
    /// Directory that `outDir` values are relative to
    pub root_dir: PathBuf,
    /// Location of `neoX.config.json`
    pub config_path: PathBuf,
    /// Number of shared sources processed at once
    pub jobs: usize,
    /// Limit for a single git invocation
    pub timeout: Option<Duration>,
    /// Whether to colorize the report
    pub use_color: bool,
    /// Whether spinners are drawn on stderr
    pub show_progress: bool,
}

impl CommandContext {
    /// Load the config file, turning a missing file into a hint to run `init`
    pub async fn load_config(&self) -> Result<NeoxConfig> {
        ConfigStore::new()
            .load(&self.config_path)
            .await
            .map_err(|e| match e {
                NeoxError::ConfigMissing { .. } => anyhow::Error::new(e)
                    .context("Failed to load config file, make sure you initialized neoX with `neox init`"),
                NeoxError::InvalidConfig { .. } => anyhow::Error::new(e)
                    .context("Invalid config file, make sure you defined \"shared\" with at least one entry"),
                other => anyhow::Error::new(other),
            })
    }

    /// Build a batch runner wired to the git CLI and a terminal progress reporter
    pub async fn batch_runner(&self, output: &OutputFormat, debug: bool) -> Result<BatchRunner> {
        let scm = GitScm::new().with_timeout(self.timeout);
        scm.check_availability()
            .await
            .context("git is required to synchronize shared sources")?;

        let progress: Arc<dyn ProgressReporter> = Arc::new(TerminalProgress::new(
            self.show_progress && matches!(output, OutputFormat::Text),
        ));

        Ok(BatchRunner::new(Arc::new(scm), progress)
            .with_root_dir(&self.root_dir)
            .with_jobs(self.jobs)
            .with_debug(debug))
    }

    /// Print the batch result to stdout in the requested format
    pub fn print_result(&self, result: &BatchResult, output: &OutputFormat) -> Result<()> {
        let formatter = ReportFormatter::new(self.use_color);
        match output {
            OutputFormat::Text => println!("{}", formatter.render_text(result)),
            OutputFormat::Json => println!("{}", formatter.render_json(result)?),
        }
        Ok(())
    }
}
