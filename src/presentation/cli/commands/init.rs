use anyhow::Result;
use colored::Colorize;
use std::path::PathBuf;
use std::process::ExitCode;

use super::CommandContext;
use crate::application::use_cases::init_config::InitConfigUseCase;
use crate::common::error::NeoxError;

/// Create a starter `neoX.config.json`
pub struct InitCommand {
    /// Directory where to create the config file
    pub path: Option<PathBuf>,
}

impl InitCommand {
    pub fn new(path: Option<PathBuf>) -> Self {
        Self { path }
    }

    /// Execute the init command
    pub async fn execute(&self, ctx: &CommandContext) -> Result<ExitCode> {
        let target_dir = match &self.path {
            Some(path) => ctx.root_dir.join(path),
            None => ctx.root_dir.clone(),
        };

        match InitConfigUseCase::new().execute(&target_dir).await {
            Ok(config_path) => {
                println!(
                    "{} Created {}",
                    "✓".green().bold(),
                    config_path.display()
                );
                println!();
                println!("Next steps:");
                println!("   1. Edit the file and list your shared sources under \"shared\"");
                println!("   2. Run 'neox pull --all' to fetch them");
                println!("   3. Run 'neox check' to see whether they are up to date");
                Ok(ExitCode::SUCCESS)
            }
            Err(e @ NeoxError::ConfigExists { .. }) => {
                Err(anyhow::Error::new(e).context("neoX is already initialized"))
            }
            Err(e) => Err(e.into()),
        }
    }
}
