pub mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use std::env;
use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use commands::{CheckCommand, CommandContext, InitCommand, PullCommand};
use crate::domain::entities::neox_config::CONFIG_FILE_NAME;

const LONG_VERSION: &str = concat!(
    env!("CARGO_PKG_VERSION"),
    " (",
    env!("GIT_HASH"),
    ", built ",
    env!("BUILD_DATE"),
    " for ",
    env!("BUILD_TARGET"),
    ")"
);

/// Output format options for check and pull
#[derive(Debug, Clone, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    Text,
    /// JSON output
    Json,
}

/// neox - Keep shared directories mirrored against remote git sources
#[derive(Parser, Debug)]
#[command(name = "neox")]
#[command(about = "Keep shared directories mirrored against remote git sources")]
#[command(version, long_version = LONG_VERSION)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Working directory (defaults to current directory)
    #[arg(short = 'C', long, global = true)]
    pub directory: Option<PathBuf>,

    /// Config file (defaults to neoX.config.json in the working directory)
    #[arg(long, global = true, env = "NEOX_CONFIG")]
    pub config: Option<PathBuf>,

    /// Number of shared sources processed in parallel (defaults to the CPU count)
    #[arg(short, long, global = true, env = "NEOX_JOBS")]
    pub jobs: Option<usize>,

    /// Timeout in seconds for a single git operation, 0 disables it
    #[arg(long, global = true, env = "NEOX_TIMEOUT", default_value_t = 300)]
    pub timeout: u64,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a neoX.config.json template
    Init {
        /// Directory where to create the config file (defaults to the working directory)
        #[arg(short, long)]
        path: Option<PathBuf>,
    },

    /// Check whether shared sources are up to date with their remotes
    #[command(visible_alias = "c")]
    Check {
        /// Check every shared source (the default)
        #[arg(long)]
        all: bool,

        /// Only check the shared source whose outDir matches
        #[arg(short, long)]
        target: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },

    /// Clone or update shared sources
    #[command(visible_alias = "p")]
    Pull {
        /// Keep the underlying git error in the report
        #[arg(long)]
        debug: bool,

        /// Pull every shared source
        #[arg(short, long)]
        all: bool,

        /// Only pull the shared source whose outDir matches
        #[arg(short, long)]
        target: Option<String>,

        /// Output format
        #[arg(short, long, value_enum, default_value = "text")]
        output: OutputFormat,
    },
}

/// CLI application runner
pub struct CliApp {
    cli: Cli,
}

impl CliApp {
    pub fn new() -> Self {
        Self { cli: Cli::parse() }
    }

    pub fn from_cli(cli: Cli) -> Self {
        Self { cli }
    }

    fn debug_enabled(&self) -> bool {
        matches!(self.cli.command, Commands::Pull { debug: true, .. })
    }

    fn use_color(&self) -> bool {
        !self.cli.no_color && env::var_os("NO_COLOR").is_none()
    }

    /// Install the tracing subscriber; logs go to stderr
    ///
    /// `RUST_LOG` takes precedence over `--verbose` and `--debug`.
    pub fn init_tracing(&self) {
        let level = if self.debug_enabled() {
            "debug"
        } else if self.cli.verbose {
            "info"
        } else {
            "warn"
        };
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(format!("neox={}", level)));

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(std::io::stderr)
            .with_target(false)
            .with_ansi(self.use_color())
            .try_init();
    }

    fn context(&self) -> Result<CommandContext> {
        let current_dir = env::current_dir()?;
        let root_dir = match &self.cli.directory {
            Some(dir) => current_dir.join(dir),
            None => current_dir,
        };
        let config_path = match &self.cli.config {
            Some(path) => root_dir.join(path),
            None => root_dir.join(CONFIG_FILE_NAME),
        };
        let jobs = self.cli.jobs.unwrap_or_else(num_cpus::get).max(1);
        let timeout = match self.cli.timeout {
            0 => None,
            secs => Some(Duration::from_secs(secs)),
        };

        Ok(CommandContext {
            root_dir,
            config_path,
            jobs,
            timeout,
            use_color: self.use_color(),
            show_progress: console::Term::stderr().features().is_attended(),
        })
    }

    /// Run the selected command and return the process exit code
    pub async fn run(self) -> Result<ExitCode> {
        colored::control::set_override(self.use_color());

        let ctx = self.context()?;
        match &self.cli.command {
            Commands::Init { path } => InitCommand::new(path.clone()).execute(&ctx).await,
            Commands::Check {
                all,
                target,
                output,
            } => {
                CheckCommand::new(*all, target.clone(), output.clone())
                    .execute(&ctx)
                    .await
            }
            Commands::Pull {
                debug,
                all,
                target,
                output,
            } => {
                PullCommand::new(*debug, *all, target.clone(), output.clone())
                    .execute(&ctx)
                    .await
            }
        }
    }
}

impl Default for CliApp {
    fn default() -> Self {
        Self::new()
    }
}
