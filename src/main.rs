use colored::Colorize;
use std::process::ExitCode;

use neox::presentation::cli::CliApp;

#[tokio::main]
async fn main() -> ExitCode {
    let app = CliApp::new();
    app.init_tracing();

    match app.run().await {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{} {:#}", "Error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}
