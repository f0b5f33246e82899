use colored::{Color, Colorize};

use crate::application::use_cases::batch_runner::BatchResult;
use crate::common::result::NeoxResult;
use crate::domain::entities::shared_source::DEFAULT_BRANCH;
use crate::domain::entities::sync_outcome::{DriftStatus, ErrorDetail, Outcome, RunMode, SyncAction};
use crate::domain::value_objects::git_url::redact_url;

/// Renders batch results for the terminal or as JSON
#[derive(Debug, Clone)]
pub struct ReportFormatter {
    use_color: bool,
}

impl ReportFormatter {
    /// Create a new formatter
    pub fn new(use_color: bool) -> Self {
        Self { use_color }
    }

    fn label(&self, text: &str, color: Color) -> String {
        let padded = format!(" {} ", text);
        if self.use_color {
            padded.color(color).bold().to_string()
        } else {
            format!("[{}]", padded)
        }
    }

    fn name(&self, name: &str) -> String {
        if self.use_color {
            format!("[ {} ]", name.underline())
        } else {
            format!("[ {} ]", name)
        }
    }

    fn command(&self, command: &str) -> String {
        if self.use_color {
            format!("`{}`", command.green().underline())
        } else {
            format!("`{}`", command)
        }
    }

    fn error_lines(&self, name: &str, error: &ErrorDetail) -> Vec<String> {
        let mut lines = vec![format!(
            "{} {} {}",
            self.label("Failed", Color::Red),
            self.name(name),
            error.message
        )];
        if let Some(cause) = &error.cause {
            let cause = format!("caused by: {}", cause);
            lines.push(if self.use_color {
                format!("    {}", cause.dimmed())
            } else {
                format!("    {}", cause)
            });
        }
        lines
    }

    fn drift_lines(&self, status: &DriftStatus) -> Vec<String> {
        let name = status.source.display_name();
        if let Some(error) = &status.error {
            return self.error_lines(&name, error);
        }

        let mut line = if status.is_up_to_date {
            format!(
                "{} {} You are up-to-date with {}!",
                self.label("Up-to-date", Color::Green),
                self.name(&name),
                name
            )
        } else {
            format!(
                "{} {} You have new commit in remote source, please pull the latest commit with {}!",
                self.label("Warning", Color::Yellow),
                self.name(&name),
                self.command("neox pull")
            )
        };
        if status.has_local_changes {
            line.push_str(" (local changes present)");
        }
        vec![line]
    }

    fn outcome_lines(&self, outcome: &Outcome) -> Vec<String> {
        let name = outcome.source.display_name();
        let url = redact_url(&outcome.source.repository_url);
        match (&outcome.action, &outcome.error) {
            (_, Some(error)) => self.error_lines(&name, error),
            (SyncAction::Cloned, None) => vec![format!(
                "{} {} Cloned {} into {}",
                self.label("Cloned", Color::Green),
                self.name(&name),
                url,
                outcome.source.out_dir()
            )],
            (SyncAction::Pulled, None) => vec![format!(
                "{} {} Pulled {} from {} into {}",
                self.label("Pulled", Color::Green),
                self.name(&name),
                DEFAULT_BRANCH,
                url,
                outcome.source.out_dir()
            )],
            (SyncAction::Failed, None) => vec![format!(
                "{} {} Failed to process {}",
                self.label("Failed", Color::Red),
                self.name(&name),
                url
            )],
        }
    }

    fn summary(&self, result: &BatchResult) -> String {
        let summary = match result.mode {
            RunMode::Check => format!(
                "{} checked: {} up-to-date, {} need attention",
                result.processed_count(),
                result.up_to_date_count(),
                result.attention_count()
            ),
            RunMode::Pull => format!(
                "{} processed: {} cloned, {} pulled, {} failed",
                result.processed_count(),
                result.cloned_count(),
                result.pulled_count(),
                result.failed_count()
            ),
        };
        if self.use_color {
            summary.bold().to_string()
        } else {
            summary
        }
    }

    /// Human readable report, one line per entry followed by a summary
    pub fn render_text(&self, result: &BatchResult) -> String {
        if result.processed_count() == 0 {
            return "No shared source matched the selection.".to_string();
        }

        let mut lines: Vec<String> = match result.mode {
            RunMode::Check => result
                .drift
                .iter()
                .flat_map(|status| self.drift_lines(status))
                .collect(),
            RunMode::Pull => result
                .outcomes
                .iter()
                .flat_map(|outcome| self.outcome_lines(outcome))
                .collect(),
        };
        lines.push(String::new());
        lines.push(self.summary(result));
        lines.join("\n")
    }

    /// Pretty-printed JSON of the whole result
    pub fn render_json(&self, result: &BatchResult) -> NeoxResult<String> {
        Ok(serde_json::to_string_pretty(result)?)
    }
}
