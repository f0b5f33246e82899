use colored::Colorize;
use indicatif::{MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use crate::application::services::progress::{ProgressEvent, ProgressReporter};
use crate::domain::entities::sync_outcome::RunMode;

/// Spinner per entry, drawn to stderr through a shared `MultiProgress`
///
/// Spinners are keyed by the entry's position in the batch, so two entries
/// with the same outDir each get their own.
pub struct TerminalProgress {
    multi: MultiProgress,
    bars: Mutex<HashMap<usize, ProgressBar>>,
    mode: Mutex<Option<RunMode>>,
}

impl TerminalProgress {
    /// Create a reporter; `visible == false` draws nothing
    pub fn new(visible: bool) -> Self {
        let target = if visible {
            ProgressDrawTarget::stderr()
        } else {
            ProgressDrawTarget::hidden()
        };
        Self {
            multi: MultiProgress::with_draw_target(target),
            bars: Mutex::new(HashMap::new()),
            mode: Mutex::new(None),
        }
    }

    fn spinner_style() -> ProgressStyle {
        ProgressStyle::default_spinner()
            .tick_strings(&["⠁", "⠂", "⠄", "⡀", "⢀", "⠠", "⠐", "⠈", " "])
            .template("{spinner:.green} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
    }

    fn verb(&self) -> &'static str {
        match self.mode.lock().ok().and_then(|mode| *mode) {
            Some(RunMode::Check) => "[ Checking ]",
            _ => "[ Pulling ]",
        }
    }
}

impl ProgressReporter for TerminalProgress {
    fn report(&self, event: ProgressEvent) {
        match event {
            ProgressEvent::BatchStarted { mode, .. } => {
                if let Ok(mut current) = self.mode.lock() {
                    *current = Some(mode);
                }
            }
            ProgressEvent::EntryStarted { entry, name } => {
                let bar = self.multi.add(ProgressBar::new_spinner());
                bar.set_style(Self::spinner_style());
                bar.set_message(format!("{} Processing {}...", self.verb().blue(), name));
                bar.enable_steady_tick(Duration::from_millis(120));
                if let Ok(mut bars) = self.bars.lock() {
                    if let Some(previous) = bars.insert(entry, bar) {
                        previous.finish_and_clear();
                    }
                }
            }
            ProgressEvent::StepStarted { entry, name, step } => {
                if let Ok(bars) = self.bars.lock() {
                    if let Some(bar) = bars.get(&entry) {
                        bar.set_message(format!("{} {}: {}...", self.verb().blue(), name, step));
                    }
                }
            }
            ProgressEvent::EntryFinished { entry, .. } => {
                if let Ok(mut bars) = self.bars.lock() {
                    if let Some(bar) = bars.remove(&entry) {
                        bar.finish_and_clear();
                    }
                }
            }
            ProgressEvent::BatchFinished => {
                if let Ok(mut bars) = self.bars.lock() {
                    for (_, bar) in bars.drain() {
                        bar.finish_and_clear();
                    }
                }
                let _ = self.multi.clear();
            }
        }
    }
}
