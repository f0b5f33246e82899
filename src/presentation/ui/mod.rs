/// Terminal rendering: reports, spinners and the entry prompt
pub mod progress;
pub mod prompt;
pub mod report;

pub use progress::TerminalProgress;
pub use prompt::EntryPrompt;
pub use report::ReportFormatter;
