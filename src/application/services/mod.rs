pub mod progress;

pub use progress::{EntryLabel, NoopProgress, ProgressEvent, ProgressReporter, Step};
