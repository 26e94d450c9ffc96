//! Terminal presentation

mod progress;

pub use progress::{ProgressReporter, TransferBar};
