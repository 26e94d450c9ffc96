//! Main sync command

use crate::executor::{ActivityLog, SyncOrchestrator, SyncStats};
use crate::types::{SyncError, SyncRequest};
use crate::ui::ProgressReporter;
use crate::Config;
use indicatif::HumanBytes;
use std::fs;

/// Run the sync operation described by `config`.
///
/// With `show_progress`, transfers get progress bars and log records are
/// printed above them instead of straight to stdout.
pub fn run(config: &Config, show_progress: bool) -> Result<SyncStats, SyncError> {
    let request = SyncRequest::try_from(config)?;

    fs::create_dir_all(&request.dest_root)?;

    let log = ActivityLog::new(request.log_path.clone());
    let orchestrator = if show_progress {
        let reporter = ProgressReporter::new();
        let echo = reporter.clone();
        let log = log.with_echo(Box::new(move |line: &str| echo.println(line)));
        SyncOrchestrator::new(request, log).with_progress(reporter)
    } else {
        SyncOrchestrator::new(request, log)
    };

    let stats = orchestrator.run()?;
    println!("{}", format_summary(&stats));
    Ok(stats)
}

fn format_summary(stats: &SyncStats) -> String {
    format!(
        "Sync complete: {} copied ({}), {} up to date, {} skipped, {} directories, {} failed",
        stats.copied,
        HumanBytes(stats.bytes_copied),
        stats.up_to_date,
        stats.skipped,
        stats.directories,
        stats.failed
    )
}
