//! Progress reporting

use indicatif::{HumanBytes, MultiProgress, ProgressBar, ProgressDrawTarget, ProgressStyle};
use std::path::Path;
use std::time::Duration;

/// Shows one progress bar per in-flight transfer.
///
/// Shared by all workers; every method takes `&self`.
#[derive(Clone)]
pub struct ProgressReporter {
    multi: MultiProgress,
    style: ProgressStyle,
}

impl ProgressReporter {
    /// Create a reporter drawing to stderr
    pub fn new() -> Self {
        Self::with_target(ProgressDrawTarget::stderr())
    }

    /// Create a reporter that never draws
    pub fn hidden() -> Self {
        Self::with_target(ProgressDrawTarget::hidden())
    }

    fn with_target(target: ProgressDrawTarget) -> Self {
        let style = ProgressStyle::with_template(
            "{msg:40} [{bar:40.cyan/blue}] {bytes}/{total_bytes}",
        )
        .map(|style| style.progress_chars("=>-"))
        .unwrap_or_else(|_| ProgressStyle::default_bar());

        Self {
            multi: MultiProgress::with_draw_target(target),
            style,
        }
    }

    /// Add a bar for copying `path` (`total_bytes` long).
    pub fn start_transfer(&self, path: &Path, total_bytes: u64) -> TransferBar {
        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());

        let bar = self.multi.add(ProgressBar::new(total_bytes));
        bar.set_style(self.style.clone());
        bar.enable_steady_tick(Duration::from_millis(65));
        bar.set_message(format!("Copying {label}"));

        TransferBar {
            multi: self.multi.clone(),
            bar,
            label,
        }
    }

    /// Print a line above the bars without corrupting them.
    pub fn println(&self, line: &str) {
        if self.multi.println(line).is_err() {
            println!("{line}");
        }
    }
}

impl Default for ProgressReporter {
    fn default() -> Self {
        Self::new()
    }
}

/// Bar for a single transfer. Cleared when dropped.
pub struct TransferBar {
    multi: MultiProgress,
    bar: ProgressBar,
    label: String,
}

impl TransferBar {
    /// Update position and throughput display.
    pub fn update(&self, bytes_so_far: u64, bytes_per_sec: u64) {
        self.bar.set_position(bytes_so_far);
        self.bar.set_message(format!(
            "{} ({}/s)",
            self.label,
            HumanBytes(bytes_per_sec)
        ));
    }
}

impl Drop for TransferBar {
    fn drop(&mut self) {
        self.bar.finish_and_clear();
        self.multi.remove(&self.bar);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transfer_bar_tracks_position_and_length() {
        let reporter = ProgressReporter::hidden();
        let bar = reporter.start_transfer(Path::new("dir/movie.mkv"), 4096);

        bar.update(1024, 512);
        bar.update(4096, 2048);

        assert_eq!(bar.bar.position(), 4096);
        assert_eq!(bar.bar.length(), Some(4096));
    }

    #[test]
    fn test_transfer_message_shows_name_and_throughput() {
        let reporter = ProgressReporter::hidden();
        let bar = reporter.start_transfer(Path::new("a/b/file.txt"), 10);
        assert!(bar.bar.message().contains("file.txt"));

        bar.update(5, 2048);
        let msg = bar.bar.message();
        assert!(msg.contains("file.txt"));
        assert!(msg.contains("2.00 KiB/s"), "unexpected message: {msg}");
    }

    #[test]
    fn test_drop_clears_bar() {
        let reporter = ProgressReporter::hidden();
        let bar = reporter.start_transfer(Path::new("x.bin"), 1);
        let handle = bar.bar.clone();
        drop(bar);
        assert!(handle.is_finished());
    }

    #[test]
    fn test_println_on_hidden_target_does_not_panic() {
        let reporter = ProgressReporter::hidden();
        reporter.println("2024-01-01T00:00:00Z: /dst/a.txt");
    }
}
