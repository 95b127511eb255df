//! Progress bar display for sync runs

use asset_core::CopyProgress;
use indicatif::{ProgressBar, ProgressStyle};

const MAX_LABEL: usize = 50;

fn shorten(label: &str) -> String {
    let chars = label.chars().count();
    if chars > MAX_LABEL {
        let tail: String = label.chars().skip(chars - (MAX_LABEL - 3)).collect();
        format!("...{tail}")
    } else {
        label.to_string()
    }
}

/// Terminal progress for one run.
///
/// Sized by the bundle's leaf count when it announces one, otherwise a
/// spinner with a running count.
pub struct ProgressDisplay {
    bar: ProgressBar,
    hidden: bool,
}

impl ProgressDisplay {
    /// Create a display; `hidden` suppresses all drawing.
    pub fn new(hidden: bool) -> Self {
        Self {
            bar: ProgressBar::hidden(),
            hidden,
        }
    }

    /// Copying is starting.
    pub fn start(&mut self, total: Option<u64>) {
        if self.hidden {
            return;
        }
        self.bar = match total {
            Some(total) => {
                let style = ProgressStyle::default_bar()
                    .template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("#>-");
                let bar = ProgressBar::new(total);
                bar.set_style(style);
                bar
            }
            None => {
                let style = ProgressStyle::default_spinner()
                    .template("{spinner} {pos} files {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner());
                let bar = ProgressBar::new_spinner();
                bar.set_style(style);
                bar
            }
        };
    }

    /// Show the latest progress report.
    pub fn update(&self, progress: &CopyProgress) {
        self.bar.set_position(progress.completed);
        self.bar.set_message(shorten(&progress.label));
    }

    /// Finish on success
    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }

    /// Abandon on error
    pub fn abandon(&self) {
        self.bar.abandon();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn long_labels_keep_their_tail() {
        let label = format!("{}/file.txt", "d".repeat(80));
        let short = shorten(&label);
        assert_eq!(short.chars().count(), MAX_LABEL);
        assert!(short.starts_with("..."));
        assert!(short.ends_with("/file.txt"));
    }

    #[test]
    fn short_labels_are_untouched() {
        assert_eq!(shorten("a/x.txt"), "a/x.txt");
    }

    #[test]
    fn hidden_display_accepts_updates() {
        let mut display = ProgressDisplay::new(true);
        display.start(Some(2));
        display.update(&CopyProgress {
            completed: 1,
            label: "a.txt".to_string(),
        });
        display.finish();
    }
}
