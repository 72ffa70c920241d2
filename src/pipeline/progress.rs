// file: src/pipeline/progress.rs
// description: download progress display and statistics reporting for pipeline execution
// reference: uses indicatif for progress bars and tracks processing metrics

use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

#[derive(Debug, Clone, Default)]
pub struct PipelineStats {
    pub bytes_downloaded: u64,
    pub files_extracted: usize,
    pub entries_skipped: usize,
    pub entries_archived: usize,
    pub bytes_archived: u64,
    pub fetch_duration: Duration,
    pub duration: Duration,
}

impl PipelineStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes per second over the fetch stage alone.
    pub fn download_rate(&self) -> f64 {
        let secs = self.fetch_duration.as_secs_f64();
        if secs == 0.0 {
            return 0.0;
        }
        self.bytes_downloaded as f64 / secs
    }

    /// Percentage of archive entries that matched the filter.
    pub fn keep_rate(&self) -> f64 {
        let total = self.files_extracted + self.entries_skipped;
        if total == 0 {
            return 0.0;
        }
        (self.files_extracted as f64 / total as f64) * 100.0
    }
}

pub struct DownloadProgress {
    bar: ProgressBar,
}

impl DownloadProgress {
    /// A byte bar when the length is known, a spinner otherwise.
    pub fn new(total_bytes: Option<u64>, visible: bool) -> Self {
        if !visible {
            return Self {
                bar: ProgressBar::hidden(),
            };
        }

        let bar = match total_bytes {
            Some(total) => {
                let bar = ProgressBar::new(total);
                if let Ok(style) = ProgressStyle::default_bar().template(
                    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {bytes}/{total_bytes} ({eta}) {msg}",
                ) {
                    bar.set_style(style.progress_chars("█▓▒░"));
                }
                bar
            }
            None => {
                let bar = ProgressBar::new_spinner();
                if let Ok(style) =
                    ProgressStyle::default_spinner().template("{spinner:.green} {bytes} {msg}")
                {
                    bar.set_style(style);
                }
                bar.enable_steady_tick(Duration::from_millis(120));
                bar
            }
        };

        Self { bar }
    }

    pub fn set_message(&self, message: String) {
        self.bar.set_message(message);
    }

    pub fn advance(&self, bytes: u64) {
        self.bar.inc(bytes);
    }

    #[cfg(test)]
    fn position(&self) -> u64 {
        self.bar.position()
    }

    pub fn finish(&self) {
        self.bar.finish_and_clear();
    }
}

impl Drop for DownloadProgress {
    fn drop(&mut self) {
        self.finish();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pipeline_stats_calculations() {
        let stats = PipelineStats {
            bytes_downloaded: 1000,
            files_extracted: 3,
            entries_skipped: 1,
            fetch_duration: Duration::from_secs(10),
            duration: Duration::from_secs(40),
            ..PipelineStats::new()
        };

        assert_eq!(stats.download_rate(), 100.0);
        assert_eq!(stats.keep_rate(), 75.0);
    }

    #[test]
    fn test_pipeline_stats_zero_values() {
        let stats = PipelineStats::new();
        assert_eq!(stats.download_rate(), 0.0);
        assert_eq!(stats.keep_rate(), 0.0);
    }

    #[test]
    fn test_hidden_progress_counts_bytes() {
        let progress = DownloadProgress::new(Some(100), false);
        progress.advance(40);
        progress.advance(2);
        assert_eq!(progress.position(), 42);
    }
}
