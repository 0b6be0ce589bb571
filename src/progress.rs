//! Progress bar display for the archive download

use std::io::Read;

use indicatif::{ProgressBar, ProgressBarIter, ProgressStyle};

/// Byte-count progress display for the vendor archive download
pub struct DownloadProgress {
    pb: ProgressBar,
}

impl DownloadProgress {
    /// Create a progress display; falls back to a spinner when the server
    /// does not announce a content length.
    pub fn new(total_bytes: Option<u64>) -> Self {
        let pb = match total_bytes {
            Some(len) => {
                let style = ProgressStyle::default_bar()
                    .template("[{bar:40.cyan/blue}] {bytes}/{total_bytes} ({bytes_per_sec})")
                    .unwrap()
                    .progress_chars("#>-");
                let pb = ProgressBar::new(len);
                pb.set_style(style);
                pb
            }
            None => {
                let style = ProgressStyle::default_spinner()
                    .template("{spinner} {bytes} ({bytes_per_sec})")
                    .unwrap();
                let pb = ProgressBar::new_spinner();
                pb.set_style(style);
                pb
            }
        };
        Self { pb }
    }

    /// Wrap a reader so every read advances the bar
    pub fn wrap_read<R: Read>(&self, reader: R) -> ProgressBarIter<R> {
        self.pb.wrap_read(reader)
    }

    pub fn finish(&self) {
        self.pb.finish_and_clear();
    }
}
