//! Status reporting to console and log file
//!
//! Every state transition of the workflow emits one status line. Lines are
//! colored on the console (console crate) and mirrored verbatim, without
//! escape codes, into a log file for post-mortem review. The file is
//! truncated at the start of each run and only appended to afterwards.

use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use console::Style;

use crate::error::Result;

/// Console + append-only file sink for status lines
pub struct LogSink {
    file: Option<File>,
    path: PathBuf,
}

impl LogSink {
    /// Create the sink, truncating the log file and writing a timestamped header.
    pub fn create(path: &Path) -> Result<Self> {
        let mut file = File::create(path)?;
        let started = chrono::Local::now().format("%Y-%m-%d %H:%M:%S %Z");
        writeln!(file, "dlsetup {} run started {}", env!("CARGO_PKG_VERSION"), started)?;
        Ok(LogSink {
            file: Some(file),
            path: path.to_path_buf(),
        })
    }

    /// Sink that only prints to the console, for contexts where the log file
    /// could not be created but the operator still needs to see why.
    pub fn console_only() -> Self {
        LogSink {
            file: None,
            path: PathBuf::new(),
        }
    }

    fn mirror(&mut self, prefix: &str, message: &str) {
        if let Some(ref mut file) = self.file {
            // The run must not die because a log line could not be written
            let _ = writeln!(file, "{prefix} {message}");
        }
    }

    fn emit(&mut self, style: &Style, prefix: &str, message: &str) {
        println!("{} {}", style.apply_to(prefix), message);
        self.mirror(prefix, message);
    }

    /// Progress/status line
    pub fn info(&mut self, message: &str) {
        self.emit(&Style::new().cyan().bold(), "::", message);
    }

    /// Completed step
    pub fn success(&mut self, message: &str) {
        self.emit(&Style::new().green().bold(), "ok", message);
    }

    /// Soft problem, run continues
    pub fn warn(&mut self, message: &str) {
        self.emit(&Style::new().yellow().bold(), "warning:", message);
    }

    /// Terminal problem, written to stderr and logged just before the
    /// process exits non-zero
    pub fn error(&mut self, message: &str) {
        eprintln!("{} {}", Style::new().red().bold().apply_to("error:"), message);
        self.mirror("error:", message);
    }

    /// Final line restating where the full transcript lives.
    pub fn farewell(&mut self) {
        if self.file.is_some() {
            let path = self.path.display().to_string();
            self.emit(&Style::new().dim(), "--", &format!("full log: {path}"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_header_and_mirroring() {
        let temp = TempDir::new().unwrap();
        let log_path = temp.path().join("run.log");

        let mut sink = LogSink::create(&log_path).unwrap();
        sink.info("checking dependencies");
        sink.warn("no device attached");
        sink.error("download failed");
        drop(sink);

        let contents = std::fs::read_to_string(&log_path).unwrap();
        let mut lines = contents.lines();
        assert!(lines.next().unwrap().starts_with("dlsetup"));
        assert_eq!(lines.next().unwrap(), ":: checking dependencies");
        assert_eq!(lines.next().unwrap(), "warning: no device attached");
        assert_eq!(lines.next().unwrap(), "error: download failed");
    }

    #[test]
    fn test_truncated_between_runs() {
        let temp = TempDir::new().unwrap();
        let log_path = temp.path().join("run.log");

        let mut sink = LogSink::create(&log_path).unwrap();
        sink.info("first run");
        drop(sink);

        let sink = LogSink::create(&log_path).unwrap();
        drop(sink);

        let contents = std::fs::read_to_string(&log_path).unwrap();
        assert!(!contents.contains("first run"));
    }

    #[test]
    fn test_console_only_does_not_panic() {
        let mut sink = LogSink::console_only();
        sink.info("no file behind this sink");
        sink.farewell();
    }
}
