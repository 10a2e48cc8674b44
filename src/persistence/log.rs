//! Append-only operator activity log.
//!
//! Each record is one line: a UTC timestamp, a tab, and the message.
//!
//! ```text
//! 2024-01-15 12:00:00	Received GitHub webhook
//! 2024-01-15 12:00:00	Event type: push
//! 2024-01-15 12:00:00	Processing ebook #42 located at /srv/ebooks/4/42/
//! 2024-01-15 12:00:01	git pull from GitHub complete
//! 2024-01-15 12:00:01	--------------
//! ```
//!
//! # Concurrency
//!
//! The file is opened in append mode, written with a single `write_all` of the
//! complete line, and closed again on every call. No handle outlives a call,
//! and appends from concurrent requests land as whole lines.

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tracing::{debug, warn};

/// Timestamp format for log lines.
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// The operator activity log file.
#[derive(Debug, Clone)]
pub struct ActivityLog {
    path: PathBuf,
}

impl ActivityLog {
    /// Creates a handle for the log at `path`. The file is created on first
    /// append.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        ActivityLog { path: path.into() }
    }

    /// Returns the path to the log file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one line stamped with the current time.
    pub fn append(&self, message: &str) -> io::Result<()> {
        self.append_at(Utc::now(), message)
    }

    /// Appends one line stamped with `ts`.
    pub fn append_at(&self, ts: DateTime<Utc>, message: &str) -> io::Result<()> {
        let line = format_line(ts, message);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }

    /// Appends a line, reporting (but not propagating) write failures.
    ///
    /// Request handling must not fail because the operator log is unwritable.
    pub fn record(&self, message: &str) {
        debug!(target: "ebook_sync::activity", "{}", message);
        if let Err(e) = self.append(message) {
            warn!(path = %self.path.display(), error = %e, "Failed to write activity log");
        }
    }
}

/// Formats one log line, including the trailing newline.
pub fn format_line(ts: DateTime<Utc>, message: &str) -> String {
    format!("{}\t{}\n", ts.format(TIMESTAMP_FORMAT), message)
}
