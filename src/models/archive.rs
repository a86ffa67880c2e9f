// src/models/archive.rs

//! Work items and layout conventions shared by the archiver and the resolver.
//!
//! ## Snapshot Layout
//!
//! ```text
//! {output}/
//! ├── event.json
//! ├── contents.json
//! ├── sessions.json
//! ├── papers.json
//! ├── keynotes.json
//! ├── sessions/{id}.json
//! ├── papers/{id}.json
//! ├── keynotes/{id}.json
//! └── media/{basename}
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Root under which rewritten references point into the snapshot.
pub const LINK_ROOT: &str = "/data/";

/// Snapshot subdirectory holding downloaded media.
pub const MEDIA_DIR: &str = "media";

/// File name of the event root document.
pub const EVENT_FILE: &str = "event.json";

/// A remote resource paired with its path relative to the snapshot root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueItem {
    pub url: String,
    pub local_path: String,
}

impl QueueItem {
    pub fn new(url: impl Into<String>, local_path: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            local_path: local_path.into(),
        }
    }
}

/// Detail document categories reachable through `self` links.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailKind {
    Session,
    Paper,
    Keynote,
}

impl DetailKind {
    /// Classification order when a path names more than one category.
    pub const ALL: [DetailKind; 3] = [DetailKind::Session, DetailKind::Paper, DetailKind::Keynote];

    /// URL path segment and snapshot directory for this kind.
    pub fn dir(self) -> &'static str {
        match self {
            DetailKind::Session => "sessions",
            DetailKind::Paper => "papers",
            DetailKind::Keynote => "keynotes",
        }
    }

    /// Snapshot-relative path of the detail document with the given id.
    pub fn local_path(self, id: &str) -> String {
        format!("{}/{}.json", self.dir(), id)
    }
}

impl fmt::Display for DetailKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.dir())
    }
}

/// A fixed top-level resource of an event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TopLevelResource {
    /// Path relative to the event base URL
    pub endpoint: &'static str,
    /// File name inside the snapshot root
    pub file: &'static str,
}

/// Top-level resources, fetched in this order.
pub const TOP_LEVEL_RESOURCES: [TopLevelResource; 5] = [
    TopLevelResource {
        endpoint: "",
        file: EVENT_FILE,
    },
    TopLevelResource {
        endpoint: "contents/",
        file: "contents.json",
    },
    TopLevelResource {
        endpoint: "sessions/",
        file: "sessions.json",
    },
    TopLevelResource {
        endpoint: "papers/",
        file: "papers.json",
    },
    TopLevelResource {
        endpoint: "keynotes/",
        file: "keynotes.json",
    },
];

/// Link written into a rewritten document for a snapshot-relative path.
pub fn local_link(local_path: &str) -> String {
    format!("{LINK_ROOT}{local_path}")
}

/// Result of a single JSON fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    /// Document fetched, rewritten and written to disk
    Saved,
    /// URL was already visited in this run
    Skipped,
    /// Transport, parse or write failure (already logged)
    Failed,
}

/// Summary of an archive run.
#[derive(Debug, Clone, Serialize)]
pub struct ArchiveReport {
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub documents_saved: usize,
    pub documents_failed: usize,
    pub details_discovered: usize,
    pub media_downloaded: usize,
    pub media_skipped: usize,
    pub media_failed: usize,
}

impl ArchiveReport {
    pub fn new() -> Self {
        let now = Utc::now();
        Self {
            start_time: now,
            end_time: now,
            documents_saved: 0,
            documents_failed: 0,
            details_discovered: 0,
            media_downloaded: 0,
            media_skipped: 0,
            media_failed: 0,
        }
    }

    /// Count a JSON fetch outcome.
    pub fn record(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Saved => self.documents_saved += 1,
            FetchOutcome::Failed => self.documents_failed += 1,
            FetchOutcome::Skipped => {}
        }
    }

    pub fn failures(&self) -> usize {
        self.documents_failed + self.media_failed
    }
}

impl Default for ArchiveReport {
    fn default() -> Self {
        Self::new()
    }
}
