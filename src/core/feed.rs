//! Persisted notification feed
//!
//! The feed is process-wide state with an init-on-load/persist-on-change
//! lifecycle. It is modeled as an explicitly owned store: commands load it,
//! append to it, and save it back - nothing reaches it ambiently.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use ulid::Ulid;

use crate::core::store::StoreError;

/// Newest notices are kept at the front; the feed is capped at this length.
const FEED_CAP: usize = 50;

/// A single dismissable notice
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notice {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub ts: DateTime<Utc>,
    #[serde(default)]
    pub read: bool,
}

impl Notice {
    pub fn new(title: impl Into<String>, message: Option<String>) -> Self {
        Self {
            id: Ulid::new().to_string(),
            title: title.into(),
            message,
            ts: Utc::now(),
            read: false,
        }
    }

    /// Notice composed when a new visitor is recorded
    pub fn visitor_added(full_name: &str, service: &str) -> Self {
        Self::new(
            "New visitor added",
            Some(format!("{} ({})", full_name, service)),
        )
    }
}

/// An owned, file-backed notification feed
#[derive(Debug)]
pub struct Feed {
    path: PathBuf,
    notices: Vec<Notice>,
}

impl Feed {
    /// Load the feed from disk. A missing or unreadable file yields an
    /// empty feed rather than an error.
    pub fn load(path: &Path) -> Self {
        let notices = std::fs::read_to_string(path)
            .ok()
            .and_then(|raw| serde_yml::from_str(&raw).ok())
            .unwrap_or_default();
        Self {
            path: path.to_path_buf(),
            notices,
        }
    }

    /// Persist the feed back to its file
    pub fn save(&self) -> Result<(), StoreError> {
        let yaml =
            serde_yml::to_string(&self.notices).map_err(|e| StoreError::Serialize(e.to_string()))?;
        std::fs::write(&self.path, yaml).map_err(|e| StoreError::Io(e.to_string()))
    }

    /// Prepend a notice, trimming the feed to its cap
    pub fn push(&mut self, notice: Notice) {
        self.notices.insert(0, notice);
        self.notices.truncate(FEED_CAP);
    }

    /// All notices, newest first
    pub fn notices(&self) -> &[Notice] {
        &self.notices
    }

    /// Number of unread notices
    pub fn unread_count(&self) -> usize {
        self.notices.iter().filter(|n| !n.read).count()
    }

    /// Mark every notice read
    pub fn mark_all_read(&mut self) {
        for notice in &mut self.notices {
            notice.read = true;
        }
    }

    /// Drop all notices
    pub fn clear(&mut self) {
        self.notices.clear();
    }
}
