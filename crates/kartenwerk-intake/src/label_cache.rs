// SPDX-License-Identifier: MIT
//
// Persistent event-label cache. Labels the user typed for a photo are keyed
// by capture time and filename, stored as JSON, and expire after a retention
// window so the file cannot grow without bound.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use kartenwerk_core::error::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct CacheEntry {
    event_name: String,
    stored_at: DateTime<Utc>,
}

/// JSON-file backed label store. Loading purges expired entries and drops
/// anything that fails to deserialize, so one bad record never poisons the
/// rest of the cache.
pub struct LabelCache {
    path: PathBuf,
    retention_days: i64,
    entries: HashMap<String, CacheEntry>,
}

impl LabelCache {
    pub fn open(path: impl Into<PathBuf>, retention_days: i64) -> Result<Self> {
        let path = path.into();
        let mut cache = Self {
            entries: load_entries(&path),
            path,
            retention_days,
        };
        let purged = cache.purge_expired();
        if purged > 0 {
            debug!(purged, "dropped expired label cache entries");
        }
        Ok(cache)
    }

    /// Cache key for a photo: capture timestamp in milliseconds plus the
    /// sanitized filename, or a filename-only key when the date is unknown.
    pub fn cache_key(filename: &str, taken: Option<DateTime<Utc>>) -> String {
        let sanitized: String = filename
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect();
        match taken {
            Some(ts) => format!("{}_{sanitized}", ts.timestamp_millis()),
            None => format!("file_{sanitized}"),
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(|e| e.event_name.as_str())
    }

    pub fn insert(&mut self, key: String, event_name: String) {
        self.entries.insert(
            key,
            CacheEntry {
                event_name,
                stored_at: Utc::now(),
            },
        );
    }

    /// Drop entries older than the retention window. Returns how many went.
    pub fn purge_expired(&mut self) -> usize {
        let cutoff = Utc::now() - chrono::Duration::days(self.retention_days);
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.stored_at >= cutoff);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Write the cache back to disk.
    pub fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(&self.entries)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }
}

fn load_entries(path: &Path) -> HashMap<String, CacheEntry> {
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(_) => return HashMap::new(),
    };
    // Parse entry by entry so a single malformed record is dropped instead
    // of discarding the whole file.
    let loose: HashMap<String, serde_json::Value> = match serde_json::from_str(&raw) {
        Ok(loose) => loose,
        Err(err) => {
            warn!(path = %path.display(), error = %err, "label cache unreadable, starting fresh");
            return HashMap::new();
        }
    };
    loose
        .into_iter()
        .filter_map(|(key, value)| match serde_json::from_value(value) {
            Ok(entry) => Some((key, entry)),
            Err(err) => {
                warn!(key, error = %err, "dropping malformed label cache entry");
                None
            }
        })
        .collect()
}
