//! Near-real-time thread convergence.
//!
//! Clients and the admin UI converge by polling, not push. Each poll fetches
//! the canonical thread list and replaces the local snapshot wholesale; no
//! incremental merging, so duplicate or out-of-order polls are harmless by
//! construction. Arrival detection compares a last-known-timestamp sentinel
//! against the fresh list.

use std::sync::RwLock;

use anyhow::Result;
use serde::Serialize;

use crate::db::{Database, MessageThread};

/// Holds one session's view of the thread list.
pub struct ThreadWatcher {
    db: Database,
    snapshot: RwLock<Vec<MessageThread>>,
    /// Highest `last_message_at` seen so far. RFC3339 in UTC compares
    /// lexicographically, so plain string comparison is ordering-correct.
    last_seen: RwLock<Option<String>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshOutcome {
    /// Total threads in the fresh snapshot.
    pub thread_count: usize,
    /// Threads with activity newer than the sentinel.
    pub new_activity: Vec<MessageThread>,
}

impl ThreadWatcher {
    pub fn new(db: Database) -> Self {
        Self {
            db,
            snapshot: RwLock::new(Vec::new()),
            last_seen: RwLock::new(None),
        }
    }

    /// Fetch the canonical list and replace the snapshot. The first refresh
    /// establishes the sentinel without reporting arrivals, so a restart
    /// does not replay the entire history as "new".
    pub fn refresh(&self) -> Result<RefreshOutcome> {
        let fresh = self.db.list_threads()?;

        let newest = fresh
            .iter()
            .map(|t| t.last_message_at.as_str())
            .max()
            .map(str::to_string);

        let mut last_seen = self.last_seen.write().unwrap();
        let new_activity = match last_seen.as_deref() {
            None => Vec::new(),
            Some(sentinel) => fresh
                .iter()
                .filter(|t| t.last_message_at.as_str() > sentinel)
                .cloned()
                .collect(),
        };
        if let Some(newest) = newest {
            match last_seen.as_deref() {
                Some(current) if current >= newest.as_str() => {}
                _ => *last_seen = Some(newest),
            }
        } else if last_seen.is_none() {
            // Empty store on first poll still counts as an established view.
            *last_seen = Some(String::new());
        }
        drop(last_seen);

        let thread_count = fresh.len();
        *self.snapshot.write().unwrap() = fresh;

        Ok(RefreshOutcome {
            thread_count,
            new_activity,
        })
    }

    /// The latest snapshot, as replaced by the most recent refresh.
    pub fn snapshot(&self) -> Vec<MessageThread> {
        self.snapshot.read().unwrap().clone()
    }
}
