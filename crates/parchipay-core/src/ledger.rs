//! Append-only notification ledger with per-user read tracking.
//!
//! The ledger itself is ordinary in-process state; only the read-id set is
//! durable (one serialized set per consuming user in the kv store). Read
//! state merges and never shrinks.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Notification {
    pub id: String,
    pub committee_id: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

/// Global ordered log, most recent first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NotificationLedger {
    entries: Vec<Notification>,
}

impl NotificationLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a notification for a committee. Assigns identity and
    /// timestamp; the entry lands at the front of the log.
    pub fn append(&mut self, committee_id: &str, message: &str) -> &Notification {
        let notification = Notification {
            id: format!("notif-{}", Uuid::new_v4()),
            committee_id: committee_id.to_string(),
            message: message.to_string(),
            timestamp: Utc::now(),
        };
        self.entries.insert(0, notification);
        &self.entries[0]
    }

    pub fn entries(&self) -> &[Notification] {
        &self.entries
    }

    /// Notifications belonging to any of the given committees, log order.
    pub fn for_committees<'a>(&'a self, committee_ids: &[&str]) -> Vec<&'a Notification> {
        self.entries
            .iter()
            .filter(|n| committee_ids.contains(&n.committee_id.as_str()))
            .collect()
    }

    /// Unread count for a user: their committees' notifications whose id is
    /// not yet in the read set.
    pub fn unread_count(&self, committee_ids: &[&str], read: &ReadSet) -> usize {
        self.for_committees(committee_ids)
            .into_iter()
            .filter(|n| !read.contains(&n.id))
            .count()
    }
}

/// Per-user read notification ids.
///
/// Monotonic: ids are only ever added. Persisted externally as one
/// serialized set; the stored copy is replaced wholesale on every change.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReadSet(HashSet<String>);

impl ReadSet {
    pub fn contains(&self, id: &str) -> bool {
        self.0.contains(id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Union the given notifications' ids into the set.
    pub fn mark_all_read<'a>(&mut self, notifications: impl IntoIterator<Item = &'a Notification>) {
        self.0
            .extend(notifications.into_iter().map(|n| n.id.clone()));
    }
}
