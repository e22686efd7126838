//! Recent-activity feed
//!
//! Every successful directory mutation records one [`Activity`]. The feed
//! is bounded and keeps the newest entries first.

use std::collections::VecDeque;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// What kind of change an activity describes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityKind {
    UserAdded,
    UserUpdated,
    UserDeleted,
    UsersDeleted,
    UsersStatusUpdated,
    RoleModified,
    PermissionUpdated,
}

impl ActivityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActivityKind::UserAdded => "user_added",
            ActivityKind::UserUpdated => "user_updated",
            ActivityKind::UserDeleted => "user_deleted",
            ActivityKind::UsersDeleted => "users_deleted",
            ActivityKind::UsersStatusUpdated => "users_status_updated",
            ActivityKind::RoleModified => "role_modified",
            ActivityKind::PermissionUpdated => "permission_updated",
        }
    }
}

impl std::fmt::Display for ActivityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single feed entry
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ActivityKind,
    pub title: String,
    pub description: String,
    pub timestamp: DateTime<Utc>,
}

impl Activity {
    pub fn new(kind: ActivityKind, title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            kind,
            title: title.into(),
            description: description.into(),
            timestamp: Utc::now(),
        }
    }

    pub fn relative_time(&self, now: DateTime<Utc>) -> String {
        format_relative_time(self.timestamp, now)
    }
}

/// Bounded, newest-first list of activities
#[derive(Debug, Clone)]
pub struct ActivityFeed {
    capacity: usize,
    entries: VecDeque<Activity>,
}

impl ActivityFeed {
    /// A capacity of 0 is treated as 1
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            entries: VecDeque::with_capacity(capacity),
        }
    }

    pub fn record(&mut self, activity: Activity) {
        self.entries.push_front(activity);
        self.entries.truncate(self.capacity);
    }

    /// Newest first
    pub fn iter(&self) -> impl Iterator<Item = &Activity> {
        self.entries.iter()
    }

    pub fn latest(&self) -> Option<&Activity> {
        self.entries.front()
    }

    pub fn to_vec(&self) -> Vec<Activity> {
        self.entries.iter().cloned().collect()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl Default for ActivityFeed {
    fn default() -> Self {
        Self::new(10)
    }
}

fn plural(count: i64, unit: &str) -> String {
    if count == 1 {
        format!("1 {unit} ago")
    } else {
        format!("{count} {unit}s ago")
    }
}

/// Human-readable age of `timestamp` as seen at `now`.
///
/// Months are 30 days and years 365 days. Timestamps in the future read as
/// "just now".
pub fn format_relative_time(timestamp: DateTime<Utc>, now: DateTime<Utc>) -> String {
    let seconds = (now - timestamp).num_seconds();
    if seconds < 60 {
        return "just now".to_string();
    }

    let minutes = seconds / 60;
    if minutes < 60 {
        return plural(minutes, "minute");
    }

    let hours = minutes / 60;
    if hours < 24 {
        return plural(hours, "hour");
    }

    let days = hours / 24;
    if days < 30 {
        return plural(days, "day");
    }

    let months = days / 30;
    if months < 12 {
        return plural(months, "month");
    }

    // 360..365 days is twelve 30-day months but not yet a full year
    plural((days / 365).max(1), "year")
}
