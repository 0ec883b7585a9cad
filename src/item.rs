//! Thread items (comments) and their timestamps.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Stable local identifier for an item in a thread.
///
/// Assigned by the controller when an item enters the list, never reused.
/// Per-item state (edit mode, dirty flags, pending requests) is keyed by this
/// instead of list position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct ItemId(u64);

impl ItemId {
    #[must_use]
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A point in time as supplied by the caller: epoch milliseconds or an
/// RFC 3339 string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Millis(i64),
    Iso(String),
}

impl Timestamp {
    #[must_use]
    pub fn now() -> Self {
        Self::Millis(now_millis())
    }

    /// Milliseconds since the Unix epoch, if the value can be interpreted.
    #[must_use]
    pub fn as_millis(&self) -> Option<i64> {
        match self {
            Self::Millis(ms) => Some(*ms),
            Self::Iso(raw) => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|dt| dt.timestamp_millis()),
        }
    }

    /// Whether two timestamps denote the same instant, regardless of encoding.
    #[must_use]
    pub fn same_instant(&self, other: &Self) -> bool {
        match (self.as_millis(), other.as_millis()) {
            (Some(a), Some(b)) => a == b,
            _ => self == other,
        }
    }

    /// Falsy values (`0`, `""`) used by callers to mean "not set".
    fn is_unset(&self) -> bool {
        match self {
            Self::Millis(ms) => *ms == 0,
            Self::Iso(raw) => raw.is_empty(),
        }
    }
}

impl From<i64> for Timestamp {
    fn from(ms: i64) -> Self {
        Self::Millis(ms)
    }
}

impl From<DateTime<Utc>> for Timestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self::Millis(dt.timestamp_millis())
    }
}

/// Current wall-clock time in epoch milliseconds.
#[must_use]
pub fn now_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// One comment in a thread.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ThreadItem<T> {
    #[serde(skip)]
    pub id: ItemId,
    pub author: String,
    #[serde(alias = "created")]
    pub created_at: Timestamp,
    #[serde(alias = "updated")]
    pub updated_at: Timestamp,
    /// Presence marks the item as a tombstone.
    #[serde(
        default,
        alias = "deleted",
        deserialize_with = "deserialize_deleted",
        skip_serializing_if = "Option::is_none"
    )]
    pub deleted_at: Option<Timestamp>,
    pub content: String,
    /// Caller data passed through untouched.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub payload: Option<T>,
}

impl<T> ThreadItem<T> {
    #[must_use]
    pub fn new(author: impl Into<String>, content: impl Into<String>, at: Timestamp) -> Self {
        Self {
            id: ItemId::default(),
            author: author.into(),
            created_at: at.clone(),
            updated_at: at,
            deleted_at: None,
            content: content.into(),
            payload: None,
        }
    }

    #[must_use]
    pub fn with_payload(mut self, payload: T) -> Self {
        self.payload = Some(payload);
        self
    }

    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.deleted_at.is_some()
    }

    /// Updated after creation (and not deleted).
    #[must_use]
    pub fn is_edited(&self) -> bool {
        !self.is_deleted() && !self.updated_at.same_instant(&self.created_at)
    }

    /// Stamp the item as deleted. Content is retained.
    pub fn mark_deleted(&mut self, at: Timestamp) {
        self.updated_at = at.clone();
        self.deleted_at = Some(at);
    }
}

fn deserialize_deleted<'de, D>(deserializer: D) -> Result<Option<Timestamp>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Timestamp>::deserialize(deserializer)?;
    Ok(value.filter(|ts| !ts.is_unset()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn falsy_deleted_field_means_not_deleted() {
        let json = r#"{"author":"u1","content":"hello","created":1,"updated":1,"deleted":0}"#;
        let item: ThreadItem<()> = serde_json::from_str(json).unwrap();

        assert_eq!(item.author, "u1");
        assert_eq!(item.created_at, Timestamp::Millis(1));
        assert!(!item.is_deleted());
        assert!(!item.is_edited());
    }

    #[test]
    fn iso_and_millis_timestamps_compare_by_instant() {
        let iso = Timestamp::Iso("1970-01-01T00:00:01Z".to_string());
        assert_eq!(iso.as_millis(), Some(1000));
        assert!(iso.same_instant(&Timestamp::Millis(1000)));
        assert!(!iso.same_instant(&Timestamp::Millis(999)));
    }

    #[test]
    fn mark_deleted_keeps_content_and_stamps_both_fields() {
        let mut item: ThreadItem<()> = ThreadItem::new("alice", "keep me", Timestamp::Millis(10));
        item.mark_deleted(Timestamp::Millis(50));

        assert!(item.is_deleted());
        assert_eq!(item.content, "keep me");
        assert_eq!(item.updated_at, Timestamp::Millis(50));
        assert_eq!(item.deleted_at, Some(Timestamp::Millis(50)));
        assert!(!item.is_edited());
    }

    #[test]
    fn payload_round_trips_through_json() {
        let item = ThreadItem::new("bob", "body", Timestamp::Millis(5)).with_payload(42_u32);
        let json = serde_json::to_string(&item).unwrap();
        let back: ThreadItem<u32> = serde_json::from_str(&json).unwrap();

        assert_eq!(back.payload, Some(42));
        assert_eq!(back.deleted_at, None);
    }
}
