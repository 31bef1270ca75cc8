//! Shared types for the extraction pipeline.

use chrono::{DateTime, Local, NaiveDateTime};
use serde::{Deserialize, Serialize};

// ── Raw input ───────────────────────────────────────────────────────

/// A message as handed over by the mailbox collaborator: protocol-assigned
/// identifier, raw RFC 822 bytes, protocol status flags.
#[derive(Debug, Clone)]
pub struct RawMessage {
    /// Unique within the fetched collection for one run.
    pub uid: String,
    /// Raw message content, headers and body.
    pub body: Vec<u8>,
    /// Server-side state markers, e.g. `\Seen`.
    pub flags: Vec<String>,
}

// ── Point in time ───────────────────────────────────────────────────

/// A calendar date and time that either carries zone information (already
/// converted to the local zone) or none at all.
///
/// Which variant a value lands in depends on the parse strategy that
/// produced it, so consumers always see a mix. Comparisons treat
/// `ZoneUnknown` values as local wall-clock time; that assumption lives
/// here so ordering and equality agree on it everywhere.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub enum PointInTime {
    Zoned(DateTime<Local>),
    ZoneUnknown(NaiveDateTime),
}

impl PointInTime {
    /// Local wall-clock view used for ordering, equality and display.
    pub fn local_key(&self) -> NaiveDateTime {
        match self {
            Self::Zoned(dt) => dt.naive_local(),
            Self::ZoneUnknown(naive) => *naive,
        }
    }
}

impl PartialEq for PointInTime {
    fn eq(&self, other: &Self) -> bool {
        self.local_key() == other.local_key()
    }
}

impl Eq for PointInTime {}

impl PartialOrd for PointInTime {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for PointInTime {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.local_key().cmp(&other.local_key())
    }
}

// ── Priority ────────────────────────────────────────────────────────

/// Message priority; `Normal` whenever no signal is decisive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    #[default]
    Normal,
    Low,
}

impl Priority {
    /// Short label for logs and reports.
    pub fn label(&self) -> &'static str {
        match self {
            Self::High => "high",
            Self::Normal => "normal",
            Self::Low => "low",
        }
    }
}

// ── Message record ──────────────────────────────────────────────────

/// One fully-resolved record per processed message.
///
/// Immutable after assembly: every field holds a concrete value, absent
/// temporal fields are an explicit `None`. Ordering a collection produces
/// a new sequence and never mutates the records themselves.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MessageRecord {
    /// Protocol-assigned message identifier.
    pub uid: String,
    /// Decoded subject; empty allowed.
    pub subject: String,
    /// Decoded display string, not validated as an address.
    pub sender: String,
    /// When the message arrived, if the Date header parsed.
    pub received_at: Option<PointInTime>,
    /// Inferred response deadline, if any strategy succeeded.
    pub due_at: Option<PointInTime>,
    pub priority: Priority,
    pub is_read: bool,
    pub has_pending_task: bool,
}

impl MessageRecord {
    /// Received-date axis of the sort key; records without one sort as the
    /// earliest possible time.
    pub(crate) fn received_key(&self) -> NaiveDateTime {
        self.received_at.map_or(NaiveDateTime::MIN, |t| t.local_key())
    }
}
