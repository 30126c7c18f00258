use serde::{Deserialize, Serialize};

/// Event record as delivered by the calendar protocol layer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct RawEvent {
    pub uid: String,
    pub start: String,
    pub end: String,
    pub summary: String,
    pub location: String,
    #[serde(alias = "desc_raw")]
    pub description: String,
}

/// Canonical event used for comparison and rendering
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Event {
    pub uid: String,
    pub start: String,
    pub end: String,
    pub summary: String,
    pub location: String,
    pub description: String,
    /// Chair taken from the description outline, empty if absent
    pub chair: String,
}

/// Difference between two event collections
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EventDiff {
    pub added: Vec<Event>,
    pub changed: Vec<Event>,
    pub removed: Vec<Event>,
}

impl EventDiff {
    /// True when no category has entries
    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.changed.is_empty() && self.removed.is_empty()
    }

    /// Counts per category
    pub fn summary(&self) -> DiffSummary {
        DiffSummary {
            added: self.added.len(),
            changed: self.changed.len(),
            removed: self.removed.len(),
        }
    }
}

/// Counts of a delivered diff
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DiffSummary {
    pub added: usize,
    pub changed: usize,
    pub removed: usize,
}
