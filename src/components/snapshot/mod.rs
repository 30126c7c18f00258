mod file_store;
mod redis_store;

pub use self::file_store::FileSnapshotStore;
pub use self::redis_store::{keys, RedisSnapshotStore};

use crate::digest::{normalize, Event, RawEvent};
use crate::error::{snapshot_error, BotResult};

/// Decode a saved snapshot.
///
/// Older snapshots hold raw records (`desc_raw`, no `chair`); every record
/// is normalized again so both shapes load as canonical events.
pub fn decode_snapshot(json: &str) -> BotResult<Vec<Event>> {
    if json.trim().is_empty() {
        return Ok(Vec::new());
    }
    let records: Vec<RawEvent> = serde_json::from_str(json)
        .map_err(|e| snapshot_error(&format!("Failed to deserialize snapshot: {}", e)))?;
    Ok(records.iter().map(normalize).collect())
}

/// Encode events as pretty JSON, non-ASCII text kept verbatim
pub fn encode_snapshot(events: &[Event]) -> BotResult<String> {
    serde_json::to_string_pretty(events)
        .map_err(|e| snapshot_error(&format!("Failed to serialize snapshot: {}", e)))
}
