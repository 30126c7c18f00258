use crate::digest::{Event, RawEvent};
use crate::error::BotResult;
use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};

// Export components
pub mod caldav;
pub mod snapshot;
pub mod telegram;

pub use caldav::CalDavClient;
pub use snapshot::{FileSnapshotStore, RedisSnapshotStore};
pub use telegram::TelegramNotifier;

/// Half-open UTC query window
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeWindow {
    /// Window from `now` to `now + days`, clamped to the largest representable instant
    pub fn lookahead(now: DateTime<Utc>, days: i64) -> Self {
        let end = Duration::try_days(days)
            .and_then(|span| now.checked_add_signed(span))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { start: now, end }
    }
}

/// Source of raw calendar events
#[async_trait]
pub trait CalendarSource: Send + Sync {
    /// Fetch every event instance inside the window
    async fn fetch_raw_events(&self, window: TimeWindow) -> BotResult<Vec<RawEvent>>;
}

/// Destination for the formatted digest
#[async_trait]
pub trait Notifier: Send + Sync {
    /// Deliver the text verbatim
    async fn send_message(&self, text: &str) -> BotResult<()>;
}

/// Durable last-seen event set
#[async_trait]
pub trait SnapshotStore: Send + Sync {
    /// Previously saved events, empty when nothing was saved yet
    async fn load_snapshot(&self) -> BotResult<Vec<Event>>;

    /// Replace the saved events
    async fn save_snapshot(&self, events: &[Event]) -> BotResult<()>;
}
