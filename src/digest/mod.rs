//! Change detection and report rendering.
//!
//! Everything in here is pure: raw events go in, a MarkdownV2 report comes
//! out. The runner is the only caller that touches the network or disk.

pub mod diff;
pub mod escape;
pub mod models;
pub mod normalize;
pub mod outline;
pub mod report;
pub mod time;

pub use diff::diff;
pub use escape::{bold, escape};
pub use models::{DiffSummary, Event, EventDiff, RawEvent};
pub use normalize::normalize;
pub use outline::parse_outline;
pub use report::{build_report, ReportBuilder};

use self::time::Instant;

/// Sort events by start instant, unparseable starts last, ties by uid
pub fn sort_chronologically(events: &mut [Event]) {
    events.sort_by(|a, b| {
        let key_a = Instant::parse(&a.start).map(|i| i.sort_key());
        let key_b = Instant::parse(&b.start).map(|i| i.sort_key());
        match (key_a, key_b) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => std::cmp::Ordering::Less,
            (None, Some(_)) => std::cmp::Ordering::Greater,
            (None, None) => std::cmp::Ordering::Equal,
        }
        .then_with(|| a.uid.cmp(&b.uid))
    });
}
