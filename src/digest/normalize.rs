use super::models::{Event, RawEvent};
use super::time::canonical_instant;

/// Outline item that conventionally carries the chair in the event template
const CHAIR_ITEM: &str = "4.";
const CHAIR_LABEL: &str = "Chủ trì:";

/// Map a raw record into its canonical form. Never fails; missing
/// fields stay empty.
pub fn normalize(raw: &RawEvent) -> Event {
    let description = raw.description.trim().to_string();
    let chair = extract_chair(&description);

    Event {
        uid: raw.uid.trim().to_string(),
        start: canonical_instant(&raw.start),
        end: canonical_instant(&raw.end),
        summary: raw.summary.trim().to_string(),
        location: raw.location.trim().to_string(),
        description,
        chair,
    }
}

/// Find the first `4. Chủ trì: <name>` line and return `<name>` trimmed.
///
/// The chair always sits at item 4 of the upstream template; other item
/// numbers are not searched. Matching is anchored at the start of a line,
/// so it is stricter than a substring search: `14. Chủ trì:` is ignored.
pub fn extract_chair(description: &str) -> String {
    description
        .lines()
        .find_map(|line| {
            let rest = line.trim_start().strip_prefix(CHAIR_ITEM)?;
            let value = rest.trim_start().strip_prefix(CHAIR_LABEL)?;
            Some(value.trim().to_string())
        })
        .unwrap_or_default()
}

impl From<&RawEvent> for Event {
    fn from(raw: &RawEvent) -> Self {
        normalize(raw)
    }
}

impl From<&Event> for RawEvent {
    fn from(event: &Event) -> Self {
        RawEvent {
            uid: event.uid.clone(),
            start: event.start.clone(),
            end: event.end.clone(),
            summary: event.summary.clone(),
            location: event.location.clone(),
            description: event.description.clone(),
        }
    }
}
