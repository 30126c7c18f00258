use super::models::{Event, EventDiff};
use std::collections::{HashMap, HashSet};

/// Id-keyed view over a fetch result.
///
/// A duplicated id keeps the position of its first occurrence and the
/// value of its last one.
struct EventIndex<'a> {
    order: Vec<&'a str>,
    by_uid: HashMap<&'a str, &'a Event>,
}

impl<'a> EventIndex<'a> {
    fn new(events: &'a [Event]) -> Self {
        let mut order = Vec::with_capacity(events.len());
        let mut seen = HashSet::with_capacity(events.len());
        let mut by_uid = HashMap::with_capacity(events.len());

        for event in events {
            let uid = event.uid.as_str();
            if seen.insert(uid) {
                order.push(uid);
            }
            by_uid.insert(uid, event);
        }

        Self { order, by_uid }
    }

    fn get(&self, uid: &str) -> Option<&'a Event> {
        self.by_uid.get(uid).copied()
    }

    fn iter(&self) -> impl Iterator<Item = &'a Event> + '_ {
        self.order.iter().filter_map(|uid| self.by_uid.get(uid).copied())
    }
}

/// Partition events into added, changed and removed by uid
pub fn diff(previous: &[Event], current: &[Event]) -> EventDiff {
    let previous_index = EventIndex::new(previous);
    let current_index = EventIndex::new(current);
    let mut result = EventDiff::default();

    for event in current_index.iter() {
        match previous_index.get(&event.uid) {
            None => result.added.push(event.clone()),
            Some(before) if before != event => result.changed.push(event.clone()),
            Some(_) => {}
        }
    }

    for event in previous_index.iter() {
        if current_index.get(&event.uid).is_none() {
            result.removed.push(event.clone());
        }
    }

    result
}
