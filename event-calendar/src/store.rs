use std::sync::{PoisonError, RwLock};

use chrono::NaiveDateTime;
use log::debug;

use crate::{Event, EventStatus, QueryArgs};

/// Event storage the calendar tables query.
#[derive(Debug, Default)]
pub struct MemoryStore {
    events: RwLock<Vec<Event>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new(events: Vec<Event>) -> Self {
        Self {
            events: RwLock::new(events),
        }
    }

    /// Swaps in a freshly loaded set of events.
    pub fn replace(&self, events: Vec<Event>) {
        *self.events.write().unwrap_or_else(PoisonError::into_inner) = events;
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    #[must_use]
    pub fn get(&self, id: u64) -> Option<Event> {
        self.events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .find(|event| event.id == id)
            .cloned()
    }

    #[must_use]
    pub fn query(&self, args: &QueryArgs) -> Vec<Event> {
        let mut events = self
            .events
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|event| args.matches(event))
            .cloned()
            .collect::<Vec<_>>();

        args.sort(&mut events);
        debug!("Query matched {} events", events.len());

        events
    }

    /// Marks every scheduled event that finished before `now` as passed and
    /// returns how many changed.
    pub fn update_statuses(&self, now: NaiveDateTime) -> usize {
        let mut events = self.events.write().unwrap_or_else(PoisonError::into_inner);
        let mut updated = 0;

        for event in events.iter_mut() {
            if event.status != EventStatus::Scheduled {
                continue;
            }

            if event.finishes_at().is_some_and(|finish| finish < now) {
                event.status = EventStatus::Passed;
                updated += 1;
            }
        }

        updated
    }
}
