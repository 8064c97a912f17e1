use std::collections::BTreeMap;

use chrono::{Datelike, Timelike};
use log::trace;

use crate::{Event, ViewWindow};

/// Called for every cell an event is about to occupy, before capacity is
/// checked.
pub trait PointerHook {
    fn setup_pointer(&mut self, _event: &Event, _cell: i64) {}
}

/// Hook that leaves placement untouched.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPointers;

impl PointerHook for NoPointers {}

/// Events keyed by cell index, each cell in query order and capped at a
/// maximum length.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Grid {
    cells: BTreeMap<i64, Vec<Event>>,
}

impl Grid {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn events(&self, cell: i64) -> &[Event] {
        self.cells.get(&cell).map_or(&[], Vec::as_slice)
    }

    /// Occupied cell indexes in ascending order.
    pub fn cells(&self) -> impl Iterator<Item = i64> + '_ {
        self.cells.keys().copied()
    }

    /// Whether any cell lists the event with `id`.
    #[must_use]
    pub fn holds(&self, id: u64) -> bool {
        self.cells.values().flatten().any(|event| event.id == id)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.values().all(Vec::is_empty)
    }

    /// Adds `event` to `cell` unless the cell already holds `max` events.
    /// An event already listed in the cell is replaced where it stands.
    pub fn insert(&mut self, cell: i64, event: &Event, max: usize) -> bool {
        let items = self.cells.entry(cell).or_default();

        if items.len() >= max {
            trace!("Cell {cell} is full, dropping event {}", event.id);
            return false;
        }

        match items.iter_mut().find(|item| item.id == event.id) {
            Some(item) => *item = event.clone(),
            None => items.push(event.clone()),
        }

        true
    }

    /// Places an event into hourly cells.
    ///
    /// The first cell is `start_hour * interval + offset` where `offset` is
    /// the number of whole days between the window start and the event start;
    /// the walk then steps by `interval` up to and including
    /// `end_hour * interval + offset`. An event without a start is measured
    /// from the Unix epoch at hour 0, which lands it in cells far before any
    /// displayed row. One without an end occupies only its start hour. Cells
    /// outside the displayed range are filled all the same, and an end hour
    /// before the start hour places nothing.
    pub fn place_hourly<H: PointerHook + ?Sized>(
        &mut self,
        event: &Event,
        window: &ViewWindow,
        interval: i64,
        max: usize,
        hook: &mut H,
    ) {
        let start_hour = event.start.map_or(0, |start| i64::from(start.hour()));
        let end_hour = event.end.map_or(start_hour, |end| i64::from(end.hour()));
        let offset = window.day_offset(event.start.unwrap_or_default());

        let mut cell = start_hour * interval + offset;
        let end_cell = end_hour * interval + offset;

        while cell <= end_cell {
            hook.setup_pointer(event, cell);
            self.insert(cell, event, max);
            cell += interval;
        }
    }

    /// Places an event into day-of-month cells, from its start day through
    /// its end day, clamped to the window.
    pub fn place_daily<H: PointerHook + ?Sized>(
        &mut self,
        event: &Event,
        window: &ViewWindow,
        max: usize,
        hook: &mut H,
    ) {
        let first = i64::from(window.first_day().day());
        let last = i64::from(window.last_day().day());

        let start_day = match event.start {
            Some(start) if start < window.start => first,
            Some(start) => i64::from(start.day()),
            None => 0,
        };

        let end_day = match event.end {
            Some(end) if end > window.end => last,
            Some(end) if end < window.start => first - 1,
            Some(end) => i64::from(end.day()),
            None => start_day,
        };

        for cell in start_day..=end_day {
            hook.setup_pointer(event, cell);
            self.insert(cell, event, max);
        }
    }
}
