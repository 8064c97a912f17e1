//! Calendar tables: one renderer per calendar mode on top of a shared
//! [`ListTable`] base.

use std::fmt::{self, Write};
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use log::debug;

use crate::grid::{Grid, NoPointers, PointerHook};
use crate::hooks::{Filter, Registry};
use crate::html::escape;
use crate::{
    Config, Error, Event, MemoryStore, OrderBy, Pagination, QueryArgs, Result, ViewRequest,
    ViewWindow,
};

mod day;
mod month;
mod week;

pub use day::DayTable;
pub use month::MonthTable;
pub use week::WeekTable;

/// Format of the hour labels and event times.
pub const TIME_FORMAT: &str = "%-I:%M %P";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Mode {
    #[default]
    Day,
    Week,
    Month,
}

impl Mode {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Week => "week",
            Self::Month => "month",
        }
    }

    /// Builds the table for this mode around `today`.
    #[must_use]
    pub fn table(self, today: NaiveDate, now: NaiveDateTime, config: Config) -> Box<dyn TableRenderer> {
        match self {
            Self::Day => Box::new(DayTable::new(today, now, config)),
            Self::Week => Box::new(WeekTable::new(today, now, config)),
            Self::Month => Box::new(MonthTable::new(today, now, config)),
        }
    }
}

impl FromStr for Mode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "day" => Ok(Self::Day),
            "week" => Ok(Self::Week),
            "month" => Ok(Self::Month),
            _ => Err(Error::UnknownMode(s.to_string())),
        }
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// State and behaviour shared by every calendar table.
#[derive(Debug, Clone)]
pub struct ListTable {
    pub mode: Mode,
    /// The date the table is centred on.
    pub today: NaiveDate,
    /// Current wall time, used to highlight the current hour and day.
    pub now: NaiveDateTime,
    pub config: Config,
    pub window: ViewWindow,
    pub grid: Grid,
    pub plural: &'static str,
}

impl ListTable {
    #[must_use]
    pub fn new(mode: Mode, today: NaiveDate, now: NaiveDateTime, config: Config, window: ViewWindow) -> Self {
        Self {
            mode,
            today,
            now,
            config,
            window,
            grid: Grid::new(),
            plural: "events",
        }
    }

    #[must_use]
    pub fn is_event_screen(&self) -> bool {
        self.config.post_type == crate::EVENT_POST_TYPE
    }

    /// Fills in the screen's post type and default ordering, then runs the
    /// registered query filters.
    #[must_use]
    pub fn main_query_args(&self, mut args: QueryArgs, registry: &Registry, request: &ViewRequest) -> QueryArgs {
        if args.post_type.is_none() {
            args.post_type = Some(self.config.post_type.clone());
        }

        if args.orderby.is_none() {
            args.orderby = Some(OrderBy::Start);
        }

        registry.apply_filters(Filter::MainQueryArgs, args, request)
    }

    #[must_use]
    pub fn table_classes(&self) -> Vec<&'static str> {
        vec!["widefat", "fixed", "striped", "calendar", self.mode.as_str(), self.plural]
    }

    /// CSS classes of the cell showing `date`.
    #[must_use]
    pub fn day_classes(&self, date: NaiveDate) -> String {
        let mut classes = vec![
            weekday_key(date),
            format!("day-{}", date.day()),
        ];

        let real_today = self.now.date();
        if date == real_today {
            classes.push("today".to_string());
        } else if date < real_today {
            classes.push("past".to_string());
        }

        classes.join(" ")
    }

    /// Links for every event the grid holds in `cell`.
    #[must_use]
    pub fn posts_for_cell(&self, cell: i64) -> String {
        let mut html = String::new();

        for event in self.grid.events(cell) {
            let time = match event.start {
                Some(_) if event.all_day => String::new(),
                Some(start) => format!(
                    "<span class=\"event-time\">{}</span> ",
                    start.format(TIME_FORMAT)
                ),
                None => String::new(),
            };

            let _ = write!(
                html,
                "<a class=\"event status-{}\" href=\"/events/{}\">{time}<span class=\"event-title\">{}</span></a>",
                event.status.as_str(),
                event.id,
                escape(&event.title)
            );
        }

        html
    }

    /// The placeholder row heading the hourly grid; `cells` empty cells follow
    /// its label.
    #[must_use]
    pub fn all_day_row(&self, cells: usize) -> String {
        let mut html = String::from("<tr class=\"all-day\"><th>All day</th>");
        for _ in 0..cells {
            html.push_str("<td></td>");
        }
        html.push_str("</tr>");
        html
    }

    /// Opens an hourly row labelled with the time of `timestamp`.
    #[must_use]
    pub fn row_start(&self, timestamp: NaiveDateTime) -> String {
        let hour = timestamp.format("%H").to_string();
        let mut classes = vec![format!("hour-{hour}")];

        if self.now.format("%H").to_string() == hour {
            classes.push("this-hour".to_string());
        }

        format!(
            "<tr class=\"{}\"><th>{}</th>",
            classes.join(" "),
            timestamp.format(TIME_FORMAT)
        )
    }
}

#[must_use]
pub fn weekday_key(date: NaiveDate) -> String {
    date.format("%A").to_string().to_lowercase()
}

/// A calendar mode's table: its window, columns, query, placement and rows.
pub trait TableRenderer: Send {
    fn base(&self) -> &ListTable;

    /// `(key, label)` pairs for the header row.
    fn columns(&self) -> Vec<(String, String)>;

    fn table_classes(&self) -> Vec<&'static str> {
        self.base().table_classes()
    }

    fn pagination(&self) -> Result<Pagination>;

    fn main_query_args(&self, args: QueryArgs, registry: &Registry, request: &ViewRequest) -> QueryArgs;

    /// Adds one queried event to the grid.
    fn setup_item(&mut self, event: &Event, max: usize, hook: &mut dyn PointerHook);

    /// The table body.
    fn rows(&self) -> String;
}

/// Queries the store for the table's window and places every result into
/// its grid. Returns the events in query order.
pub fn prepare_items(
    table: &mut dyn TableRenderer,
    store: &MemoryStore,
    registry: &Registry,
    request: &ViewRequest,
) -> Vec<Event> {
    let args = table.main_query_args(QueryArgs::default(), registry, request);
    let events = store.query(&args);
    let max = table.base().config.max_per_cell;

    debug!(
        "Placing {} events into {} view of {}",
        events.len(),
        table.base().mode,
        table.base().today
    );

    for event in &events {
        table.setup_item(event, max, &mut NoPointers);
    }

    events
}

/// Renders navigation followed by the full table.
pub fn display(table: &dyn TableRenderer) -> Result<String> {
    let base = table.base();
    let mut html = table.pagination()?.render(base.mode.as_str(), base.today);

    let _ = write!(
        html,
        "<table class=\"{}\"><thead><tr>",
        table.table_classes().join(" ")
    );

    for (key, label) in table.columns() {
        let _ = write!(
            html,
            "<th scope=\"col\" class=\"column-{}\">{}</th>",
            escape(&key),
            escape(&label)
        );
    }

    html.push_str("</tr></thead><tbody>");
    html.push_str(&table.rows());
    html.push_str("</tbody></table>");

    Ok(html)
}
