use chrono::{Datelike, Days, Duration, NaiveDate, NaiveDateTime};

use super::{weekday_key, ListTable, Mode, TableRenderer};
use crate::grid::PointerHook;
use crate::hooks::Registry;
use crate::pagination::Labels;
use crate::window::week_start;
use crate::{Config, Event, MetaClause, MetaKey, Pagination, QueryArgs, Result, ViewRequest, ViewWindow};

/// A month laid out as weeks of seven days. Cells are keyed by day of month.
#[derive(Debug, Clone)]
pub struct MonthTable {
    base: ListTable,
}

impl MonthTable {
    #[must_use]
    pub fn new(today: NaiveDate, now: NaiveDateTime, config: Config) -> Self {
        Self {
            base: ListTable::new(Mode::Month, today, now, config, ViewWindow::month(today)),
        }
    }

    fn day_cell(&self, date: NaiveDate) -> String {
        let day = date.day();

        format!(
            "<td class=\"{}\"><div class=\"month-day\">{day}</div><div class=\"events-for-day\">{}</div></td>",
            self.base.day_classes(date),
            self.base.posts_for_cell(i64::from(day))
        )
    }
}

impl TableRenderer for MonthTable {
    fn base(&self) -> &ListTable {
        &self.base
    }

    fn columns(&self) -> Vec<(String, String)> {
        let first = week_start(self.base.window.first_day(), self.base.config.start_of_week);

        (0..7)
            .map(|index| {
                let day = first + Duration::days(index);
                (weekday_key(day), day.format("%A").to_string())
            })
            .collect()
    }

    fn pagination(&self) -> Result<Pagination> {
        Pagination::new(
            "1 month",
            "1 year",
            Labels::new("Next Month", "Next Year", "Previous Month", "Previous Year"),
        )
    }

    /// All-day events stay in: a month has no hourly rows to keep them out of.
    fn main_query_args(&self, args: QueryArgs, registry: &Registry, request: &ViewRequest) -> QueryArgs {
        let args = if self.base.is_event_screen() {
            QueryArgs {
                meta_query: vec![MetaClause::between(MetaKey::DateTime, &self.base.window)],
                ..QueryArgs::default()
            }
        } else {
            args
        };

        self.base.main_query_args(args, registry, request)
    }

    fn setup_item(&mut self, event: &Event, max: usize, hook: &mut dyn PointerHook) {
        self.base
            .grid
            .place_daily(event, &self.base.window, max, hook);
    }

    fn rows(&self) -> String {
        let first = self.base.window.first_day();
        let last = self.base.window.last_day();
        let mut week = Some(week_start(first, self.base.config.start_of_week));
        let mut html = String::new();

        while let Some(first_of_week) = week.filter(|day| *day <= last) {
            html.push_str("<tr class=\"week\">");

            for index in 0..7 {
                match first_of_week.checked_add_days(Days::new(index)) {
                    Some(day) if first <= day && day <= last => html.push_str(&self.day_cell(day)),
                    _ => html.push_str("<td class=\"padding\"></td>"),
                }
            }

            html.push_str("</tr>");
            week = first_of_week.checked_add_days(Days::new(7));
        }

        html
    }
}
