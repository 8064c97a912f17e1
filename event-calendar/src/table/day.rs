use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::{weekday_key, ListTable, Mode, TableRenderer};
use crate::grid::PointerHook;
use crate::hooks::Registry;
use crate::pagination::Labels;
use crate::{Config, Event, MetaClause, MetaKey, Pagination, QueryArgs, Result, ViewRequest, ViewWindow};

/// One day split into 24 hourly rows, preceded by an all-day row.
#[derive(Debug, Clone)]
pub struct DayTable {
    base: ListTable,
}

impl DayTable {
    #[must_use]
    pub fn new(today: NaiveDate, now: NaiveDateTime, config: Config) -> Self {
        Self {
            base: ListTable::new(Mode::Day, today, now, config, ViewWindow::day(today)),
        }
    }

    fn row_cell(&self, hour: i64) -> String {
        format!(
            "<td class=\"{}\"><div class=\"events-for-hour\">{}</div></td>",
            self.base.day_classes(self.base.window.first_day()),
            self.base.posts_for_cell(hour)
        )
    }
}

impl TableRenderer for DayTable {
    fn base(&self) -> &ListTable {
        &self.base
    }

    fn columns(&self) -> Vec<(String, String)> {
        let day = self.base.window.first_day();

        vec![
            ("hour".to_string(), format!("Wk. {}", self.base.today.format("%V"))),
            (weekday_key(day), day.format("%A, %B %-d, %Y").to_string()),
        ]
    }

    fn pagination(&self) -> Result<Pagination> {
        Pagination::new(
            "1 day",
            "1 week",
            Labels::new("Tomorrow", "Next Week", "Yesterday", "Previous Week"),
        )
    }

    /// Restricts an event screen to timed events starting within the day.
    /// All-day events are left to the all-day row.
    fn main_query_args(&self, args: QueryArgs, registry: &Registry, request: &ViewRequest) -> QueryArgs {
        let args = if self.base.is_event_screen() {
            QueryArgs {
                meta_query: vec![
                    MetaClause::between(MetaKey::DateTime, &self.base.window),
                    MetaClause::not_exists(MetaKey::AllDay),
                ],
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
            .place_hourly(event, &self.base.window, 1, max, hook);
    }

    fn rows(&self) -> String {
        let mut html = self.base.all_day_row(1);

        for hour in 0..24 {
            let timestamp = self.base.window.start + Duration::hours(hour);

            html.push_str(&self.base.row_start(timestamp));
            html.push_str(&self.row_cell(hour));
            html.push_str("</tr>");
        }

        html
    }
}
