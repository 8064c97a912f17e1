use chrono::{Duration, NaiveDate, NaiveDateTime};

use super::{weekday_key, ListTable, Mode, TableRenderer};
use crate::grid::PointerHook;
use crate::hooks::Registry;
use crate::pagination::Labels;
use crate::{Config, Event, MetaClause, MetaKey, Pagination, QueryArgs, Result, ViewRequest, ViewWindow};

const DAYS: i64 = 7;

/// Seven days side by side, one row per hour. Cell `hour * 7 + day` holds the
/// events of that hour on the `day`-th day of the week.
#[derive(Debug, Clone)]
pub struct WeekTable {
    base: ListTable,
}

impl WeekTable {
    #[must_use]
    pub fn new(today: NaiveDate, now: NaiveDateTime, config: Config) -> Self {
        let window = ViewWindow::week(today, config.start_of_week);

        Self {
            base: ListTable::new(Mode::Week, today, now, config, window),
        }
    }

    fn day(&self, index: i64) -> NaiveDate {
        let first = self.base.window.first_day();

        first
            .checked_add_signed(Duration::days(index))
            .unwrap_or(NaiveDate::MAX)
    }
}

impl TableRenderer for WeekTable {
    fn base(&self) -> &ListTable {
        &self.base
    }

    fn columns(&self) -> Vec<(String, String)> {
        let mut columns = vec![("hour".to_string(), format!("Wk. {}", self.base.today.format("%V")))];

        columns.extend((0..DAYS).map(|index| {
            let day = self.day(index);
            (weekday_key(day), day.format("%a %-d").to_string())
        }));

        columns
    }

    fn pagination(&self) -> Result<Pagination> {
        Pagination::new(
            "1 week",
            "1 month",
            Labels::new("Next Week", "Next Month", "Previous Week", "Previous Month"),
        )
    }

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
            .place_hourly(event, &self.base.window, DAYS, max, hook);
    }

    fn rows(&self) -> String {
        let mut html = self.base.all_day_row(DAYS as usize);

        for hour in 0..24 {
            let timestamp = self.base.window.start + Duration::hours(hour);
            html.push_str(&self.base.row_start(timestamp));

            for index in 0..DAYS {
                html.push_str(&format!(
                    "<td class=\"{}\"><div class=\"events-for-hour\">{}</div></td>",
                    self.base.day_classes(self.day(index)),
                    self.base.posts_for_cell(hour * DAYS + index)
                ));
            }

            html.push_str("</tr>");
        }

        html
    }
}
