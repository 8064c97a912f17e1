use chrono::{Datelike, Days, Duration, Months, NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Format used for the bounds of a date-time range query.
pub const VIEW_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

pub const DAY_IN_SECONDS: i64 = 24 * 60 * 60;

#[must_use]
pub fn start_of_day(date: NaiveDate) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN)
}

#[must_use]
pub fn end_of_day(date: NaiveDate) -> NaiveDateTime {
    start_of_day(date) + Duration::seconds(DAY_IN_SECONDS - 1)
}

/// Whether every calendar mode can lay out `date` along with a year of
/// pagination either side. Dates at the edge of the representable range
/// are not.
#[must_use]
pub fn is_displayable(date: NaiveDate) -> bool {
    date.checked_sub_months(Months::new(13)).is_some()
        && date.checked_add_months(Months::new(13)).is_some()
}

/// Inclusive range of local wall time a calendar table shows.
///
/// Bounds are wall-clock values in the configured timezone, so a day is
/// always `00:00:00..=23:59:59` even when a DST change shortens or lengthens
/// it in absolute time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ViewWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl ViewWindow {
    #[must_use]
    pub fn day(date: NaiveDate) -> Self {
        Self {
            start: start_of_day(date),
            end: end_of_day(date),
        }
    }

    #[must_use]
    pub fn week(date: NaiveDate, start_of_week: Weekday) -> Self {
        let first = week_start(date, start_of_week);

        Self {
            start: start_of_day(first),
            end: end_of_day(first.checked_add_days(Days::new(6)).unwrap_or(NaiveDate::MAX)),
        }
    }

    #[must_use]
    pub fn month(date: NaiveDate) -> Self {
        let first = date - Duration::days(i64::from(date.day0()));

        Self {
            start: start_of_day(first),
            end: end_of_day(first + Duration::days(days_in_month(first) - 1)),
        }
    }

    #[must_use]
    pub fn first_day(&self) -> NaiveDate {
        self.start.date()
    }

    #[must_use]
    pub fn last_day(&self) -> NaiveDate {
        self.end.date()
    }

    #[must_use]
    pub fn contains(&self, at: NaiveDateTime) -> bool {
        self.start <= at && at <= self.end
    }

    #[must_use]
    pub fn view_start(&self) -> String {
        self.start.format(VIEW_FORMAT).to_string()
    }

    #[must_use]
    pub fn view_end(&self) -> String {
        self.end.format(VIEW_FORMAT).to_string()
    }

    /// Whole days between the window start and `at`, rounded towards negative
    /// infinity.
    #[must_use]
    pub fn day_offset(&self, at: NaiveDateTime) -> i64 {
        (at - self.start).num_seconds().div_euclid(DAY_IN_SECONDS)
    }
}

/// The most recent `start_of_week` on or before `date`, saturating at the
/// earliest representable date.
#[must_use]
pub fn week_start(date: NaiveDate, start_of_week: Weekday) -> NaiveDate {
    let back = (date.weekday().num_days_from_monday() + 7
        - start_of_week.num_days_from_monday())
        % 7;

    date.checked_sub_days(Days::new(u64::from(back))).unwrap_or(NaiveDate::MIN)
}

#[must_use]
pub fn days_in_month(date: NaiveDate) -> i64 {
    let first = date - Duration::days(i64::from(date.day0()));

    first
        .checked_add_months(Months::new(1))
        .map_or(31, |next| (next - first).num_days())
}
