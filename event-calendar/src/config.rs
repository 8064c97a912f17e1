use chrono::{DateTime, NaiveDateTime, Utc, Weekday};
use chrono_tz::Tz;

use crate::{Error, Result, EVENT_POST_TYPE};

/// Cap on how many events a single grid cell lists.
pub const DEFAULT_MAX_PER_CELL: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub timezone: Tz,
    pub start_of_week: Weekday,
    pub max_per_cell: usize,
    /// Post type the calendar screen shows.
    pub post_type: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timezone: Tz::UTC,
            start_of_week: Weekday::Mon,
            max_per_cell: DEFAULT_MAX_PER_CELL,
            post_type: EVENT_POST_TYPE.to_string(),
        }
    }
}

impl Config {
    /// Converts an absolute instant to wall time in the configured timezone.
    #[must_use]
    pub fn local(&self, instant: DateTime<Utc>) -> NaiveDateTime {
        instant.with_timezone(&self.timezone).naive_local()
    }
}

pub fn parse_timezone(name: &str) -> Result<Tz> {
    name.parse::<Tz>()
        .map_err(|_| Error::UnknownTimezone(name.to_string()))
}

pub fn parse_weekday(name: &str) -> Result<Weekday> {
    name.parse::<Weekday>()
        .map_err(|_| Error::UnknownWeekday(name.to_string()))
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn local_applies_timezone_offset() {
        let config = Config {
            timezone: parse_timezone("Europe/Berlin").unwrap(),
            ..Config::default()
        };
        let instant = Utc.with_ymd_and_hms(2024, 7, 1, 22, 30, 0).unwrap();

        assert_eq!(
            config.local(instant).to_string(),
            "2024-07-02 00:30:00".to_string()
        );
    }

    #[test]
    fn parses_weekdays_case_insensitively() {
        assert_eq!(parse_weekday("sunday"), Ok(Weekday::Sun));
        assert_eq!(parse_weekday("Mon"), Ok(Weekday::Mon));
        assert_eq!(
            parse_weekday("someday"),
            Err(Error::UnknownWeekday("someday".into()))
        );
    }

    #[test]
    fn rejects_unknown_timezones() {
        assert_eq!(
            parse_timezone("Mars/Olympus"),
            Err(Error::UnknownTimezone("Mars/Olympus".into()))
        );
    }
}
