use std::fmt::Write;
use std::str::FromStr;

use chrono::{Datelike, Duration, Months, NaiveDate};

use crate::html::escape;
use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unit {
    Day,
    Week,
    Month,
    Year,
}

/// A navigation step such as `1 day` or `2 weeks`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Step {
    pub count: u32,
    pub unit: Unit,
}

impl FromStr for Step {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidStep(s.to_string());
        let mut parts = s.split_whitespace();

        let count = parts
            .next()
            .and_then(|count| count.parse::<u32>().ok())
            .ok_or_else(invalid)?;

        let unit = match parts.next().ok_or_else(invalid)? {
            "day" | "days" => Unit::Day,
            "week" | "weeks" => Unit::Week,
            "month" | "months" => Unit::Month,
            "year" | "years" => Unit::Year,
            _ => return Err(invalid()),
        };

        if parts.next().is_some() {
            return Err(invalid());
        }

        Ok(Self { count, unit })
    }
}

impl Step {
    /// Moves `date` forwards or backwards by this step. Month and year steps
    /// land on the last day of the target month when the day does not exist
    /// there.
    #[must_use]
    pub fn apply(self, date: NaiveDate, forward: bool) -> Option<NaiveDate> {
        let days = match self.unit {
            Unit::Day => i64::from(self.count),
            Unit::Week => i64::from(self.count) * 7,
            Unit::Month => return shift_months(date, self.count, forward),
            Unit::Year => return shift_months(date, self.count.checked_mul(12)?, forward),
        };

        if forward {
            date.checked_add_signed(Duration::days(days))
        } else {
            date.checked_sub_signed(Duration::days(days))
        }
    }
}

fn shift_months(date: NaiveDate, months: u32, forward: bool) -> Option<NaiveDate> {
    if forward {
        date.checked_add_months(Months::new(months))
    } else {
        date.checked_sub_months(Months::new(months))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Labels {
    pub next_small: String,
    pub next_large: String,
    pub prev_small: String,
    pub prev_large: String,
}

impl Labels {
    #[must_use]
    pub fn new(next_small: &str, next_large: &str, prev_small: &str, prev_large: &str) -> Self {
        Self {
            next_small: next_small.to_string(),
            next_large: next_large.to_string(),
            prev_small: prev_small.to_string(),
            prev_large: prev_large.to_string(),
        }
    }
}

/// Step sizes and labels a table hands to the paginator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pagination {
    pub small: Step,
    pub large: Step,
    pub labels: Labels,
}

impl Pagination {
    pub fn new(small: &str, large: &str, labels: Labels) -> Result<Self, Error> {
        Ok(Self {
            small: small.parse()?,
            large: large.parse()?,
            labels,
        })
    }

    /// Links ordered previous-large, previous-small, next-small, next-large.
    /// A step that would leave the representable date range is skipped.
    #[must_use]
    pub fn links(&self, today: NaiveDate) -> Vec<PageLink> {
        [
            ("previous-large", &self.labels.prev_large, self.large, false),
            ("previous-small", &self.labels.prev_small, self.small, false),
            ("next-small", &self.labels.next_small, self.small, true),
            ("next-large", &self.labels.next_large, self.large, true),
        ]
        .into_iter()
        .filter_map(|(class, label, step, forward)| {
            Some(PageLink {
                class,
                label: label.clone(),
                date: step.apply(today, forward)?,
            })
        })
        .collect()
    }

    #[must_use]
    pub fn render(&self, mode: &str, today: NaiveDate) -> String {
        let mut html = String::from("<div class=\"tablenav-pages\">");

        for link in self.links(today) {
            let _ = write!(
                html,
                "<a class=\"{}\" href=\"{}\">{}</a>",
                link.class,
                escape(&link.href(mode)),
                escape(&link.label)
            );
        }

        html.push_str("</div>");
        html
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageLink {
    pub class: &'static str,
    pub label: String,
    pub date: NaiveDate,
}

impl PageLink {
    #[must_use]
    pub fn href(&self, mode: &str) -> String {
        format!(
            "?mode={mode}&year={}&month={}&day={}",
            self.date.year(),
            self.date.month(),
            self.date.day()
        )
    }
}
