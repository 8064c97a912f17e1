use chrono::{NaiveDate, NaiveDateTime};

use crate::window::end_of_day;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Post type every calendar event is stored under.
pub const EVENT_POST_TYPE: &str = "event";

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct Event {
    pub id: u64,
    pub title: String,
    #[cfg_attr(feature = "serde", serde(default = "default_post_type"))]
    pub post_type: String,
    /// Start in local wall time of the configured timezone.
    #[cfg_attr(feature = "serde", serde(default))]
    pub start: Option<NaiveDateTime>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub end: Option<NaiveDateTime>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub all_day: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub status: EventStatus,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub location: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub organizer: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub categories: Vec<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, rename = "type", skip_serializing_if = "Option::is_none")
    )]
    pub event_type: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum EventStatus {
    #[default]
    Scheduled,
    Passed,
}

#[cfg(feature = "serde")]
fn default_post_type() -> String {
    EVENT_POST_TYPE.to_string()
}

impl EventStatus {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Scheduled => "scheduled",
            Self::Passed => "passed",
        }
    }
}

impl Event {
    #[must_use]
    pub fn new<S: Into<String>>(id: u64, title: S) -> Self {
        Self {
            id,
            title: title.into(),
            post_type: EVENT_POST_TYPE.to_string(),
            start: None,
            end: None,
            all_day: false,
            status: EventStatus::Scheduled,
            location: None,
            organizer: None,
            categories: Vec::new(),
            event_type: None,
        }
    }

    #[must_use]
    pub fn starting(mut self, start: NaiveDateTime) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub fn ending(mut self, end: NaiveDateTime) -> Self {
        self.end = Some(end);
        self
    }

    #[must_use]
    pub fn all_day(mut self) -> Self {
        self.all_day = true;
        self
    }

    /// The instant after which the event counts as passed.
    ///
    /// All-day events last until the end of their start day; everything else
    /// until its end, or its start when it has no end.
    #[must_use]
    pub fn finishes_at(&self) -> Option<NaiveDateTime> {
        if self.all_day {
            return self.start.map(|start| end_of_day(start.date()));
        }

        self.end.or(self.start)
    }

    #[must_use]
    pub fn start_date(&self) -> Option<NaiveDate> {
        self.start.map(|start| start.date())
    }
}
