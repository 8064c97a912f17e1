use std::cmp::Ordering;
use std::str::FromStr;

use chrono::NaiveDateTime;

use crate::{Event, ViewWindow};

/// Meta fields a query clause can test.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    /// The event start; present on every scheduled event.
    DateTime,
    /// Present only on all-day events.
    AllDay,
}

impl MetaKey {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::DateTime => "event_date_time",
            Self::AllDay => "event_all_day",
        }
    }

    fn exists_on(self, event: &Event) -> bool {
        match self {
            Self::DateTime => event.start.is_some(),
            Self::AllDay => event.all_day,
        }
    }

    fn datetime_of(self, event: &Event) -> Option<NaiveDateTime> {
        match self {
            Self::DateTime => event.start,
            Self::AllDay => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Compare {
    /// Inclusive on both ends, compared as date-times.
    Between(NaiveDateTime, NaiveDateTime),
    NotExists,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetaClause {
    pub key: MetaKey,
    pub compare: Compare,
}

impl MetaClause {
    #[must_use]
    pub fn between(key: MetaKey, window: &ViewWindow) -> Self {
        Self {
            key,
            compare: Compare::Between(window.start, window.end),
        }
    }

    #[must_use]
    pub fn not_exists(key: MetaKey) -> Self {
        Self {
            key,
            compare: Compare::NotExists,
        }
    }

    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        match self.compare {
            Compare::Between(start, end) => self
                .key
                .datetime_of(event)
                .is_some_and(|at| start <= at && at <= end),
            Compare::NotExists => !self.key.exists_on(event),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OrderBy {
    #[default]
    Start,
    Title,
    Id,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Order {
    #[default]
    Asc,
    Desc,
}

impl FromStr for OrderBy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "start" | "date" => Ok(Self::Start),
            "title" => Ok(Self::Title),
            "id" => Ok(Self::Id),
            _ => Err(()),
        }
    }
}

impl FromStr for Order {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(()),
        }
    }
}

/// Arguments for one store query. Every set field must match.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryArgs {
    pub post_type: Option<String>,
    pub meta_query: Vec<MetaClause>,
    pub category: Option<String>,
    pub event_type: Option<String>,
    pub orderby: Option<OrderBy>,
    pub order: Order,
}

impl QueryArgs {
    #[must_use]
    pub fn matches(&self, event: &Event) -> bool {
        if let Some(post_type) = &self.post_type {
            if &event.post_type != post_type {
                return false;
            }
        }

        if let Some(category) = &self.category {
            if !event.categories.iter().any(|c| c == category) {
                return false;
            }
        }

        if let Some(event_type) = &self.event_type {
            if event.event_type.as_ref() != Some(event_type) {
                return false;
            }
        }

        self.meta_query.iter().all(|clause| clause.matches(event))
    }

    /// Orders query results; ties fall back to ascending id so results are
    /// stable between requests.
    pub fn sort(&self, events: &mut [Event]) {
        let orderby = self.orderby.unwrap_or_default();

        events.sort_by(|a, b| {
            let ordering = match orderby {
                OrderBy::Start => a.start.cmp(&b.start),
                OrderBy::Title => a.title.cmp(&b.title),
                OrderBy::Id => Ordering::Equal,
            };

            let ordering = match self.order {
                Order::Asc => ordering,
                Order::Desc => ordering.reverse(),
            };

            ordering.then_with(|| match (orderby, self.order) {
                (OrderBy::Id, Order::Desc) => b.id.cmp(&a.id),
                _ => a.id.cmp(&b.id),
            })
        });
    }
}

/// Request parameters that query filters may read.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewRequest {
    pub category: Option<String>,
    pub event_type: Option<String>,
    pub orderby: Option<String>,
    pub order: Option<String>,
}
