use ics::properties::{Categories, DtEnd, DtStart, Location, Organizer, Summary};

use crate::Event;

const ICS_FORMAT: &str = "%Y%m%dT%H%M%S";

/// Builds a calendar of `events` in floating local time.
///
/// Events without a start are left out.
#[must_use]
pub fn to_ics<'a>(name: &'a str, events: &'a [Event]) -> ics::ICalendar<'a> {
    let mut icalendar = ics::ICalendar::new("2.0", name);

    for event in events.iter().filter_map(Event::to_ics) {
        icalendar.add_event(event);
    }

    icalendar
}

impl Event {
    #[must_use]
    pub fn to_ics(&self) -> Option<ics::Event<'_>> {
        let start = self.start?;
        let end = if self.all_day {
            self.finishes_at()
        } else {
            self.end
        };

        let start = start.format(ICS_FORMAT).to_string();
        let mut ics_event = ics::Event::new(format!("event-{}", self.id), start.clone());

        ics_event.push(DtStart::new(start));
        if let Some(end) = end {
            ics_event.push(DtEnd::new(end.format(ICS_FORMAT).to_string()));
        }
        ics_event.push(Summary::new(&self.title));

        if let Some(location) = &self.location {
            ics_event.push(Location::new(location));
        }

        if let Some(organizer) = &self.organizer {
            ics_event.push(Organizer::new(organizer));
        }

        if !self.categories.is_empty() {
            ics_event.push(Categories::new(self.categories.join(",")));
        }

        Some(ics_event)
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;

    fn at(hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 4)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    #[test]
    fn exports_scheduled_events() {
        let mut review = Event::new(1, "Design review").starting(at(9)).ending(at(10));
        review.location = Some("Room 2".into());
        review.categories = vec!["team".into(), "design".into()];
        let events = vec![review, Event::new(2, "Someday")];

        let ics = to_ics("Calendar", &events).to_string();

        assert_eq!(ics.matches("BEGIN:VEVENT").count(), 1);
        assert!(ics.contains("UID:event-1"));
        assert!(ics.contains("DTSTART:20240304T090000"));
        assert!(ics.contains("DTEND:20240304T100000"));
        assert!(ics.contains("SUMMARY:Design review"));
        assert!(ics.contains("LOCATION:Room 2"));
        assert!(ics.contains("CATEGORIES:team,design"));
    }

    #[test]
    fn all_day_events_end_with_their_day() {
        let holiday = Event::new(3, "Holiday").starting(at(0)).all_day();
        let ics = to_ics("Calendar", std::slice::from_ref(&holiday)).to_string();

        assert!(ics.contains("DTEND:20240304T235959"));
    }
}
