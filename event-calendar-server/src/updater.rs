use std::sync::Arc;

use chrono::Utc;
use event_calendar::hooks::{Action, ActionContext};
use log::{info, warn};
use tokio::{task, time};

use crate::routes::App;
use crate::source::EventSource;

/// Reloads events from `source` and fires [`Action::UpdateEvents`]. A failed
/// load keeps the events already in the store.
pub async fn update_events(app: &App, source: &EventSource, client: &reqwest::Client) {
    match source.load(client).await {
        Ok(events) => {
            info!("Reloaded {} events from {source}", events.len());
            app.store.replace(events);
        }
        Err(err) => warn!("Keeping previous events, reload from {source} failed: {err}"),
    }

    let context = ActionContext {
        store: &app.store,
        now: app.config.local(Utc::now()),
    };
    app.registry.do_action(Action::UpdateEvents, &context);
}

pub fn spawn(
    app: Arc<App>,
    source: EventSource,
    client: reqwest::Client,
    interval: time::Duration,
) -> task::JoinHandle<()> {
    task::spawn(async move {
        loop {
            time::sleep(interval).await;
            update_events(&app, &source, &client).await;
        }
    })
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use chrono::{Duration, NaiveDate};
    use event_calendar::{hooks::register_event_hooks, hooks::Registry, Config, Event, EventStatus, MemoryStore};
    use pretty_assertions::assert_eq;

    use super::*;

    fn app(events: Vec<Event>) -> App {
        let mut registry = Registry::new();
        register_event_hooks(&mut registry);

        App {
            store: MemoryStore::new(events),
            registry,
            config: Config::default(),
        }
    }

    #[tokio::test]
    async fn reloads_and_marks_passed_events() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[{{"id": 1, "title": "Kickoff", "start": "2001-01-01T09:00:00"}}]"#
        )
        .unwrap();

        let app = app(vec![Event::new(9, "Stale")]);
        let source = EventSource::File(file.path().to_path_buf());

        update_events(&app, &source, &reqwest::Client::new()).await;

        assert_eq!(app.store.len(), 1);
        assert_eq!(app.store.get(1).unwrap().status, EventStatus::Passed);
    }

    #[tokio::test]
    async fn failed_reload_keeps_events() {
        let tomorrow = NaiveDate::from_ymd_opt(2999, 1, 1).unwrap().and_hms_opt(9, 0, 0).unwrap();
        let app = app(vec![
            Event::new(1, "Future").starting(tomorrow),
            Event::new(2, "Past").starting(tomorrow - Duration::days(365_000)),
        ]);
        let source = EventSource::File("/nonexistent/events.json".into());

        update_events(&app, &source, &reqwest::Client::new()).await;

        assert_eq!(app.store.len(), 2);
        assert_eq!(app.store.get(1).unwrap().status, EventStatus::Scheduled);
        assert_eq!(app.store.get(2).unwrap().status, EventStatus::Passed);
    }
}
