use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Redirect, Response},
    routing::get,
    Json, Router,
};
use chrono::{NaiveDate, Utc};
use event_calendar::{
    display, escape, hooks::Registry, is_displayable, prepare_items, to_ics, Config,
    MemoryStore, Mode, ViewRequest,
};
use log::error;
use serde::Deserialize;

const CALENDAR_PATH: &str = "/calendar";

pub struct App {
    pub store: MemoryStore,
    pub registry: Registry,
    pub config: Config,
}

pub fn router(app: Arc<App>) -> Router {
    Router::new()
        .route(CALENDAR_PATH, get(handle_calendar))
        .route("/events/:id", get(handle_event))
        .fallback(|| async { Redirect::temporary(CALENDAR_PATH) })
        .with_state(app)
}

#[derive(Debug, Default, Deserialize)]
struct CalendarQuery {
    mode: Option<String>,
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
    category: Option<String>,
    #[serde(rename = "type")]
    event_type: Option<String>,
    orderby: Option<String>,
    order: Option<String>,
    post_type: Option<String>,
    format: Option<String>,
}

impl CalendarQuery {
    /// The requested date, when all three parts are given and form a real
    /// date the calendar can lay out.
    fn date(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year?, self.month?, self.day?)
            .filter(|date| is_displayable(*date))
    }

    /// The app configuration, switched to the requested post type.
    fn config(&self, config: &Config) -> Config {
        match self.post_type.as_deref().map(str::trim) {
            Some(post_type) if !post_type.is_empty() => Config {
                post_type: post_type.to_string(),
                ..config.clone()
            },
            _ => config.clone(),
        }
    }

    fn view_request(&self) -> ViewRequest {
        ViewRequest {
            category: self.category.clone(),
            event_type: self.event_type.clone(),
            orderby: self.orderby.clone(),
            order: self.order.clone(),
        }
    }
}

async fn handle_calendar(State(app): State<Arc<App>>, Query(query): Query<CalendarQuery>) -> Response {
    let mode = match query.mode.as_deref().unwrap_or("day").parse::<Mode>() {
        Ok(mode) => mode,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    };

    let now = app.config.local(Utc::now());
    let today = query.date().unwrap_or(now.date());

    let mut table = mode.table(today, now, query.config(&app.config));
    let mut events = prepare_items(table.as_mut(), &app.store, &app.registry, &query.view_request());
    events.retain(|event| table.base().grid.holds(event.id));

    match query.format.as_deref().unwrap_or("html") {
        "html" => match display(table.as_ref()) {
            Ok(body) => Html(page(mode, today, &body)).into_response(),
            Err(err) => {
                error!("Failed to render {mode} view of {today}: {err}");
                (StatusCode::INTERNAL_SERVER_ERROR, "Failed to render calendar").into_response()
            }
        },
        "json" => Json(events).into_response(),
        "ics" => {
            let name = format!("{mode} {today}");
            let body = to_ics(&name, &events).to_string();
            ([(header::CONTENT_TYPE, "text/calendar")], body).into_response()
        }
        other => (StatusCode::BAD_REQUEST, format!("unknown format `{other}`")).into_response(),
    }
}

async fn handle_event(State(app): State<Arc<App>>, Path(id): Path<u64>) -> Response {
    match app.store.get(id) {
        Some(event) => Json(event).into_response(),
        None => (StatusCode::NOT_FOUND, format!("no event with id {id}")).into_response(),
    }
}

fn page(mode: Mode, today: NaiveDate, table: &str) -> String {
    let title = escape(&format!("Events: {mode} of {}", today.format("%B %-d, %Y"))).into_owned();

    format!(
        "<!DOCTYPE html><html><head><meta charset=\"utf-8\"><title>{title}</title></head><body><h1>{title}</h1>{table}</body></html>"
    )
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use chrono::{Datelike, NaiveDate};
    use event_calendar::{hooks::register_event_hooks, Event};
    use pretty_assertions::assert_eq;
    use scraper::{Html as Document, Selector};
    use tower::ServiceExt;

    use super::*;

    fn at(day: u32, hour: u32) -> chrono::NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn app() -> Router {
        let mut retro = Event::new(3, "Retro").starting(at(4, 15)).ending(at(4, 16));
        retro.categories = vec!["team".into()];

        let mut about = Event::new(5, "About us").starting(at(20, 9));
        about.post_type = "page".into();

        app_with(vec![
            Event::new(1, "Planning").starting(at(4, 9)).ending(at(4, 11)),
            Event::new(2, "Holiday").starting(at(4, 0)).all_day(),
            retro,
            Event::new(4, "Launch").starting(at(12, 14)),
            about,
        ])
    }

    fn app_with(events: Vec<Event>) -> Router {
        let mut registry = Registry::new();
        register_event_hooks(&mut registry);

        router(Arc::new(App {
            store: MemoryStore::new(events),
            registry,
            config: Config::default(),
        }))
    }

    async fn get(uri: &str) -> (StatusCode, String, Option<String>) {
        request(app(), uri).await
    }

    async fn request(app: Router, uri: &str) -> (StatusCode, String, Option<String>) {
        let response = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|value| value.to_str().unwrap().to_string());
        let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();

        (status, String::from_utf8(body.to_vec()).unwrap(), content_type)
    }

    #[tokio::test]
    async fn renders_day_view() {
        let (status, body, _) = get("/calendar?mode=day&year=2024&month=3&day=4").await;
        assert_eq!(status, StatusCode::OK);

        let document = Document::parse_document(&body);
        let rows = Selector::parse("tbody > tr").unwrap();
        assert_eq!(document.select(&rows).count(), 25);
        assert!(body.contains("Planning"));
        assert!(body.contains("Retro"));
        assert!(!body.contains("Launch"));
    }

    #[tokio::test]
    async fn filters_by_category() {
        let (status, body, _) = get("/calendar?year=2024&month=3&day=4&category=team&format=json").await;
        assert_eq!(status, StatusCode::OK);

        let events: Vec<Event> = serde_json::from_str(&body).unwrap();
        assert_eq!(events.iter().map(|event| event.id).collect::<Vec<_>>(), vec![3]);
    }

    #[tokio::test]
    async fn month_json_includes_all_day_events() {
        let (_, body, _) = get("/calendar?mode=month&year=2024&month=3&day=1&format=json").await;

        let events: Vec<Event> = serde_json::from_str(&body).unwrap();
        assert_eq!(events.iter().map(|event| event.id).collect::<Vec<_>>(), vec![2, 1, 3, 4]);
    }

    #[tokio::test]
    async fn exports_ics() {
        let (status, body, content_type) = get("/calendar?mode=week&year=2024&month=3&day=4&format=ics").await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type.as_deref(), Some("text/calendar"));
        assert_eq!(body.matches("BEGIN:VEVENT").count(), 2);
    }

    #[tokio::test]
    async fn rejects_unknown_mode_and_format() {
        let (status, _, _) = get("/calendar?mode=decade").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _, _) = get("/calendar?format=pdf").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn impossible_date_falls_back_to_today() {
        let (status, _, _) = get("/calendar?year=2024&month=2&day=30").await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn dates_at_the_edge_of_the_calendar_fall_back_to_today() {
        let today = Utc::now().date_naive();

        for (mode, date) in [("day", NaiveDate::MAX), ("week", NaiveDate::MIN), ("month", NaiveDate::MAX)] {
            let uri = format!(
                "/calendar?mode={mode}&year={}&month={}&day={}",
                date.year(),
                date.month(),
                date.day()
            );
            let (status, body, _) = get(&uri).await;

            assert_eq!(status, StatusCode::OK, "{uri}");
            assert!(body.contains(&format!("{}, {}", today.format("%B %-d"), today.year())), "{uri}");
        }
    }

    #[tokio::test]
    async fn other_post_types_skip_the_day_window() {
        let (status, body, _) = get("/calendar?year=2024&month=3&day=4&post_type=page&format=json").await;
        assert_eq!(status, StatusCode::OK);

        let events: Vec<Event> = serde_json::from_str(&body).unwrap();
        assert_eq!(events.iter().map(|event| event.id).collect::<Vec<_>>(), vec![5]);
    }

    #[tokio::test]
    async fn json_lists_only_events_placed_in_the_grid() {
        let events = (1..=11)
            .map(|id| Event::new(id, format!("Slot {id}")).starting(at(4, 10)))
            .collect();

        let (_, body, _) = request(app_with(events), "/calendar?year=2024&month=3&day=4&format=json").await;

        let events: Vec<Event> = serde_json::from_str(&body).unwrap();
        assert_eq!(events.iter().map(|event| event.id).collect::<Vec<_>>(), (1..=10).collect::<Vec<_>>());
    }

    #[tokio::test]
    async fn serves_single_events() {
        let (status, body, _) = get("/events/4").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("\"title\":\"Launch\""));

        let (status, _, _) = get("/events/99").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn redirects_unknown_paths() {
        let response = app()
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::TEMPORARY_REDIRECT);
        assert_eq!(response.headers()[header::LOCATION], CALENDAR_PATH);
    }
}
