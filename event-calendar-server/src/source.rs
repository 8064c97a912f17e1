use std::io;
use std::path::PathBuf;
use std::str::FromStr;

use event_calendar::Event;
use log::debug;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("event source is empty")]
    Empty,
    #[error("failed to read events: {0}")]
    Io(#[from] io::Error),
    #[error("failed to fetch events: {0}")]
    Http(#[from] reqwest::Error),
    #[error("upstream responded with status {0}")]
    Status(u16),
    #[error("failed to parse events: {0}")]
    Json(#[from] serde_json::Error),
}

/// Where the server loads its events from: a JSON array of events, either on
/// disk or behind an http(s) URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventSource {
    File(PathBuf),
    Url(String),
}

impl FromStr for EventSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();

        if s.is_empty() {
            return Err(Error::Empty);
        }

        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(Self::Url(s.to_string()));
        }

        Ok(Self::File(PathBuf::from(s)))
    }
}

impl EventSource {
    pub async fn load(&self, client: &reqwest::Client) -> Result<Vec<Event>, Error> {
        let json = match self {
            Self::File(path) => tokio::fs::read_to_string(path).await?,
            Self::Url(url) => {
                let response = client.get(url).send().await?;
                let status = response.status();

                if !status.is_success() {
                    return Err(Error::Status(status.as_u16()));
                }

                response.text().await?
            }
        };

        let events = serde_json::from_str::<Vec<Event>>(&json)?;
        debug!("Loaded {} events from {self}", events.len());

        Ok(events)
    }
}

impl std::fmt::Display for EventSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::Url(url) => f.write_str(url),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn picks_source_kind_from_scheme() {
        assert_eq!(
            "https://example.com/events.json".parse::<EventSource>().unwrap(),
            EventSource::Url("https://example.com/events.json".into())
        );
        assert_eq!(
            "./events.json".parse::<EventSource>().unwrap(),
            EventSource::File("./events.json".into())
        );
        assert!(matches!("  ".parse::<EventSource>(), Err(Error::Empty)));
    }

    #[tokio::test]
    async fn loads_events_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"[
                {{"id": 1, "title": "Standup", "start": "2024-03-04T09:00:00", "end": "2024-03-04T09:15:00"}},
                {{"id": 2, "title": "Holiday", "start": "2024-03-04T00:00:00", "all_day": true}}
            ]"#
        )
        .unwrap();

        let source = EventSource::File(file.path().to_path_buf());
        let events = source.load(&reqwest::Client::new()).await.unwrap();

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].title, "Standup");
        assert!(events[1].all_day);
    }

    #[tokio::test]
    async fn reports_malformed_json() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{\"not\": \"a list\"}}").unwrap();

        let source = EventSource::File(file.path().to_path_buf());
        let result = source.load(&reqwest::Client::new()).await;

        assert!(matches!(result, Err(Error::Json(_))));
    }

    #[tokio::test]
    async fn reports_missing_file() {
        let source = EventSource::File("/nonexistent/events.json".into());
        let result = source.load(&reqwest::Client::new()).await;

        assert!(matches!(result, Err(Error::Io(_))));
    }
}
