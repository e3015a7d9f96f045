use std::time::Duration;

use reqwest::header::{ACCEPT, USER_AGENT};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::http_client::http_client;
use crate::record::PlayerRecord;

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Transport(String),

    #[error("http {status}")]
    Http { status: u16 },

    #[error("malformed body: {0}")]
    Decode(String),
}

/// Anything that can hand back a category's player list by endpoint name.
pub trait StatsSource: Send + Sync {
    fn fetch(&self, endpoint: &str) -> Result<Vec<PlayerRecord>, FetchError>;
}

impl<F> StatsSource for F
where
    F: Fn(&str) -> Result<Vec<PlayerRecord>, FetchError> + Send + Sync,
{
    fn fetch(&self, endpoint: &str) -> Result<Vec<PlayerRecord>, FetchError> {
        self(endpoint)
    }
}

#[derive(Debug, Clone)]
pub struct HttpStatsSource {
    base_url: String,
    timeout: Option<Duration>,
}

impl HttpStatsSource {
    pub fn new(base_url: impl Into<String>, timeout: Option<Duration>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }

    pub fn url_for(&self, endpoint: &str) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            endpoint.trim_start_matches('/')
        )
    }
}

impl StatsSource for HttpStatsSource {
    fn fetch(&self, endpoint: &str) -> Result<Vec<PlayerRecord>, FetchError> {
        let client =
            http_client(self.timeout).map_err(|err| FetchError::Transport(format!("{err:#}")))?;
        let url = self.url_for(endpoint);
        tracing::debug!(%url, "fetching stats");

        let resp = client
            .get(&url)
            .header(USER_AGENT, "player-stats-terminal")
            .header(ACCEPT, "application/json")
            .send()
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Http {
                status: status.as_u16(),
            });
        }

        let body = resp
            .text()
            .map_err(|err| FetchError::Transport(err.to_string()))?;
        parse_records_json(&body)
    }
}

/// Decodes a JSON array of flat player objects. Anything else, `null`
/// included, is a decode error.
pub fn parse_records_json(raw: &str) -> Result<Vec<PlayerRecord>, FetchError> {
    let rows: Vec<Map<String, Value>> =
        serde_json::from_str(raw).map_err(|err| FetchError::Decode(err.to_string()))?;
    Ok(rows.into_iter().map(PlayerRecord::from_map).collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_without_double_slash() {
        let source = HttpStatsSource::new("http://localhost:9000/", None);
        assert_eq!(source.url_for("hitters"), "http://localhost:9000/hitters");
        assert_eq!(source.url_for("/pitchers"), "http://localhost:9000/pitchers");
    }

    #[test]
    fn rejects_non_array_bodies() {
        assert!(matches!(
            parse_records_json(r#"{"name":"x"}"#),
            Err(FetchError::Decode(_))
        ));
        assert!(matches!(
            parse_records_json("[1, 2]"),
            Err(FetchError::Decode(_))
        ));
        assert!(matches!(
            parse_records_json("<html>"),
            Err(FetchError::Decode(_))
        ));
    }
}
