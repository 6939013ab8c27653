//! iTunes Search API client for resolving song media links and durations.
//!
//! Rate limited to 5 requests per second to stay well within the
//! published limits for unauthenticated search.

use anyhow::Result;
use reqwest::blocking::Client;
use serde::Deserialize;
use std::sync::Mutex;
use std::time::{Duration, Instant};

const ITUNES_API_BASE: &str = "https://itunes.apple.com/search";
const RATE_LIMIT_INTERVAL: Duration = Duration::from_millis(200); // 5 req/sec

/// Media details for a song as resolved from the iTunes Search API.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedMedia {
    pub media_url: String,
    pub duration: Option<String>,
}

pub struct ITunesClient {
    client: Client,
    last_request: Mutex<Instant>,
}

#[derive(Deserialize)]
struct SearchResponse {
    results: Option<Vec<ITunesTrack>>,
}

#[derive(Deserialize)]
struct ITunesTrack {
    #[serde(rename = "trackViewUrl")]
    track_view_url: Option<String>,
    #[serde(rename = "trackTimeMillis")]
    track_time_millis: Option<u64>,
}

impl ITunesClient {
    pub fn new() -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .build()?;

        Ok(Self {
            client,
            last_request: Mutex::new(Instant::now() - RATE_LIMIT_INTERVAL),
        })
    }

    fn rate_limit(&self) {
        let mut last = self.last_request.lock().unwrap();
        let elapsed = last.elapsed();
        if elapsed < RATE_LIMIT_INTERVAL {
            std::thread::sleep(RATE_LIMIT_INTERVAL - elapsed);
        }
        *last = Instant::now();
    }

    /// Search for the best match for a free-text term, typically
    /// `"<artist> <title>"`. Returns None when the search has no usable hit.
    pub fn resolve(&self, term: &str) -> Result<Option<ResolvedMedia>> {
        self.rate_limit();

        let response = self
            .client
            .get(ITUNES_API_BASE)
            .query(&[("term", term), ("media", "music"), ("limit", "1")])
            .send()?;

        if !response.status().is_success() {
            anyhow::bail!(
                "iTunes search failed with status {}",
                response.status()
            );
        }

        let body: SearchResponse = response.json()?;

        let track = match body.results.and_then(|r| r.into_iter().next()) {
            Some(track) => track,
            None => return Ok(None),
        };

        let media_url = match track.track_view_url.filter(|u| !u.is_empty()) {
            Some(url) => url,
            None => return Ok(None),
        };

        let duration = track.track_time_millis.map(format_duration);

        Ok(Some(ResolvedMedia {
            media_url,
            duration,
        }))
    }
}

/// Formats track milliseconds as "m:ss".
fn format_duration(millis: u64) -> String {
    let total_seconds = millis / 1000;
    format!("{}:{:02}", total_seconds / 60, total_seconds % 60)
}
