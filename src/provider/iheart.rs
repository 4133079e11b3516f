//! iHeartRadio station provider.
//!
//! Search goes through the public iHeart search API (JSON). Station lookups
//! scrape the station page, which embeds the full station record as JSON in
//! `<script id="initialState">` under `live.stations.<id>`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use super::StationProvider;
use crate::error::{Error, Result};
use crate::http_client::HttpClient;
use crate::station::{Station, StationId};

pub const IHEART_ID: &str = "iheartradio";
pub const IHEART_NAME: &str = "iHeart Radio (Built-in)";
pub const IHEART_BASE_URL: &str = "https://www.iheart.com";
pub const IHEART_SEARCH_URL: &str = "https://us.api.iheart.com/api/v3/search/all";

static STATION_URL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:https?://)?(?:\w{3}\.)?iheart\.com/live/(?:[a-z0-9]+-)*[0-9]{4}/?$")
        .expect("valid regex")
});

/// iHeartRadio provider.
pub struct IHeartRadioProvider {
    client: HttpClient,
    base_url: String,
    search_url: String,
}

impl IHeartRadioProvider {
    /// Provider against the public iHeart endpoints.
    pub fn new(client: HttpClient) -> Self {
        Self::with_endpoints(client, IHEART_BASE_URL, IHEART_SEARCH_URL)
    }

    /// Provider against custom endpoints (mirrors, test servers).
    pub fn with_endpoints(
        client: HttpClient,
        base_url: impl Into<String>,
        search_url: impl Into<String>,
    ) -> Self {
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            search_url: search_url.into(),
        }
    }

    fn search_params(query: &str, limit: usize) -> Vec<(&'static str, String)> {
        vec![
            ("keywords", query.to_string()),
            ("startIndex", "0".to_string()),
            ("maxRows", limit.to_string()),
            ("station", "true".to_string()),
            ("albums", "false".to_string()),
            ("artist", "false".to_string()),
            ("bundle", "false".to_string()),
            ("playlist", "false".to_string()),
            ("podcast", "false".to_string()),
            ("track", "false".to_string()),
        ]
    }
}

#[async_trait]
impl StationProvider for IHeartRadioProvider {
    fn id(&self) -> &str {
        IHEART_ID
    }

    fn name(&self) -> &str {
        IHEART_NAME
    }

    fn base_url(&self) -> &str {
        &self.base_url
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Station>> {
        if limit == 0 {
            return Ok(Vec::new());
        }

        tracing::debug!("Searching iHeart for '{}' (limit {})", query, limit);

        let params = Self::search_params(query, limit);
        let response: SearchResponse =
            self.client.fetch_json(&self.search_url, &params).await?;

        let mut stations = to_search_hits(response, &self.base_url);
        stations.truncate(limit);
        Ok(stations)
    }

    async fn get(&self, station_url: &str) -> Result<Station> {
        tracing::debug!("Fetching iHeart station page {}", station_url);
        let html = self.client.fetch_text(station_url).await?;
        parse_station_page(&html, &self.base_url).map_err(|reason| Error::Parse {
            url: station_url.to_string(),
            reason,
        })
    }

    fn matches(&self, url: &str) -> bool {
        STATION_URL.is_match(url)
    }
}

/// Convert a search API response into stations.
fn to_search_hits(response: SearchResponse, base_url: &str) -> Vec<Station> {
    response
        .results
        .stations
        .into_iter()
        .map(|hit| Station {
            provider: IHEART_ID.to_string(),
            url: format!("{base_url}/live/{}", hit.id),
            station_id: hit.id,
            name: hit.name,
            call_letters: hit.call_letters,
            description: hit.description,
            genre: hit.genre,
            frequency: hit.frequency,
            image: hit.image_url,
            streams: BTreeMap::new(),
            score: hit.score,
        })
        .collect()
}

/// Extract the embedded station record from a station page.
fn parse_station_page(html: &str, base_url: &str) -> std::result::Result<Station, String> {
    let document = Html::parse_document(html);
    let selector =
        Selector::parse("script#initialState").map_err(|e| format!("selector: {e:?}"))?;
    let script = document
        .select(&selector)
        .next()
        .ok_or("page has no initialState script")?;
    let raw: String = script.text().collect();

    let state: Value = serde_json::from_str(&raw).map_err(|e| format!("initialState: {e}"))?;
    let data = state
        .pointer("/live/stations")
        .and_then(Value::as_object)
        .and_then(|stations| stations.values().next())
        .ok_or("initialState has no live.stations entry")?;

    let page: PageStation =
        serde_json::from_value(data.clone()).map_err(|e| format!("station record: {e}"))?;

    let url = if page.url.starts_with("http://") || page.url.starts_with("https://") {
        page.url
    } else {
        format!("{base_url}{}", page.url)
    };

    let streams = page
        .streams
        .into_iter()
        .filter_map(|(label, value)| match value {
            Value::String(s) if !s.is_empty() => Some((label, s)),
            _ => None,
        })
        .collect();

    Ok(Station {
        provider: IHEART_ID.to_string(),
        station_id: page.id,
        name: page.name,
        call_letters: page.call_letters,
        description: page.description,
        genre: page.genres.into_iter().next().map(|g| g.name).unwrap_or_default(),
        frequency: page.freq,
        url,
        image: page.logo,
        streams,
        score: 0.0,
    })
}

/// Accepts strings, numbers and null for free-text fields.
fn lenient_string<'de, D>(deserializer: D) -> std::result::Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Null => String::new(),
        other => other.to_string(),
    })
}

// ============================================================================
// iHeart Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
struct SearchResponse {
    results: SearchResults,
}

#[derive(Debug, Deserialize)]
struct SearchResults {
    #[serde(default)]
    stations: Vec<SearchHit>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchHit {
    id: StationId,
    #[serde(deserialize_with = "lenient_string")]
    name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    call_letters: String,
    #[serde(default, deserialize_with = "lenient_string")]
    description: String,
    #[serde(default, deserialize_with = "lenient_string")]
    genre: String,
    #[serde(default, deserialize_with = "lenient_string")]
    frequency: String,
    #[serde(default, deserialize_with = "lenient_string")]
    image_url: String,
    #[serde(default)]
    score: f64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PageStation {
    id: StationId,
    #[serde(deserialize_with = "lenient_string")]
    name: String,
    #[serde(default, deserialize_with = "lenient_string")]
    call_letters: String,
    #[serde(default, deserialize_with = "lenient_string")]
    description: String,
    #[serde(default)]
    genres: Vec<PageGenre>,
    #[serde(default, deserialize_with = "lenient_string")]
    freq: String,
    #[serde(default, deserialize_with = "lenient_string")]
    url: String,
    #[serde(default, deserialize_with = "lenient_string")]
    logo: String,
    #[serde(default)]
    streams: BTreeMap<String, Value>,
}

#[derive(Debug, Deserialize)]
struct PageGenre {
    #[serde(deserialize_with = "lenient_string")]
    name: String,
}
