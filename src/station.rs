//! Normalized radio station record.
//!
//! Every provider converts its own response format into a [`Station`].
//! The same station can be produced by a quick search hit (with a relevance
//! score but no streams) or by a full lookup (with streams but no score), so
//! equality only considers the identifying fields.

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Provider-scoped station identifier.
///
/// Providers are free to use numeric or textual identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StationId {
    Number(i64),
    Text(String),
}

impl Default for StationId {
    fn default() -> Self {
        Self::Text(String::new())
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<i64> for StationId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for StationId {
    fn from(s: &str) -> Self {
        Self::Text(s.to_string())
    }
}

impl From<String> for StationId {
    fn from(s: String) -> Self {
        Self::Text(s)
    }
}

/// One radio station as reported by one provider.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Station {
    /// Id of the provider that produced this record.
    #[serde(default)]
    pub provider: String,
    pub station_id: StationId,
    pub name: String,
    #[serde(default)]
    pub call_letters: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genre: String,
    #[serde(default)]
    pub frequency: String,
    /// Canonical human-facing page for the station.
    #[serde(default)]
    pub url: String,
    /// Station artwork.
    #[serde(default)]
    pub image: String,
    /// Stream format label -> stream URL.
    #[serde(default)]
    pub streams: BTreeMap<String, String>,
    /// Search relevance assigned by the provider; 0 for direct lookups.
    #[serde(default)]
    pub score: f64,
}

impl Station {
    /// Create a station with the identifying fields set and everything else empty.
    pub fn new(
        provider: impl Into<String>,
        station_id: impl Into<StationId>,
        name: impl Into<String>,
    ) -> Self {
        Self {
            provider: provider.into(),
            station_id: station_id.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Pick the preferred stream of this station.
    ///
    /// See [`crate::stream::best_stream`].
    pub fn best_stream(&self) -> Result<(&str, &str)> {
        crate::stream::best_stream(self)
    }
}

impl PartialEq for Station {
    fn eq(&self, other: &Self) -> bool {
        self.provider == other.provider
            && self.station_id == other.station_id
            && self.name == other.name
            && self.call_letters == other.call_letters
            && self.description == other.description
    }
}

impl fmt::Display for Station {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        writeln!(f, "  {}", self.description)?;
        writeln!(f, "  {}", self.call_letters)?;
        writeln!(f, "  ID: {}", self.station_id)?;
        writeln!(f, "  Genre: {}", self.genre)?;
        writeln!(f, "  Frequency: {}", self.frequency)?;
        writeln!(f, "  URL: {}", self.url)?;
        writeln!(f, "  Image URL: {}", self.image)?;
        writeln!(f, "  Streams:")?;
        for (label, url) in &self.streams {
            writeln!(f, "    {label}: {url}")?;
        }
        writeln!(f, "  Score: {}", self.score)?;
        writeln!(f, "  Provider: {}", self.provider)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alt_1045() -> Station {
        Station {
            call_letters: "WRFF-FM".into(),
            description: "Philly's Alternative Rock".into(),
            genre: "Alternative".into(),
            frequency: "104.5".into(),
            ..Station::new("iheartradio", 3401, "ALT 104.5")
        }
    }

    #[test]
    fn equality_ignores_streams_score_and_url() {
        let search_hit = Station {
            url: "https://www.iheart.com/live/3401".into(),
            score: 87.5,
            ..alt_1045()
        };
        let mut lookup = Station {
            url: "https://www.iheart.com/live/alt-1045-3401/".into(),
            genre: "Rock".into(),
            ..alt_1045()
        };
        lookup
            .streams
            .insert("secure_hls_stream".into(), "https://x/a.m3u8".into());

        assert_eq!(search_hit, lookup);
    }

    #[test]
    fn equality_checks_identifying_fields() {
        let base = alt_1045();
        assert_ne!(base, Station { provider: "other".into(), ..alt_1045() });
        assert_ne!(base, Station { station_id: 3402.into(), ..alt_1045() });
        assert_ne!(base, Station { name: "ALT 104.6".into(), ..alt_1045() });
        assert_ne!(base, Station { call_letters: "WXXX".into(), ..alt_1045() });
        assert_ne!(base, Station { description: String::new(), ..alt_1045() });
    }

    #[test]
    fn numeric_and_text_ids_differ() {
        assert_ne!(StationId::from(3401), StationId::from("3401"));
    }

    #[test]
    fn display_lists_streams_under_label() {
        let mut station = alt_1045();
        station
            .streams
            .insert("hls_stream".into(), "http://x/a.m3u8".into());
        station
            .streams
            .insert("pls_stream".into(), "http://x/a.pls".into());

        let rendered = station.to_string();
        assert!(rendered.starts_with("ALT 104.5\n"));
        assert!(rendered.contains("  Genre: Alternative\n"));
        assert!(rendered.contains(
            "  Streams:\n    hls_stream: http://x/a.m3u8\n    pls_stream: http://x/a.pls\n"
        ));
        assert!(rendered.ends_with("  Provider: iheartradio\n"));
    }

    #[test]
    fn deserializes_camel_case_with_defaults() {
        let json = r#"{"stationId": "abc", "name": "Test FM", "callLetters": "TFM"}"#;
        let station: Station = serde_json::from_str(json).unwrap();
        assert_eq!(station.station_id, StationId::from("abc"));
        assert_eq!(station.call_letters, "TFM");
        assert!(station.streams.is_empty());
        assert!(station.score.abs() < f64::EPSILON);
    }
}
