//! Stream selection.
//!
//! Stations usually advertise several stream variants (HLS, PLS, raw
//! Shoutcast, ...). [`best_stream`] scores each variant and returns the most
//! preferable one:
//!
//! - `+5` when the URL uses `https://`
//! - `+10` when the last path segment looks like a file, e.g. `playlist.m3u8`

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{Error, Result};
use crate::station::Station;

const SECURE_BONUS: u32 = 5;
const FILE_BONUS: u32 = 10;

static FILE_SEGMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\w+\.\w{3,4}$").expect("valid regex"));

/// Preference score for a single stream URL.
pub fn stream_score(url: &str) -> u32 {
    let mut score = 0;
    if url.starts_with("https://") {
        score += SECURE_BONUS;
    }
    if FILE_SEGMENT.is_match(&last_path_segment(url)) {
        score += FILE_BONUS;
    }
    score
}

/// Select the highest scoring `(label, url)` stream of a station.
///
/// Among equal scores the first label in lexicographic order wins.
pub fn best_stream(station: &Station) -> Result<(&str, &str)> {
    let mut best: Option<(&str, &str, u32)> = None;
    for (label, url) in &station.streams {
        let score = stream_score(url);
        if best.map_or(true, |(_, _, top)| score > top) {
            best = Some((label.as_str(), url.as_str(), score));
        }
    }

    best.map(|(label, url, _)| (label, url))
        .ok_or_else(|| Error::EmptyStreamSet {
            station: station.name.clone(),
        })
}

fn last_path_segment(raw: &str) -> String {
    let path = match url::Url::parse(raw) {
        Ok(parsed) => parsed.path().to_string(),
        Err(_) => raw.split(['?', '#']).next().unwrap_or(raw).to_string(),
    };
    path.rsplit('/').next().unwrap_or_default().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn station_with(streams: &[(&str, &str)]) -> Station {
        let mut station = Station::new("test", 1, "Test FM");
        for (label, url) in streams {
            station.streams.insert((*label).into(), (*url).into());
        }
        station
    }

    #[test]
    fn prefers_secure_file_stream() {
        let station = station_with(&[
            ("hls", "http://x/a.m3u8"),
            ("secure_hls", "https://x/b.m3u8"),
        ]);
        assert_eq!(
            best_stream(&station).unwrap(),
            ("secure_hls", "https://x/b.m3u8")
        );
    }

    #[test]
    fn scores_scheme_and_file_segment() {
        assert_eq!(stream_score("http://x/a.m3u8"), 10);
        assert_eq!(stream_score("https://x/b.m3u8"), 15);
        assert_eq!(stream_score("https://stream.example.com/live"), 5);
        assert_eq!(stream_score("http://stream.example.com/live/"), 0);
    }

    #[test]
    fn query_string_does_not_hide_file_segment() {
        assert_eq!(
            stream_score("https://cdn.example.com/hls/playlist.m3u8?token=abc"),
            15
        );
    }

    #[test]
    fn file_extension_must_be_three_or_four_chars() {
        assert_eq!(stream_score("http://x/a.m3"), 0);
        assert_eq!(stream_score("http://x/stream.mpeg4"), 0);
        assert_eq!(stream_score("http://x/stream.aacp"), 10);
    }

    #[test]
    fn file_segment_beats_bare_https() {
        let station = station_with(&[
            ("shoutcast", "https://x/stream"),
            ("pls", "http://x/listen.pls"),
        ]);
        assert_eq!(best_stream(&station).unwrap().0, "pls");
    }

    #[test]
    fn empty_streams_fail() {
        let station = station_with(&[]);
        let err = best_stream(&station).unwrap_err();
        assert!(matches!(err, Error::EmptyStreamSet { .. }));
    }

    #[test]
    fn unparseable_url_still_scored() {
        assert_eq!(stream_score("cdn/radio/live.aac"), 10);
    }
}
