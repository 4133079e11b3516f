use anyhow::{bail, Result};

use radioscout::StationFinder;

use super::output::print_stations;
use crate::OutputFormat;

pub async fn cmd_search(
    finder: &StationFinder,
    text: &str,
    limit: usize,
    format: OutputFormat,
) -> Result<()> {
    let results = finder.search_stations(text, limit).await;

    for failure in &results.failures {
        eprintln!("⚠️  {} failed: {}", failure.provider, failure.error);
    }
    if results.all_failed() {
        bail!("every provider failed to search for '{text}'");
    }
    if results.is_empty() {
        eprintln!("No matching stations found for '{text}'");
        return Ok(());
    }

    print_stations(&results.stations, format)
}
