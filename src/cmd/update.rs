use anyhow::{bail, Context, Result};

use radioscout::StationFinder;

use super::output::print_station;
use crate::OutputFormat;

pub async fn cmd_update(finder: &StationFinder, text: &str, format: OutputFormat) -> Result<()> {
    // Quick record from the search API
    let results = finder.search_stations(text, 1).await;
    if results.all_failed() {
        bail!("every provider failed to search for '{text}'");
    }
    let Some(hit) = results.stations.first() else {
        eprintln!("No matching stations found for '{text}'");
        return Ok(());
    };

    // Full record from the station page
    let station = finder
        .update_station_info(hit)
        .await
        .with_context(|| format!("failed to update '{}' from {}", hit.name, hit.url))?;

    print_station(&station, format)
}
