use anyhow::{Context, Result};

use radioscout::{Error, StationFinder};

use super::output::print_station;
use crate::OutputFormat;

pub async fn cmd_info(finder: &StationFinder, url: &str, format: OutputFormat) -> Result<()> {
    match finder.get_station_info(url).await {
        Ok(station) => print_station(&station, format),
        Err(Error::NoMatchingProvider { .. }) => {
            eprintln!("No provider matches {url}");
            Ok(())
        }
        Err(e) => Err(e).with_context(|| format!("failed to get station info for {url}")),
    }
}
