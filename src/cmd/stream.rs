use anyhow::{Context, Result};

use radioscout::{Error, StationFinder};

pub async fn cmd_stream(finder: &StationFinder, url: &str) -> Result<()> {
    let station = match finder.get_station_info(url).await {
        Ok(station) => station,
        Err(Error::NoMatchingProvider { .. }) => {
            eprintln!("No provider matches {url}");
            return Ok(());
        }
        Err(e) => return Err(e).with_context(|| format!("failed to get station info for {url}")),
    };

    match station.best_stream() {
        Ok((label, stream_url)) => println!("{label}\t{stream_url}"),
        Err(Error::EmptyStreamSet { station }) => {
            eprintln!("Station '{station}' has no streams");
        }
        Err(e) => return Err(e.into()),
    }

    Ok(())
}
