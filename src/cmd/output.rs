use anyhow::Result;

use radioscout::Station;

use crate::OutputFormat;

pub fn print_station(station: &Station, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => println!("{station}"),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(station)?),
    }
    Ok(())
}

pub fn print_stations(stations: &[Station], format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => {
            for station in stations {
                println!("{station}");
            }
        }
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(stations)?),
    }
    Ok(())
}
