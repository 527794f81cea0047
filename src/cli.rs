use std::path::PathBuf;

use chrono::NaiveDate;
use clap::Parser;
use rainfall::{DEFAULT_END_DATE, DEFAULT_START_DATE};

/// Collect rainfall data for London and other cities.
#[derive(Parser)]
#[command(
    name = "rainfall",
    version,
    about = "Collect historical rainfall data for London and other cities"
)]
pub struct Cli {
    /// Path to the CSV file containing city coordinates.
    pub coord_file: PathBuf,

    /// Path to the JSON file mapping regions to cities.
    #[arg(long, default_value = "data/cities_config.json")]
    pub cities_config: PathBuf,

    /// Output CSV file for London's daily data (default: data/london_daily_rain.csv).
    #[arg(long)]
    pub london_daily_output: Option<PathBuf>,

    /// Output CSV file for London's hourly data (default: data/london_hourly_rain.csv).
    #[arg(long)]
    pub london_hourly_output: Option<PathBuf>,

    /// Output CSV file for all cities' daily data (default: data/all_daily_rain.csv).
    #[arg(long)]
    pub all_daily_output: Option<PathBuf>,

    /// Output CSV file for all cities' hourly data (default: data/all_hourly_rain.csv).
    #[arg(long)]
    pub all_hourly_output: Option<PathBuf>,

    /// First day of the collection window (YYYY-MM-DD).
    #[arg(long, default_value = DEFAULT_START_DATE)]
    pub start_date: NaiveDate,

    /// Last day of the collection window (YYYY-MM-DD).
    #[arg(long, default_value = DEFAULT_END_DATE)]
    pub end_date: NaiveDate,

    /// Increase verbosity (-v info, -vv debug, -vvv trace).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}
