mod cli;
mod logging;

use std::process;

use clap::Parser;
use rainfall::{
    CityRegistry, Collector, CoordinateTable, Exporter, FetchPeriod, RainfallError,
};

use crate::cli::Cli;

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {e}");
        process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), RainfallError> {
    let registry = CityRegistry::from_path(&cli.cities_config)?;
    let coordinates = CoordinateTable::resolve(&cli.coord_file, &registry)?;

    let collector = Collector::builder()
        .period(FetchPeriod::new(cli.start_date, cli.end_date))
        .build();
    let results = collector.collect(&coordinates).await?;

    let exporter = Exporter::builder()
        .maybe_london_daily(cli.london_daily_output)
        .maybe_london_hourly(cli.london_hourly_output)
        .maybe_all_daily(cli.all_daily_output)
        .maybe_all_hourly(cli.all_hourly_output)
        .build();
    exporter.write(&results)?;

    Ok(())
}
