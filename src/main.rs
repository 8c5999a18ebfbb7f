//! Tariffscope CLI
//!
//! Loads a SKU list and a tariff scenario, prints the scenario report and optionally writes a
//! per-item CSV export.
//!
//! Use `-f` to load a fixture set by name
//! Use `-i` / `-s` to point at an items CSV or scenario YAML directly
//! Use `--fx` to override the scenario's FX multiplier
//! Use `--csv` to write per-item results to a file

use std::{fs::File, io, time::Instant};

use anyhow::Result;
use clap::Parser;
use tracing::{info, warn};

use tariffscope::{
    fixtures::Fixture, observability::init_subscriber, tariffs::ScenarioConfig,
    utils::ScenarioArgs,
};

fn main() -> Result<()> {
    let args = ScenarioArgs::parse();

    init_subscriber(&args.logging)?;

    let mut fixture = Fixture::with_base_path(&args.fixtures_dir);

    match &args.scenario {
        Some(path) => fixture.load_scenario_file(path)?,
        None => fixture.load_scenario(&args.fixture)?,
    };

    match &args.items {
        Some(path) => fixture.load_items_file(path)?,
        None => fixture.load_items(&args.fixture)?,
    };

    if let Some(fx) = args.fx {
        let scenario = fixture.scenario()?;
        let overridden = ScenarioConfig::new(scenario.rates().clone(), fx)?
            .with_unrated_policy(scenario.unrated_policy());

        fixture.set_scenario(overridden);
    }

    for row_error in &fixture.dataset().row_errors {
        warn!(%row_error, "row skipped during load");
    }

    let start = Instant::now();
    let report = fixture.evaluate(args.top)?;

    info!(elapsed_us = start.elapsed().as_micros(), "scenario evaluated");

    let stdout = io::stdout();
    let mut handle = stdout.lock();

    report.write_to(&mut handle, fixture.items(), fixture.currency(), args.top)?;

    if let Some(path) = &args.csv {
        report.write_csv(File::create(path)?, fixture.items())?;

        info!(path = %path.display(), "CSV export written");
    }

    Ok(())
}
