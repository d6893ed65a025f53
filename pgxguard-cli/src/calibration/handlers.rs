use std::path::Path;

use anyhow::{Context, Result, bail};
use clap::ArgMatches;

use pgxguard_risk::calibration::{CalibrationReport, load_calibration_jsonl};

use crate::common::write_json;

pub fn run_calibration(matches: &ArgMatches) -> Result<()> {
    let input = matches
        .get_one::<String>("input")
        .expect("--input is required");
    let bins: usize = matches
        .get_one::<String>("bins")
        .expect("--bins has a default")
        .parse()
        .context("--bins must be a positive integer")?;
    if bins == 0 {
        bail!("--bins must be a positive integer");
    }

    let rows = load_calibration_jsonl(Path::new(input))
        .with_context(|| format!("Failed to read calibration rows from {input}"))?;
    let report = CalibrationReport::from_rows(&rows, bins)?;

    write_json(&report, matches.get_one::<String>("output"))
}
