use std::fs::File;
use std::io::BufReader;

use anyhow::{Context, Result};
use clap::ArgMatches;
use indicatif::{ProgressBar, ProgressStyle};
use log::info;

use pgxguard_risk::analysis::AnalysisBatch;
use pgxguard_risk::cohort::{cohort_entries, summarize_cohort};

use crate::common::write_json;

pub fn run_cohort(matches: &ArgMatches) -> Result<()> {
    let inputs: Vec<&String> = matches
        .get_many::<String>("inputs")
        .expect("--inputs is required")
        .collect();

    let pb = ProgressBar::new(inputs.len() as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .context("Invalid progress bar template")?,
    );
    pb.set_message("Reading analyses");

    let mut batches = Vec::with_capacity(inputs.len());
    for path in inputs {
        let file = File::open(path).with_context(|| format!("Failed to open {path}"))?;
        let batch: AnalysisBatch = serde_json::from_reader(BufReader::new(file))
            .with_context(|| format!("Failed to parse analysis output: {path}"))?;
        batches.push(batch);
        pb.inc(1);
    }
    pb.finish_and_clear();

    let summary = summarize_cohort(&cohort_entries(&batches));
    info!("{}", summary.alert);

    write_json(&summary, matches.get_one::<String>("output"))
}
