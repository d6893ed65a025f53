use anyhow::{Result, anyhow};
use clap::ArgMatches;

use pgxguard_core::models::Phenotype;
use pgxguard_risk::phenoconversion::detect_phenoconversion;

use crate::common::{split_list, write_json};

pub fn run_phenoconversion(matches: &ArgMatches) -> Result<()> {
    let gene = matches
        .get_one::<String>("gene")
        .expect("--gene is required")
        .trim()
        .to_uppercase();
    let raw_phenotype = matches
        .get_one::<String>("phenotype")
        .expect("--phenotype is required");
    let phenotype = Phenotype::from_abbreviation(raw_phenotype.trim())
        .ok_or_else(|| anyhow!("Unknown phenotype abbreviation: {raw_phenotype}"))?;
    let medications = matches
        .get_one::<String>("medications")
        .map(|m| split_list(m))
        .unwrap_or_default();

    let result = detect_phenoconversion(&gene, phenotype, medications.as_slice());
    write_json(&result, None)
}
