use anyhow::Result;
use clap::ArgMatches;
use serde::Serialize;

use pgxguard_core::rules::RuleSet;
use pgxguard_core::utils::normalize_name;

use crate::common::{load_config, load_rules, write_json};

#[derive(Serialize, Debug, PartialEq)]
struct SupportedDrug<'a> {
    drug: &'a str,
    gene: &'a str,
}

#[derive(Serialize, Debug, PartialEq)]
struct NormalizedDrug {
    input: String,
    normalized: String,
    supported: bool,
    gene: Option<String>,
    /// 1.0 for an exact canonical name, lower when an alias was needed.
    confidence: f64,
}

fn normalize(rules: &RuleSet, name: &str) -> NormalizedDrug {
    let normalized = rules.normalize_drug(name);
    let gene = rules.primary_gene(&normalized).map(str::to_string);
    NormalizedDrug {
        input: name.to_string(),
        supported: gene.is_some(),
        confidence: if normalize_name(name) == normalized { 1.0 } else { 0.85 },
        normalized,
        gene,
    }
}

pub fn run_drugs(matches: &ArgMatches) -> Result<()> {
    let config = load_config(matches)?;
    let rules = load_rules(matches, config.as_ref())?;

    match matches.get_one::<String>("normalize") {
        Some(name) => write_json(&normalize(&rules, name), None),
        None => {
            let drugs: Vec<SupportedDrug> = rules
                .supported_drugs()
                .map(|(drug, gene)| SupportedDrug { drug, gene })
                .collect();
            write_json(&drugs, None)
        }
    }
}
