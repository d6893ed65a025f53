use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};
use chrono::{SecondsFormat, Utc};
use clap::ArgMatches;
use log::info;
use uuid::Uuid;

use pgxguard_core::utils::get_dynamic_reader;
use pgxguard_risk::analysis::{AnalysisRequest, analyze_with};
use pgxguard_risk::explain::{Explainer, TemplateExplainer};

use crate::common::{load_config, load_rules, parse_options, split_list, write_json};

fn default_patient_id() -> String {
    let id = Uuid::new_v4().simple().to_string();
    format!("patient_{}", &id[..8])
}

pub fn run_analyze(matches: &ArgMatches) -> Result<()> {
    let vcf_path = matches
        .get_one::<String>("vcf")
        .expect("--vcf is required");
    let drugs = matches
        .get_one::<String>("drugs")
        .expect("--drugs is required");
    let medications = matches
        .get_one::<String>("medications")
        .map(|m| split_list(m))
        .unwrap_or_default();
    let patient_id = matches
        .get_one::<String>("patient-id")
        .cloned()
        .unwrap_or_else(default_patient_id);

    let config = load_config(matches)?;
    let rules = load_rules(matches, config.as_ref())?;

    let mut vcf = String::new();
    get_dynamic_reader(Path::new(vcf_path))
        .with_context(|| format!("Failed to open VCF file: {vcf_path}"))?
        .read_to_string(&mut vcf)
        .context("Invalid VCF file encoding")?;

    let request = AnalysisRequest {
        patient_id,
        vcf,
        drugs: split_list(drugs),
        medications,
        options: parse_options(config.as_ref()),
    };

    let template = TemplateExplainer;
    let explainer: Option<&dyn Explainer> = if matches.get_flag("explain") {
        Some(&template)
    } else {
        None
    };

    let mut batch = analyze_with(&rules, &request, explainer)?;
    batch.timestamp = Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true));

    info!(
        "Analyzed {} drug(s) for {}: {} result(s), {} error(s)",
        request.drugs.len(),
        batch.patient_id,
        batch.results.len(),
        batch.errors.len()
    );

    write_json(&batch, matches.get_one::<String>("output"))?;

    if matches.get_flag("strict") && !batch.errors.is_empty() {
        bail!("{} drug(s) failed: {}", batch.errors.len(), batch.errors.join("; "));
    }

    Ok(())
}
