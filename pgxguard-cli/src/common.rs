use std::env;
use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Arg, ArgMatches, arg};
use log::{LevelFilter, info};
use serde::Serialize;

use pgxguard_core::config::PipelineConfig;
use pgxguard_core::consts::RULES_PATH_ENV;
use pgxguard_core::rules::RuleSet;
use pgxguard_vcf::ParseOptions;

pub fn init_logging(verbose: bool) {
    let mut builder = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"));
    if verbose {
        builder.filter_level(LevelFilter::Debug);
    }
    builder.init();
}

/// `--rules` and `--config`, shared by every subcommand that needs a rule set.
pub fn rules_args() -> [Arg; 2] {
    [
        arg!(--rules <RULES>)
            .required(false)
            .help(format!(
                "Path to the clinical rule set (.json/.yaml). Falls back to the config file, then ${RULES_PATH_ENV}"
            )),
        arg!(--config <CONFIG>)
            .required(false)
            .help("Path to a pipeline config TOML file"),
    ]
}

pub fn output_arg() -> Arg {
    arg!(--output <OUTPUT>)
        .required(false)
        .help("Output JSON path (default: stdout)")
}

/// Comma-separated list, trimmed, without empty entries.
pub fn split_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

pub fn load_config(matches: &ArgMatches) -> Result<Option<PipelineConfig>> {
    match matches.get_one::<String>("config") {
        Some(path) => {
            let config = PipelineConfig::try_from(Path::new(path))
                .with_context(|| format!("Failed to load pipeline config: {path}"))?;
            Ok(Some(config))
        }
        None => Ok(None),
    }
}

///
/// Pick the rule set path: the command line first, then the config file,
/// then the environment.
///
pub fn resolve_rules_path(
    cli: Option<&str>,
    config: Option<&PipelineConfig>,
    env_value: Option<String>,
) -> Result<PathBuf> {
    if let Some(path) = cli {
        return Ok(PathBuf::from(path));
    }
    if let Some(path) = config.and_then(|c| c.rules.clone()) {
        return Ok(path);
    }
    match env_value.filter(|v| !v.trim().is_empty()) {
        Some(path) => Ok(PathBuf::from(path)),
        None => bail!("No rule set given. Use --rules, a config file with `rules`, or ${RULES_PATH_ENV}"),
    }
}

pub fn load_rules(matches: &ArgMatches, config: Option<&PipelineConfig>) -> Result<RuleSet> {
    let path = resolve_rules_path(
        matches.get_one::<String>("rules").map(String::as_str),
        config,
        env::var(RULES_PATH_ENV).ok(),
    )?;
    let rules = RuleSet::try_from(path.as_path())
        .with_context(|| format!("Failed to load clinical rules: {}", path.display()))?;
    Ok(rules)
}

pub fn parse_options(config: Option<&PipelineConfig>) -> ParseOptions {
    config.map(ParseOptions::from).unwrap_or_default()
}

pub fn write_json<T: Serialize>(value: &T, output: Option<&String>) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output to JSON")?;

    match output {
        Some(p) => {
            let mut file = File::create(Path::new(p))
                .with_context(|| format!("Failed to create output file: {}", p))?;
            file.write_all(json.as_bytes())?;
            info!("Output written to {}", p);
        }
        None => {
            io::stdout().write_all(json.as_bytes())?;
            println!();
        }
    }

    Ok(())
}
