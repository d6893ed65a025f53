mod analyze;
mod calibration;
mod cohort;
mod common;
mod drugs;
mod phenoconversion;

use anyhow::Result;
use clap::{Command, arg};

pub mod consts {
    pub const VERSION: &str = env!("CARGO_PKG_VERSION");
    pub const PKG_NAME: &str = "pgxguard";
    pub const BIN_NAME: &str = "pgxguard";
}

fn build_parser() -> Command {
    Command::new(consts::BIN_NAME)
        .bin_name(consts::BIN_NAME)
        .version(consts::VERSION)
        .about("Deterministic, auditable pharmacogenomic drug-risk verdicts from VCF files.")
        .subcommand_required(true)
        .arg(
            arg!(-v --verbose "Log debug output")
                .global(true)
                .required(false),
        )
        .subcommand(analyze::cli::create_analyze_cli())
        .subcommand(phenoconversion::cli::create_phenoconversion_cli())
        .subcommand(cohort::cli::create_cohort_cli())
        .subcommand(calibration::cli::create_calibration_cli())
        .subcommand(drugs::cli::create_drugs_cli())
}

fn main() -> Result<()> {
    let app = build_parser();
    let matches = app.get_matches();

    common::init_logging(matches.get_flag("verbose"));

    match matches.subcommand() {
        //
        // ANALYZE
        //
        Some((analyze::cli::ANALYZE_CMD, matches)) => {
            analyze::handlers::run_analyze(matches)?;
        }

        //
        // PHENOCONVERSION
        //
        Some((phenoconversion::cli::PHENOCONVERSION_CMD, matches)) => {
            phenoconversion::handlers::run_phenoconversion(matches)?;
        }

        //
        // COHORT
        //
        Some((cohort::cli::COHORT_CMD, matches)) => {
            cohort::handlers::run_cohort(matches)?;
        }

        //
        // CALIBRATION
        //
        Some((calibration::cli::CALIBRATION_CMD, matches)) => {
            calibration::handlers::run_calibration(matches)?;
        }

        //
        // DRUGS
        //
        Some((drugs::cli::DRUGS_CMD, matches)) => {
            drugs::handlers::run_drugs(matches)?;
        }

        _ => unreachable!("Subcommand not found"),
    };

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::*;

    #[rstest]
    fn test_parser_is_consistent() {
        build_parser().debug_assert();
    }

    #[rstest]
    fn test_analyze_args() {
        let matches = build_parser()
            .try_get_matches_from([
                "pgxguard",
                "analyze",
                "--vcf",
                "sample.vcf",
                "--drugs",
                "CODEINE,WARFARIN",
                "--strict",
            ])
            .unwrap();
        let (name, sub) = matches.subcommand().unwrap();
        assert_eq!(name, analyze::cli::ANALYZE_CMD);
        assert!(sub.get_flag("strict"));
        assert!(!sub.get_flag("explain"));
    }
}
