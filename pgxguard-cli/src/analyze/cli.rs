use clap::{Arg, Command, arg};

use crate::common::{output_arg, rules_args};

pub const ANALYZE_CMD: &str = "analyze";

pub fn create_analyze_cli() -> Command {
    Command::new(ANALYZE_CMD)
        .about("Analyze a patient VCF against one or more drugs.")
        .arg(
            arg!(--vcf <VCF>)
                .required(true)
                .help("Path to the patient VCF (plain or gzipped)"),
        )
        .arg(
            arg!(--drugs <DRUGS>)
                .required(true)
                .help("Comma-separated drug names, brand names allowed"),
        )
        .arg(
            arg!(--medications <MEDICATIONS>)
                .required(false)
                .help("Comma-separated concurrent medications, checked for phenoconversion"),
        )
        .arg(
            Arg::new("patient-id")
                .long("patient-id")
                .required(false)
                .help("Patient identifier (default: a random patient_xxxxxxxx id)"),
        )
        .args(rules_args())
        .arg(arg!(--explain "Attach a template explanation and its quality score").required(false))
        .arg(arg!(--strict "Exit with an error when any drug fails").required(false))
        .arg(output_arg())
}
