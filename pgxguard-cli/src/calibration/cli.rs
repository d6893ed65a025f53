use clap::{Command, arg};

use crate::common::output_arg;

pub const CALIBRATION_CMD: &str = "calibration";

pub fn create_calibration_cli() -> Command {
    Command::new(CALIBRATION_CMD)
        .about("Expected calibration error and Brier score for logged predictions.")
        .arg(
            arg!(--input <INPUT>)
                .required(true)
                .help("JSONL file of {\"confidence\": f, \"correct\": 0|1} rows"),
        )
        .arg(
            arg!(--bins <BINS>)
                .required(false)
                .default_value("10")
                .help("Number of equal-width bins for ECE"),
        )
        .arg(output_arg())
}
