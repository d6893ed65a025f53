use clap::{Arg, Command};

use crate::common::output_arg;

pub const COHORT_CMD: &str = "cohort";

pub fn create_cohort_cli() -> Command {
    Command::new(COHORT_CMD)
        .about("Aggregate saved `analyze` outputs into a cohort risk summary.")
        .arg(
            Arg::new("inputs")
                .long("inputs")
                .required(true)
                .num_args(1..)
                .help("One or more JSON files written by `pgxguard analyze`"),
        )
        .arg(output_arg())
}
