use clap::{Command, arg};

use crate::common::rules_args;

pub const DRUGS_CMD: &str = "drugs";

pub fn create_drugs_cli() -> Command {
    Command::new(DRUGS_CMD)
        .about("List supported drugs, or normalize a drug name.")
        .arg(
            arg!(--normalize <NAME>)
                .required(false)
                .help("Drug or brand name to normalize"),
        )
        .args(rules_args())
}
