use clap::{Command, arg};

pub const PHENOCONVERSION_CMD: &str = "phenoconversion";

pub fn create_phenoconversion_cli() -> Command {
    Command::new(PHENOCONVERSION_CMD)
        .about("Check concurrent medications for inhibitor-driven phenotype shifts.")
        .arg(arg!(--gene <GENE>).required(true).help("Gene symbol, e.g. CYP2D6"))
        .arg(
            arg!(--phenotype <PHENOTYPE>)
                .required(true)
                .help("Genetic phenotype abbreviation (PM, IM, NM, RM, URM)"),
        )
        .arg(
            arg!(--medications <MEDICATIONS>)
                .required(false)
                .help("Comma-separated concurrent medications"),
        )
}
