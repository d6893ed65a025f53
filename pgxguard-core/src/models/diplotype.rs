use std::cmp::Ordering;
use std::fmt::{self, Display};
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::consts::WILD_TYPE_ALLELE;

static MULTIPLICATION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)x(\d+|n)$").expect("valid multiplication regex"));

static ALLELE_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\*?(\d+)").expect("valid allele number regex"));

/// True for copy-number alleles such as `*1xN` or `*2x2`.
pub fn is_multiplication_allele(allele: &str) -> bool {
    MULTIPLICATION.is_match(allele.trim())
}

///
/// Ordering key for star alleles.
///
/// Single-copy alleles sort before copy-number alleles, then by allele
/// number (alleles without a number sort last), then lexically.
///
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct AlleleKey<'a> {
    multiplied: bool,
    number: u32,
    label: &'a str,
}

pub fn allele_key(allele: &str) -> AlleleKey<'_> {
    let number = ALLELE_NUMBER
        .captures(allele)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .unwrap_or(u32::MAX);

    AlleleKey {
        multiplied: is_multiplication_allele(allele),
        number,
        label: allele,
    }
}

pub fn compare_alleles(a: &str, b: &str) -> Ordering {
    allele_key(a).cmp(&allele_key(b))
}

///
/// Normalize one allele token.
///
/// Bare star numbers (`4`, `1xN`) get a `*` prefix. Named haplotypes such
/// as `HapB3` or `c.1129-5923C>G` are kept as written, since the curated
/// tables list them without one. An empty token is the wild type.
///
pub fn normalize_allele(token: &str) -> String {
    let token = token.trim();
    if token.is_empty() {
        WILD_TYPE_ALLELE.to_string()
    } else if token.starts_with(|c: char| c.is_ascii_digit()) {
        format!("*{token}")
    } else {
        token.to_string()
    }
}

/// A pair of star alleles, rendered `*A/*B`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Diplotype {
    first: String,
    second: String,
}

impl Diplotype {
    pub fn new(first: &str, second: &str) -> Self {
        Diplotype {
            first: first.to_string(),
            second: second.to_string(),
        }
    }

    /// Build a diplotype with its alleles in ascending [AlleleKey] order.
    pub fn canonical(a: &str, b: &str) -> Self {
        match compare_alleles(a, b) {
            Ordering::Greater => Diplotype::new(b, a),
            _ => Diplotype::new(a, b),
        }
    }

    pub fn wild_type() -> Self {
        Diplotype::new(WILD_TYPE_ALLELE, WILD_TYPE_ALLELE)
    }

    /// A diplotype string is usable only if it carries both a `/` and a `*`.
    pub fn is_well_formed(raw: &str) -> bool {
        raw.contains('/') && raw.contains('*')
    }

    ///
    /// Parse `*A/*B`, or `A/B`. Tokens go through [normalize_allele].
    ///
    /// Anything that does not split into exactly two tokens falls back to
    /// `*1/*1`; an empty token falls back to `*1`.
    ///
    pub fn parse(raw: &str) -> Self {
        let tokens: Vec<&str> = raw.trim().split('/').map(str::trim).collect();
        if tokens.len() != 2 {
            return Diplotype::wild_type();
        }

        Diplotype {
            first: normalize_allele(tokens[0]),
            second: normalize_allele(tokens[1]),
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }

    pub fn canonicalized(&self) -> Self {
        Diplotype::canonical(&self.first, &self.second)
    }

    pub fn has_multiplication(&self) -> bool {
        is_multiplication_allele(&self.first) || is_multiplication_allele(&self.second)
    }
}

impl Display for Diplotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.first, self.second)
    }
}

impl From<&str> for Diplotype {
    fn from(value: &str) -> Self {
        Diplotype::parse(value)
    }
}
