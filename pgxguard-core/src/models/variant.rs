use std::fmt::{self, Display};

use serde::{Deserialize, Serialize};

use crate::consts::{DEFAULT_GENOTYPE, WILD_TYPE_ALLELE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Zygosity {
    Homozygous,
    Heterozygous,
}

///
/// A diploid genotype call as written in the GT field.
///
/// Phased calls are stored unphased (`0|1` becomes `0/1`). A missing call
/// is taken to be heterozygous.
///
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Genotype(String);

impl Genotype {
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.is_empty() || raw == "." {
            return Genotype(DEFAULT_GENOTYPE.to_string());
        }
        Genotype(raw.replace('|', "/"))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn alleles(&self) -> Option<(&str, &str)> {
        let mut parts = self.0.split('/');
        match (parts.next(), parts.next(), parts.next()) {
            (Some(a), Some(b), None) => Some((a, b)),
            _ => None,
        }
    }

    /// Both alleles are the reference allele.
    pub fn is_reference(&self) -> bool {
        matches!(self.alleles(), Some(("0", "0")))
    }

    /// Both alleles are present and identical.
    pub fn is_homozygous(&self) -> bool {
        match self.alleles() {
            Some((a, b)) => a == b && a != ".",
            None => false,
        }
    }

    pub fn zygosity(&self) -> Zygosity {
        if self.is_homozygous() {
            Zygosity::Homozygous
        } else {
            Zygosity::Heterozygous
        }
    }
}

impl Default for Genotype {
    fn default() -> Self {
        Genotype(DEFAULT_GENOTYPE.to_string())
    }
}

impl Display for Genotype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One retained VCF data line, annotated where possible.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VariantRecord {
    pub chrom: String,
    pub pos: u64,
    pub rsid: String,
    #[serde(rename = "ref")]
    pub ref_allele: String,
    #[serde(rename = "alt")]
    pub alt_allele: String,
    pub qual: f64,
    pub gene: Option<String>,
    pub star_allele: Option<String>,
    pub genotype: Genotype,
    pub function: Option<String>,
}

impl VariantRecord {
    pub fn is_annotated(&self) -> bool {
        self.gene.is_some() && self.star_allele.is_some()
    }

    /// The non-wild-type star allele this record adds to its gene, if any.
    pub fn contributing_allele(&self) -> Option<&str> {
        if self.genotype.is_reference() {
            return None;
        }
        match self.star_allele.as_deref() {
            Some(star) if star != WILD_TYPE_ALLELE && !star.is_empty() => Some(star),
            _ => None,
        }
    }
}

/// A non-reference, annotated call surfaced in the patient profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectedVariant {
    pub rsid: String,
    pub gene: String,
    pub star_allele: String,
    pub zygosity: Zygosity,
    pub function: Option<String>,
    pub clinical_significance: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    fn make_record(star: Option<&str>, gt: &str) -> VariantRecord {
        VariantRecord {
            chrom: "22".to_string(),
            pos: 42522613,
            rsid: "rs3892097".to_string(),
            ref_allele: "G".to_string(),
            alt_allele: "A".to_string(),
            qual: 100.0,
            gene: Some("CYP2D6".to_string()),
            star_allele: star.map(String::from),
            genotype: Genotype::parse(gt),
            function: None,
        }
    }

    #[rstest]
    #[case("1/1", Zygosity::Homozygous)]
    #[case("0|1", Zygosity::Heterozygous)]
    #[case("0/0", Zygosity::Homozygous)]
    #[case("./.", Zygosity::Heterozygous)]
    #[case("1", Zygosity::Heterozygous)]
    fn test_zygosity(#[case] gt: &str, #[case] expected: Zygosity) {
        assert_eq!(Genotype::parse(gt).zygosity(), expected);
    }

    #[rstest]
    fn test_missing_genotype_defaults_to_het() {
        assert_eq!(Genotype::parse("").as_str(), "0/1");
        assert_eq!(Genotype::parse(".").as_str(), "0/1");
        assert_eq!(Genotype::default().as_str(), "0/1");
    }

    #[rstest]
    fn test_contributing_allele() {
        assert_eq!(make_record(Some("*4"), "1/1").contributing_allele(), Some("*4"));
        assert_eq!(make_record(Some("*4"), "0/0").contributing_allele(), None);
        assert_eq!(make_record(Some("*1"), "0/1").contributing_allele(), None);
        assert_eq!(make_record(None, "0/1").contributing_allele(), None);
    }
}
