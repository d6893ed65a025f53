use std::collections::BTreeMap;

use log::info;

use pgxguard_core::consts::WILD_TYPE_ALLELE;
use pgxguard_core::models::diplotype::{compare_alleles, normalize_allele};
use pgxguard_core::models::{Diplotype, VariantRecord, Zygosity};
use pgxguard_core::rules::RuleSet;

/// Star alleles contributed by one gene's calls, in input order.
#[derive(Debug, Default)]
struct AlleleAccumulator {
    alleles: Vec<String>,
}

impl AlleleAccumulator {
    fn absorb(mut self, record: &VariantRecord) -> Self {
        if let Some(allele) = record.contributing_allele() {
            let allele = normalize_allele(allele);
            if allele == WILD_TYPE_ALLELE {
                return self;
            }
            let copies = match record.genotype.zygosity() {
                Zygosity::Homozygous => 2,
                Zygosity::Heterozygous => 1,
            };
            for _ in 0..copies {
                self.alleles.push(allele.clone());
            }
        }
        self
    }

    fn into_diplotype(mut self, default: &Diplotype) -> Diplotype {
        match self.alleles.len() {
            0 => default.clone(),
            1 => Diplotype::new(WILD_TYPE_ALLELE, &self.alleles[0]),
            _ => {
                // sort everything first so the pair does not depend on line order
                self.alleles.sort_by(|a, b| compare_alleles(a, b));
                Diplotype::new(&self.alleles[0], &self.alleles[1])
            }
        }
    }
}

/// Diplotype for a single gene. Genes with no qualifying call get the default.
pub fn resolve_gene_diplotype(records: &[VariantRecord], gene: &str, rules: &RuleSet) -> Diplotype {
    records
        .iter()
        .filter(|r| r.gene.as_deref() == Some(gene))
        .fold(AlleleAccumulator::default(), AlleleAccumulator::absorb)
        .into_diplotype(rules.default_diplotype())
}

///
/// Resolve a diplotype for every target gene in the rule set.
///
/// Qualifying calls carry a star allele other than `*1` and a genotype
/// that is not homozygous reference. Homozygous calls contribute their
/// allele twice, heterozygous calls once.
///
pub fn resolve_diplotypes(records: &[VariantRecord], rules: &RuleSet) -> BTreeMap<String, Diplotype> {
    let diplotypes: BTreeMap<String, Diplotype> = rules
        .target_genes()
        .iter()
        .map(|gene| (gene.clone(), resolve_gene_diplotype(records, gene, rules)))
        .collect();

    info!(
        "Extracted diplotypes: {}",
        diplotypes
            .iter()
            .map(|(gene, d)| format!("{gene}={d}"))
            .collect::<Vec<_>>()
            .join(", ")
    );

    diplotypes
}
