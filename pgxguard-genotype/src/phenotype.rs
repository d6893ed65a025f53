use log::{debug, warn};

use pgxguard_core::genes::{AlleleFunctionSets, CallingModel, gene_family};
use pgxguard_core::models::{Diplotype, NamingConvention, Phenotype, PhenotypeCall};
use pgxguard_core::rules::RuleSet;
use pgxguard_core::utils::round_to;

/// Activity value for alleles missing from the rule set: presumed functional.
const DEFAULT_ALLELE_ACTIVITY: f64 = 1.0;

fn total_activity(gene: &str, diplotype: &Diplotype, rules: &RuleSet) -> f64 {
    [diplotype.first(), diplotype.second()]
        .iter()
        .map(|allele| {
            rules
                .activity_score(gene, allele)
                .unwrap_or(DEFAULT_ALLELE_ACTIVITY)
        })
        .sum()
}

fn classify_activity(total: f64) -> Phenotype {
    if total <= 0.0 {
        Phenotype::Poor
    } else if total <= 1.0 {
        Phenotype::Intermediate
    } else if total <= 2.25 {
        Phenotype::Normal
    } else {
        Phenotype::Ultrarapid
    }
}

fn classify_allele_function(sets: &AlleleFunctionSets, diplotype: &Diplotype) -> Phenotype {
    let (a, b) = (diplotype.first(), diplotype.second());
    let count = |pred: &dyn Fn(&str) -> bool| [a, b].into_iter().filter(|allele| pred(*allele)).count();

    let non_functional = count(&|x| sets.is_non_functional(x));
    let decreased = count(&|x| sets.is_decreased(x));
    let increased = count(&|x| sets.is_increased(x));

    match (non_functional, decreased, increased) {
        (2, _, _) => Phenotype::Poor,
        (1, _, _) => Phenotype::Intermediate,
        (_, 2, _) => Phenotype::Poor,
        (_, 1, _) => Phenotype::Intermediate,
        (_, _, 2) => Phenotype::Ultrarapid,
        (_, _, 1) => Phenotype::Rapid,
        _ => Phenotype::Normal,
    }
}

fn from_curated_name(name: &str, naming: NamingConvention, rules: &RuleSet) -> Option<PhenotypeCall> {
    if let Some((phenotype, wording)) = Phenotype::from_full_name(name) {
        return Some(PhenotypeCall::new(phenotype, wording));
    }
    rules
        .abbreviation_for(name)
        .and_then(Phenotype::from_abbreviation)
        .map(|phenotype| PhenotypeCall::new(phenotype, naming))
}

///
/// Call the phenotype for a gene and diplotype.
///
/// The curated diplotype table is consulted first (in either allele
/// order). The default diplotype without a table entry takes the rule
/// set's default phenotype. Otherwise activity-score genes sum per-allele
/// activity and everything else is classified from curated allele function.
/// Genes outside the rule set's target list are `Unknown`.
///
pub fn call_phenotype(gene: &str, diplotype: &Diplotype, rules: &RuleSet) -> PhenotypeCall {
    let family = gene_family(gene);

    if !rules.is_target_gene(gene) {
        warn!("Gene {gene} not in target genes");
        return PhenotypeCall::unknown(family.naming);
    }

    if let Some(name) = rules.diplotype_phenotype(gene, diplotype) {
        match from_curated_name(name, family.naming, rules) {
            Some(call) => return call,
            None => warn!("Unrecognized curated phenotype `{name}` for {gene} {diplotype}"),
        }
    }

    // a gene with no observed variants takes the rule set's default call
    if diplotype.canonicalized() == rules.default_diplotype().canonicalized() {
        if let Some(call) = from_curated_name(rules.default_phenotype(), family.naming, rules) {
            return call.with_naming(family.naming);
        }
    }

    let phenotype = match family.model {
        CallingModel::ActivityScore => {
            let total = total_activity(gene, diplotype, rules);
            debug!("{gene} {diplotype} activity score {total}");
            classify_activity(total)
        }
        CallingModel::AlleleFunction(sets) => classify_allele_function(&sets, diplotype),
    };

    PhenotypeCall::new(phenotype, family.naming)
}

/// Summed activity score, for genes called by activity score only.
pub fn activity_score(gene: &str, diplotype: &Diplotype, rules: &RuleSet) -> Option<f64> {
    if !gene_family(gene).uses_activity_score() {
        return None;
    }
    Some(round_to(total_activity(gene, diplotype, rules), 2))
}
