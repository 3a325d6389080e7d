//! Single-category inheritance
//!
//! Each parent contributes one of its two alleles with equal chance, so a
//! cross is the four-cell product of the parents' alleles. Cells collapse onto
//! the canonical (dominant-first) genotype and their 1/4 weights add up.

use crate::catalog::{parse_alleles, CategoryDefinition, CategoryKind, Gender};
use crate::error::{BreedError, Result};
use log::{debug, warn};
use serde::{Deserialize, Serialize};

const CELL_WEIGHT: f64 = 0.25;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutcomeEntry {
    pub genotype: String,
    pub phenotype: String,
    pub probability: f64,
}

/// Outcomes folded by expressed look
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PhenotypeOutcome {
    pub phenotype: String,
    /// Contributing genotypes, most likely first
    pub genotypes: Vec<String>,
    pub probability: f64,
}

/// Offspring distribution for one category, most likely first
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryOutcome {
    pub category: String,
    pub kind: CategoryKind,
    pub entries: Vec<OutcomeEntry>,
    /// Gender exclusion would have emptied the table, so it still holds
    /// genotypes restricted to the other gender
    #[serde(default)]
    pub restriction_ignored: bool,
}

impl CategoryOutcome {
    pub fn is_gender(&self) -> bool {
        self.kind == CategoryKind::Gender
    }

    pub fn total_probability(&self) -> f64 {
        self.entries.iter().map(|e| e.probability).sum()
    }

    pub fn is_normalized(&self, tolerance: f64) -> bool {
        (self.total_probability() - 1.0).abs() <= tolerance
    }

    pub fn most_likely(&self) -> Option<&OutcomeEntry> {
        self.entries.first()
    }

    /// Probability of a genotype; allele order does not matter
    pub fn genotype_chance(&self, genotype: &str) -> f64 {
        self.entries
            .iter()
            .filter(|e| same_genotype(&e.genotype, genotype))
            .map(|e| e.probability)
            .sum::<f64>()
            .min(1.0)
    }

    /// Probability of every genotype expressing `phenotype`
    pub fn phenotype_chance(&self, phenotype: &str) -> f64 {
        self.entries
            .iter()
            .filter(|e| e.phenotype == phenotype)
            .map(|e| e.probability)
            .sum::<f64>()
            .min(1.0)
    }

    /// Group by phenotype; total mass is preserved
    pub fn by_phenotype(&self) -> Vec<PhenotypeOutcome> {
        let mut grouped: Vec<PhenotypeOutcome> = Vec::new();
        for entry in &self.entries {
            match grouped.iter_mut().find(|g| g.phenotype == entry.phenotype) {
                Some(group) => {
                    group.probability += entry.probability;
                    group.genotypes.push(entry.genotype.clone());
                }
                None => grouped.push(PhenotypeOutcome {
                    phenotype: entry.phenotype.clone(),
                    genotypes: vec![entry.genotype.clone()],
                    probability: entry.probability,
                }),
            }
        }
        // stable: equal mass keeps the order of the strongest genotype
        grouped.sort_by(|a, b| b.probability.total_cmp(&a.probability));
        grouped
    }
}

/// Offspring genotype distribution for one category.
///
/// With `gender` set, genotypes the catalog restricts to the other gender are
/// excluded and the remaining mass renormalized.
pub fn cross_category(
    category: &CategoryDefinition,
    parent_a: &str,
    parent_b: &str,
    gender: Option<Gender>,
) -> Result<CategoryOutcome> {
    let alleles_a = alleles(category, parent_a)?;
    let alleles_b = alleles(category, parent_b)?;

    let mut weights: Vec<(String, f64)> = Vec::with_capacity(4);
    for &x in &alleles_a {
        for &y in &alleles_b {
            accumulate(&mut weights, category.canonical_genotype(x, y), CELL_WEIGHT);
        }
    }

    let mut restriction_ignored = false;
    if let Some(gender) = gender {
        match exclude_restricted(category, &weights, gender) {
            Some(kept) => weights = kept,
            None => restriction_ignored = true,
        }
    }

    debug!(
        "{}: {} × {} → {} genotypes",
        category.name,
        parent_a,
        parent_b,
        weights.len()
    );
    let mut outcome = finalize(category, weights);
    outcome.restriction_ignored = restriction_ignored;
    Ok(outcome)
}

/// Share of each gender among offspring, zero-probability genders dropped
pub fn gender_weights(female_ratio: f64) -> Vec<(Gender, f64)> {
    let female_ratio = female_ratio.clamp(0.0, 1.0);
    [(Gender::Female, female_ratio), (Gender::Male, 1.0 - female_ratio)]
        .into_iter()
        .filter(|(_, p)| *p > 0.0)
        .collect()
}

/// The gender category is never crossed: it is the species' fixed split
pub fn gender_split(category: &CategoryDefinition, female_ratio: f64) -> CategoryOutcome {
    let weights = gender_weights(female_ratio)
        .into_iter()
        .filter_map(|(gender, p)| {
            category
                .entry_for_gender(gender)
                .map(|entry| (entry.genotype.clone(), p))
        })
        .collect();
    finalize(category, weights)
}

/// Gender category resolved to a single known gender
pub fn gender_certain(category: &CategoryDefinition, gender: Gender) -> CategoryOutcome {
    let weights = category
        .entry_for_gender(gender)
        .map(|entry| vec![(entry.genotype.clone(), 1.0)])
        .unwrap_or_default();
    finalize(category, weights)
}

/// Attach phenotypes and order by probability, then catalog declaration order
pub(crate) fn finalize(category: &CategoryDefinition, weights: Vec<(String, f64)>) -> CategoryOutcome {
    let mut keyed: Vec<(usize, OutcomeEntry)> = weights
        .into_iter()
        .filter(|(_, p)| *p > 0.0)
        .map(|(genotype, probability)| {
            let declared = category.declaration_index(&genotype).unwrap_or(usize::MAX);
            let phenotype = category.phenotype_of(&genotype);
            (
                declared,
                OutcomeEntry {
                    genotype,
                    phenotype,
                    probability,
                },
            )
        })
        .collect();

    keyed.sort_by(|(da, a), (db, b)| {
        b.probability
            .total_cmp(&a.probability)
            .then(da.cmp(db))
            .then_with(|| a.genotype.cmp(&b.genotype))
    });

    CategoryOutcome {
        category: category.name.clone(),
        kind: category.kind,
        entries: keyed.into_iter().map(|(_, entry)| entry).collect(),
        restriction_ignored: false,
    }
}

pub(crate) fn accumulate(weights: &mut Vec<(String, f64)>, genotype: String, weight: f64) {
    match weights.iter_mut().find(|(g, _)| *g == genotype) {
        Some((_, p)) => *p += weight,
        None => weights.push((genotype, weight)),
    }
}

fn alleles(category: &CategoryDefinition, genotype: &str) -> Result<[char; 2]> {
    let pair = parse_alleles(genotype).map_err(|reason| BreedError::InvalidGenotypeFormat {
        segment: format!("{}:{}", category.name, genotype),
        reason: reason.to_string(),
    })?;
    for allele in pair {
        if !category.knows_allele(allele) {
            debug!("{}: allele `{allele}` is not in the catalog", category.name);
        }
    }
    Ok(pair)
}

/// Weights without genotypes restricted to the other gender, renormalized.
/// `None` when nothing would remain.
fn exclude_restricted(
    category: &CategoryDefinition,
    weights: &[(String, f64)],
    gender: Gender,
) -> Option<Vec<(String, f64)>> {
    let kept: Vec<(String, f64)> = weights
        .iter()
        .filter(|(genotype, _)| category.restriction_of(genotype) != Some(gender.opposite()))
        .cloned()
        .collect();
    if kept.len() == weights.len() {
        return Some(kept);
    }
    let mass: f64 = kept.iter().map(|(_, p)| p).sum();
    if kept.is_empty() || mass <= 0.0 {
        warn!(
            "{}: every genotype is restricted away from {} offspring, keeping the unfiltered cross",
            category.name,
            gender.name()
        );
        return None;
    }
    Some(kept.into_iter().map(|(g, p)| (g, p / mass)).collect())
}

fn same_genotype(a: &str, b: &str) -> bool {
    match (parse_alleles(a), parse_alleles(b)) {
        (Ok([a1, a2]), Ok([b1, b2])) => (a1 == b1 && a2 == b2) || (a1 == b2 && a2 == b1),
        _ => a == b,
    }
}
