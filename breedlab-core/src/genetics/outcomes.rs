//! Outcome aggregation across every category of a species
//!
//! Categories are treated as independent: each is crossed on its own and the
//! tables are reported side by side. Dimorphic species are crossed once per
//! predicted gender and the reported table is the mixture over the split.

use super::codec::{decode_genotype, encode_genotype, GenotypeMap};
use super::inheritance::{
    accumulate, cross_category, finalize, gender_certain, gender_split, gender_weights,
    CategoryOutcome, OutcomeEntry,
};
use crate::catalog::{Gender, GeneCatalog, HybridTable, SpeciesDefinition};
use crate::config::PROBABILITY_TOLERANCE;
use crate::creature::Creature;
use crate::error::{BreedError, Result};
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Full offspring table for a same-species pairing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OffspringOutcomes {
    pub species: String,
    /// One table per category, in catalog order
    pub categories: Vec<CategoryOutcome>,
    /// Gender-conditioned tables; only filled for dimorphic species
    pub by_gender: BTreeMap<Gender, Vec<CategoryOutcome>>,
    /// Recovered problems: dropped segments, skipped categories
    pub diagnostics: Vec<BreedError>,
}

impl OffspringOutcomes {
    pub fn category(&self, name: &str) -> Option<&CategoryOutcome> {
        self.categories.iter().find(|c| c.category == name)
    }

    pub fn gender_category(&self) -> Option<&CategoryOutcome> {
        self.categories.iter().find(|c| c.is_gender())
    }

    /// Tables for offspring of a known gender; the mixed tables otherwise
    pub fn for_gender(&self, gender: Gender) -> &[CategoryOutcome] {
        self.by_gender
            .get(&gender)
            .map(Vec::as_slice)
            .unwrap_or(&self.categories)
    }

    /// First entry of every category
    pub fn most_likely(&self) -> Vec<(&str, &OutcomeEntry)> {
        self.categories
            .iter()
            .filter_map(|c| c.most_likely().map(|e| (c.category.as_str(), e)))
            .collect()
    }

    /// The most likely offspring as a stored genetics string
    pub fn most_likely_genotype(&self) -> String {
        let genes: GenotypeMap = self
            .most_likely()
            .into_iter()
            .map(|(category, entry)| (category.to_string(), entry.genotype.clone()))
            .collect();
        encode_genotype(&genes)
    }

    pub fn is_normalized(&self, tolerance: f64) -> bool {
        self.categories.iter().all(|c| c.is_normalized(tolerance))
            && self
                .by_gender
                .values()
                .flatten()
                .all(|c| c.is_normalized(tolerance))
    }

    pub fn is_complete(&self) -> bool {
        self.diagnostics.is_empty()
    }
}

/// Cross-species pairing with a hybridization rule; genes are not predicted
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossBreedOutcome {
    pub species_a: String,
    pub species_b: String,
    pub possible_species: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum OffspringPrediction {
    Purebred(OffspringOutcomes),
    CrossBreed(CrossBreedOutcome),
    /// Cross-species pairing the hybridization table does not cover
    Unsupported(BreedError),
}

impl OffspringPrediction {
    pub fn outcomes(&self) -> Option<&OffspringOutcomes> {
        match self {
            OffspringPrediction::Purebred(outcomes) => Some(outcomes),
            _ => None,
        }
    }

    pub fn is_cross_breed(&self) -> bool {
        !matches!(self, OffspringPrediction::Purebred(_))
    }
}

/// Predict offspring for two parents.
///
/// Fails only when a same-species pairing names a species the catalog lacks.
pub fn compute_offspring_outcomes(
    parent_a: &Creature,
    parent_b: &Creature,
    catalog: &GeneCatalog,
    hybrids: &HybridTable,
) -> Result<OffspringPrediction> {
    if parent_a.species != parent_b.species {
        return Ok(match hybrids.lookup(&parent_a.species, &parent_b.species) {
            Some(possible) => {
                info!(
                    "Cross-breed {} × {}: possible offspring {:?}",
                    parent_a.species, parent_b.species, possible
                );
                OffspringPrediction::CrossBreed(CrossBreedOutcome {
                    species_a: parent_a.species.clone(),
                    species_b: parent_b.species.clone(),
                    possible_species: possible.to_vec(),
                })
            }
            None => {
                warn!(
                    "No hybridization rule for {} × {}",
                    parent_a.species, parent_b.species
                );
                OffspringPrediction::Unsupported(BreedError::UnsupportedCrossBreed {
                    species_a: parent_a.species.clone(),
                    species_b: parent_b.species.clone(),
                })
            }
        });
    }

    let species = catalog.species(&parent_a.species)?;
    let outcomes = aggregate(species, parent_a, parent_b);
    info!(
        "Predicted {} × {} ({}): {} categories, {} diagnostics",
        parent_a.id,
        parent_b.id,
        species.name,
        outcomes.categories.len(),
        outcomes.diagnostics.len()
    );
    Ok(OffspringPrediction::Purebred(outcomes))
}

/// Outcome table for two parents already known to share `species`
pub fn aggregate(species: &SpeciesDefinition, parent_a: &Creature, parent_b: &Creature) -> OffspringOutcomes {
    let decoded_a = decode_genotype(&parent_a.genotype, species);
    let decoded_b = decode_genotype(&parent_b.genotype, species);
    let mut diagnostics: Vec<BreedError> = decoded_a
        .issues
        .into_iter()
        .chain(decoded_b.issues)
        .collect();

    let pair = ParentPair {
        species,
        a: (parent_a.id.as_str(), &decoded_a.genes),
        b: (parent_b.id.as_str(), &decoded_b.genes),
    };

    let mut by_gender = BTreeMap::new();
    let categories = match species.gender_category() {
        Some(_) if species.is_dimorphic() => {
            let split = gender_weights(species.female_ratio());
            for &(gender, _) in &split {
                by_gender.insert(gender, pair.tables(Some(gender), &mut diagnostics));
            }
            mix(species, &split, &by_gender)
        }
        _ => pair.tables(None, &mut diagnostics),
    };

    let outcomes = OffspringOutcomes {
        species: species.name.clone(),
        categories,
        by_gender,
        diagnostics,
    };
    if !outcomes.is_normalized(PROBABILITY_TOLERANCE) {
        warn!("{}: outcome table is not normalized", species.name);
    }
    outcomes
}

struct ParentPair<'a> {
    species: &'a SpeciesDefinition,
    a: (&'a str, &'a GenotypeMap),
    b: (&'a str, &'a GenotypeMap),
}

impl ParentPair<'_> {
    fn tables(&self, gender: Option<Gender>, diagnostics: &mut Vec<BreedError>) -> Vec<CategoryOutcome> {
        let mut tables = Vec::with_capacity(self.species.categories.len());
        for category in &self.species.categories {
            if category.is_gender() {
                tables.push(match gender {
                    Some(gender) => gender_certain(category, gender),
                    None => gender_split(category, self.species.female_ratio()),
                });
                continue;
            }

            let genotype_a = self.genotype(self.a, &category.name, diagnostics);
            let genotype_b = self.genotype(self.b, &category.name, diagnostics);
            let (Some(genotype_a), Some(genotype_b)) = (genotype_a, genotype_b) else {
                continue;
            };
            match cross_category(category, genotype_a, genotype_b, gender) {
                Ok(outcome) => {
                    if let (true, Some(gender)) = (outcome.restriction_ignored, gender) {
                        note(
                            diagnostics,
                            BreedError::UnsatisfiableGenderRestriction {
                                category: category.name.clone(),
                                gender: gender.name().to_string(),
                            },
                        );
                    }
                    tables.push(outcome);
                }
                Err(err) => note(diagnostics, err),
            }
        }
        tables
    }

    fn genotype<'g>(
        &self,
        (id, genes): (&str, &'g GenotypeMap),
        category: &str,
        diagnostics: &mut Vec<BreedError>,
    ) -> Option<&'g str> {
        let genotype = genes.get(category).map(String::as_str);
        if genotype.is_none() {
            note(
                diagnostics,
                BreedError::MissingCategoryGenotype {
                    creature: id.to_string(),
                    category: category.to_string(),
                },
            );
        }
        genotype
    }
}

/// Record a diagnostic once, even when tables are built per gender
fn note(diagnostics: &mut Vec<BreedError>, err: BreedError) {
    if !diagnostics.contains(&err) {
        warn!("{err}");
        diagnostics.push(err);
    }
}

fn mix(
    species: &SpeciesDefinition,
    split: &[(Gender, f64)],
    by_gender: &BTreeMap<Gender, Vec<CategoryOutcome>>,
) -> Vec<CategoryOutcome> {
    species
        .categories
        .iter()
        .filter_map(|category| {
            let mut weights: Vec<(String, f64)> = Vec::new();
            let mut present = false;
            let mut restriction_ignored = false;
            for &(gender, share) in split {
                let Some(table) = by_gender
                    .get(&gender)
                    .and_then(|tables| tables.iter().find(|t| t.category == category.name))
                else {
                    continue;
                };
                present = true;
                restriction_ignored |= table.restriction_ignored;
                for entry in &table.entries {
                    accumulate(&mut weights, entry.genotype.clone(), share * entry.probability);
                }
            }
            present.then(|| {
                let mut mixed = finalize(category, weights);
                mixed.restriction_ignored = restriction_ignored;
                mixed
            })
        })
        .collect()
}
