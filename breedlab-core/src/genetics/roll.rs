//! Rolling concrete offspring from an outcome table
//!
//! The engine owns no randomness; callers pass the generator, so a seeded
//! generator reproduces the same litter.

use super::codec::{encode_genotype, GenotypeMap};
use super::inheritance::CategoryOutcome;
use super::outcomes::OffspringOutcomes;
use crate::catalog::{Gender, SpeciesDefinition};
use crate::error::{BreedError, Result};
use log::debug;
use rand::distributions::{Distribution, WeightedIndex};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RolledOffspring {
    pub species: String,
    pub gender: Option<Gender>,
    pub genes: GenotypeMap,
}

impl RolledOffspring {
    /// Stored genetics string for the new creature
    pub fn genotype_string(&self) -> String {
        encode_genotype(&self.genes)
    }
}

/// Roll one offspring: gender first, then every other category from the
/// table conditioned on that gender.
pub fn roll_offspring<R: Rng + ?Sized>(
    outcomes: &OffspringOutcomes,
    species: &SpeciesDefinition,
    rng: &mut R,
) -> Result<RolledOffspring> {
    if outcomes.species != species.name {
        return Err(BreedError::SpeciesMismatch {
            expected: species.name.clone(),
            found: outcomes.species.clone(),
        });
    }

    let mut genes = GenotypeMap::new();
    let mut gender = None;
    if let Some(table) = outcomes.gender_category() {
        let genotype = sample(table, rng)?;
        gender = species
            .gender_category()
            .and_then(|c| c.restriction_of(&genotype));
        genes.insert(table.category.clone(), genotype);
    }

    let tables = match gender {
        Some(gender) => outcomes.for_gender(gender),
        None => outcomes.categories.as_slice(),
    };
    for table in tables.iter().filter(|t| !t.is_gender()) {
        genes.insert(table.category.clone(), sample(table, rng)?);
    }

    // keep catalog order regardless of which table set was used
    let position = |category: &String| {
        species
            .categories
            .iter()
            .position(|c| &c.name == category)
            .unwrap_or(usize::MAX)
    };
    genes.sort_by(|a, _, b, _| position(a).cmp(&position(b)));

    debug!("Rolled {} offspring: {}", species.name, encode_genotype(&genes));
    Ok(RolledOffspring {
        species: species.name.clone(),
        gender,
        genes,
    })
}

pub fn roll_litter<R: Rng + ?Sized>(
    outcomes: &OffspringOutcomes,
    species: &SpeciesDefinition,
    size: usize,
    rng: &mut R,
) -> Result<Vec<RolledOffspring>> {
    (0..size)
        .map(|_| roll_offspring(outcomes, species, rng))
        .collect()
}

fn sample<R: Rng + ?Sized>(table: &CategoryOutcome, rng: &mut R) -> Result<String> {
    let weights = WeightedIndex::new(table.entries.iter().map(|e| e.probability))
        .map_err(|err| BreedError::Sampling(format!("{}: {err}", table.category)))?;
    Ok(table.entries[weights.sample(rng)].genotype.clone())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::creature::Creature;
    use crate::fixtures;
    use crate::genetics::outcomes::aggregate;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_roll_is_reproducible() {
        let catalog = fixtures::catalog();
        let species = catalog.species("Mothkin").unwrap();
        let a = fixtures::mothkin("a", "Gender:XX;Body Color:Aa;Wing Pattern:Bb;Eye Color:Er");
        let b = fixtures::mothkin("b", "Gender:XY;Body Color:Aa;Wing Pattern:bb;Eye Color:er");
        let outcomes = aggregate(species, &a, &b);

        let first = roll_litter(&outcomes, species, 5, &mut StdRng::seed_from_u64(42)).unwrap();
        let second = roll_litter(&outcomes, species, 5, &mut StdRng::seed_from_u64(42)).unwrap();
        assert_eq!(first, second);
        for pup in &first {
            assert!(pup.gender.is_some());
            assert_eq!(
                pup.genes.keys().map(String::as_str).collect::<Vec<_>>(),
                vec!["Gender", "Body Color", "Wing Pattern", "Eye Color"]
            );
            assert!(!pup.genotype_string().is_empty());
        }
    }

    #[test]
    fn test_rolled_genotypes_are_possible() {
        let catalog = fixtures::catalog();
        let species = catalog.species("Mothkin").unwrap();
        let a = fixtures::mothkin("a", "Body Color:AA;Wing Pattern:Bb");
        let b = fixtures::mothkin("b", "Body Color:aa;Wing Pattern:bb");
        let outcomes = aggregate(species, &a, &b);
        let mut rng = StdRng::seed_from_u64(3);
        for pup in roll_litter(&outcomes, species, 50, &mut rng).unwrap() {
            assert_eq!(pup.genes["Body Color"], "Aa");
            assert!(["Bb", "bb"].contains(&pup.genes["Wing Pattern"].as_str()));
        }
    }

    #[test]
    fn test_dimorphic_roll_respects_restriction() {
        let catalog = fixtures::catalog();
        let species = catalog.species("Glimmerhound").unwrap();
        let a = Creature::new("a", "Glimmerhound", "Gender:XX;Crest:CC;Coat:Dd");
        let b = Creature::new("b", "Glimmerhound", "Gender:XY;Crest:Cc;Coat:dd");
        let outcomes = aggregate(species, &a, &b);
        let mut rng = StdRng::seed_from_u64(11);
        for pup in roll_litter(&outcomes, species, 100, &mut rng).unwrap() {
            if pup.gender == Some(Gender::Female) {
                assert_eq!(pup.genes["Crest"], "Cc");
            }
        }
    }

    #[test]
    fn test_species_mismatch() {
        let catalog = fixtures::catalog();
        let outcomes = aggregate(
            catalog.species("Mothkin").unwrap(),
            &fixtures::mothkin("a", "Body Color:Aa"),
            &fixtures::mothkin("b", "Body Color:Aa"),
        );
        let result = roll_offspring(
            &outcomes,
            catalog.species("Vellow").unwrap(),
            &mut StdRng::seed_from_u64(1),
        );
        assert!(matches!(result, Err(BreedError::SpeciesMismatch { .. })));
    }
}
