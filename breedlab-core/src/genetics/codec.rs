//! Genotype codec: `Body Color:Aa;Eye Color:Er` ⇄ ordered category map
//!
//! Decoding never aborts a creature. A malformed or unknown segment is
//! dropped and reported; the remaining segments still decode.

use crate::catalog::{parse_alleles, SpeciesDefinition};
use crate::error::BreedError;
use indexmap::IndexMap;
use log::warn;
use serde::{Deserialize, Serialize};

pub const SEGMENT_DELIMITER: char = ';';
pub const PAIR_SEPARATOR: char = ':';

/// Category → allele genotype, in the order the segments were stored
pub type GenotypeMap = IndexMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DecodedGenotype {
    pub genes: GenotypeMap,
    /// Segments that were skipped and why
    pub issues: Vec<BreedError>,
}

impl DecodedGenotype {
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn get(&self, category: &str) -> Option<&str> {
        self.genes.get(category).map(String::as_str)
    }

    /// Categories the species defines that this genotype does not cover
    pub fn missing_categories<'a>(&self, species: &'a SpeciesDefinition) -> Vec<&'a str> {
        species
            .category_names()
            .filter(|name| !self.genes.contains_key(*name))
            .collect()
    }
}

pub fn decode_genotype(input: &str, species: &SpeciesDefinition) -> DecodedGenotype {
    let mut decoded = DecodedGenotype::default();

    for raw in input.split(SEGMENT_DELIMITER) {
        let segment = raw.trim();
        if segment.is_empty() {
            continue;
        }
        let invalid = |reason: &str| BreedError::InvalidGenotypeFormat {
            segment: segment.to_string(),
            reason: reason.to_string(),
        };

        let Some((category, genotype)) = segment.split_once(PAIR_SEPARATOR) else {
            warn!("{}: dropping segment `{segment}` without separator", species.name);
            decoded.issues.push(invalid("missing `:` separator"));
            continue;
        };
        let category = category.trim();
        let genotype = genotype.trim();

        if category.is_empty() {
            decoded.issues.push(invalid("empty category"));
            continue;
        }
        if let Err(reason) = parse_alleles(genotype) {
            warn!("{}: dropping segment `{segment}`: {reason}", species.name);
            decoded.issues.push(invalid(reason));
            continue;
        }
        if species.category(category).is_none() {
            warn!("{}: dropping unknown category `{category}`", species.name);
            decoded.issues.push(BreedError::UnknownCategoryForSpecies {
                species: species.name.clone(),
                category: category.to_string(),
            });
            continue;
        }
        if decoded.genes.contains_key(category) {
            decoded.issues.push(invalid("duplicate category"));
            continue;
        }
        decoded
            .genes
            .insert(category.to_string(), genotype.to_string());
    }

    decoded
}

pub fn encode_genotype(genes: &GenotypeMap) -> String {
    genes
        .iter()
        .map(|(category, genotype)| format!("{category}{PAIR_SEPARATOR}{genotype}"))
        .collect::<Vec<_>>()
        .join(&SEGMENT_DELIMITER.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;
    use rand::rngs::StdRng;
    use rand::seq::SliceRandom;
    use rand::{Rng, SeedableRng};

    #[test]
    fn test_decode_well_formed() {
        let catalog = fixtures::catalog();
        let species = catalog.species("Mothkin").unwrap();
        let decoded = decode_genotype("Gender:XY;Body Color:Aa;Eye Color:er", species);
        assert!(decoded.is_clean());
        assert_eq!(decoded.get("Body Color"), Some("Aa"));
        assert_eq!(decoded.get("Eye Color"), Some("er"));
        assert_eq!(decoded.missing_categories(species), vec!["Wing Pattern"]);
    }

    #[test]
    fn test_round_trip_preserves_order() {
        let catalog = fixtures::catalog();
        let species = catalog.species("Mothkin").unwrap();
        for input in [
            "Eye Color:rE;Gender:XX;Body Color:aa;Wing Pattern:Bb",
            "Body Color:AA",
            "",
        ] {
            let decoded = decode_genotype(input, species);
            assert!(decoded.is_clean(), "{input}: {:?}", decoded.issues);
            assert_eq!(encode_genotype(&decoded.genes), input);
        }
    }

    #[test]
    fn test_random_well_formed_strings_round_trip() {
        let catalog = fixtures::catalog();
        let alleles: Vec<char> = ('A'..='Z').chain('a'..='z').collect();
        let mut rng = StdRng::seed_from_u64(19);
        for name in ["Mothkin", "Glimmerhound", "Vellow"] {
            let species = catalog.species(name).unwrap();
            let mut categories: Vec<&str> = species.category_names().collect();
            for _ in 0..100 {
                categories.shuffle(&mut rng);
                let count = rng.gen_range(0..=categories.len());
                let input = categories[..count]
                    .iter()
                    .map(|category| {
                        let a = *alleles.choose(&mut rng).unwrap();
                        let b = *alleles.choose(&mut rng).unwrap();
                        format!("{category}:{a}{b}")
                    })
                    .collect::<Vec<_>>()
                    .join(";");

                let decoded = decode_genotype(&input, species);
                assert!(decoded.is_clean(), "{input}: {:?}", decoded.issues);
                assert_eq!(decoded.genes.len(), count);
                let encoded = encode_genotype(&decoded.genes);
                assert_eq!(encoded, input);
                assert_eq!(decode_genotype(&encoded, species).genes, decoded.genes);
            }
        }
    }

    #[test]
    fn test_malformed_segment_does_not_abort() {
        fixtures::init_logging();
        let catalog = fixtures::catalog();
        let species = catalog.species("Mothkin").unwrap();
        let decoded = decode_genotype("Body Color:A;Wing Pattern;Eye Color:Ee;Horns:Hh", species);
        assert_eq!(decoded.genes.len(), 1);
        assert_eq!(decoded.get("Eye Color"), Some("Ee"));
        assert_eq!(decoded.issues.len(), 3);
        assert!(matches!(
            decoded.issues[0],
            BreedError::InvalidGenotypeFormat { .. }
        ));
        assert!(matches!(
            decoded.issues[2],
            BreedError::UnknownCategoryForSpecies { .. }
        ));
    }

    #[test]
    fn test_duplicate_category_keeps_first() {
        let catalog = fixtures::catalog();
        let species = catalog.species("Mothkin").unwrap();
        let decoded = decode_genotype("Body Color:AA;Body Color:aa", species);
        assert_eq!(decoded.get("Body Color"), Some("AA"));
        assert_eq!(decoded.issues.len(), 1);
    }

    #[test]
    fn test_tolerates_padding_and_trailing_delimiter() {
        let catalog = fixtures::catalog();
        let species = catalog.species("Mothkin").unwrap();
        let decoded = decode_genotype(" Body Color : Aa ; ", species);
        assert!(decoded.is_clean());
        assert_eq!(encode_genotype(&decoded.genes), "Body Color:Aa");
    }
}
