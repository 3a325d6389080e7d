//! Error taxonomy for the breeding engine
//!
//! Most variants are locally recoverable: the computation that hit them keeps
//! going and records the error in its `diagnostics` list instead of returning
//! it. Only the non-recoverable variants ever surface as `Err`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, thiserror::Error, Serialize, Deserialize)]
pub enum BreedError {
    #[error("Invalid genotype segment `{segment}`: {reason}")]
    InvalidGenotypeFormat { segment: String, reason: String },

    #[error("Category `{category}` is not defined for species `{species}`")]
    UnknownCategoryForSpecies { species: String, category: String },

    #[error("Creature `{creature}` has no genotype for category `{category}`")]
    MissingCategoryGenotype { creature: String, category: String },

    #[error("Cross-breeding `{species_a}` with `{species_b}` is not supported")]
    UnsupportedCrossBreed { species_a: String, species_b: String },

    #[error("Cyclic ancestry detected at `{0}`")]
    CyclicAncestryDetected(String),

    #[error("Parent record `{parent}` of `{creature}` could not be resolved")]
    MissingParentRecord { creature: String, parent: String },

    #[error("Breeding log `{log}` references unknown pair `{pair}`")]
    UnknownBreedingPair { log: String, pair: String },

    #[error("Creature `{creature}` is claimed by pair `{ignored_pair}`, keeping `{kept_pair}`")]
    ConflictingParentage {
        creature: String,
        kept_pair: String,
        ignored_pair: String,
    },

    #[error("Every `{category}` genotype from this cross is restricted away from {gender} offspring")]
    UnsatisfiableGenderRestriction { category: String, gender: String },

    #[error("Unknown species `{0}`")]
    UnknownSpecies(String),

    #[error("Species mismatch: expected `{expected}`, found `{found}`")]
    SpeciesMismatch { expected: String, found: String },

    #[error("Invalid research goal: {0}")]
    InvalidGoal(String),

    #[error("Catalog error: {0}")]
    Catalog(String),

    #[error("Config error: {0}")]
    Config(String),

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Sampling error: {0}")]
    Sampling(String),
}

impl BreedError {
    /// Whether the engine recovers from this error locally and reports it as a
    /// diagnostic rather than failing the call.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            BreedError::InvalidGenotypeFormat { .. }
                | BreedError::UnknownCategoryForSpecies { .. }
                | BreedError::MissingCategoryGenotype { .. }
                | BreedError::UnsupportedCrossBreed { .. }
                | BreedError::CyclicAncestryDetected(_)
                | BreedError::MissingParentRecord { .. }
                | BreedError::UnknownBreedingPair { .. }
                | BreedError::ConflictingParentage { .. }
                | BreedError::UnsatisfiableGenderRestriction { .. }
        )
    }
}

impl From<serde_json::Error> for BreedError {
    fn from(err: serde_json::Error) -> Self {
        BreedError::Parse(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, BreedError>;
