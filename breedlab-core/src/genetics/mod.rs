//! Genetics: from stored genotype strings to scored offspring predictions
//!
//! Codec → inheritance (one category) → outcomes (whole species) → goal.

pub mod codec;
pub mod goal;
pub mod inheritance;
pub mod outcomes;
pub mod roll;

pub use codec::{decode_genotype, encode_genotype, DecodedGenotype, GenotypeMap};
pub use goal::{score_goal, score_prediction, GoalMode, GoalTarget, MatchResult, ResearchGoal, ScoreOptions};
pub use inheritance::{cross_category, CategoryOutcome, OutcomeEntry, PhenotypeOutcome};
pub use outcomes::{
    compute_offspring_outcomes, CrossBreedOutcome, OffspringOutcomes, OffspringPrediction,
};
pub use roll::{roll_litter, roll_offspring, RolledOffspring};
