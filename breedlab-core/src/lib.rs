//! BreedLab: breeding genetics prediction and pedigree analysis
//!
//! A pure computation library over snapshots supplied by the caller:
//! - **Catalog**: per-species gene categories, genotypes, phenotypes, dominance
//! - **Genetics**: genotype codec, Mendelian crosses, offspring outcome tables,
//!   research goal scoring, seeded offspring rolls
//! - **Pedigree**: lineage graph, bounded inbreeding checks, generation numbers
//! - **Planner / Cache**: pairing ranking and caller-owned preview memoization

pub mod cache;
pub mod catalog;
pub mod config;
pub mod creature;
pub mod error;
pub mod genetics;
pub mod pedigree;
pub mod planner;

#[cfg(test)]
pub(crate) mod fixtures;

pub use cache::{PreviewCache, PreviewKey};
pub use catalog::{Gender, GeneCatalog, HybridTable, SpeciesDefinition};
pub use config::EngineConfig;
pub use creature::{Creature, Origin};
pub use error::{BreedError, Result};
pub use genetics::{
    compute_offspring_outcomes, decode_genotype, encode_genotype, score_goal, GoalMode,
    MatchResult, OffspringOutcomes, OffspringPrediction, ResearchGoal,
};
pub use pedigree::{calculate_generation, detect_inbreeding, BreedingLogEntry, BreedingPair};
pub use planner::{rank_pairings, PairingCandidate};
