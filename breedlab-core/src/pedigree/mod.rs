//! Pedigree: ancestry reconstructed from breeding records
//!
//! - **Graph**: `creature → parents` index over pairs and logs
//! - **Inbreeding**: bounded shared-ancestry check between two candidates
//! - **Generation**: generation numbers from recorded parentage

pub mod generation;
pub mod graph;
pub mod inbreeding;

pub use generation::{
    calculate_generation, resolve_generation, GenerationReport, GenerationSource,
    FALLBACK_GENERATION, FOUNDER_GENERATION,
};
pub use graph::{
    AncestorWalk, BreedingLogEntry, BreedingPair, LineageEdge, Parentage, PedigreeGraph,
};
pub use inbreeding::{check_inbreeding, detect_inbreeding, InbreedingReport};
