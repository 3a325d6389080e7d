//! Gene catalog: the read-only reference data the engine computes against
//!
//! - **Registry**: species → category → genotype rows, validated at load
//! - **Hybrid table**: which species a cross-species pairing can produce

mod hybrid;
mod registry;

pub use hybrid::{HybridRule, HybridTable};
pub use registry::{
    CategoryDefinition, CategoryKind, Gender, GeneCatalog, GeneEntry, SpeciesDefinition,
};

pub(crate) use registry::parse_alleles;
