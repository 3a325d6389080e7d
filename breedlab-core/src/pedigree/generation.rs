//! Generation numbers from recorded parentage
//!
//! A user override always wins and is never recomputed. Bred creatures sit
//! one generation below their older parent; founders are generation 1.

use super::graph::{BreedingLogEntry, BreedingPair, PedigreeGraph};
use crate::creature::Creature;
use crate::error::BreedError;
use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

pub const FOUNDER_GENERATION: u32 = 1;
/// Used when parentage exists but cannot be fully resolved
pub const FALLBACK_GENERATION: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GenerationSource {
    Override,
    Parents,
    Founder,
    Fallback,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GenerationReport {
    pub generation: u32,
    pub source: GenerationSource,
    pub diagnostics: Vec<BreedError>,
}

impl GenerationReport {
    fn new(generation: u32, source: GenerationSource) -> Self {
        Self {
            generation,
            source,
            diagnostics: Vec::new(),
        }
    }
}

pub fn resolve_generation(
    creature: &Creature,
    graph: &PedigreeGraph,
    roster: &HashMap<&str, &Creature>,
) -> GenerationReport {
    if let Some(generation) = creature.generation_override {
        return GenerationReport::new(generation, GenerationSource::Override);
    }

    let Some(parents) = graph.parents_of(&creature.id) else {
        if creature.is_bred() {
            warn!("{} is bred but has no lineage record", creature.id);
            let mut report = GenerationReport::new(FALLBACK_GENERATION, GenerationSource::Fallback);
            report.diagnostics.push(BreedError::MissingParentRecord {
                creature: creature.id.clone(),
                parent: "unrecorded".to_string(),
            });
            return report;
        }
        return GenerationReport::new(FOUNDER_GENERATION, GenerationSource::Founder);
    };

    let mut diagnostics = Vec::new();
    let mut oldest = 0;
    for parent in parents {
        match roster.get(parent.as_str()).and_then(|p| p.known_generation()) {
            Some(generation) => oldest = oldest.max(generation),
            None => {
                warn!("{}: generation of parent {parent} is unknown", creature.id);
                diagnostics.push(BreedError::MissingParentRecord {
                    creature: creature.id.clone(),
                    parent: parent.clone(),
                });
            }
        }
    }

    if diagnostics.is_empty() {
        GenerationReport::new(oldest + 1, GenerationSource::Parents)
    } else {
        GenerationReport {
            generation: FALLBACK_GENERATION,
            source: GenerationSource::Fallback,
            diagnostics,
        }
    }
}

/// Generation of `creature` given the breeding records and the creatures
/// they reference
pub fn calculate_generation(
    creature: &Creature,
    pairs: &[BreedingPair],
    logs: &[BreedingLogEntry],
    roster: &[Creature],
) -> u32 {
    let graph = PedigreeGraph::build(pairs, logs);
    let roster: HashMap<&str, &Creature> = roster.iter().map(|c| (c.id.as_str(), c)).collect();
    resolve_generation(creature, &graph, &roster).generation
}
