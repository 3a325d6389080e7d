//! Pairing planner
//!
//! Scores every compatible pairing in a roster against a research goal and
//! ranks them. Inbreeding is reported alongside each candidate; it lowers the
//! rank among equal scores but never removes a pairing.

use crate::catalog::GeneCatalog;
use crate::config::EngineConfig;
use crate::creature::Creature;
use crate::error::Result;
use crate::genetics::outcomes::aggregate;
use crate::genetics::{score_goal, MatchResult, ResearchGoal, ScoreOptions};
use crate::pedigree::{check_inbreeding, PedigreeGraph};
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairingCandidate {
    pub parent_a: String,
    pub parent_b: String,
    pub result: MatchResult,
    pub inbred: bool,
}

impl PairingCandidate {
    fn rank(&self, other: &Self) -> Ordering {
        other
            .result
            .is_possible
            .cmp(&self.result.is_possible)
            .then_with(|| other.result.average_chance.total_cmp(&self.result.average_chance))
            .then_with(|| self.inbred.cmp(&other.inbred))
            .then_with(|| self.parent_a.cmp(&other.parent_a))
            .then_with(|| self.parent_b.cmp(&other.parent_b))
    }
}

/// Same species as the goal, and not the same gender when both are known
fn compatible(a: &Creature, b: &Creature) -> bool {
    match (a.gender, b.gender) {
        (Some(ga), Some(gb)) => ga != gb,
        _ => true,
    }
}

pub fn rank_pairings(
    goal: &ResearchGoal,
    roster: &[Creature],
    catalog: &GeneCatalog,
    pedigree: &PedigreeGraph,
    config: &EngineConfig,
) -> Result<Vec<PairingCandidate>> {
    goal.validate_against(catalog)?;
    let species = catalog.species(&goal.species)?;
    let options = ScoreOptions::from(config);

    let members: Vec<&Creature> = roster.iter().filter(|c| c.species == goal.species).collect();
    let mut candidates = Vec::new();
    for (i, a) in members.iter().enumerate() {
        for b in &members[i + 1..] {
            if a.id == b.id || !compatible(a, b) {
                continue;
            }
            let outcomes = aggregate(species, a, b);
            let result = score_goal(goal, &outcomes, options)?;
            let inbred = check_inbreeding(pedigree, &a.id, &b.id, config.max_pedigree_depth).inbred;
            debug!(
                "{} × {}: {:.3} possible={} inbred={}",
                a.id, b.id, result.average_chance, result.is_possible, inbred
            );
            candidates.push(PairingCandidate {
                parent_a: a.id.clone(),
                parent_b: b.id.clone(),
                result,
                inbred,
            });
        }
    }

    candidates.sort_by(PairingCandidate::rank);
    info!(
        "Ranked {} pairings for {} from {} creatures",
        candidates.len(),
        goal.species,
        members.len()
    );
    Ok(candidates)
}
