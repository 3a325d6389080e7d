//! Inbreeding detection
//!
//! Advisory only: a flagged pairing is reported, never refused.

use super::graph::{BreedingLogEntry, BreedingPair, PedigreeGraph};
use crate::error::BreedError;
use log::{info, warn};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InbreedingReport {
    pub parent_a: String,
    pub parent_b: String,
    pub inbred: bool,
    /// Ancestors both parents share within the depth bound, sorted
    pub shared_ancestors: Vec<String>,
    /// One parent is an ancestor of the other
    pub direct_ancestor: bool,
    pub max_depth: usize,
    pub diagnostics: Vec<BreedError>,
}

pub fn check_inbreeding(
    graph: &PedigreeGraph,
    parent_a: &str,
    parent_b: &str,
    max_depth: usize,
) -> InbreedingReport {
    let ancestors_a = graph.ancestors(parent_a, max_depth);
    let ancestors_b = graph.ancestors(parent_b, max_depth);

    let mut diagnostics = Vec::new();
    for walk in [&ancestors_a, &ancestors_b] {
        if let Some(node) = &walk.cycle_at {
            let cycle = BreedError::CyclicAncestryDetected(node.clone());
            if !diagnostics.contains(&cycle) {
                diagnostics.push(cycle);
            }
        }
    }

    // BTreeMap keys: already sorted
    let shared_ancestors: Vec<String> = ancestors_a
        .ids()
        .filter(|id| ancestors_b.contains(id))
        .map(str::to_string)
        .collect();
    let direct_ancestor = ancestors_a.contains(parent_b) || ancestors_b.contains(parent_a);
    let inbred = parent_a == parent_b || direct_ancestor || !shared_ancestors.is_empty();

    if inbred {
        warn!(
            "Pairing {parent_a} × {parent_b} is inbred: {} shared ancestors, direct={direct_ancestor}",
            shared_ancestors.len()
        );
    } else {
        info!("Pairing {parent_a} × {parent_b}: no shared ancestry within {max_depth} generations");
    }

    InbreedingReport {
        parent_a: parent_a.to_string(),
        parent_b: parent_b.to_string(),
        inbred,
        shared_ancestors,
        direct_ancestor,
        max_depth,
        diagnostics,
    }
}

/// Whether pairing the two creatures would produce inbred offspring
pub fn detect_inbreeding(
    parent_a: &str,
    parent_b: &str,
    pairs: &[BreedingPair],
    logs: &[BreedingLogEntry],
    max_depth: usize,
) -> bool {
    let graph = PedigreeGraph::build(pairs, logs);
    check_inbreeding(&graph, parent_a, parent_b, max_depth).inbred
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_MAX_PEDIGREE_DEPTH;
    use crate::fixtures::breeding_log as log;

    /// Cousins c1 and c2 share grandparents gp1 and gp2.
    /// Unrelated u1 and u2 have their own three-generation lines.
    fn records() -> (Vec<BreedingPair>, Vec<BreedingLogEntry>) {
        let pairs = vec![
            BreedingPair::new("pair-gp", "gp1", "gp2"),
            BreedingPair::new("pair-1", "p1", "x"),
            BreedingPair::new("pair-2", "p2", "y"),
            BreedingPair::new("pair-u1-gp", "ga", "gb"),
            BreedingPair::new("pair-u1", "ua", "ub"),
            BreedingPair::new("pair-u2-gp", "gc", "gd"),
            BreedingPair::new("pair-u2", "uc", "ud"),
        ];
        let logs = vec![
            log("l1", "pair-gp", &["p1", "p2"], 0),
            log("l2", "pair-1", &["c1"], 1),
            log("l3", "pair-2", &["c2"], 2),
            log("l4", "pair-u1-gp", &["ua"], 3),
            log("l5", "pair-u1", &["u1"], 4),
            log("l6", "pair-u2-gp", &["uc"], 5),
            log("l7", "pair-u2", &["u2"], 6),
        ];
        (pairs, logs)
    }

    #[test]
    fn test_shared_grandparent_is_inbred() {
        let (pairs, logs) = records();
        assert!(detect_inbreeding("c1", "c2", &pairs, &logs, DEFAULT_MAX_PEDIGREE_DEPTH));

        let graph = PedigreeGraph::build(&pairs, &logs);
        let report = check_inbreeding(&graph, "c1", "c2", DEFAULT_MAX_PEDIGREE_DEPTH);
        assert_eq!(report.shared_ancestors, vec!["gp1", "gp2"]);
        assert!(!report.direct_ancestor);
    }

    #[test]
    fn test_disjoint_ancestry_is_not_inbred() {
        let (pairs, logs) = records();
        assert!(!detect_inbreeding("u1", "u2", &pairs, &logs, DEFAULT_MAX_PEDIGREE_DEPTH));
        assert!(!detect_inbreeding("c1", "u1", &pairs, &logs, DEFAULT_MAX_PEDIGREE_DEPTH));
    }

    #[test]
    fn test_depth_bound_hides_distant_ancestry() {
        let (pairs, logs) = records();
        assert!(!detect_inbreeding("c1", "c2", &pairs, &logs, 1));
        assert!(detect_inbreeding("c1", "c2", &pairs, &logs, 2));
    }

    #[test]
    fn test_parent_child_pairing() {
        let (pairs, logs) = records();
        let graph = PedigreeGraph::build(&pairs, &logs);
        let report = check_inbreeding(&graph, "gp1", "c1", DEFAULT_MAX_PEDIGREE_DEPTH);
        assert!(report.inbred);
        assert!(report.direct_ancestor);
        assert!(report.shared_ancestors.is_empty());
    }

    #[test]
    fn test_same_creature() {
        let graph = PedigreeGraph::default();
        assert!(check_inbreeding(&graph, "solo", "solo", 3).inbred);
        assert!(!check_inbreeding(&graph, "solo", "other", 3).inbred);
    }

    #[test]
    fn test_cycle_still_completes() {
        crate::fixtures::init_logging();
        let pairs = vec![
            BreedingPair::new("p-a", "b", "z"),
            BreedingPair::new("p-b", "a", "z"),
        ];
        let logs = vec![log("l1", "p-a", &["a"], 0), log("l2", "p-b", &["b"], 1)];
        let graph = PedigreeGraph::build(&pairs, &logs);
        let report = check_inbreeding(&graph, "a", "q", usize::MAX);
        assert!(!report.inbred);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(matches!(
            report.diagnostics[0],
            BreedError::CyclicAncestryDetected(_)
        ));
    }

    #[test]
    fn test_loop_between_ancestors_is_reported() {
        let pairs = vec![
            BreedingPair::new("pr", "p", "z1"),
            BreedingPair::new("pp", "q", "z2"),
            BreedingPair::new("pq", "p", "z3"),
        ];
        let logs = vec![
            log("l1", "pr", &["r"], 0),
            log("l2", "pp", &["p"], 1),
            log("l3", "pq", &["q"], 2),
        ];
        let graph = PedigreeGraph::build(&pairs, &logs);
        let report = check_inbreeding(&graph, "r", "stranger", DEFAULT_MAX_PEDIGREE_DEPTH);
        assert!(!report.inbred);
        assert_eq!(report.diagnostics.len(), 1);
        assert!(matches!(
            &report.diagnostics[0],
            BreedError::CyclicAncestryDetected(node) if node == "p" || node == "q"
        ));
    }

    #[test]
    fn test_long_line_is_bounded() {
        let mut pairs = Vec::new();
        let mut logs = Vec::new();
        for i in 0..5_000 {
            let pair = format!("pair-{i}");
            let child = format!("n{i}");
            pairs.push(BreedingPair::new(pair.as_str(), format!("n{}", i + 1), "stud"));
            logs.push(log(&format!("log-{i}"), &pair, &[child.as_str()], 0));
        }
        let graph = PedigreeGraph::build(&pairs, &logs);
        let walk = graph.ancestors("n0", 6);
        // six generations of the line plus the shared stud
        assert_eq!(walk.len(), 7);
        assert!(walk.truncated);
        assert!(check_inbreeding(&graph, "n0", "n3", 6).direct_ancestor);
    }
}
