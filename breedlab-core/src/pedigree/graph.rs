//! Pedigree graph built from breeding pairs and breeding logs
//!
//! Every creature a log lists as offspring gets the logged pair's two
//! parents. The result is meant to be a DAG, but walks over it never assume
//! so: they carry a visited set and a depth bound.

use crate::error::BreedError;
use chrono::{DateTime, Utc};
use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingPair {
    pub id: String,
    pub parent_a: String,
    pub parent_b: String,
}

impl BreedingPair {
    pub fn new(id: impl Into<String>, parent_a: impl Into<String>, parent_b: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            parent_a: parent_a.into(),
            parent_b: parent_b.into(),
        }
    }
}

/// A recorded breeding of a pair and the creatures it produced
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BreedingLogEntry {
    pub id: String,
    pub pair_id: String,
    pub offspring: Vec<String>,
    pub logged_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct LineageEdge {
    pub child: String,
    pub parent: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Parentage {
    pub pair_id: String,
    pub parents: [String; 2],
}

/// Result of a bounded upward walk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AncestorWalk {
    /// Ancestor → generations above the root (parents are 1)
    pub depths: BTreeMap<String, usize>,
    /// The explored ancestry contains a loop
    pub cycle_detected: bool,
    /// Ancestor where the loop closes
    pub cycle_at: Option<String>,
    /// Ancestry continues past the depth bound
    pub truncated: bool,
}

impl AncestorWalk {
    pub fn contains(&self, id: &str) -> bool {
        self.depths.contains_key(id)
    }

    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.depths.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.depths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.depths.is_empty()
    }
}

/// Lookup `creature → parents`
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PedigreeGraph {
    parentage: HashMap<String, Parentage>,
    pub diagnostics: Vec<BreedError>,
}

impl PedigreeGraph {
    /// Index logs against pairs. Logs are applied oldest first; the first log
    /// to claim a creature decides its parents.
    pub fn build(pairs: &[BreedingPair], logs: &[BreedingLogEntry]) -> Self {
        let pairs_by_id: HashMap<&str, &BreedingPair> =
            pairs.iter().map(|p| (p.id.as_str(), p)).collect();

        let mut ordered: Vec<&BreedingLogEntry> = logs.iter().collect();
        ordered.sort_by(|a, b| a.logged_at.cmp(&b.logged_at).then_with(|| a.id.cmp(&b.id)));

        let mut graph = Self::default();
        for log in ordered {
            let Some(pair) = pairs_by_id.get(log.pair_id.as_str()) else {
                warn!("Breeding log {} references unknown pair {}", log.id, log.pair_id);
                graph.diagnostics.push(BreedError::UnknownBreedingPair {
                    log: log.id.clone(),
                    pair: log.pair_id.clone(),
                });
                continue;
            };
            for child in &log.offspring {
                if *child == pair.parent_a || *child == pair.parent_b {
                    warn!("Breeding log {} lists parent {} as its own offspring", log.id, child);
                    graph
                        .diagnostics
                        .push(BreedError::CyclicAncestryDetected(child.clone()));
                    continue;
                }
                if let Some(existing) = graph.parentage.get(child) {
                    debug!(
                        "{} already descends from pair {}, ignoring pair {}",
                        child, existing.pair_id, pair.id
                    );
                    if existing.pair_id != pair.id {
                        graph.diagnostics.push(BreedError::ConflictingParentage {
                            creature: child.clone(),
                            kept_pair: existing.pair_id.clone(),
                            ignored_pair: pair.id.clone(),
                        });
                    }
                    continue;
                }
                graph.parentage.insert(
                    child.clone(),
                    Parentage {
                        pair_id: pair.id.clone(),
                        parents: [pair.parent_a.clone(), pair.parent_b.clone()],
                    },
                );
            }
        }

        if let Some(node) = graph.find_cycle(graph.parentage.keys().map(String::as_str)) {
            warn!("Recorded parentage loops through {node}");
            let node = node.to_string();
            graph.diagnostics.push(BreedError::CyclicAncestryDetected(node));
        }

        info!(
            "Built pedigree: {} creatures with recorded parents from {} pairs, {} logs",
            graph.parentage.len(),
            pairs.len(),
            logs.len()
        );
        graph
    }

    pub fn parentage(&self, id: &str) -> Option<&Parentage> {
        self.parentage.get(id)
    }

    pub fn parents_of(&self, id: &str) -> Option<&[String; 2]> {
        self.parentage.get(id).map(|p| &p.parents)
    }

    pub fn len(&self) -> usize {
        self.parentage.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parentage.is_empty()
    }

    /// Every child → parent edge, sorted
    pub fn edges(&self) -> Vec<LineageEdge> {
        let mut edges: Vec<LineageEdge> = self
            .parentage
            .iter()
            .flat_map(|(child, p)| {
                p.parents.iter().map(move |parent| LineageEdge {
                    child: child.clone(),
                    parent: parent.clone(),
                })
            })
            .collect();
        edges.sort();
        edges.dedup();
        edges
    }

    /// Breadth-first walk up to `max_depth` generations above `root`.
    ///
    /// Each node is expanded at most once, so the walk terminates and stays
    /// within the size of the graph even when records form a cycle. Loops
    /// inside the explored region are reported, diamonds are not.
    pub fn ancestors(&self, root: &str, max_depth: usize) -> AncestorWalk {
        let mut walk = AncestorWalk::default();
        let mut visited: HashSet<&str> = HashSet::from([root]);
        let mut expanded: Vec<&str> = Vec::new();
        let mut queue: VecDeque<(&str, usize)> = VecDeque::from([(root, 0)]);

        while let Some((node, depth)) = queue.pop_front() {
            let Some(parentage) = self.parentage.get(node) else {
                continue;
            };
            if depth >= max_depth {
                walk.truncated = true;
                continue;
            }
            expanded.push(node);
            for parent in &parentage.parents {
                if !visited.insert(parent.as_str()) {
                    continue;
                }
                walk.depths.insert(parent.clone(), depth + 1);
                queue.push_back((parent.as_str(), depth + 1));
            }
        }

        let within: HashSet<&str> = expanded.iter().copied().collect();
        if let Some(node) = self.find_cycle_within(expanded, &within) {
            warn!("Ancestry of {root} loops through {node}");
            walk.cycle_detected = true;
            walk.cycle_at = Some(node.to_string());
        }
        walk
    }

    fn find_cycle<'a>(&'a self, nodes: impl Iterator<Item = &'a str>) -> Option<&'a str> {
        let nodes: Vec<&str> = nodes.collect();
        let within: HashSet<&str> = nodes.iter().copied().collect();
        self.find_cycle_within(nodes, &within)
    }

    /// Iterative three-colour DFS over `child → parent` edges, following only
    /// edges out of nodes in `within`. Returns the node a back edge points to.
    fn find_cycle_within<'a>(
        &'a self,
        mut starts: Vec<&'a str>,
        within: &HashSet<&'a str>,
    ) -> Option<&'a str> {
        #[derive(Clone, Copy, PartialEq)]
        enum Mark {
            Open,
            Done,
        }

        starts.sort_unstable();
        let mut marks: HashMap<&str, Mark> = HashMap::new();
        for start in starts {
            if marks.contains_key(start) {
                continue;
            }
            marks.insert(start, Mark::Open);
            let mut stack: Vec<(&str, usize)> = vec![(start, 0)];
            while let Some(top) = stack.last_mut() {
                let (node, next) = *top;
                let parents: &[String] = match self.parentage.get(node) {
                    Some(p) if within.contains(node) => &p.parents,
                    _ => &[],
                };
                let Some(parent) = parents.get(next) else {
                    marks.insert(node, Mark::Done);
                    stack.pop();
                    continue;
                };
                top.1 += 1;
                match marks.get(parent.as_str()).copied() {
                    Some(Mark::Open) => return Some(parent.as_str()),
                    Some(Mark::Done) => {}
                    None => {
                        marks.insert(parent.as_str(), Mark::Open);
                        stack.push((parent.as_str(), 0));
                    }
                }
            }
        }
        None
    }

    /// Pedigree chart: ancestors grouped by generation, parents first
    pub fn ancestry_layers(&self, root: &str, max_depth: usize) -> Vec<Vec<String>> {
        let walk = self.ancestors(root, max_depth);
        let deepest = walk.depths.values().copied().max().unwrap_or(0);
        let mut layers = vec![Vec::new(); deepest];
        for (id, depth) in walk.depths {
            layers[depth - 1].push(id);
        }
        layers
    }
}
