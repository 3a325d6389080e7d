//! Content-addressed preview cache
//!
//! Keys hash the inputs of a preview, never creature ids, so editing a
//! creature's genetics yields a new key instead of a stale hit. The cache is
//! owned by the caller; nothing here is global.

use crate::creature::Creature;
use crate::error::Result;
use crate::genetics::{ResearchGoal, ScoreOptions};
use log::debug;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::{HashMap, VecDeque};
use std::fmt;

/// Default number of previews kept
pub const DEFAULT_PREVIEW_CAPACITY: usize = 256;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PreviewKey(String);

impl PreviewKey {
    /// Key for an offspring outcome table. Parent order does not matter.
    pub fn for_outcomes(parent_a: &Creature, parent_b: &Creature) -> Self {
        Self(hex::encode(Self::parents_hasher("outcomes", parent_a, parent_b).finalize()))
    }

    /// Key for a goal score over a pairing
    pub fn for_goal(
        parent_a: &Creature,
        parent_b: &Creature,
        goal: &ResearchGoal,
        options: ScoreOptions,
    ) -> Result<Self> {
        let mut hasher = Self::parents_hasher("goal", parent_a, parent_b);
        hasher.update(serde_json::to_vec(goal)?);
        hasher.update([options.exclude_gender as u8]);
        Ok(Self(hex::encode(hasher.finalize())))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Leading characters for log lines; keys restored from storage may be
    /// shorter than a digest
    pub fn short(&self) -> &str {
        self.0.get(..12).unwrap_or(&self.0)
    }

    fn parents_hasher(domain: &str, parent_a: &Creature, parent_b: &Creature) -> Sha256 {
        let mut parents = [
            (parent_a.species.as_str(), parent_a.genotype.as_str()),
            (parent_b.species.as_str(), parent_b.genotype.as_str()),
        ];
        parents.sort();

        let mut hasher = Sha256::new();
        hasher.update(domain.as_bytes());
        for (species, genotype) in parents {
            // length prefixes keep ("ab", "c") apart from ("a", "bc")
            hasher.update((species.len() as u64).to_le_bytes());
            hasher.update(species.as_bytes());
            hasher.update((genotype.len() as u64).to_le_bytes());
            hasher.update(genotype.as_bytes());
        }
        hasher
    }
}

impl fmt::Display for PreviewKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Bounded map of computed previews, evicting the oldest insert first
#[derive(Debug, Clone)]
pub struct PreviewCache<V> {
    entries: HashMap<PreviewKey, V>,
    order: VecDeque<PreviewKey>,
    capacity: usize,
    hits: u64,
    misses: u64,
}

impl<V> Default for PreviewCache<V> {
    fn default() -> Self {
        Self::new(DEFAULT_PREVIEW_CAPACITY)
    }
}

impl<V> PreviewCache<V> {
    /// A capacity of zero is raised to one
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            order: VecDeque::with_capacity(capacity),
            capacity,
            hits: 0,
            misses: 0,
        }
    }

    pub fn get(&mut self, key: &PreviewKey) -> Option<&V> {
        let value = self.entries.get(key);
        if value.is_some() {
            self.hits += 1;
        } else {
            self.misses += 1;
        }
        value
    }

    /// Store a preview, returning the value it replaced
    pub fn insert(&mut self, key: PreviewKey, value: V) -> Option<V> {
        if let Some(slot) = self.entries.get_mut(&key) {
            return Some(std::mem::replace(slot, value));
        }
        self.make_room();
        self.order.push_back(key.clone());
        self.entries.insert(key, value);
        None
    }

    /// Cached value for `key`, computing and storing it on a miss.
    /// A failed computation is returned and not cached.
    pub fn get_or_insert_with<F>(&mut self, key: PreviewKey, compute: F) -> Result<&V>
    where
        F: FnOnce() -> Result<V>,
    {
        if self.entries.contains_key(&key) {
            self.hits += 1;
            return Ok(&self.entries[&key]);
        }
        self.misses += 1;
        let value = compute()?;
        self.make_room();
        self.order.push_back(key.clone());
        Ok(self.entries.entry(key).or_insert(value))
    }

    pub fn invalidate(&mut self, key: &PreviewKey) -> Option<V> {
        let removed = self.entries.remove(key);
        if removed.is_some() {
            self.order.retain(|k| k != key);
        }
        removed
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.order.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn hits(&self) -> u64 {
        self.hits
    }

    pub fn misses(&self) -> u64 {
        self.misses
    }

    fn make_room(&mut self) {
        while self.entries.len() >= self.capacity {
            let Some(oldest) = self.order.pop_front() else {
                break;
            };
            debug!("Evicting preview {}", oldest.short());
            self.entries.remove(&oldest);
        }
    }
}
