//! Hybridization table for cross-species pairings

use super::GeneCatalog;
use crate::error::{BreedError, Result};
use serde::{Deserialize, Serialize};

/// `species_a × species_b → offspring`; the pairing is unordered
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HybridRule {
    pub species_a: String,
    pub species_b: String,
    pub offspring: Vec<String>,
}

impl HybridRule {
    fn matches(&self, a: &str, b: &str) -> bool {
        (self.species_a == a && self.species_b == b) || (self.species_a == b && self.species_b == a)
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct HybridTable {
    rules: Vec<HybridRule>,
}

impl HybridTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load from a JSON array of rules
    pub fn from_json(json: &str) -> Result<Self> {
        let rules: Vec<HybridRule> = serde_json::from_str(json)?;
        let mut table = Self::new();
        for rule in rules {
            table.insert(rule.species_a, rule.species_b, rule.offspring);
        }
        Ok(table)
    }

    /// Add or replace the rule for a pairing
    pub fn insert(
        &mut self,
        species_a: impl Into<String>,
        species_b: impl Into<String>,
        offspring: Vec<String>,
    ) {
        let species_a = species_a.into();
        let species_b = species_b.into();
        self.rules.retain(|r| !r.matches(&species_a, &species_b));
        self.rules.push(HybridRule {
            species_a,
            species_b,
            offspring,
        });
    }

    pub fn lookup(&self, species_a: &str, species_b: &str) -> Option<&[String]> {
        self.rules
            .iter()
            .find(|r| r.matches(species_a, species_b))
            .map(|r| r.offspring.as_slice())
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Reject rules naming species the catalog does not define
    pub fn validate(&self, catalog: &GeneCatalog) -> Result<()> {
        for rule in &self.rules {
            for species in [&rule.species_a, &rule.species_b]
                .into_iter()
                .chain(rule.offspring.iter())
            {
                if !catalog.contains(species) {
                    return Err(BreedError::Catalog(format!(
                        "hybrid rule {} × {} names unknown species `{species}`",
                        rule.species_a, rule.species_b
                    )));
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures;

    #[test]
    fn test_lookup_is_symmetric() {
        let table = fixtures::hybrids();
        assert_eq!(
            table.lookup("Mothkin", "Vellow"),
            Some(&["Mothkin".to_string(), "Vellow".to_string()][..])
        );
        assert_eq!(table.lookup("Vellow", "Mothkin"), table.lookup("Mothkin", "Vellow"));
        assert!(table.lookup("Mothkin", "Glimmerhound").is_none());
    }

    #[test]
    fn test_insert_replaces_existing_rule() {
        let mut table = HybridTable::new();
        table.insert("A", "B", vec!["A".into()]);
        table.insert("B", "A", vec!["B".into()]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.lookup("A", "B"), Some(&["B".to_string()][..]));
    }

    #[test]
    fn test_from_json_and_validate() {
        let table = HybridTable::from_json(
            r#"[{"species_a": "Mothkin", "species_b": "Dragon", "offspring": ["Mothkin"]}]"#,
        )
        .unwrap();
        assert!(matches!(
            table.validate(&fixtures::catalog()),
            Err(BreedError::Catalog(_))
        ));
        assert!(fixtures::hybrids().validate(&fixtures::catalog()).is_ok());
    }
}
