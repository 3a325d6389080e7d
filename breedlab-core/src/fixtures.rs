//! Shared test catalog

use crate::catalog::{GeneCatalog, HybridTable};
use crate::creature::Creature;
use crate::pedigree::BreedingLogEntry;
use chrono::{TimeZone, Utc};

pub(crate) const CATALOG_JSON: &str = r#"{
  "species": [
    {
      "name": "Mothkin",
      "categories": [
        {
          "name": "Gender",
          "kind": "gender",
          "genes": [
            {"genotype": "XX", "phenotype": "Female", "gender": "female"},
            {"genotype": "XY", "phenotype": "Male", "gender": "male"}
          ]
        },
        {
          "name": "Body Color",
          "genes": [
            {"genotype": "AA", "phenotype": "Red", "dominance": 3},
            {"genotype": "Aa", "phenotype": "Red", "dominance": 2},
            {"genotype": "aa", "phenotype": "Cream", "dominance": 1}
          ]
        },
        {
          "name": "Wing Pattern",
          "genes": [
            {"genotype": "BB", "phenotype": "Banded", "dominance": 3},
            {"genotype": "Bb", "phenotype": "Spotted", "dominance": 2},
            {"genotype": "bb", "phenotype": "Plain", "dominance": 1}
          ]
        },
        {
          "name": "Eye Color",
          "genes": [
            {"genotype": "EE", "phenotype": "Gold", "dominance": 6},
            {"genotype": "Ee", "phenotype": "Gold", "dominance": 5},
            {"genotype": "Er", "phenotype": "Gold", "dominance": 4},
            {"genotype": "ee", "phenotype": "Green", "dominance": 3},
            {"genotype": "er", "phenotype": "Green", "dominance": 2},
            {"genotype": "rr", "phenotype": "Ruby", "dominance": 1}
          ]
        }
      ]
    },
    {
      "name": "Glimmerhound",
      "categories": [
        {
          "name": "Gender",
          "kind": "gender",
          "genes": [
            {"genotype": "XX", "phenotype": "Female", "gender": "female"},
            {"genotype": "XY", "phenotype": "Male", "gender": "male"}
          ]
        },
        {
          "name": "Crest",
          "genes": [
            {"genotype": "CC", "phenotype": "Tall Crest", "dominance": 3, "gender": "male"},
            {"genotype": "Cc", "phenotype": "Short Crest", "dominance": 2},
            {"genotype": "cc", "phenotype": "No Crest", "dominance": 1}
          ]
        },
        {
          "name": "Coat",
          "genes": [
            {"genotype": "DD", "phenotype": "Dark", "dominance": 2},
            {"genotype": "Dd", "phenotype": "Dark", "dominance": 2},
            {"genotype": "dd", "phenotype": "Light", "dominance": 1}
          ]
        }
      ]
    },
    {
      "name": "Vellow",
      "female_ratio": 0.75,
      "categories": [
        {
          "name": "Gender",
          "kind": "gender",
          "genes": [
            {"genotype": "XX", "phenotype": "Female", "gender": "female"},
            {"genotype": "XY", "phenotype": "Male", "gender": "male"}
          ]
        },
        {
          "name": "Body Color",
          "genes": [
            {"genotype": "AA", "phenotype": "Gold", "dominance": 2},
            {"genotype": "Aa", "phenotype": "Gold", "dominance": 2},
            {"genotype": "aa", "phenotype": "White", "dominance": 1}
          ]
        }
      ]
    }
  ]
}"#;

pub(crate) fn catalog() -> GeneCatalog {
    GeneCatalog::from_json(CATALOG_JSON).expect("fixture catalog is valid")
}

pub(crate) fn hybrids() -> HybridTable {
    let mut table = HybridTable::new();
    table.insert(
        "Mothkin",
        "Vellow",
        vec!["Mothkin".to_string(), "Vellow".to_string()],
    );
    table
}

pub(crate) fn mothkin(id: &str, genotype: &str) -> Creature {
    Creature::new(id, "Mothkin", genotype)
}

pub(crate) fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// Log entry at a fixed date, ordered by `minute`
pub(crate) fn breeding_log(id: &str, pair: &str, offspring: &[&str], minute: u32) -> BreedingLogEntry {
    BreedingLogEntry {
        id: id.to_string(),
        pair_id: pair.to_string(),
        offspring: offspring.iter().map(|s| s.to_string()).collect(),
        logged_at: Utc.with_ymd_and_hms(2024, 5, 1, 12, minute, 0).unwrap(),
    }
}
