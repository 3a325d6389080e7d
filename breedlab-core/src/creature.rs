//! Creature snapshot as supplied by the data-access layer

use crate::catalog::Gender;
use serde::{Deserialize, Serialize};

/// How a creature entered the roster
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Origin {
    /// Produced by a logged breeding
    Bred,
    /// Anything else (starter, adopted, event, ...)
    #[default]
    Founder,
    Other(String),
}

impl From<String> for Origin {
    fn from(value: String) -> Self {
        match value.as_str() {
            "bred" => Origin::Bred,
            "founder" => Origin::Founder,
            _ => Origin::Other(value),
        }
    }
}

impl From<Origin> for String {
    fn from(origin: Origin) -> Self {
        match origin {
            Origin::Bred => "bred".to_string(),
            Origin::Founder => "founder".to_string(),
            Origin::Other(value) => value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Creature {
    pub id: String,
    pub species: String,
    #[serde(default)]
    pub gender: Option<Gender>,
    /// Stored genetics string, `category:genotype` pairs
    pub genotype: String,
    /// Recorded generation, if known
    #[serde(default)]
    pub generation: Option<u32>,
    /// User-set generation; never recomputed once present
    #[serde(default)]
    pub generation_override: Option<u32>,
    #[serde(default)]
    pub origin: Origin,
}

impl Creature {
    pub fn new(id: impl Into<String>, species: impl Into<String>, genotype: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            species: species.into(),
            gender: None,
            genotype: genotype.into(),
            generation: None,
            generation_override: None,
            origin: Origin::Founder,
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_generation(mut self, generation: u32) -> Self {
        self.generation = Some(generation);
        self
    }

    pub fn with_origin(mut self, origin: Origin) -> Self {
        self.origin = origin;
        self
    }

    /// Override if set, otherwise the recorded generation
    pub fn known_generation(&self) -> Option<u32> {
        self.generation_override.or(self.generation)
    }

    pub fn is_bred(&self) -> bool {
        self.origin == Origin::Bred
    }
}
