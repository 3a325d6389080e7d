//! Engine configuration

use crate::error::{BreedError, Result};
use serde::{Deserialize, Serialize};

/// Generations walked upward when looking for shared ancestry
pub const DEFAULT_MAX_PEDIGREE_DEPTH: usize = 6;

/// Allowed drift of a category's summed probabilities from 1.0
pub const PROBABILITY_TOLERANCE: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Maximum pedigree traversal depth for inbreeding checks
    pub max_pedigree_depth: usize,
    /// Tolerance used when checking that outcome tables are normalized
    pub probability_tolerance: f64,
    /// Leave the gender category out of goal averages
    pub exclude_gender: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_pedigree_depth: DEFAULT_MAX_PEDIGREE_DEPTH,
            probability_tolerance: PROBABILITY_TOLERANCE,
            exclude_gender: false,
        }
    }
}

impl EngineConfig {
    /// Parents and grandparents only
    pub fn shallow() -> Self {
        Self {
            max_pedigree_depth: 2,
            ..Self::default()
        }
    }

    /// Long-running lines with deep recorded pedigrees
    pub fn deep() -> Self {
        Self {
            max_pedigree_depth: 12,
            ..Self::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_pedigree_depth == 0 {
            return Err(BreedError::Config(
                "max_pedigree_depth must be at least 1".into(),
            ));
        }
        if !(self.probability_tolerance > 0.0 && self.probability_tolerance <= 0.01) {
            return Err(BreedError::Config(format!(
                "probability_tolerance {} outside (0, 0.01]",
                self.probability_tolerance
            )));
        }
        Ok(())
    }
}
