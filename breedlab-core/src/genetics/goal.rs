//! Research goal scoring
//!
//! An optional category is waived: it always contributes a full 1.0 to the
//! average and never makes a goal impossible.

use super::outcomes::{OffspringOutcomes, OffspringPrediction};
use crate::catalog::GeneCatalog;
use crate::config::EngineConfig;
use crate::error::{BreedError, Result};
use indexmap::IndexMap;
use log::{debug, warn};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalMode {
    /// Exact genotype required
    #[default]
    Genotype,
    /// Any genotype expressing the target look
    Phenotype,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GoalTarget {
    pub category: String,
    /// Genotype or phenotype, depending on the goal mode
    pub target: String,
    #[serde(default)]
    pub optional: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResearchGoal {
    pub species: String,
    #[serde(default)]
    pub mode: GoalMode,
    pub targets: Vec<GoalTarget>,
}

impl ResearchGoal {
    pub fn new(species: impl Into<String>, mode: GoalMode) -> Self {
        Self {
            species: species.into(),
            mode,
            targets: Vec::new(),
        }
    }

    pub fn with_target(mut self, category: impl Into<String>, target: impl Into<String>) -> Self {
        self.targets.push(GoalTarget {
            category: category.into(),
            target: target.into(),
            optional: false,
        });
        self
    }

    pub fn with_optional(mut self, category: impl Into<String>, target: impl Into<String>) -> Self {
        self.targets.push(GoalTarget {
            category: category.into(),
            target: target.into(),
            optional: true,
        });
        self
    }

    /// Structural checks; a malformed goal is rejected before any scoring
    pub fn validate(&self) -> Result<()> {
        if self.targets.is_empty() {
            return Err(BreedError::InvalidGoal(format!(
                "goal for `{}` has no target categories",
                self.species
            )));
        }
        let mut seen = HashSet::new();
        for target in &self.targets {
            if target.category.trim().is_empty() || target.target.trim().is_empty() {
                return Err(BreedError::InvalidGoal(
                    "target category and value must be non-empty".into(),
                ));
            }
            if !seen.insert(target.category.as_str()) {
                return Err(BreedError::InvalidGoal(format!(
                    "category `{}` is targeted twice",
                    target.category
                )));
            }
        }
        Ok(())
    }

    /// Structural checks plus species and category existence
    pub fn validate_against(&self, catalog: &GeneCatalog) -> Result<()> {
        self.validate()?;
        let species = catalog.species(&self.species)?;
        for target in &self.targets {
            if species.category(&target.category).is_none() {
                return Err(BreedError::InvalidGoal(format!(
                    "category `{}` is not defined for `{}`",
                    target.category, self.species
                )));
            }
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ScoreOptions {
    /// Report the gender category but leave it out of the average
    pub exclude_gender: bool,
}

impl From<&EngineConfig> for ScoreOptions {
    fn from(config: &EngineConfig) -> Self {
        Self {
            exclude_gender: config.exclude_gender,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchResult {
    /// Real chance per goal category, in goal order
    pub chances_by_category: IndexMap<String, f64>,
    pub average_chance: f64,
    /// Every required category has a non-zero chance
    pub is_possible: bool,
    pub diagnostics: Vec<BreedError>,
}

pub fn score_goal(
    goal: &ResearchGoal,
    outcomes: &OffspringOutcomes,
    options: ScoreOptions,
) -> Result<MatchResult> {
    goal.validate()?;
    if goal.species != outcomes.species {
        return Err(BreedError::SpeciesMismatch {
            expected: goal.species.clone(),
            found: outcomes.species.clone(),
        });
    }

    let mut chances_by_category = IndexMap::with_capacity(goal.targets.len());
    let mut diagnostics = Vec::new();
    let mut contributions = Vec::with_capacity(goal.targets.len());
    let mut is_possible = true;

    for target in &goal.targets {
        let Some(outcome) = outcomes.category(&target.category) else {
            warn!(
                "Goal category `{}` has no outcome table for {}",
                target.category, goal.species
            );
            diagnostics.extend(missing_table_causes(outcomes, &target.category));
            chances_by_category.insert(target.category.clone(), 0.0);
            if target.optional {
                contributions.push(1.0);
            } else {
                contributions.push(0.0);
                is_possible = false;
            }
            continue;
        };

        let chance = match goal.mode {
            GoalMode::Genotype => outcome.genotype_chance(&target.target),
            GoalMode::Phenotype => outcome.phenotype_chance(&target.target),
        };
        chances_by_category.insert(target.category.clone(), chance);

        if !target.optional && chance <= 0.0 {
            is_possible = false;
        }
        if options.exclude_gender && outcome.is_gender() {
            debug!("{}: excluded from the average", target.category);
            continue;
        }
        contributions.push(if target.optional { 1.0 } else { chance });
    }

    let average_chance = if contributions.is_empty() {
        1.0
    } else {
        contributions.iter().sum::<f64>() / contributions.len() as f64
    };

    Ok(MatchResult {
        chances_by_category,
        average_chance,
        is_possible,
        diagnostics,
    })
}

/// Why a catalog category has no table: a parent lacked its genotype, or the
/// species does not define it at all
fn missing_table_causes(outcomes: &OffspringOutcomes, category: &str) -> Vec<BreedError> {
    let causes: Vec<BreedError> = outcomes
        .diagnostics
        .iter()
        .filter(|d| {
            matches!(d, BreedError::MissingCategoryGenotype { category: c, .. } if c == category)
        })
        .cloned()
        .collect();
    if causes.is_empty() {
        vec![BreedError::UnknownCategoryForSpecies {
            species: outcomes.species.clone(),
            category: category.to_string(),
        }]
    } else {
        causes
    }
}

/// Score a prediction; cross-species pairings have no gene outcomes to score
pub fn score_prediction(
    goal: &ResearchGoal,
    prediction: &OffspringPrediction,
    options: ScoreOptions,
) -> Result<MatchResult> {
    match prediction {
        OffspringPrediction::Purebred(outcomes) => score_goal(goal, outcomes, options),
        OffspringPrediction::CrossBreed(cross) => Err(BreedError::UnsupportedCrossBreed {
            species_a: cross.species_a.clone(),
            species_b: cross.species_b.clone(),
        }),
        OffspringPrediction::Unsupported(err) => Err(err.clone()),
    }
}
