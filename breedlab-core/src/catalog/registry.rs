//! Gene registry: species, trait categories and their genotype tables
//!
//! The catalog is external reference data. It is validated once when loaded so
//! that every lookup made during probability math can trust it.

use crate::error::{BreedError, Result};
use indexmap::IndexMap;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

/// Offspring sex; also the tag used for gender-restricted genotypes
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Female,
    Male,
}

impl Gender {
    pub const ALL: [Gender; 2] = [Gender::Female, Gender::Male];

    pub fn name(&self) -> &str {
        match self {
            Gender::Female => "female",
            Gender::Male => "male",
        }
    }

    pub fn opposite(self) -> Self {
        match self {
            Gender::Female => Gender::Male,
            Gender::Male => Gender::Female,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryKind {
    #[default]
    Standard,
    /// Resolved by the species' gender split, never crossed from parent alleles
    Gender,
}

/// One genotype row of a category table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GeneEntry {
    pub genotype: String,
    pub phenotype: String,
    /// Larger values dominate
    #[serde(default)]
    pub dominance: u32,
    /// Gender this genotype is limited to (dimorphic species), or the gender a
    /// gender-category row denotes
    #[serde(default, rename = "gender")]
    pub gender_restriction: Option<Gender>,
}

impl GeneEntry {
    pub fn new(genotype: impl Into<String>, phenotype: impl Into<String>, dominance: u32) -> Self {
        Self {
            genotype: genotype.into(),
            phenotype: phenotype.into(),
            dominance,
            gender_restriction: None,
        }
    }

    pub fn restricted_to(mut self, gender: Gender) -> Self {
        self.gender_restriction = Some(gender);
        self
    }
}

/// A single heritable trait slot and its genotype table, in declaration order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryDefinition {
    pub name: String,
    #[serde(default)]
    pub kind: CategoryKind,
    pub genes: Vec<GeneEntry>,
    /// Alleles, most dominant first; derived at load
    #[serde(skip)]
    allele_order: Vec<char>,
}

impl CategoryDefinition {
    pub fn new(name: impl Into<String>, kind: CategoryKind, genes: Vec<GeneEntry>) -> Self {
        let allele_order = derive_allele_order(&genes);
        Self {
            name: name.into(),
            kind,
            genes,
            allele_order,
        }
    }

    pub fn is_gender(&self) -> bool {
        self.kind == CategoryKind::Gender
    }

    /// Whether any genotype of this (non-gender) category is gender-restricted
    pub fn is_dimorphic(&self) -> bool {
        !self.is_gender() && self.genes.iter().any(|g| g.gender_restriction.is_some())
    }

    pub fn allele_order(&self) -> &[char] {
        &self.allele_order
    }

    pub fn knows_allele(&self, allele: char) -> bool {
        self.allele_order.contains(&allele)
    }

    pub fn entry(&self, genotype: &str) -> Option<&GeneEntry> {
        self.genes.iter().find(|g| g.genotype == genotype)
    }

    /// Position of a genotype in the catalog table, used as the stable tie-breaker
    pub fn declaration_index(&self, genotype: &str) -> Option<usize> {
        self.genes.iter().position(|g| g.genotype == genotype)
    }

    pub fn restriction_of(&self, genotype: &str) -> Option<Gender> {
        self.entry(genotype).and_then(|g| g.gender_restriction)
    }

    /// Gender-category row denoting `gender`
    pub fn entry_for_gender(&self, gender: Gender) -> Option<&GeneEntry> {
        self.genes
            .iter()
            .find(|g| g.gender_restriction == Some(gender))
    }

    /// Orders two alleles dominant-first. Alleles the catalog does not know sort
    /// after every known allele, by character.
    pub fn canonical_genotype(&self, a: char, b: char) -> String {
        let (first, second) = if self.allele_key(a) <= self.allele_key(b) {
            (a, b)
        } else {
            (b, a)
        };
        [first, second].iter().collect()
    }

    pub fn canonicalize(&self, genotype: &str) -> Result<String> {
        let [a, b] = parse_alleles(genotype).map_err(|reason| BreedError::InvalidGenotypeFormat {
            segment: genotype.to_string(),
            reason: reason.to_string(),
        })?;
        Ok(self.canonical_genotype(a, b))
    }

    /// Display phenotype of a genotype: its own row, else the dominant allele's
    /// homozygous row, else the genotype itself.
    pub fn phenotype_of(&self, genotype: &str) -> String {
        if let Some(entry) = self.entry(genotype) {
            return entry.phenotype.clone();
        }
        if let Ok([a, b]) = parse_alleles(genotype) {
            let dominant = self.canonical_genotype(a, b).chars().next().unwrap_or(a);
            let homozygous: String = [dominant, dominant].iter().collect();
            if let Some(entry) = self.entry(&homozygous) {
                debug!(
                    "{}: no row for {}, expressing {} via {}",
                    self.name, genotype, entry.phenotype, homozygous
                );
                return entry.phenotype.clone();
            }
        }
        genotype.to_string()
    }

    fn allele_key(&self, allele: char) -> (usize, char) {
        let rank = self
            .allele_order
            .iter()
            .position(|&c| c == allele)
            .unwrap_or(usize::MAX);
        (rank, allele)
    }

    fn validate(&mut self, species: &str) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BreedError::Catalog(format!("{species}: category with empty name")));
        }
        if self.genes.is_empty() {
            return Err(BreedError::Catalog(format!(
                "{species}/{}: category has no genotypes",
                self.name
            )));
        }
        for gene in &self.genes {
            parse_alleles(&gene.genotype).map_err(|reason| {
                BreedError::Catalog(format!(
                    "{species}/{}: genotype `{}` {reason}",
                    self.name, gene.genotype
                ))
            })?;
        }

        self.allele_order = derive_allele_order(&self.genes);
        let mut seen = HashSet::new();
        for i in 0..self.genes.len() {
            let canonical = self.canonicalize(&self.genes[i].genotype)?;
            if canonical != self.genes[i].genotype {
                debug!(
                    "{species}/{}: normalized {} to {}",
                    self.name, self.genes[i].genotype, canonical
                );
                self.genes[i].genotype = canonical.clone();
            }
            if !seen.insert(canonical.clone()) {
                return Err(BreedError::Catalog(format!(
                    "{species}/{}: duplicate genotype `{canonical}`",
                    self.name
                )));
            }
        }

        if self.is_gender() {
            for gender in Gender::ALL {
                let count = self
                    .genes
                    .iter()
                    .filter(|g| g.gender_restriction == Some(gender))
                    .count();
                if count != 1 {
                    return Err(BreedError::Catalog(format!(
                        "{species}/{}: gender category needs exactly one {} row, found {count}",
                        self.name,
                        gender.name()
                    )));
                }
            }
            if self.genes.iter().any(|g| g.gender_restriction.is_none()) {
                return Err(BreedError::Catalog(format!(
                    "{species}/{}: every gender row must name its gender",
                    self.name
                )));
            }
        }
        Ok(())
    }
}

/// A species and its ordered trait categories
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpeciesDefinition {
    pub name: String,
    /// Share of female offspring; an even split when absent
    #[serde(default)]
    pub female_ratio: Option<f64>,
    pub categories: Vec<CategoryDefinition>,
}

impl SpeciesDefinition {
    pub fn new(name: impl Into<String>, categories: Vec<CategoryDefinition>) -> Self {
        Self {
            name: name.into(),
            female_ratio: None,
            categories,
        }
    }

    pub fn category(&self, name: &str) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn gender_category(&self) -> Option<&CategoryDefinition> {
        self.categories.iter().find(|c| c.is_gender())
    }

    pub fn is_dimorphic(&self) -> bool {
        self.categories.iter().any(|c| c.is_dimorphic())
    }

    pub fn female_ratio(&self) -> f64 {
        self.female_ratio.unwrap_or(0.5)
    }

    pub fn category_names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    fn validate(&mut self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(BreedError::Catalog("species with empty name".into()));
        }
        if let Some(ratio) = self.female_ratio {
            if !(0.0..=1.0).contains(&ratio) {
                return Err(BreedError::Catalog(format!(
                    "{}: female_ratio {ratio} outside [0, 1]",
                    self.name
                )));
            }
        }
        let mut names = HashSet::new();
        for category in &mut self.categories {
            category.validate(&self.name)?;
            if !names.insert(category.name.clone()) {
                return Err(BreedError::Catalog(format!(
                    "{}: duplicate category `{}`",
                    self.name, category.name
                )));
            }
        }
        let gender_categories = self.categories.iter().filter(|c| c.is_gender()).count();
        if gender_categories > 1 {
            return Err(BreedError::Catalog(format!(
                "{}: {gender_categories} gender categories, at most one allowed",
                self.name
            )));
        }
        if self.is_dimorphic() && gender_categories == 0 {
            return Err(BreedError::Catalog(format!(
                "{}: gender-restricted genotypes require a gender category",
                self.name
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct CatalogDocument {
    species: Vec<SpeciesDefinition>,
}

/// Read-only registry: species → category → genotype rows
#[derive(Debug, Clone, Serialize)]
pub struct GeneCatalog {
    species: Vec<SpeciesDefinition>,
    #[serde(skip)]
    index: HashMap<String, usize>,
}

impl GeneCatalog {
    /// Validate and index a set of species definitions
    pub fn new(mut species: Vec<SpeciesDefinition>) -> Result<Self> {
        let mut index = HashMap::new();
        for (i, def) in species.iter_mut().enumerate() {
            def.validate()?;
            if index.insert(def.name.clone(), i).is_some() {
                return Err(BreedError::Catalog(format!("duplicate species `{}`", def.name)));
            }
        }
        info!("Loaded gene catalog with {} species", species.len());
        Ok(Self { species, index })
    }

    /// Load from a JSON document of the form `{"species": [...]}`
    pub fn from_json(json: &str) -> Result<Self> {
        let doc: CatalogDocument = serde_json::from_str(json)?;
        Self::new(doc.species)
    }

    pub fn get(&self, species: &str) -> Option<&SpeciesDefinition> {
        self.index.get(species).map(|&i| &self.species[i])
    }

    pub fn species(&self, species: &str) -> Result<&SpeciesDefinition> {
        self.get(species)
            .ok_or_else(|| BreedError::UnknownSpecies(species.to_string()))
    }

    pub fn category(&self, species: &str, category: &str) -> Result<&CategoryDefinition> {
        self.species(species)?
            .category(category)
            .ok_or_else(|| BreedError::UnknownCategoryForSpecies {
                species: species.to_string(),
                category: category.to_string(),
            })
    }

    pub fn species_names(&self) -> impl Iterator<Item = &str> {
        self.species.iter().map(|s| s.name.as_str())
    }

    pub fn contains(&self, species: &str) -> bool {
        self.index.contains_key(species)
    }

    /// Display phenotype per category for a decoded genotype map
    pub fn describe(
        &self,
        species: &str,
        genes: &IndexMap<String, String>,
    ) -> Result<IndexMap<String, String>> {
        let def = self.species(species)?;
        Ok(def
            .categories
            .iter()
            .filter_map(|category| {
                genes
                    .get(&category.name)
                    .map(|genotype| (category.name.clone(), category.phenotype_of(genotype)))
            })
            .collect())
    }
}

/// Split a genotype into its two alleles
pub(crate) fn parse_alleles(genotype: &str) -> std::result::Result<[char; 2], &'static str> {
    let mut chars = genotype.chars();
    match (chars.next(), chars.next(), chars.next()) {
        (Some(a), Some(b), None) if a.is_ascii_alphabetic() && b.is_ascii_alphabetic() => Ok([a, b]),
        (Some(_), Some(_), None) => Err("alleles must be letters"),
        _ => Err("must be exactly two alleles"),
    }
}

/// Rank alleles by the dominance of their homozygous row, falling back to the
/// strongest row that carries them; ties keep first appearance.
fn derive_allele_order(genes: &[GeneEntry]) -> Vec<char> {
    struct AlleleRank {
        allele: char,
        homozygous: Option<u32>,
        strongest: u32,
        first_seen: usize,
    }

    let mut ranks: Vec<AlleleRank> = Vec::new();
    for gene in genes {
        let Ok([a, b]) = parse_alleles(&gene.genotype) else {
            continue;
        };
        for allele in [a, b] {
            let position = ranks.iter().position(|r| r.allele == allele);
            let rank = match position {
                Some(i) => &mut ranks[i],
                None => {
                    let first_seen = ranks.len();
                    ranks.push(AlleleRank {
                        allele,
                        homozygous: None,
                        strongest: 0,
                        first_seen,
                    });
                    let last = ranks.len() - 1;
                    &mut ranks[last]
                }
            };
            rank.strongest = rank.strongest.max(gene.dominance);
            if a == b {
                rank.homozygous = Some(rank.homozygous.unwrap_or(0).max(gene.dominance));
            }
        }
    }

    ranks.sort_by(|x, y| {
        let xr = x.homozygous.unwrap_or(x.strongest);
        let yr = y.homozygous.unwrap_or(y.strongest);
        yr.cmp(&xr).then(x.first_seen.cmp(&y.first_seen))
    });
    ranks.into_iter().map(|r| r.allele).collect()
}
