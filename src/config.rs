//! Engine configuration.
//! Read from a TOML file with `clustering`, `selection` and `evidence`
//! sections; every key is optional.

use std::path::Path;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::cluster::similarity::ClusterWeights;
use crate::error::{DisambiguationError, Result};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub clustering: ClusteringConfig,
    pub selection: SelectionConfig,
    pub evidence: EvidenceConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClusteringConfig {
    /// combined similarity must exceed this to merge
    #[serde(default = "default_sim_threshold1")]
    pub sim_threshold1: f64,
    /// the corroborating signal must exceed this to merge
    #[serde(default = "default_sim_threshold2")]
    pub sim_threshold2: f64,
    #[serde(default)]
    pub weights: ClusterWeights,
}

fn default_sim_threshold1() -> f64 { 0.3 }
fn default_sim_threshold2() -> f64 { 0.2 }

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            sim_threshold1: default_sim_threshold1(),
            sim_threshold2: default_sim_threshold2(),
            weights: ClusterWeights::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionConfig {
    /// a cluster is selected when its score exceeds this
    #[serde(default = "default_selection_threshold")]
    pub threshold: f64,
    /// a non-selected cluster is promoted when its MeSH overlap exceeds this
    #[serde(default = "default_mesh_threshold")]
    pub mesh_threshold: f64,
    /// descriptors seen more often than this in the global map are ignored
    #[serde(default)]
    pub mesh_common_cutoff: Option<u64>,
    /// feature name -> weight; features not listed weigh 0
    #[serde(default = "default_selection_weights")]
    pub weights: IndexMap<String, f64>,
}

fn default_selection_threshold() -> f64 { 0.25 }
fn default_mesh_threshold() -> f64 { 0.5 }

fn default_selection_weights() -> IndexMap<String, f64> {
    [
        ("email_match", 0.35),
        ("department_match", 0.15),
        ("known_relationship", 0.2),
        ("institution_affiliation", 0.2),
        ("scopus_affiliation", 0.1),
        ("journal_match", 0.05),
        ("citizenship_match", 0.02),
        ("internship_residency", 0.05),
        ("name_match", 0.15),
        ("keyword_similarity", 0.1),
        ("degree_year_discrepancy", -0.4),
    ]
    .into_iter()
    .map(|(name, weight)| (name.to_string(), weight))
    .collect()
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            threshold: default_selection_threshold(),
            mesh_threshold: default_mesh_threshold(),
            mesh_common_cutoff: None,
            weights: default_selection_weights(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvidenceConfig {
    /// names under which the home institution appears in affiliations
    #[serde(default = "default_institution_aliases")]
    pub institution_aliases: Vec<String>,
    /// years a publication may precede the terminal degree before it is implausible
    #[serde(default = "default_degree_year_tolerance")]
    pub degree_year_tolerance: i32,
}

fn default_institution_aliases() -> Vec<String> {
    [
        "weill cornell",
        "cornell university",
        "cornell medical",
        "new york presbyterian",
        "newyork presbyterian",
        "memorial sloan kettering",
        "hospital for special surgery",
        "rockefeller university",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

fn default_degree_year_tolerance() -> i32 { 5 }

impl Default for EvidenceConfig {
    fn default() -> Self {
        Self {
            institution_aliases: default_institution_aliases(),
            degree_year_tolerance: default_degree_year_tolerance(),
        }
    }
}

impl EngineConfig {
    /// Load and validate a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: EngineConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject thresholds and weights that would make a run meaningless.
    pub fn validate(&self) -> Result<()> {
        check_threshold("sim_threshold1", self.clustering.sim_threshold1)?;
        check_threshold("sim_threshold2", self.clustering.sim_threshold2)?;
        check_threshold("selection.threshold", self.selection.threshold)?;
        check_threshold("mesh_threshold", self.selection.mesh_threshold)?;
        self.clustering.weights.validate()?;
        for (name, weight) in &self.selection.weights {
            if !weight.is_finite() {
                return Err(DisambiguationError::InvalidWeight {
                    name: name.clone(),
                    value: *weight,
                });
            }
        }
        if self.evidence.degree_year_tolerance < 0 {
            return Err(DisambiguationError::Config(format!(
                "degree_year_tolerance must not be negative, got {}",
                self.evidence.degree_year_tolerance
            )));
        }
        Ok(())
    }
}

/// Finite and non-negative.
pub fn check_threshold(name: &'static str, value: f64) -> Result<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(DisambiguationError::InvalidThreshold { name, value })
    }
}
