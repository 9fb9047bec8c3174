//! Precision and recall of a selection against the gold standard.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::model::article::ArticleId;
use crate::model::feature::Feature;

/// Evaluation of one run. The four id lists are disjoint and sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    pub precision: f64,
    pub recall: f64,
    /// (precision + recall) / 2
    pub accuracy: f64,
    pub true_positives: Vec<ArticleId>,
    pub false_positives: Vec<ArticleId>,
    pub false_negatives: Vec<ArticleId>,
    pub true_negatives: Vec<ArticleId>,
}

impl Analysis {
    /// Compare `selected` with `gold` over the candidate set.
    ///
    /// # Arguments
    /// * `selected` - ids attributed to the identity
    /// * `gold` - ids known to belong to the identity
    /// * `candidates` - every candidate id of the run
    ///
    /// # Returns
    /// * precision = |S∩G| / |S|, 0 when nothing was selected
    /// * recall = |S∩G| / |G|, 0 when the gold standard is empty
    pub fn analyze(selected: &[ArticleId], gold: &[ArticleId], candidates: &[ArticleId]) -> Self {
        let s: AHashSet<ArticleId> = selected.iter().copied().collect();
        let g: AHashSet<ArticleId> = gold.iter().copied().collect();

        let true_positives = sorted(s.intersection(&g).copied());
        let false_positives = sorted(s.difference(&g).copied());
        let false_negatives = sorted(g.difference(&s).copied());
        let true_negatives = sorted(
            candidates
                .iter()
                .copied()
                .filter(|id| !s.contains(id) && !g.contains(id)),
        );

        let hits = true_positives.len() as f64;
        let precision = if s.is_empty() { 0.0 } else { hits / s.len() as f64 };
        let recall = if g.is_empty() { 0.0 } else { hits / g.len() as f64 };

        Self {
            precision,
            recall,
            accuracy: (precision + recall) / 2.0,
            true_positives,
            false_positives,
            false_negatives,
            true_negatives,
        }
    }
}

fn sorted(ids: impl Iterator<Item = ArticleId>) -> Vec<ArticleId> {
    let mut ids: Vec<ArticleId> = ids.collect();
    ids.sort_unstable();
    ids.dedup();
    ids
}

/// Copy of `features` with each gold flag set from membership in `gold`.
pub fn assign_gold_standard(features: &[Feature], gold: &[ArticleId]) -> Vec<Feature> {
    let gold: AHashSet<ArticleId> = gold.iter().copied().collect();
    features
        .iter()
        .map(|feature| feature.with_gold_standard(gold.contains(&feature.pmid())))
        .collect()
}
