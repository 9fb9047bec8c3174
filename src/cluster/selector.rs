//! Picking the clusters that belong to the target identity.

use std::collections::BTreeMap;

use ahash::{AHashMap, AHashSet};
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::cluster::{Cluster, ClusterId, Partition};
use crate::config::{check_threshold, SelectionConfig};
use crate::error::{DisambiguationError, Result};
use crate::evidence::mesh::{MeshCountMap, MeshMajorStrategy};
use crate::model::article::{Article, ArticleId};
use crate::model::feature::Feature;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClusterScore {
    pub cluster: ClusterId,
    pub score: f64,
    pub size: usize,
}

/// Outcome of cluster selection.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    /// every cluster's evidence score, in cluster order
    scores: Vec<ClusterScore>,
    /// selected on evidence, ascending
    selected: Vec<ClusterId>,
    /// promoted by the MeSH pass, ascending
    promoted: Vec<ClusterId>,
    primary: Option<ClusterId>,
}

impl Selection {
    pub fn scores(&self) -> &[ClusterScore] {
        &self.scores
    }

    pub fn score_of(&self, cluster: ClusterId) -> Option<f64> {
        self.scores
            .iter()
            .find(|s| s.cluster == cluster)
            .map(|s| s.score)
    }

    /// Highest-scoring cluster selected on evidence.
    pub fn primary(&self) -> Option<ClusterId> {
        self.primary
    }

    pub fn promoted(&self) -> &[ClusterId] {
        &self.promoted
    }

    /// Evidence-selected and MeSH-promoted clusters, ascending.
    pub fn selected_clusters(&self) -> Vec<ClusterId> {
        let mut all: Vec<ClusterId> = self.selected.iter().chain(&self.promoted).copied().collect();
        all.sort_unstable();
        all.dedup();
        all
    }

    pub fn is_selected(&self, cluster: ClusterId) -> bool {
        self.selected.binary_search(&cluster).is_ok() || self.promoted.binary_search(&cluster).is_ok()
    }

    /// Members of all selected clusters, ascending.
    pub fn selected_article_ids(&self, partition: &Partition) -> Vec<ArticleId> {
        let mut ids: Vec<ArticleId> = self
            .selected_clusters()
            .into_iter()
            .filter_map(|id| partition.get(id))
            .flat_map(|cluster| cluster.members().iter().copied())
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Scores clusters from member evidence and applies the thresholds.
#[derive(Debug, Clone)]
pub struct ClusterSelector {
    threshold: f64,
    mesh_threshold: f64,
    mesh_common_cutoff: Option<u64>,
    /// feature name -> weight
    weights: IndexMap<String, f64>,
}

impl ClusterSelector {
    pub fn new(threshold: f64, mesh_threshold: f64, weights: IndexMap<String, f64>) -> Result<Self> {
        check_threshold("selection.threshold", threshold)?;
        check_threshold("mesh_threshold", mesh_threshold)?;
        if let Some((name, value)) = weights.iter().find(|(_, w)| !w.is_finite()) {
            return Err(DisambiguationError::InvalidWeight {
                name: name.clone(),
                value: *value,
            });
        }
        Ok(Self {
            threshold,
            mesh_threshold,
            mesh_common_cutoff: None,
            weights,
        })
    }

    pub fn from_config(config: &SelectionConfig) -> Result<Self> {
        Ok(Self::new(config.threshold, config.mesh_threshold, config.weights.clone())?
            .with_mesh_common_cutoff(config.mesh_common_cutoff))
    }

    pub fn with_mesh_common_cutoff(mut self, cutoff: Option<u64>) -> Self {
        self.mesh_common_cutoff = cutoff;
        self
    }

    /// Σ weight(feature) × mean member signal.
    /// Members without a Feature count as all-absent.
    pub fn cluster_score(&self, members: &[Option<&Feature>]) -> f64 {
        if members.is_empty() {
            return 0.0;
        }
        let n = members.len() as f64;
        self.weights
            .iter()
            .map(|(name, weight)| {
                let sum: f64 = members
                    .iter()
                    .flatten()
                    .map(|feature| feature.get(name).signal())
                    .sum();
                weight * sum / n
            })
            .sum()
    }

    /// Score every cluster and select those above the threshold.
    pub fn select_clusters(&self, partition: &Partition, features: &[Feature]) -> Selection {
        let by_id: AHashMap<ArticleId, &Feature> = features.iter().map(|f| (f.pmid(), f)).collect();
        let clusters: Vec<&Cluster> = partition.clusters().collect();

        let scores: Vec<ClusterScore> = clusters
            .par_iter()
            .map(|cluster| {
                let members: Vec<Option<&Feature>> = cluster
                    .members()
                    .iter()
                    .map(|id| by_id.get(id).copied())
                    .collect();
                ClusterScore {
                    cluster: cluster.id(),
                    score: self.cluster_score(&members),
                    size: cluster.len(),
                }
            })
            .collect();

        let selected: Vec<ClusterId> = scores
            .iter()
            .filter(|s| s.score > self.threshold)
            .map(|s| s.cluster)
            .collect();
        let primary = scores
            .iter()
            .filter(|s| s.score > self.threshold)
            .max_by(|a, b| {
                a.score
                    .total_cmp(&b.score)
                    .then(a.size.cmp(&b.size))
                    .then(b.cluster.cmp(&a.cluster))
            })
            .map(|s| s.cluster);

        info!(
            clusters = scores.len(),
            selected = selected.len(),
            primary = ?primary,
            "cluster selection finished"
        );
        Selection {
            scores,
            selected,
            promoted: Vec::new(),
            primary,
        }
    }

    /// MeSH table of the clusters selected so far.
    pub fn mesh_strategy(
        &self,
        partition: &Partition,
        articles: &[Article],
        selection: &Selection,
        global: &MeshCountMap,
    ) -> MeshMajorStrategy {
        let selected = selected_member_set(partition, selection);
        MeshMajorStrategy::from_articles(
            articles.iter().filter(|a| selected.contains(&a.id)),
            global,
            self.mesh_common_cutoff,
        )
    }

    /// Promote non-selected clusters whose major MeSH descriptors overlap
    /// the table by more than the MeSH threshold. The table is not updated
    /// by promotions made during the pass.
    ///
    /// Returns the promoted clusters.
    pub fn handle_non_selected_clusters(
        &self,
        mesh: &MeshMajorStrategy,
        partition: &Partition,
        articles: &[Article],
        selection: &mut Selection,
    ) -> Vec<ClusterId> {
        if mesh.is_empty() {
            return Vec::new();
        }
        let by_id: AHashMap<ArticleId, &Article> = articles.iter().map(|a| (a.id, a)).collect();
        let mut promoted = Vec::new();

        for cluster in partition.clusters() {
            if selection.is_selected(cluster.id()) {
                continue;
            }
            let descriptors: AHashSet<String> = cluster
                .members()
                .iter()
                .filter_map(|id| by_id.get(id))
                .flat_map(|article| article.major_descriptors())
                .collect();
            let Some(overlap) = mesh.overlap(&descriptors) else {
                continue;
            };
            if overlap > self.mesh_threshold {
                debug!(cluster = %cluster.id(), overlap, "promoted by mesh overlap");
                promoted.push(cluster.id());
            }
        }

        selection.promoted.extend(promoted.iter().copied());
        selection.promoted.sort_unstable();
        selection.promoted.dedup();
        info!(promoted = promoted.len(), "mesh recall pass finished");
        promoted
    }

    /// Major descriptor counts per selected cluster.
    pub fn selected_cluster_mesh_counts(
        &self,
        partition: &Partition,
        articles: &[Article],
        selection: &Selection,
    ) -> BTreeMap<ClusterId, MeshCountMap> {
        let by_id: AHashMap<ArticleId, &Article> = articles.iter().map(|a| (a.id, a)).collect();
        selection
            .selected_clusters()
            .into_iter()
            .filter_map(|id| partition.get(id))
            .map(|cluster| {
                let mut counts = MeshCountMap::new();
                for article in cluster.members().iter().filter_map(|id| by_id.get(id)) {
                    for descriptor in article.major_descriptors() {
                        *counts.entry(descriptor).or_insert(0) += 1;
                    }
                }
                (cluster.id(), counts)
            })
            .collect()
    }
}

fn selected_member_set(partition: &Partition, selection: &Selection) -> AHashSet<ArticleId> {
    selection.selected_article_ids(partition).into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cluster::similarity::ClusterWeights;
    use crate::cluster::Clusterer;
    use crate::model::article::{Author, AuthorName, MeshHeading};
    use crate::model::feature::FeatureValue;
    use crate::model::identity::Identity;

    fn feature(pmid: ArticleId, email: bool) -> Feature {
        let mut values = IndexMap::new();
        values.insert("email_match".to_string(), FeatureValue::bool(email));
        Feature::new(pmid, false, values)
    }

    fn email_only_selector(threshold: f64) -> ClusterSelector {
        let mut weights = IndexMap::new();
        weights.insert("email_match".to_string(), 1.0);
        ClusterSelector::new(threshold, 0.5, weights).unwrap()
    }

    /// Cluster `(id, coauthor, completeness)` rows with the default clusterer.
    fn clustered(rows: &[(ArticleId, &str, f64)]) -> (Vec<Article>, Partition) {
        let identity = Identity::new("jdoe", AuthorName::new("Jane", "", "Doe"));
        let articles: Vec<Article> = rows
            .iter()
            .map(|&(id, coauthor, completeness)| {
                let mut article = Article::new(id);
                article.completeness_score = completeness;
                article.coauthors = vec![
                    Author::new(identity.name.clone()),
                    Author::new(AuthorName::parse(coauthor)),
                ];
                article
            })
            .collect();
        let partition = Clusterer::new(0.3, 0.2, ClusterWeights::default())
            .unwrap()
            .cluster(&articles, &identity);
        (articles, partition)
    }

    /// Articles 1,2 share coauthors; 3 stands alone.
    fn partition() -> (Vec<Article>, Partition) {
        clustered(&[(1, "Al Smith", 0.0), (2, "Al Smith", 0.0), (3, "Xi Wang", 0.0)])
    }

    #[test]
    fn cluster_score_is_weighted_member_mean() {
        let selector = email_only_selector(0.25);
        let (a, b) = (feature(1, true), feature(2, false));
        assert_eq!(selector.cluster_score(&[Some(&a), Some(&b)]), 0.5);
        assert_eq!(selector.cluster_score(&[Some(&a), None]), 0.5);
        assert_eq!(selector.cluster_score(&[]), 0.0);
    }

    #[test]
    fn select_and_primary() {
        let (_, partition) = partition();
        assert_eq!(partition.len(), 2);
        let features = vec![feature(1, true), feature(2, true), feature(3, false)];
        let selection = email_only_selector(0.25).select_clusters(&partition, &features);

        let first = partition.cluster_of(1).unwrap();
        assert_eq!(selection.selected_clusters(), vec![first]);
        assert_eq!(selection.primary(), Some(first));
        assert_eq!(selection.selected_article_ids(&partition), vec![1, 2]);
        assert_eq!(selection.score_of(first), Some(1.0));
    }

    #[test]
    fn primary_tie_prefers_larger_then_lower_id() {
        // Wang opens cluster 0, the Smith pair cluster 1, Chen cluster 2
        let (_, partition) = clustered(&[
            (1, "Al Smith", 1.0),
            (2, "Al Smith", 1.0),
            (3, "Xi Wang", 2.0),
            (4, "Bo Chen", 0.0),
        ]);
        let wang = partition.cluster_of(3).unwrap();
        let smith = partition.cluster_of(1).unwrap();
        let chen = partition.cluster_of(4).unwrap();
        assert!(wang < smith && smith < chen);

        let selector = email_only_selector(0.25);
        let all = vec![feature(1, true), feature(2, true), feature(3, true), feature(4, true)];
        let selection = selector.select_clusters(&partition, &all);
        assert_eq!(selection.selected_clusters(), vec![wang, smith, chen]);
        assert_eq!(selection.primary(), Some(smith));

        let singles = vec![feature(1, false), feature(2, false), feature(3, true), feature(4, true)];
        assert_eq!(selector.select_clusters(&partition, &singles).primary(), Some(wang));
    }

    #[test]
    fn negative_weight_pulls_score_down() {
        let mut weights = IndexMap::new();
        weights.insert("email_match".to_string(), 1.0);
        weights.insert("degree_year_discrepancy".to_string(), -0.4);
        let selector = ClusterSelector::new(0.25, 0.5, weights).unwrap();
        let mut values = IndexMap::new();
        values.insert("email_match".to_string(), FeatureValue::bool(true));
        values.insert(
            "degree_year_discrepancy".to_string(),
            FeatureValue::YearGap { gap: -20, implausible: true },
        );
        let f = Feature::new(1, false, values);
        assert!((selector.cluster_score(&[Some(&f)]) - 0.6).abs() < 1e-12);
    }

    #[test]
    fn mesh_pass_promotes_overlapping_cluster() {
        let (mut articles, partition) = partition();
        for article in &mut articles {
            article.mesh_headings = vec![MeshHeading::new("Lymphoma", true)];
        }
        let features = vec![feature(1, true), feature(2, true), feature(3, false)];
        let selector = email_only_selector(0.25);
        let mut selection = selector.select_clusters(&partition, &features);

        let mesh = selector.mesh_strategy(&partition, &articles, &selection, &MeshCountMap::new());
        assert_eq!(mesh.table().get("lymphoma"), Some(&2));
        let promoted = selector.handle_non_selected_clusters(&mesh, &partition, &articles, &mut selection);

        let third = partition.cluster_of(3).unwrap();
        assert_eq!(promoted, vec![third]);
        assert!(selection.is_selected(third));
        assert_eq!(selection.selected_article_ids(&partition), vec![1, 2, 3]);

        let counts = selector.selected_cluster_mesh_counts(&partition, &articles, &selection);
        assert_eq!(counts[&third].get("lymphoma"), Some(&1));
    }

    #[test]
    fn invalid_selection_settings() {
        assert!(ClusterSelector::new(-1.0, 0.5, IndexMap::new()).is_err());
        let mut weights = IndexMap::new();
        weights.insert("email_match".to_string(), f64::NAN);
        assert!(ClusterSelector::new(0.25, 0.5, weights).is_err());
    }
}
