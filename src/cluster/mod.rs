pub mod selector;
pub mod similarity;

use std::cmp::Ordering;

use ahash::AHashSet;
use indexmap::IndexMap;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::cluster::similarity::{ArticleProfile, ClusterProfile, ClusterWeights, PairSignals};
use crate::config::{check_threshold, ClusteringConfig};
use crate::error::Result;
use crate::model::article::{Article, ArticleId};
use crate::model::identity::Identity;
use crate::utils::datastruct::arena::{Arena, ArenaSlot};

/// Cluster ids are arena slots, so they count up from 0 in creation order.
pub type ClusterId = ArenaSlot;

/// Articles believed to share one true author.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cluster {
    id: ClusterId,
    /// in the order they joined
    members: Vec<ArticleId>,
}

impl Cluster {
    #[inline]
    pub fn id(&self) -> ClusterId {
        self.id
    }

    #[inline]
    pub fn members(&self) -> &[ArticleId] {
        &self.members
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Clusters plus the article -> cluster assignment.
/// Every assigned article sits in exactly one cluster.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Partition {
    clusters: Arena<Cluster>,
    assignment: IndexMap<ArticleId, ClusterId>,
}

impl Partition {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put an article in a new cluster.
    fn open(&mut self, article: ArticleId) -> ClusterId {
        let id = self.clusters.alloc_with(|id| Cluster {
            id,
            members: vec![article],
        });
        self.assignment.insert(article, id);
        id
    }

    /// Add an article to an existing cluster. Returns false for an unknown id.
    fn join(&mut self, cluster: ClusterId, article: ArticleId) -> bool {
        match self.clusters.get_mut(cluster) {
            Some(c) => {
                c.members.push(article);
                self.assignment.insert(article, cluster);
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: ClusterId) -> Option<&Cluster> {
        self.clusters.get(id)
    }

    /// Clusters in id order.
    pub fn clusters(&self) -> impl Iterator<Item = &Cluster> {
        self.clusters.values().iter()
    }

    pub fn cluster_of(&self, article: ArticleId) -> Option<ClusterId> {
        self.assignment.get(&article).copied()
    }

    /// Number of clusters
    #[inline]
    pub fn len(&self) -> usize {
        self.clusters.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.clusters.is_empty()
    }

    /// Number of assigned articles
    #[inline]
    pub fn article_count(&self) -> usize {
        self.assignment.len()
    }

    /// Member lists of all clusters, each sorted, in cluster order.
    pub fn groups(&self) -> Vec<Vec<ArticleId>> {
        self.clusters()
            .map(|cluster| {
                let mut members = cluster.members.clone();
                members.sort_unstable();
                members
            })
            .collect()
    }
}

/// Greedy single-pass clustering.
///
/// Articles are visited in a fixed order (most complete first, then by id).
/// Each one is compared once against every existing cluster's running
/// [`ClusterProfile`] and joins the most similar cluster, provided the
/// combined similarity exceeds `sim_threshold1` and the corroborating
/// signal exceeds `sim_threshold2`. Otherwise it opens a new cluster.
/// The result is fully determined by the input.
#[derive(Debug, Clone)]
pub struct Clusterer {
    sim_threshold1: f64,
    sim_threshold2: f64,
    weights: ClusterWeights,
}

/// Best candidate cluster for the article being placed.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    cluster: usize,
    score: f64,
    size: usize,
}

impl Candidate {
    /// Higher score, then larger cluster, then lower id.
    fn beats(&self, other: &Candidate) -> bool {
        match self.score.total_cmp(&other.score) {
            Ordering::Greater => true,
            Ordering::Less => false,
            Ordering::Equal => match self.size.cmp(&other.size) {
                Ordering::Greater => true,
                Ordering::Less => false,
                Ordering::Equal => self.cluster < other.cluster,
            },
        }
    }
}

impl Clusterer {
    /// Fails on a negative or non-finite threshold, or unusable weights.
    pub fn new(sim_threshold1: f64, sim_threshold2: f64, weights: ClusterWeights) -> Result<Self> {
        check_threshold("sim_threshold1", sim_threshold1)?;
        check_threshold("sim_threshold2", sim_threshold2)?;
        weights.validate()?;
        Ok(Self {
            sim_threshold1,
            sim_threshold2,
            weights,
        })
    }

    pub fn from_config(config: &ClusteringConfig) -> Result<Self> {
        Self::new(config.sim_threshold1, config.sim_threshold2, config.weights)
    }

    /// Article positions in clustering order.
    pub fn visit_order(articles: &[Article]) -> Vec<usize> {
        let mut order: Vec<usize> = (0..articles.len()).collect();
        order.sort_by(|&a, &b| {
            articles[b]
                .completeness_score
                .total_cmp(&articles[a].completeness_score)
                .then_with(|| articles[a].id.cmp(&articles[b].id))
        });
        order
    }

    /// Articles whose id was already placed are skipped with a warning.
    pub fn cluster(&self, articles: &[Article], identity: &Identity) -> Partition {
        let mut partition = Partition::new();
        if articles.is_empty() {
            return partition;
        }

        let profiles: Vec<ArticleProfile> = articles
            .par_iter()
            .map(|article| ArticleProfile::new(article, identity))
            .collect();
        // running evidence per cluster, parallel to the partition's arena
        let mut clusters: Vec<ClusterProfile> = Vec::new();
        let mut placed = AHashSet::with_capacity(articles.len());

        for pos in Self::visit_order(articles) {
            let article = &articles[pos];
            let profile = &profiles[pos];
            if !placed.insert(article.id) {
                warn!(pmid = article.id, "duplicate article id skipped by clustering");
                continue;
            }

            let mut best: Option<Candidate> = None;
            for (cluster, cluster_profile) in clusters.iter().enumerate() {
                let Some(score) = self.cluster_score(article, profile, cluster_profile) else {
                    continue;
                };
                let candidate = Candidate {
                    cluster,
                    score,
                    size: cluster_profile.len(),
                };
                if best.map_or(true, |b| candidate.beats(&b)) {
                    best = Some(candidate);
                }
            }

            match best {
                Some(candidate) => {
                    let joined = partition.join(ArenaSlot::new(candidate.cluster as u32), article.id);
                    debug_assert!(joined, "cluster profiles out of step with the partition");
                    clusters[candidate.cluster].absorb(article, profile);
                    debug!(
                        pmid = article.id,
                        cluster = candidate.cluster,
                        score = candidate.score,
                        "merged"
                    );
                }
                None => {
                    partition.open(article.id);
                    clusters.push(ClusterProfile::new(article, profile));
                }
            }
        }

        info!(
            articles = articles.len(),
            clusters = partition.len(),
            "clustering finished"
        );
        partition
    }

    /// Combined similarity of the article to a cluster, when it clears
    /// both thresholds and the name gate.
    fn cluster_score(
        &self,
        article: &Article,
        profile: &ArticleProfile,
        cluster: &ClusterProfile,
    ) -> Option<f64> {
        if cluster.name_conflicts(profile) {
            return None;
        }
        let signals = PairSignals::against(article, profile, cluster);
        let combined = signals.combined(&self.weights);
        (combined > self.sim_threshold1 && signals.corroboration() > self.sim_threshold2)
            .then_some(combined)
    }
}
