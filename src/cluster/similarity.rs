//! Article-to-cluster similarity used by the clusterer.

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{DisambiguationError, Result};
use crate::model::article::Article;
use crate::model::identity::Identity;
use crate::utils::normalizer::normalize_text;
use crate::vectorizer::{compare::cosine_similarity, TermVector, VectorField};

/// Weights of the article-to-cluster signals in the combined similarity.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClusterWeights {
    pub coauthor: f64,
    pub affiliation: f64,
    pub journal: f64,
    pub keyword: f64,
}

impl Default for ClusterWeights {
    fn default() -> Self {
        Self {
            coauthor: 0.4,
            affiliation: 0.3,
            journal: 0.15,
            keyword: 0.15,
        }
    }
}

impl ClusterWeights {
    fn entries(&self) -> [(&'static str, f64); 4] {
        [
            ("coauthor", self.coauthor),
            ("affiliation", self.affiliation),
            ("journal", self.journal),
            ("keyword", self.keyword),
        ]
    }

    /// Finite, non-negative, and not all zero.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in self.entries() {
            if !value.is_finite() || value < 0.0 {
                return Err(DisambiguationError::InvalidWeight {
                    name: format!("clustering.weights.{}", name),
                    value,
                });
            }
        }
        if self.total() <= 0.0 {
            return Err(DisambiguationError::Config(
                "clustering weights must not all be zero".to_string(),
            ));
        }
        Ok(())
    }

    #[inline]
    pub fn total(&self) -> f64 {
        self.coauthor + self.affiliation + self.journal + self.keyword
    }
}

/// Per-article data the cluster comparison needs, computed once.
#[derive(Debug, Clone, Default)]
pub struct ArticleProfile {
    coauthors: AHashSet<String>,
    journal: String,
    target_first: Option<String>,
}

impl ArticleProfile {
    pub fn new(article: &Article, identity: &Identity) -> Self {
        Self {
            coauthors: article.coauthor_keys(&identity.name),
            journal: normalize_text(&article.journal),
            target_first: article
                .target_author(&identity.name)
                .and_then(|author| author.name.full_first()),
        }
    }
}

/// Running evidence of one cluster, updated as members join: the union of
/// coauthor keys and journals, the summed affiliation and keyword vectors,
/// and the first full first name seen for the target author.
#[derive(Debug, Clone, Default)]
pub struct ClusterProfile {
    coauthors: AHashSet<String>,
    journals: AHashSet<String>,
    affiliation: TermVector,
    keyword: TermVector,
    target_first: Option<String>,
    size: usize,
}

impl ClusterProfile {
    pub fn new(article: &Article, profile: &ArticleProfile) -> Self {
        let mut cluster = Self::default();
        cluster.absorb(article, profile);
        cluster
    }

    /// Fold a new member into the profile.
    pub fn absorb(&mut self, article: &Article, profile: &ArticleProfile) {
        self.coauthors.extend(profile.coauthors.iter().cloned());
        if !profile.journal.is_empty() {
            self.journals.insert(profile.journal.clone());
        }
        self.affiliation = self
            .affiliation
            .sum_with(article.vectors.get(VectorField::Affiliation));
        self.keyword = self.keyword.sum_with(article.vectors.get(VectorField::Keyword));
        if self.target_first.is_none() {
            self.target_first = profile.target_first.clone();
        }
        self.size += 1;
    }

    /// Number of absorbed members
    #[inline]
    pub fn len(&self) -> usize {
        self.size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.size == 0
    }

    /// The cluster and the article spell out different first names for the target.
    pub fn name_conflicts(&self, profile: &ArticleProfile) -> bool {
        matches!((&self.target_first, &profile.target_first), (Some(a), Some(b)) if a != b)
    }
}

/// Signals between an article and a cluster profile, each in [0, 1].
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PairSignals {
    /// overlap coefficient of the article's coauthor keys and the cluster's
    pub coauthor: f64,
    /// cosine of the article's affiliation vector and the cluster sum
    pub affiliation: f64,
    /// 1 when the article's journal is one the cluster has published in
    pub journal: f64,
    /// cosine of the article's keyword vector and the cluster sum
    pub keyword: f64,
}

impl PairSignals {
    pub fn against(article: &Article, profile: &ArticleProfile, cluster: &ClusterProfile) -> Self {
        let journal = if !profile.journal.is_empty() && cluster.journals.contains(&profile.journal) {
            1.0
        } else {
            0.0
        };
        Self {
            coauthor: overlap_coefficient(&profile.coauthors, &cluster.coauthors),
            affiliation: cosine_similarity(
                article.vectors.get(VectorField::Affiliation),
                &cluster.affiliation,
            ),
            journal,
            keyword: cosine_similarity(article.vectors.get(VectorField::Keyword), &cluster.keyword),
        }
    }

    /// Weighted mean of the signals.
    pub fn combined(&self, weights: &ClusterWeights) -> f64 {
        let total = weights.total();
        if total <= 0.0 {
            return 0.0;
        }
        (weights.coauthor * self.coauthor
            + weights.affiliation * self.affiliation
            + weights.journal * self.journal
            + weights.keyword * self.keyword)
            / total
    }

    /// Strongest signal other than the journal, which alone is too weak
    /// to tie two papers to one person.
    pub fn corroboration(&self) -> f64 {
        self.coauthor.max(self.affiliation).max(self.keyword)
    }
}

/// |A ∩ B| / min(|A|, |B|), 0.0 when either set is empty.
pub fn overlap_coefficient(a: &AHashSet<String>, b: &AHashSet<String>) -> f64 {
    let smaller = a.len().min(b.len());
    if smaller == 0 {
        return 0.0;
    }
    let (small, large) = if a.len() <= b.len() { (a, b) } else { (b, a) };
    small.iter().filter(|key| large.contains(*key)).count() as f64 / smaller as f64
}
