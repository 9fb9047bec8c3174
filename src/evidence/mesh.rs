use std::collections::BTreeMap;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::model::article::Article;
use crate::model::feature::FeatureValue;
use crate::model::identity::Identity;

/// Descriptor -> occurrence count. Ordered so reports and snapshots are stable.
pub type MeshCountMap = BTreeMap<String, u64>;

/// Overlap between an article's major MeSH descriptors and the descriptors
/// of the articles already attributed to the target author.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeshMajorStrategy {
    /// lowercase descriptor -> count among attributed articles
    table: MeshCountMap,
}

impl MeshMajorStrategy {
    pub const NAME: &'static str = "mesh_major_overlap";

    pub fn new(table: MeshCountMap) -> Self {
        Self { table }
    }

    /// Count major descriptors of `articles`.
    ///
    /// With a `common_cutoff`, descriptors whose count in `global` exceeds
    /// it are left out; "Humans" says nothing about who wrote a paper.
    pub fn from_articles<'a, I>(articles: I, global: &MeshCountMap, common_cutoff: Option<u64>) -> Self
    where
        I: IntoIterator<Item = &'a Article>,
    {
        let global = match common_cutoff {
            Some(_) => lowercase_keys(global),
            None => MeshCountMap::new(),
        };

        let mut table = MeshCountMap::new();
        for article in articles {
            for descriptor in article.major_descriptors() {
                let too_common = common_cutoff
                    .is_some_and(|cutoff| global.get(&descriptor).copied().unwrap_or(0) > cutoff);
                if !too_common {
                    *table.entry(descriptor).or_insert(0) += 1;
                }
            }
        }
        Self { table }
    }

    pub fn table(&self) -> &MeshCountMap {
        &self.table
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Fraction of `descriptors` present in the table.
    /// `None` when either side is empty.
    pub fn overlap(&self, descriptors: &AHashSet<String>) -> Option<f64> {
        if self.table.is_empty() || descriptors.is_empty() {
            return None;
        }
        let hits = descriptors
            .iter()
            .filter(|d| self.table.contains_key(d.as_str()))
            .count();
        Some(hits as f64 / descriptors.len() as f64)
    }

    pub fn score(&self, article: &Article, _identity: &Identity) -> FeatureValue {
        match self.overlap(&article.major_descriptors()) {
            Some(overlap) => FeatureValue::score(overlap),
            None => FeatureValue::Absent,
        }
    }
}

fn lowercase_keys(map: &MeshCountMap) -> MeshCountMap {
    let mut out = MeshCountMap::new();
    for (key, count) in map {
        *out.entry(key.to_lowercase()).or_insert(0) += count;
    }
    out
}
