use ahash::AHashSet;

use crate::model::article::Article;
use crate::model::feature::FeatureValue;
use crate::model::identity::Identity;

/// A coauthor other than the target is a known collaborator, mentor or mentee.
#[derive(Debug, Clone, Copy, Default)]
pub struct KnownRelationshipStrategy;

impl KnownRelationshipStrategy {
    pub const NAME: &'static str = "known_relationship";

    pub fn score(&self, article: &Article, identity: &Identity) -> FeatureValue {
        if identity.known_relationships.is_empty() {
            return FeatureValue::bool(false);
        }
        let known: AHashSet<String> = identity
            .known_relationships
            .iter()
            .map(|name| name.normalized_key())
            .filter(|key| !key.is_empty())
            .collect();
        let matched = article
            .coauthor_keys(&identity.name)
            .iter()
            .any(|key| known.contains(key));
        FeatureValue::bool(matched)
    }
}
