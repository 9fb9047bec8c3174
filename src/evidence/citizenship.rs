use ahash::AHashSet;

use crate::model::article::Article;
use crate::model::feature::FeatureValue;
use crate::model::identity::Identity;
use crate::utils::normalizer::{contains_phrase, tokens};

/// Some affiliation of the article, PubMed or Scopus, is located in the
/// identity's country of citizenship.
#[derive(Debug, Clone, Copy, Default)]
pub struct CitizenshipStrategy;

impl CitizenshipStrategy {
    pub const NAME: &'static str = "citizenship_match";

    pub fn score(&self, article: &Article, identity: &Identity) -> FeatureValue {
        let Some(country) = identity
            .citizenship
            .as_deref()
            .filter(|c| !c.trim().is_empty())
        else {
            return FeatureValue::Absent;
        };
        let scopus = article.scopus_affiliations.iter().flatten().map(String::as_str);
        let words: AHashSet<String> = article.affiliations().chain(scopus).flat_map(tokens).collect();
        FeatureValue::bool(contains_phrase(&words, country))
    }
}
