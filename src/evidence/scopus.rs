use strsim::jaro_winkler;

use crate::model::article::Article;
use crate::model::feature::FeatureValue;
use crate::model::identity::Identity;
use crate::utils::normalizer::normalize_text;

/// Best Jaro-Winkler similarity between a Scopus affiliation and the
/// identity's affiliation.
#[derive(Debug, Clone, Copy, Default)]
pub struct ScopusAffiliationStrategy;

impl ScopusAffiliationStrategy {
    pub const NAME: &'static str = "scopus_affiliation";

    pub fn score(&self, article: &Article, identity: &Identity) -> FeatureValue {
        let Some(scopus) = article.scopus_affiliations.as_ref().filter(|a| !a.is_empty()) else {
            return FeatureValue::Absent;
        };
        let Some(claimed) = identity
            .affiliation
            .as_deref()
            .map(normalize_text)
            .filter(|a| !a.is_empty())
        else {
            return FeatureValue::Absent;
        };
        let best = scopus
            .iter()
            .map(|aff| jaro_winkler(&normalize_text(aff), &claimed))
            .fold(0.0_f64, f64::max);
        FeatureValue::score(best)
    }
}
