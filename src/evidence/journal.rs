use crate::model::article::Article;
use crate::model::feature::FeatureValue;
use crate::model::identity::Identity;
use crate::utils::normalizer::{token_jaccard, token_set};

/// Word overlap between the article's journal and the journals the
/// identity has published in before. 1.0 on an exact title match.
#[derive(Debug, Clone, Copy, Default)]
pub struct JournalStrategy;

impl JournalStrategy {
    pub const NAME: &'static str = "journal_match";

    pub fn score(&self, article: &Article, identity: &Identity) -> FeatureValue {
        if identity.journals.is_empty() {
            return FeatureValue::Absent;
        }
        let journal = token_set(&article.journal);
        if journal.is_empty() {
            return FeatureValue::score(0.0);
        }
        let best = identity
            .journals
            .iter()
            .map(|known| token_jaccard(&journal, &token_set(known)))
            .fold(0.0_f64, f64::max);
        FeatureValue::score(best)
    }
}
