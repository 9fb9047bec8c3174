use crate::model::article::Article;
use crate::model::feature::FeatureValue;
use crate::model::identity::Identity;
use crate::vectorizer::{compare::cosine_similarity, TermVector, VectorField};

/// Cosine between the article's keyword vector and the vector of the
/// identity's claimed keywords.
#[derive(Debug, Clone, Default)]
pub struct KeywordSimilarityStrategy {
    reference: TermVector,
}

impl KeywordSimilarityStrategy {
    pub const NAME: &'static str = "keyword_similarity";

    /// `reference` is the keyword vector of the identity's self-article,
    /// built against the same dictionary as the candidates.
    pub fn new(reference: TermVector) -> Self {
        Self { reference }
    }

    pub fn score(&self, article: &Article, _identity: &Identity) -> FeatureValue {
        FeatureValue::score(cosine_similarity(
            article.vectors.get(VectorField::Keyword),
            &self.reference,
        ))
    }
}
