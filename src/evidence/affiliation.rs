use crate::model::article::Article;
use crate::model::feature::FeatureValue;
use crate::model::identity::Identity;
use crate::utils::normalizer::{contains_phrase, token_set};

/// Target author's affiliation names the home institution under one of its
/// configured aliases. Without a target-author affiliation, every byline
/// affiliation is checked.
#[derive(Debug, Clone, Default)]
pub struct InstitutionAffiliationStrategy {
    aliases: Vec<String>,
}

impl InstitutionAffiliationStrategy {
    pub const NAME: &'static str = "institution_affiliation";

    pub fn new(aliases: Vec<String>) -> Self {
        Self { aliases }
    }

    pub fn aliases(&self) -> &[String] {
        &self.aliases
    }

    pub fn score(&self, article: &Article, identity: &Identity) -> FeatureValue {
        let own = article
            .target_author(&identity.name)
            .and_then(|author| author.affiliation.as_deref())
            .filter(|aff| !aff.trim().is_empty());
        let affiliations: Vec<&str> = match own {
            Some(aff) => vec![aff],
            None => article.affiliations().collect(),
        };
        let matched = affiliations.iter().any(|aff| {
            let tokens = token_set(aff);
            self.aliases.iter().any(|alias| contains_phrase(&tokens, alias))
        });
        FeatureValue::bool(matched)
    }
}
