use crate::model::article::Article;
use crate::model::feature::FeatureValue;
use crate::model::identity::Identity;

/// Identity email equals an author's email, or an address written inside
/// any affiliation string.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmailStrategy;

impl EmailStrategy {
    pub const NAME: &'static str = "email_match";

    pub fn score(&self, article: &Article, identity: &Identity) -> FeatureValue {
        let Some(email) = identity
            .email
            .as_deref()
            .map(|e| e.trim().to_lowercase())
            .filter(|e| !e.is_empty())
        else {
            return FeatureValue::bool(false);
        };

        let on_author = article.coauthors.iter().any(|author| {
            author
                .email
                .as_deref()
                .is_some_and(|e| e.trim().eq_ignore_ascii_case(&email))
        });
        let in_affiliation = article
            .affiliations()
            .any(|aff| email_tokens(aff).any(|token| token.eq_ignore_ascii_case(&email)));
        FeatureValue::bool(on_author || in_affiliation)
    }
}

/// Email-shaped tokens of free text, with surrounding punctuation trimmed
/// ("Electronic address: x@y.edu." yields `x@y.edu`).
fn email_tokens(text: &str) -> impl Iterator<Item = &str> {
    text.split(|c: char| {
        c.is_whitespace() || matches!(c, ',' | ';' | ':' | '(' | ')' | '<' | '>' | '[' | ']')
    })
    .map(|token| token.trim_matches(|c: char| !c.is_alphanumeric()))
    .filter(|token| token.contains('@'))
}
