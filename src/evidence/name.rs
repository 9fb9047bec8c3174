use crate::model::article::Article;
use crate::model::feature::FeatureValue;
use crate::model::identity::Identity;

/// How well the byline's form of the target name agrees with the identity.
///
/// 1.0 when the full first names agree, 0.5 when only initials can be
/// compared and they agree, 0.0 on a conflict or when no byline name fits.
#[derive(Debug, Clone, Copy, Default)]
pub struct NameStrategy;

impl NameStrategy {
    pub const NAME: &'static str = "name_match";

    pub fn score(&self, article: &Article, identity: &Identity) -> FeatureValue {
        let Some(author) = article.target_author(&identity.name) else {
            return FeatureValue::score(0.0);
        };
        let name = &author.name;
        let claimed = &identity.name;

        if let (Some(a), Some(b)) = (name.middle_initial(), claimed.middle_initial()) {
            if a != b {
                return FeatureValue::score(0.0);
            }
        }
        match (name.full_first(), claimed.full_first()) {
            (Some(a), Some(b)) if a == b => FeatureValue::score(1.0),
            (Some(_), Some(_)) => FeatureValue::score(0.0),
            _ => FeatureValue::score(0.5),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::article::{Author, AuthorName};

    fn with_byline(name: AuthorName) -> Article {
        let mut article = Article::new(1);
        article.coauthors = vec![Author::new(name)];
        article
    }

    #[test]
    fn name_variants() {
        let identity = Identity::new("jdoe", AuthorName::new("Jane", "Q", "Doe"));
        let strategy = NameStrategy;
        let score = |name| strategy.score(&with_byline(name), &identity);

        assert_eq!(score(AuthorName::new("Jane", "", "Doe")), FeatureValue::score(1.0));
        assert_eq!(score(AuthorName::new("J", "Q", "Doe")), FeatureValue::score(0.5));
        assert_eq!(score(AuthorName::new("Jenny", "", "Doe")), FeatureValue::score(0.0));
        assert_eq!(score(AuthorName::new("Jane", "R", "Doe")), FeatureValue::score(0.0));
        assert_eq!(score(AuthorName::new("Jane", "", "Roe")), FeatureValue::score(0.0));
    }
}
