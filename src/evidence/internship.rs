use crate::model::article::Article;
use crate::model::feature::FeatureValue;
use crate::model::identity::Identity;
use crate::utils::normalizer::{contains_phrase, token_set};

/// Article was published during an internship or residency and lists the
/// institution of that appointment.
#[derive(Debug, Clone, Copy, Default)]
pub struct InternshipResidencyStrategy;

impl InternshipResidencyStrategy {
    pub const NAME: &'static str = "internship_residency";

    pub fn score(&self, article: &Article, identity: &Identity) -> FeatureValue {
        if identity.appointments.is_empty() {
            return FeatureValue::Absent;
        }
        let Some(year) = article.publication_year else {
            return FeatureValue::Absent;
        };
        let affiliation = token_set(&article.target_affiliation_text(&identity.name));
        let matched = identity
            .appointments
            .iter()
            .filter(|appointment| appointment.covers(year))
            .any(|appointment| contains_phrase(&affiliation, &appointment.institution));
        FeatureValue::bool(matched)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::article::{Author, AuthorName};
    use crate::model::identity::Appointment;

    #[test]
    fn year_and_institution_must_both_match() {
        let mut identity = Identity::new("jdoe", AuthorName::new("Jane", "", "Doe"));
        identity.appointments = vec![Appointment {
            institution: "Johns Hopkins Hospital".into(),
            start_year: 2003,
            end_year: Some(2006),
        }];
        let mut article = Article::new(1);
        article.coauthors = vec![Author::new(AuthorName::new("Jane", "", "Doe"))
            .with_affiliation("Department of Medicine, Johns Hopkins Hospital, Baltimore")];
        assert!(InternshipResidencyStrategy.score(&article, &identity).is_absent());

        article.publication_year = Some(2005);
        assert_eq!(
            InternshipResidencyStrategy.score(&article, &identity),
            FeatureValue::bool(true)
        );
        article.publication_year = Some(2010);
        assert_eq!(
            InternshipResidencyStrategy.score(&article, &identity),
            FeatureValue::bool(false)
        );
    }
}
