use crate::model::article::Article;
use crate::model::feature::FeatureValue;
use crate::model::identity::Identity;

/// Publication year relative to the terminal degree year.
/// Papers far older than the degree likely belong to someone else.
#[derive(Debug, Clone, Copy)]
pub struct DegreeYearStrategy {
    /// years before the terminal degree still considered plausible
    tolerance: i32,
}

impl Default for DegreeYearStrategy {
    fn default() -> Self {
        Self { tolerance: 5 }
    }
}

impl DegreeYearStrategy {
    pub const NAME: &'static str = "degree_year_discrepancy";

    pub fn new(tolerance: i32) -> Self {
        Self { tolerance }
    }

    pub fn score(&self, article: &Article, identity: &Identity) -> FeatureValue {
        match (article.publication_year, identity.terminal_degree_year()) {
            (Some(year), Some(terminal)) => {
                let gap = year - terminal;
                FeatureValue::YearGap {
                    gap,
                    implausible: gap < -self.tolerance,
                }
            }
            _ => FeatureValue::Absent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::article::AuthorName;
    use crate::model::identity::DegreeRecord;

    #[test]
    fn gap_against_terminal_degree() {
        let identity = Identity::new("jdoe", AuthorName::new("Jane", "", "Doe"))
            .with_degree_record(DegreeRecord::new(1995, 0, 2000));
        let strategy = DegreeYearStrategy::new(5);
        let mut article = Article::new(1);
        assert!(strategy.score(&article, &identity).is_absent());

        article.publication_year = Some(1996);
        assert_eq!(
            strategy.score(&article, &identity),
            FeatureValue::YearGap { gap: -4, implausible: false }
        );
        article.publication_year = Some(1980);
        assert_eq!(
            strategy.score(&article, &identity),
            FeatureValue::YearGap { gap: -20, implausible: true }
        );
    }

    #[test]
    fn no_degree_is_absent() {
        let identity = Identity::new("jdoe", AuthorName::new("Jane", "", "Doe"));
        let mut article = Article::new(1);
        article.publication_year = Some(1980);
        assert!(DegreeYearStrategy::default().score(&article, &identity).is_absent());
    }
}
