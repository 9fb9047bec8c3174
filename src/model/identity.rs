use serde::{Deserialize, Serialize};

use crate::model::article::{Article, Author, AuthorName, SELF_ARTICLE_ID};

/// Degree years; 0 means the degree is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DegreeRecord {
    pub bachelor_year: i32,
    pub masters_year: i32,
    pub doctoral_year: i32,
}

impl DegreeRecord {
    pub fn new(bachelor_year: i32, masters_year: i32, doctoral_year: i32) -> Self {
        Self {
            bachelor_year,
            masters_year,
            doctoral_year,
        }
    }

    /// Doctoral year if present, else masters, else bachelor.
    pub fn terminal_year(&self) -> Option<i32> {
        [self.doctoral_year, self.masters_year, self.bachelor_year]
            .into_iter()
            .find(|year| *year > 0)
    }
}

/// Internship or residency at one institution over a span of years.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Appointment {
    pub institution: String,
    pub start_year: i32,
    /// inclusive; `None` while ongoing
    #[serde(default)]
    pub end_year: Option<i32>,
}

impl Appointment {
    pub fn covers(&self, year: i32) -> bool {
        year >= self.start_year && self.end_year.map_or(true, |end| year <= end)
    }
}

/// The target author as claimed by the institution.
///
/// Built once per run and only read afterwards.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Identity {
    /// institutional id
    pub key: String,
    pub name: AuthorName,
    pub affiliation: Option<String>,
    pub department: Option<String>,
    pub email: Option<String>,
    pub citizenship: Option<String>,
    pub degrees: DegreeRecord,
    /// names of known collaborators, mentors, mentees
    pub known_relationships: Vec<AuthorName>,
    pub keywords: Vec<String>,
    pub journals: Vec<String>,
    pub appointments: Vec<Appointment>,
}

impl Identity {
    pub fn new(key: impl Into<String>, name: AuthorName) -> Self {
        Self {
            key: key.into(),
            name,
            ..Self::default()
        }
    }

    pub fn with_degree_record(mut self, degrees: DegreeRecord) -> Self {
        self.degrees = degrees;
        self
    }

    #[inline]
    pub fn terminal_degree_year(&self) -> Option<i32> {
        self.degrees.terminal_year()
    }

    /// Terminal degree year, or -1 when there is none.
    #[inline]
    pub fn terminal_degree_year_or_sentinel(&self) -> i32 {
        self.terminal_degree_year().unwrap_or(-1)
    }

    /// Synthetic article assembled from the identity's own claims.
    ///
    /// It takes part in vectorization so claimed keywords and affiliation
    /// can be compared against candidates, but it is never a candidate.
    pub fn self_article(&self) -> Article {
        let mut author = Author::new(self.name.clone());
        author.affiliation = match (&self.department, &self.affiliation) {
            (Some(dept), Some(aff)) => Some(format!("{}, {}", dept, aff)),
            (Some(one), None) | (None, Some(one)) => Some(one.clone()),
            (None, None) => None,
        };
        author.email = self.email.clone();

        let mut article = Article::new(SELF_ARTICLE_ID);
        article.journal = self.journals.join(" ");
        article.keywords = self.keywords.clone();
        article.coauthors = vec![author];
        article
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_degree_prefers_doctoral() {
        assert_eq!(DegreeRecord::new(1990, 1993, 1998).terminal_year(), Some(1998));
        assert_eq!(DegreeRecord::new(1990, 1993, 0).terminal_year(), Some(1993));
        assert_eq!(DegreeRecord::new(1990, 0, 0).terminal_year(), Some(1990));
        assert_eq!(DegreeRecord::default().terminal_year(), None);

        let identity = Identity::new("jdoe", AuthorName::new("Jane", "", "Doe"));
        assert_eq!(identity.terminal_degree_year_or_sentinel(), -1);
        let identity = identity.with_degree_record(DegreeRecord::new(0, 0, 2001));
        assert_eq!(identity.terminal_degree_year_or_sentinel(), 2001);
    }

    #[test]
    fn appointment_span_is_inclusive() {
        let a = Appointment {
            institution: "NewYork-Presbyterian".into(),
            start_year: 2005,
            end_year: Some(2008),
        };
        assert!(a.covers(2005) && a.covers(2008));
        assert!(!a.covers(2009));
    }

    #[test]
    fn self_article_carries_claims() {
        let mut identity = Identity::new("jdoe", AuthorName::new("Jane", "", "Doe"));
        identity.department = Some("Medicine".into());
        identity.affiliation = Some("Weill Cornell".into());
        identity.keywords = vec!["lymphoma".into()];

        let article = identity.self_article();
        assert_eq!(article.id, SELF_ARTICLE_ID);
        assert_eq!(
            article.target_affiliation_text(&identity.name),
            "Medicine, Weill Cornell"
        );
        assert_eq!(article.keywords, vec!["lymphoma".to_string()]);
    }
}
