use std::fmt;

use ahash::AHashSet;
use serde::{Deserialize, Serialize};

use crate::utils::normalizer::normalize_name_part;
use crate::vectorizer::FieldVectors;

/// PubMed identifier, or an equivalent numeric key.
pub type ArticleId = u64;

/// Id of the synthetic article built from an identity's claims.
/// PMIDs start at 1, so 0 never collides with a real record.
pub const SELF_ARTICLE_ID: ArticleId = 0;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AuthorName {
    pub first: String,
    pub middle: String,
    pub last: String,
}

impl AuthorName {
    pub fn new(first: impl Into<String>, middle: impl Into<String>, last: impl Into<String>) -> Self {
        Self {
            first: first.into(),
            middle: middle.into(),
            last: last.into(),
        }
    }

    /// Parse "First Last" or "First Middle Last".
    /// A single word is taken as a last name.
    pub fn parse(full: &str) -> Self {
        let parts: Vec<&str> = full.split_whitespace().collect();
        match parts.as_slice() {
            [] => Self::default(),
            [last] => Self::new("", "", *last),
            [first, last] => Self::new(*first, "", *last),
            [first, middle @ .., last] => Self::new(*first, middle.join(" "), *last),
        }
    }

    pub fn first_initial(&self) -> Option<char> {
        normalize_name_part(&self.first).chars().next()
    }

    pub fn middle_initial(&self) -> Option<char> {
        normalize_name_part(&self.middle).chars().next()
    }

    pub fn normalized_last(&self) -> String {
        normalize_name_part(&self.last)
    }

    /// Full first name, if more than an initial is known.
    pub fn full_first(&self) -> Option<String> {
        let first = normalize_name_part(&self.first);
        (first.chars().count() > 1).then_some(first)
    }

    /// Lowercase last name + first initial, the key used for name equality.
    pub fn normalized_key(&self) -> String {
        match self.first_initial() {
            Some(initial) => format!("{} {}", self.normalized_last(), initial),
            None => self.normalized_last(),
        }
    }

    /// Same last name and, when both sides have one, same first initial.
    pub fn matches(&self, other: &AuthorName) -> bool {
        let last = self.normalized_last();
        if last.is_empty() || last != other.normalized_last() {
            return false;
        }
        match (self.first_initial(), other.first_initial()) {
            (Some(a), Some(b)) => a == b,
            _ => true,
        }
    }
}

impl fmt::Display for AuthorName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let parts = [&self.first, &self.middle, &self.last];
        let mut first = true;
        for part in parts.iter().filter(|p| !p.is_empty()) {
            if !first {
                write!(f, " ")?;
            }
            write!(f, "{}", part)?;
            first = false;
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    pub name: AuthorName,
    #[serde(default)]
    pub affiliation: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl Author {
    pub fn new(name: AuthorName) -> Self {
        Self {
            name,
            affiliation: None,
            email: None,
        }
    }

    pub fn with_affiliation(mut self, affiliation: impl Into<String>) -> Self {
        self.affiliation = Some(affiliation.into());
        self
    }

    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MeshHeading {
    pub descriptor: String,
    #[serde(default)]
    pub major_topic: bool,
}

impl MeshHeading {
    pub fn new(descriptor: impl Into<String>, major_topic: bool) -> Self {
        Self {
            descriptor: descriptor.into(),
            major_topic,
        }
    }
}

/// One candidate publication.
///
/// Cluster membership is not stored here; see [`crate::cluster::Partition`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub title: String,
    pub journal: String,
    pub publication_year: Option<i32>,
    pub mesh_headings: Vec<MeshHeading>,
    pub keywords: Vec<String>,
    pub coauthors: Vec<Author>,
    /// Affiliations from Scopus; `None` when no Scopus record exists.
    pub scopus_affiliations: Option<Vec<String>>,
    #[serde(default)]
    pub vectors: FieldVectors,
    pub completeness_score: f64,
}

impl Article {
    pub fn new(id: ArticleId) -> Self {
        Self {
            id,
            ..Self::default()
        }
    }

    /// The author of this article taken to be the target person.
    pub fn target_author(&self, target: &AuthorName) -> Option<&Author> {
        self.coauthors.iter().find(|author| author.name.matches(target))
    }

    /// Every non-empty author affiliation, in author order.
    pub fn affiliations(&self) -> impl Iterator<Item = &str> {
        self.coauthors
            .iter()
            .filter_map(|author| author.affiliation.as_deref())
            .filter(|aff| !aff.trim().is_empty())
    }

    /// Affiliation text attributed to the target author.
    /// Falls back to all affiliations when the target's own is missing,
    /// since older records carry a single affiliation for the whole byline.
    pub fn target_affiliation_text(&self, target: &AuthorName) -> String {
        if let Some(aff) = self
            .target_author(target)
            .and_then(|author| author.affiliation.as_deref())
            .filter(|aff| !aff.trim().is_empty())
        {
            return aff.to_string();
        }
        self.affiliations().collect::<Vec<_>>().join("; ")
    }

    /// Normalized descriptors flagged as major topics, deduplicated.
    pub fn major_descriptors(&self) -> AHashSet<String> {
        self.mesh_headings
            .iter()
            .filter(|heading| heading.major_topic)
            .map(|heading| heading.descriptor.trim().to_lowercase())
            .filter(|descriptor| !descriptor.is_empty())
            .collect()
    }

    /// Normalized coauthor name keys, the target author left out.
    pub fn coauthor_keys(&self, target: &AuthorName) -> AHashSet<String> {
        self.coauthors
            .iter()
            .filter(|author| !author.name.matches(target))
            .map(|author| author.name.normalized_key())
            .filter(|key| !key.is_empty())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_names() {
        assert_eq!(AuthorName::parse("Jane Doe"), AuthorName::new("Jane", "", "Doe"));
        assert_eq!(
            AuthorName::parse("Jane Q Public Doe"),
            AuthorName::new("Jane", "Q Public", "Doe")
        );
        assert_eq!(AuthorName::parse("Doe"), AuthorName::new("", "", "Doe"));
        assert_eq!(AuthorName::parse("  "), AuthorName::default());
    }

    #[test]
    fn name_matching_uses_last_and_initial() {
        let target = AuthorName::new("Jane", "", "Doe");
        assert!(AuthorName::new("J", "", "doe").matches(&target));
        assert!(AuthorName::new("", "", "Doe").matches(&target));
        assert!(!AuthorName::new("Kim", "", "Doe").matches(&target));
        assert!(!AuthorName::new("Jane", "", "Roe").matches(&target));
        assert_eq!(target.normalized_key(), "doe j");
        assert_eq!(target.to_string(), "Jane Doe");
    }

    #[test]
    fn target_affiliation_falls_back_to_byline() {
        let target = AuthorName::new("Jane", "", "Doe");
        let mut article = Article::new(1);
        article.coauthors = vec![
            Author::new(AuthorName::new("Al", "", "Smith")).with_affiliation("Mayo Clinic"),
            Author::new(AuthorName::new("Jane", "", "Doe")),
        ];
        assert_eq!(article.target_affiliation_text(&target), "Mayo Clinic");

        article.coauthors[1].affiliation = Some("Weill Cornell".into());
        assert_eq!(article.target_affiliation_text(&target), "Weill Cornell");
    }

    #[test]
    fn coauthor_keys_skip_target() {
        let target = AuthorName::new("Jane", "", "Doe");
        let mut article = Article::new(1);
        article.coauthors = vec![
            Author::new(AuthorName::new("Jane", "", "Doe")),
            Author::new(AuthorName::new("Al", "B", "Smith")),
        ];
        let keys = article.coauthor_keys(&target);
        assert_eq!(keys.len(), 1);
        assert!(keys.contains("smith a"));
    }

    #[test]
    fn major_descriptors_only() {
        let mut article = Article::new(1);
        article.mesh_headings = vec![
            MeshHeading::new("Neoplasms", true),
            MeshHeading::new("Humans", false),
            MeshHeading::new(" neoplasms ", true),
        ];
        let majors = article.major_descriptors();
        assert_eq!(majors.len(), 1);
        assert!(majors.contains("neoplasms"));
    }
}
