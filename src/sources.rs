//! Collaborators that supply run input, and an in-memory implementation
//! backed by a JSON bundle.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{DisambiguationError, Result};
use crate::evidence::MeshCountMap;
use crate::model::article::ArticleId;
use crate::model::identity::{DegreeRecord, Identity};
use crate::model::translate::{RawArticle, ScopusRecord};
use crate::utils::normalizer::normalize_name_part;

/// Candidate articles retrieved by name search.
pub trait ArticleSource: Send + Sync {
    fn fetch_candidate_articles(
        &self,
        last_name: &str,
        first_initial: Option<char>,
        identity_key: &str,
    ) -> Result<Vec<RawArticle>>;

    /// Scopus records for the given articles; none by default.
    fn fetch_scopus_records(&self, _pmids: &[ArticleId]) -> Result<Vec<ScopusRecord>> {
        Ok(Vec::new())
    }
}

pub trait GoldStandardStore: Send + Sync {
    fn lookup_gold_standard_pmids(&self, identity_key: &str) -> Result<Vec<ArticleId>>;
}

pub trait DegreeStore: Send + Sync {
    fn lookup_identity_degree_record(&self, identity_key: &str) -> Result<Option<DegreeRecord>>;
}

/// Everything one run needs, as stored on disk.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RunBundle {
    pub identities: Vec<Identity>,
    pub articles: Vec<RawArticle>,
    pub scopus: Vec<ScopusRecord>,
    /// identity key -> gold-standard pmids
    pub gold_standard: Vec<GoldStandardEntry>,
    pub degrees: Vec<DegreeEntry>,
    pub global_mesh_counts: Option<MeshCountMap>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GoldStandardEntry {
    pub identity_key: String,
    pub pmids: Vec<ArticleId>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DegreeEntry {
    pub identity_key: String,
    pub degrees: DegreeRecord,
}

/// All collaborators answered from one loaded [`RunBundle`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryStore {
    bundle: RunBundle,
}

impl InMemoryStore {
    pub fn new(bundle: RunBundle) -> Self {
        Self { bundle }
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        Ok(Self::new(serde_json::from_str(json)?))
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    pub fn identities(&self) -> &[Identity] {
        &self.bundle.identities
    }

    pub fn identity(&self, key: &str) -> Result<&Identity> {
        self.bundle
            .identities
            .iter()
            .find(|identity| identity.key == key)
            .ok_or_else(|| DisambiguationError::UnknownIdentity(key.to_string()))
    }

    pub fn global_mesh_counts(&self) -> Option<&MeshCountMap> {
        self.bundle.global_mesh_counts.as_ref()
    }
}

impl ArticleSource for InMemoryStore {
    /// Articles with an author whose last name matches and whose first
    /// initial, when both are known, agrees.
    fn fetch_candidate_articles(
        &self,
        last_name: &str,
        first_initial: Option<char>,
        _identity_key: &str,
    ) -> Result<Vec<RawArticle>> {
        let last_name = normalize_name_part(last_name);
        let first_initial = first_initial.and_then(|c| c.to_lowercase().next());
        let matches = |raw: &RawArticle| {
            raw.authors.iter().any(|author| {
                let last_ok = author
                    .last_name
                    .as_deref()
                    .is_some_and(|last| normalize_name_part(last) == last_name);
                let initial = author
                    .first_name
                    .as_deref()
                    .and_then(|first| normalize_name_part(first).chars().next());
                let initial_ok = match (first_initial, initial) {
                    (Some(a), Some(b)) => a == b,
                    _ => true,
                };
                last_ok && initial_ok
            })
        };
        Ok(self.bundle.articles.iter().filter(|raw| matches(raw)).cloned().collect())
    }

    fn fetch_scopus_records(&self, pmids: &[ArticleId]) -> Result<Vec<ScopusRecord>> {
        Ok(self
            .bundle
            .scopus
            .iter()
            .filter(|record| pmids.contains(&record.pmid))
            .cloned()
            .collect())
    }
}

impl GoldStandardStore for InMemoryStore {
    fn lookup_gold_standard_pmids(&self, identity_key: &str) -> Result<Vec<ArticleId>> {
        Ok(self
            .bundle
            .gold_standard
            .iter()
            .filter(|entry| entry.identity_key == identity_key)
            .flat_map(|entry| entry.pmids.iter().copied())
            .collect())
    }
}

impl DegreeStore for InMemoryStore {
    fn lookup_identity_degree_record(&self, identity_key: &str) -> Result<Option<DegreeRecord>> {
        Ok(self
            .bundle
            .degrees
            .iter()
            .find(|entry| entry.identity_key == identity_key)
            .map(|entry| entry.degrees))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BUNDLE: &str = r#"{
        "identities": [{ "key": "jdoe", "name": { "first": "Jane", "last": "Doe" } }],
        "articles": [
            { "pmid": 1, "authors": [{ "first_name": "Jane", "last_name": "Doe" }] },
            { "pmid": 2, "authors": [{ "first_name": "Kim", "last_name": "Doe" }] },
            { "pmid": 3, "authors": [{ "first_name": "J", "last_name": "Roe" }] }
        ],
        "scopus": [{ "pmid": 1, "affiliations": ["Weill Cornell"] }],
        "gold_standard": [{ "identity_key": "jdoe", "pmids": [1] }],
        "degrees": [{ "identity_key": "jdoe", "degrees": { "doctoral_year": 2001 } }]
    }"#;

    #[test]
    fn in_memory_store_answers_all_lookups() {
        let store = InMemoryStore::from_json_str(BUNDLE).unwrap();
        let identity = store.identity("jdoe").unwrap();
        assert_eq!(identity.name.last, "Doe");
        assert!(matches!(
            store.identity("nobody"),
            Err(DisambiguationError::UnknownIdentity(_))
        ));

        let candidates = store.fetch_candidate_articles("doe", Some('J'), "jdoe").unwrap();
        assert_eq!(candidates.iter().map(|a| a.pmid).collect::<Vec<_>>(), vec![Some(1)]);
        let all_does = store.fetch_candidate_articles("Doe", None, "jdoe").unwrap();
        assert_eq!(all_does.len(), 2);

        assert_eq!(store.fetch_scopus_records(&[1, 2]).unwrap().len(), 1);
        assert_eq!(store.lookup_gold_standard_pmids("jdoe").unwrap(), vec![1]);
        assert_eq!(
            store
                .lookup_identity_degree_record("jdoe")
                .unwrap()
                .and_then(|d| d.terminal_year()),
            Some(2001)
        );
        assert!(store.global_mesh_counts().is_none());
    }
}
