//! Raw input records to [`Article`]s.

use ahash::{AHashMap, AHashSet};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::model::article::{Article, ArticleId, Author, AuthorName, MeshHeading};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawAuthor {
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub affiliation: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawMeshHeading {
    pub descriptor: Option<String>,
    pub major_topic: bool,
}

/// Untranslated article record. Every field may be missing.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct RawArticle {
    pub pmid: Option<ArticleId>,
    pub title: Option<String>,
    pub journal: Option<String>,
    pub year: Option<i32>,
    pub mesh_headings: Vec<RawMeshHeading>,
    pub keywords: Vec<String>,
    pub authors: Vec<RawAuthor>,
}

/// Scopus affiliations of one article.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScopusRecord {
    pub pmid: ArticleId,
    pub affiliations: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct ArticleTranslator;

impl ArticleTranslator {
    pub fn new() -> Self {
        Self
    }

    /// Translate one record, merging its Scopus affiliations if any.
    /// Returns `None` for a record without a usable id.
    pub fn translate(&self, raw: &RawArticle, scopus: Option<&ScopusRecord>) -> Option<Article> {
        let id = match raw.pmid {
            Some(id) if id > 0 => id,
            _ => return None,
        };

        let mut article = Article::new(id);
        article.title = clean(raw.title.as_deref());
        article.journal = clean(raw.journal.as_deref());
        article.publication_year = raw.year.filter(|year| *year > 0);
        article.mesh_headings = raw
            .mesh_headings
            .iter()
            .filter_map(|heading| {
                let descriptor = clean(heading.descriptor.as_deref());
                (!descriptor.is_empty()).then(|| MeshHeading::new(descriptor, heading.major_topic))
            })
            .collect();
        article.keywords = raw
            .keywords
            .iter()
            .map(|kw| clean(Some(kw)))
            .filter(|kw| !kw.is_empty())
            .collect();
        article.coauthors = raw.authors.iter().filter_map(translate_author).collect();
        article.scopus_affiliations = scopus.map(|record| {
            record
                .affiliations
                .iter()
                .map(|aff| clean(Some(aff)))
                .filter(|aff| !aff.is_empty())
                .collect()
        });
        article.completeness_score = completeness(&article);
        Some(article)
    }

    /// Translate a batch. Records without an id and repeated ids are
    /// dropped with a warning; the first occurrence of an id wins.
    pub fn translate_all(&self, raw: &[RawArticle], scopus: &[ScopusRecord]) -> Vec<Article> {
        let scopus_by_id: AHashMap<ArticleId, &ScopusRecord> =
            scopus.iter().map(|record| (record.pmid, record)).collect();
        let mut seen = AHashSet::with_capacity(raw.len());
        let mut articles = Vec::with_capacity(raw.len());

        for (pos, record) in raw.iter().enumerate() {
            let scopus = record.pmid.and_then(|id| scopus_by_id.get(&id).copied());
            let Some(article) = self.translate(record, scopus) else {
                warn!(position = pos, "skipping article record without a pmid");
                continue;
            };
            if !seen.insert(article.id) {
                warn!(pmid = article.id, "skipping duplicate article record");
                continue;
            }
            articles.push(article);
        }
        debug!(
            input = raw.len(),
            translated = articles.len(),
            "translated article records"
        );
        articles
    }
}

fn clean(s: Option<&str>) -> String {
    s.map(|s| s.split_whitespace().collect::<Vec<_>>().join(" "))
        .unwrap_or_default()
}

fn translate_author(raw: &RawAuthor) -> Option<Author> {
    let last = clean(raw.last_name.as_deref());
    if last.is_empty() {
        return None;
    }
    let name = AuthorName::new(
        clean(raw.first_name.as_deref()),
        clean(raw.middle_name.as_deref()),
        last,
    );
    let mut author = Author::new(name);
    author.affiliation = Some(clean(raw.affiliation.as_deref())).filter(|s| !s.is_empty());
    author.email = Some(clean(raw.email.as_deref()).to_lowercase()).filter(|s| !s.is_empty());
    Some(author)
}

/// Number of populated fields. Fixes the order articles are clustered in.
fn completeness(article: &Article) -> f64 {
    let populated = [
        !article.title.is_empty(),
        !article.journal.is_empty(),
        article.publication_year.is_some(),
        !article.mesh_headings.is_empty(),
        !article.keywords.is_empty(),
        !article.coauthors.is_empty(),
        article.affiliations().next().is_some(),
        article
            .scopus_affiliations
            .as_ref()
            .is_some_and(|affs| !affs.is_empty()),
    ];
    populated.iter().filter(|p| **p).count() as f64
}
