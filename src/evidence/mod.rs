//! Evidence strategies.
//!
//! Each strategy compares one article against the target identity along
//! one dimension and emits a [`FeatureValue`]. Strategies never fail; a
//! value that cannot be determined is [`FeatureValue::Absent`].

pub mod affiliation;
pub mod citizenship;
pub mod degree;
pub mod department;
pub mod email;
pub mod internship;
pub mod journal;
pub mod keyword;
pub mod known_relationship;
pub mod mesh;
pub mod name;
pub mod scopus;

use ahash::AHashSet;
use indexmap::IndexMap;
use rayon::prelude::*;

use crate::config::EvidenceConfig;
use crate::model::article::{Article, ArticleId};
use crate::model::feature::{Feature, FeatureValue};
use crate::model::identity::Identity;
use crate::vectorizer::TermVector;

pub use affiliation::InstitutionAffiliationStrategy;
pub use citizenship::CitizenshipStrategy;
pub use degree::DegreeYearStrategy;
pub use department::DepartmentStrategy;
pub use email::EmailStrategy;
pub use internship::InternshipResidencyStrategy;
pub use journal::JournalStrategy;
pub use keyword::KeywordSimilarityStrategy;
pub use known_relationship::KnownRelationshipStrategy;
pub use mesh::{MeshCountMap, MeshMajorStrategy};
pub use name::NameStrategy;
pub use scopus::ScopusAffiliationStrategy;

/// The closed set of evidence strategies.
#[derive(Debug, Clone)]
pub enum EvidenceStrategy {
    /// identity email on an author or in affiliation text
    Email(EmailStrategy),
    /// identity department in the target author's affiliation
    Department(DepartmentStrategy),
    /// coauthor is a known collaborator
    KnownRelationship(KnownRelationshipStrategy),
    /// home institution alias in the affiliation
    InstitutionAffiliation(InstitutionAffiliationStrategy),
    /// Jaro-Winkler against Scopus affiliations
    ScopusAffiliation(ScopusAffiliationStrategy),
    /// journal seen in the identity's history
    Journal(JournalStrategy),
    /// major MeSH overlap with attributed articles
    MeshMajor(MeshMajorStrategy),
    /// publication year vs terminal degree year
    DegreeYear(DegreeYearStrategy),
    Citizenship(CitizenshipStrategy),
    InternshipResidency(InternshipResidencyStrategy),
    Name(NameStrategy),
    KeywordSimilarity(KeywordSimilarityStrategy),
}

impl EvidenceStrategy {
    /// Feature name written by this strategy.
    pub fn name(&self) -> &'static str {
        match self {
            EvidenceStrategy::Email(_) => EmailStrategy::NAME,
            EvidenceStrategy::Department(_) => DepartmentStrategy::NAME,
            EvidenceStrategy::KnownRelationship(_) => KnownRelationshipStrategy::NAME,
            EvidenceStrategy::InstitutionAffiliation(_) => InstitutionAffiliationStrategy::NAME,
            EvidenceStrategy::ScopusAffiliation(_) => ScopusAffiliationStrategy::NAME,
            EvidenceStrategy::Journal(_) => JournalStrategy::NAME,
            EvidenceStrategy::MeshMajor(_) => MeshMajorStrategy::NAME,
            EvidenceStrategy::DegreeYear(_) => DegreeYearStrategy::NAME,
            EvidenceStrategy::Citizenship(_) => CitizenshipStrategy::NAME,
            EvidenceStrategy::InternshipResidency(_) => InternshipResidencyStrategy::NAME,
            EvidenceStrategy::Name(_) => NameStrategy::NAME,
            EvidenceStrategy::KeywordSimilarity(_) => KeywordSimilarityStrategy::NAME,
        }
    }

    pub fn score(&self, article: &Article, identity: &Identity) -> FeatureValue {
        match self {
            EvidenceStrategy::Email(s) => s.score(article, identity),
            EvidenceStrategy::Department(s) => s.score(article, identity),
            EvidenceStrategy::KnownRelationship(s) => s.score(article, identity),
            EvidenceStrategy::InstitutionAffiliation(s) => s.score(article, identity),
            EvidenceStrategy::ScopusAffiliation(s) => s.score(article, identity),
            EvidenceStrategy::Journal(s) => s.score(article, identity),
            EvidenceStrategy::MeshMajor(s) => s.score(article, identity),
            EvidenceStrategy::DegreeYear(s) => s.score(article, identity),
            EvidenceStrategy::Citizenship(s) => s.score(article, identity),
            EvidenceStrategy::InternshipResidency(s) => s.score(article, identity),
            EvidenceStrategy::Name(s) => s.score(article, identity),
            EvidenceStrategy::KeywordSimilarity(s) => s.score(article, identity),
        }
    }
}

/// Ordered set of strategies. Feature columns follow registration order.
#[derive(Debug, Clone, Default)]
pub struct StrategyRegistry {
    strategies: Vec<EvidenceStrategy>,
}

impl StrategyRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every strategy that needs no prior selection, in reporting order.
    ///
    /// # Arguments
    /// * `config` - evidence settings
    /// * `keyword_reference` - keyword vector of the identity's self-article
    pub fn with_defaults(config: &EvidenceConfig, keyword_reference: TermVector) -> Self {
        let mut registry = Self::new();
        registry
            .register(EvidenceStrategy::Email(EmailStrategy))
            .register(EvidenceStrategy::Department(DepartmentStrategy))
            .register(EvidenceStrategy::KnownRelationship(KnownRelationshipStrategy))
            .register(EvidenceStrategy::InstitutionAffiliation(
                InstitutionAffiliationStrategy::new(config.institution_aliases.clone()),
            ))
            .register(EvidenceStrategy::ScopusAffiliation(ScopusAffiliationStrategy))
            .register(EvidenceStrategy::Journal(JournalStrategy))
            .register(EvidenceStrategy::DegreeYear(DegreeYearStrategy::new(
                config.degree_year_tolerance,
            )))
            .register(EvidenceStrategy::Citizenship(CitizenshipStrategy))
            .register(EvidenceStrategy::InternshipResidency(InternshipResidencyStrategy))
            .register(EvidenceStrategy::Name(NameStrategy))
            .register(EvidenceStrategy::KeywordSimilarity(KeywordSimilarityStrategy::new(
                keyword_reference,
            )));
        registry
    }

    /// Append a strategy. A strategy with an already registered name
    /// replaces the old one in place.
    pub fn register(&mut self, strategy: EvidenceStrategy) -> &mut Self {
        match self.strategies.iter().position(|s| s.name() == strategy.name()) {
            Some(pos) => self.strategies[pos] = strategy,
            None => self.strategies.push(strategy),
        }
        self
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(EvidenceStrategy::name)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.strategies.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.strategies.is_empty()
    }

    /// Run every strategy on one article.
    pub fn score_article(&self, article: &Article, identity: &Identity, gold_standard: bool) -> Feature {
        let values: IndexMap<String, FeatureValue> = self
            .strategies
            .iter()
            .map(|strategy| (strategy.name().to_string(), strategy.score(article, identity)))
            .collect();
        Feature::new(article.id, gold_standard, values)
    }

    /// One Feature per article, in article order. Articles are scored in parallel.
    pub fn populate_features(
        &self,
        articles: &[Article],
        identity: &Identity,
        gold: &AHashSet<ArticleId>,
    ) -> Vec<Feature> {
        articles
            .par_iter()
            .map(|article| self.score_article(article, identity, gold.contains(&article.id)))
            .collect()
    }
}
