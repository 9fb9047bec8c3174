/// This crate attributes scholarly articles to a claimed author identity.
pub mod analysis;
pub mod cluster;
pub mod config;
pub mod engine;
pub mod error;
pub mod evidence;
pub mod model;
pub mod report;
pub mod sources;
pub mod utils;
pub mod vectorizer;

/// Disambiguation Engine
/// The top-level struct of this crate. It runs one identity end to end:
/// translation, document vectors, evidence, clustering, selection, the
/// MeSH recall pass, and evaluation against the gold standard.
///
/// The configuration is validated when the engine is created, so a run
/// never starts with an unusable threshold or weight.
///
/// # Serialization
/// The run output (`EngineOutput`) is serializable, and can be stored as a
/// CBOR snapshot.
pub use engine::{Engine, EngineOutput, EngineParameters};

/// Engine configuration
/// Clustering thresholds and weights, selection threshold and weights,
/// MeSH settings and evidence settings. Loaded from TOML; every key has a
/// default.
pub use config::EngineConfig;

/// Error type and `Result` alias used across the crate.
pub use error::{DisambiguationError, Result};

/// Core data model
/// - `Article`: one candidate publication
/// - `Identity`: the target author's claims
/// - `Feature` / `FeatureValue`: evidence outputs for one article
pub use model::{
    article::{Article, ArticleId, Author, AuthorName, MeshHeading},
    feature::{Feature, FeatureValue},
    identity::{DegreeRecord, Identity},
};

/// Evidence strategies and their ordered registry.
pub use evidence::{EvidenceStrategy, MeshCountMap, MeshMajorStrategy, StrategyRegistry};

/// Clustering
/// - `Clusterer`: greedy deterministic clustering into a `Partition`
/// - `ClusterSelector`: evidence-based selection and the MeSH recall pass
pub use cluster::{
    selector::{ClusterSelector, Selection},
    Cluster, ClusterId, Clusterer, Partition,
};

/// Precision / recall against a gold standard.
pub use analysis::Analysis;

/// Term Frequency structure
/// Counts term occurrences within one field of one article.
/// It is the input of the corpus dictionary and of the document vectors.
pub use vectorizer::term::TermFrequency;

/// Document vectors
/// - `TermDictionary`: corpus-wide term -> dimension index
/// - `DocumentVectorModel`: per-field normalized vectors of articles
pub use vectorizer::{dictionary::TermDictionary, DocumentVectorModel, TermVector, VectorField};
