//! One disambiguation run for one identity.

use std::collections::BTreeMap;

use ahash::AHashSet;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{info, info_span, warn};

use crate::analysis::{assign_gold_standard, Analysis};
use crate::cluster::selector::{ClusterSelector, Selection};
use crate::cluster::{ClusterId, Clusterer, Partition};
use crate::config::EngineConfig;
use crate::error::Result;
use crate::evidence::{EvidenceStrategy, MeshCountMap, StrategyRegistry};
use crate::model::article::{Article, ArticleId};
use crate::model::feature::Feature;
use crate::model::identity::Identity;
use crate::model::translate::{ArticleTranslator, RawArticle, ScopusRecord};
use crate::sources::{ArticleSource, DegreeStore, GoldStandardStore};
use crate::vectorizer::dictionary::TermDictionary;
use crate::vectorizer::token::Tokenizer;
use crate::vectorizer::{DocumentVectorModel, FieldTerms, VectorField};

/// Input of one run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EngineParameters {
    pub identity: Identity,
    pub articles: Vec<RawArticle>,
    pub scopus: Vec<ScopusRecord>,
    pub gold_standard: Vec<ArticleId>,
    /// corpus-wide major MeSH counts; without it the MeSH pass is skipped
    pub global_mesh_counts: Option<MeshCountMap>,
}

impl EngineParameters {
    /// Gather run input for `identity` from the collaborators.
    /// A degree record from the store replaces the identity's own.
    pub fn gather<S>(store: &S, identity: Identity, global_mesh_counts: Option<MeshCountMap>) -> Result<Self>
    where
        S: ArticleSource + GoldStandardStore + DegreeStore,
    {
        let identity = match store.lookup_identity_degree_record(&identity.key)? {
            Some(degrees) => identity.with_degree_record(degrees),
            None => identity,
        };
        let articles = store.fetch_candidate_articles(
            &identity.name.last,
            identity.name.first_initial(),
            &identity.key,
        )?;
        let pmids: Vec<ArticleId> = articles.iter().filter_map(|raw| raw.pmid).collect();
        let scopus = store.fetch_scopus_records(&pmids)?;
        let gold_standard = store.lookup_gold_standard_pmids(&identity.key)?;
        Ok(Self {
            identity,
            articles,
            scopus,
            gold_standard,
            global_mesh_counts,
        })
    }
}

/// Translated and vectorized articles with their evidence.
#[derive(Debug, Clone)]
pub struct GeneratedFeatures {
    pub articles: Vec<Article>,
    pub dictionary: TermDictionary,
    pub features: Vec<Feature>,
    pub registry: StrategyRegistry,
}

/// Result of one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineOutput {
    pub identity_key: String,
    pub articles: Vec<Article>,
    pub dictionary: TermDictionary,
    pub partition: Partition,
    pub selection: Selection,
    pub selected_article_ids: Vec<ArticleId>,
    pub features: Vec<Feature>,
    pub analysis: Analysis,
    pub selected_cluster_mesh_counts: BTreeMap<ClusterId, MeshCountMap>,
}

impl EngineOutput {
    pub fn to_cbor(&self) -> Result<Vec<u8>> {
        Ok(serde_cbor::to_vec(self)?)
    }

    pub fn from_cbor(bytes: &[u8]) -> Result<Self> {
        Ok(serde_cbor::from_slice(bytes)?)
    }
}

#[derive(Debug, Clone)]
pub struct Engine {
    config: EngineConfig,
    tokenizer: Tokenizer,
    translator: ArticleTranslator,
    clusterer: Clusterer,
    selector: ClusterSelector,
}

impl Engine {
    /// Validates the configuration before anything runs.
    pub fn new(config: EngineConfig) -> Result<Self> {
        config.validate()?;
        let clusterer = Clusterer::from_config(&config.clustering)?;
        let selector = ClusterSelector::from_config(&config.selection)?;
        Ok(Self {
            config,
            tokenizer: Tokenizer::default(),
            translator: ArticleTranslator::new(),
            clusterer,
            selector,
        })
    }

    pub fn with_tokenizer(mut self, tokenizer: Tokenizer) -> Self {
        self.tokenizer = tokenizer;
        self
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Translate, vectorize and score every candidate.
    pub fn generate_features(&self, params: &EngineParameters) -> GeneratedFeatures {
        let identity = &params.identity;
        let mut articles = self.translator.translate_all(&params.articles, &params.scopus);

        let terms: Vec<FieldTerms> = articles
            .par_iter()
            .map(|article| self.tokenizer.field_terms(article))
            .collect();
        let self_terms = self.tokenizer.field_terms(&identity.self_article());

        let mut dictionary = TermDictionary::new();
        for field_terms in terms.iter().chain(std::iter::once(&self_terms)) {
            for (_, freq) in field_terms.iter() {
                dictionary.add_freq(freq);
            }
        }

        let model = DocumentVectorModel::new(&dictionary);
        model.build_all(&mut articles, &terms);
        let self_vectors = model.vectors_for(&self_terms);
        info!(
            articles = articles.len(),
            vocabulary = dictionary.vocab_size(),
            "document vectors built"
        );

        let registry = StrategyRegistry::with_defaults(
            &self.config.evidence,
            self_vectors.get(VectorField::Keyword).clone(),
        );
        let gold: AHashSet<ArticleId> = params.gold_standard.iter().copied().collect();
        let features = registry.populate_features(&articles, identity, &gold);

        GeneratedFeatures {
            articles,
            dictionary,
            features,
            registry,
        }
    }

    /// Full pipeline: features, clustering, selection, MeSH pass, analysis.
    pub fn run(&self, params: &EngineParameters) -> Result<EngineOutput> {
        let identity = &params.identity;
        let _span = info_span!("run", identity = %identity.key).entered();

        let GeneratedFeatures {
            articles,
            dictionary,
            mut features,
            mut registry,
        } = self.generate_features(params);

        let partition = self.clusterer.cluster(&articles, identity);
        let mut selection = self.selector.select_clusters(&partition, &features);

        match params.global_mesh_counts.as_ref() {
            Some(global) => {
                let mesh = self
                    .selector
                    .mesh_strategy(&partition, &articles, &selection, global);
                self.selector
                    .handle_non_selected_clusters(&mesh, &partition, &articles, &mut selection);
                if !mesh.is_empty() {
                    registry.register(EvidenceStrategy::MeshMajor(mesh));
                    let gold: AHashSet<ArticleId> = params.gold_standard.iter().copied().collect();
                    features = registry.populate_features(&articles, identity, &gold);
                }
            }
            None => warn!("no global mesh counts given, skipping mesh recall pass"),
        }

        let selected_article_ids = selection.selected_article_ids(&partition);
        let candidates: Vec<ArticleId> = articles.iter().map(|a| a.id).collect();
        let analysis = Analysis::analyze(&selected_article_ids, &params.gold_standard, &candidates);
        let features = assign_gold_standard(&features, &params.gold_standard);
        let selected_cluster_mesh_counts =
            self.selector
                .selected_cluster_mesh_counts(&partition, &articles, &selection);

        info!(
            selected = selected_article_ids.len(),
            precision = analysis.precision,
            recall = analysis.recall,
            "run finished"
        );

        Ok(EngineOutput {
            identity_key: identity.key.clone(),
            articles,
            dictionary,
            partition,
            selection,
            selected_article_ids,
            features,
            analysis,
            selected_cluster_mesh_counts,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::article::AuthorName;
    use crate::model::translate::RawAuthor;

    fn raw(pmid: ArticleId, coauthor: &str) -> RawArticle {
        RawArticle {
            pmid: Some(pmid),
            title: Some("Lymphoma genomics".into()),
            journal: Some("Blood".into()),
            authors: vec![
                RawAuthor {
                    first_name: Some("Jane".into()),
                    last_name: Some("Doe".into()),
                    email: Some("jdoe@med.cornell.edu".into()),
                    ..RawAuthor::default()
                },
                RawAuthor {
                    first_name: Some(coauthor.into()),
                    last_name: Some("Smith".into()),
                    ..RawAuthor::default()
                },
            ],
            ..RawArticle::default()
        }
    }

    fn params() -> EngineParameters {
        let mut identity = Identity::new("jdoe", AuthorName::new("Jane", "", "Doe"));
        identity.email = Some("jdoe@med.cornell.edu".into());
        EngineParameters {
            identity,
            articles: vec![raw(1, "Al"), raw(2, "Al")],
            gold_standard: vec![1, 2],
            ..EngineParameters::default()
        }
    }

    #[test]
    fn invalid_config_fails_fast() {
        let mut config = EngineConfig::default();
        config.clustering.sim_threshold1 = -1.0;
        assert!(Engine::new(config).is_err());
    }

    #[test]
    fn run_selects_and_snapshots() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let output = engine.run(&params()).unwrap();
        assert_eq!(output.partition.len(), 1);
        assert_eq!(output.selected_article_ids, vec![1, 2]);
        assert_eq!(output.analysis.precision, 1.0);
        assert_eq!(output.analysis.recall, 1.0);
        assert!(output.features.iter().all(Feature::is_gold_standard));

        let bytes = output.to_cbor().unwrap();
        let back = EngineOutput::from_cbor(&bytes).unwrap();
        assert_eq!(back.selected_article_ids, output.selected_article_ids);
        assert_eq!(back.analysis, output.analysis);
    }

    #[test]
    fn empty_input_is_an_empty_run() {
        let engine = Engine::new(EngineConfig::default()).unwrap();
        let mut params = params();
        params.articles.clear();
        let output = engine.run(&params).unwrap();
        assert!(output.partition.is_empty());
        assert!(output.selected_article_ids.is_empty());
        assert_eq!(output.analysis.precision, 0.0);
        assert_eq!(output.analysis.recall, 0.0);
    }
}
