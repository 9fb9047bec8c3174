pub mod compare;
pub mod dictionary;
pub mod term;
pub mod token;

use rayon::prelude::*;
use serde::{Deserialize, Serialize};

use crate::model::article::Article;
use crate::utils::math::vector::SparseVec;
use crate::vectorizer::{dictionary::TermDictionary, term::TermFrequency};

/// Weighted sparse vector of one (article, field) pair.
/// Dimensions are TermDictionary indices.
pub type TermVector = SparseVec<f64>;

/// Fields that get their own vector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VectorField {
    Title,
    Journal,
    Affiliation,
    Keyword,
}

impl VectorField {
    pub const ALL: [VectorField; 4] = [
        VectorField::Title,
        VectorField::Journal,
        VectorField::Affiliation,
        VectorField::Keyword,
    ];

    pub fn name(self) -> &'static str {
        match self {
            VectorField::Title => "title",
            VectorField::Journal => "journal",
            VectorField::Affiliation => "affiliation",
            VectorField::Keyword => "keyword",
        }
    }

    #[inline]
    fn slot(self) -> usize {
        self as usize
    }
}

/// One value per tracked field.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ByField<T>([T; 4]);

impl<T> ByField<T> {
    #[inline]
    pub fn get(&self, field: VectorField) -> &T {
        &self.0[field.slot()]
    }

    #[inline]
    pub fn get_mut(&mut self, field: VectorField) -> &mut T {
        &mut self.0[field.slot()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (VectorField, &T)> {
        VectorField::ALL.into_iter().zip(self.0.iter())
    }
}

pub type FieldTerms = ByField<TermFrequency>;
pub type FieldVectors = ByField<TermVector>;

/// Builds the per-field vectors of articles against one corpus dictionary.
///
/// The weight of a term is its raw frequency in the field, and every
/// vector is L2-normalized so cosine similarity reduces to a dot product.
#[derive(Debug, Clone, Copy)]
pub struct DocumentVectorModel<'d> {
    dictionary: &'d TermDictionary,
}

impl<'d> DocumentVectorModel<'d> {
    pub fn new(dictionary: &'d TermDictionary) -> Self {
        Self { dictionary }
    }

    pub fn dictionary(&self) -> &'d TermDictionary {
        self.dictionary
    }

    /// Normalized vector of one field. Terms missing from the dictionary are
    /// skipped; an empty field yields the zero vector.
    pub fn build_vector(&self, freq: &TermFrequency) -> TermVector {
        let mut vector = TermVector::from_pairs(freq.iter().filter_map(|(term, count)| {
            self.dictionary
                .index_of(term)
                .map(|idx| (idx, count as f64))
        }));
        vector.normalize();
        vector.shrink_to_fit();
        vector
    }

    pub fn vectors_for(&self, field_terms: &FieldTerms) -> FieldVectors {
        let mut vectors = FieldVectors::default();
        for (field, freq) in field_terms.iter() {
            *vectors.get_mut(field) = self.build_vector(freq);
        }
        vectors
    }

    /// Populate `article.vectors` from its field term counts.
    pub fn build_vectors(&self, article: &mut Article, field_terms: &FieldTerms) {
        article.vectors = self.vectors_for(field_terms);
    }

    /// Populate vectors of every article in parallel.
    /// `field_terms[i]` belongs to `articles[i]`.
    pub fn build_all(&self, articles: &mut [Article], field_terms: &[FieldTerms]) {
        debug_assert_eq!(articles.len(), field_terms.len());
        articles
            .par_iter_mut()
            .zip(field_terms.par_iter())
            .for_each(|(article, terms)| self.build_vectors(article, terms));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn freq(terms: &[&str]) -> TermFrequency {
        TermFrequency::from(terms)
    }

    #[test]
    fn vectors_are_unit_norm_and_non_negative() {
        let docs = [freq(&["cell", "cell", "tumor"]), freq(&["tumor", "immune"])];
        let dict = TermDictionary::build(docs.iter());
        let model = DocumentVectorModel::new(&dict);
        for doc in &docs {
            let v = model.build_vector(doc);
            assert!(v.values().iter().all(|w| *w >= 0.0));
            assert!((v.norm() - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn empty_field_is_zero_vector() {
        let dict = TermDictionary::build([&freq(&["cell"])]);
        let model = DocumentVectorModel::new(&dict);
        let v = model.build_vector(&TermFrequency::new());
        assert!(v.is_zero_vector());
    }

    #[test]
    fn unknown_terms_are_skipped() {
        let dict = TermDictionary::build([&freq(&["cell"])]);
        let model = DocumentVectorModel::new(&dict);
        let v = model.build_vector(&freq(&["cell", "unseen"]));
        assert_eq!(v.nnz(), 1);
        assert_eq!(v.get(0), 1.0);
    }

    #[test]
    fn build_all_fills_every_article() {
        let mut articles = vec![Article::new(1), Article::new(2)];
        let mut t1 = FieldTerms::default();
        *t1.get_mut(VectorField::Title) = freq(&["genome"]);
        let t2 = FieldTerms::default();
        let dict = TermDictionary::build([t1.get(VectorField::Title)]);
        DocumentVectorModel::new(&dict).build_all(&mut articles, &[t1, t2]);
        assert_eq!(articles[0].vectors.get(VectorField::Title).nnz(), 1);
        assert!(articles[1].vectors.get(VectorField::Title).is_zero_vector());
    }
}
