use ahash::RandomState;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::vectorizer::term::TermFrequency;

/// Corpus-wide term dictionary, built once per run.
///
/// Each term owns a stable dimension index (its insertion position), so
/// vectors of different articles compare by term identity.
/// It also keeps, per term, the number of field documents containing it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermDictionary {
    /// term -> number of field documents containing the term
    term_counts: IndexMap<Box<str>, u64, RandomState>,
}

impl TermDictionary {
    /// Create a new instance
    pub fn new() -> Self {
        Self {
            term_counts: IndexMap::with_hasher(RandomState::new()),
        }
    }

    /// Build from field documents.
    /// Terms of one document are inserted in dictionary order so the
    /// resulting indices do not depend on hash iteration order.
    pub fn build<'a, I>(docs: I) -> Self
    where
        I: IntoIterator<Item = &'a TermFrequency>,
    {
        let mut dict = Self::new();
        for doc in docs {
            dict.add_freq(doc);
        }
        dict
    }

    /// Add one document's terms
    pub fn add_set<T>(&mut self, terms: &[T])
    where
        T: AsRef<str>,
    {
        for term in terms {
            *self.term_counts.entry(term.as_ref().into()).or_insert(0) += 1;
        }
    }

    pub fn add_freq(&mut self, freq: &TermFrequency) {
        let terms: Vec<&str> = freq
            .sorted_dict_order_vector()
            .into_iter()
            .map(|(term, _)| term)
            .collect();
        self.add_set(&terms);
    }

    /// Dimension index of a term
    #[inline]
    pub fn index_of(&self, term: &str) -> Option<u32> {
        self.term_counts.get_index_of(term).map(|idx| idx as u32)
    }

    /// Number of field documents containing the term
    #[inline]
    pub fn term_count(&self, term: &str) -> u64 {
        self.term_counts.get(term).copied().unwrap_or(0)
    }

    /// Number of unique terms
    #[inline]
    pub fn vocab_size(&self) -> usize {
        self.term_counts.len()
    }

    /// Terms in dimension order
    pub fn terms(&self) -> impl Iterator<Item = &str> {
        self.term_counts.keys().map(|term| term.as_ref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indices_are_stable_and_counts_per_document() {
        let d1 = TermFrequency::from(&["cancer", "cell", "cell"][..]);
        let d2 = TermFrequency::from(&["cell", "immunology"][..]);
        let dict = TermDictionary::build([&d1, &d2]);

        assert_eq!(dict.vocab_size(), 3);
        assert_eq!(dict.index_of("cancer"), Some(0));
        assert_eq!(dict.index_of("cell"), Some(1));
        assert_eq!(dict.index_of("immunology"), Some(2));
        assert_eq!(dict.term_count("cell"), 2);
        assert_eq!(dict.index_of("missing"), None);
        assert_eq!(dict.terms().collect::<Vec<_>>(), vec!["cancer", "cell", "immunology"]);
    }
}
