use std::collections::HashMap;

use ahash::RandomState;
use serde::{Deserialize, Serialize};

/// TermFrequency struct
/// Raw term counts for one (article, field) pair.
///
/// # Examples
/// ```
/// use author_disambiguation::TermFrequency;
/// let mut term_freq = TermFrequency::new();
/// term_freq.add_term("term1");
/// term_freq.add_term("term2");
/// term_freq.add_term("term1");
///
/// assert_eq!(term_freq.term_count("term1"), 2);
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub struct TermFrequency {
    term_count: HashMap<String, u64, RandomState>,
}

/// Implementation for adding terms
impl TermFrequency {
    /// Create a new TermFrequency
    pub fn new() -> Self {
        TermFrequency {
            term_count: HashMap::with_hasher(RandomState::new()),
        }
    }

    /// Add a term
    ///
    /// # Arguments
    /// * `term` - term to add
    #[inline]
    pub fn add_term(&mut self, term: &str) -> &mut Self {
        let count = self.term_count.entry(term.to_string()).or_insert(0);
        *count += 1;
        self
    }

    /// Add multiple terms
    ///
    /// # Arguments
    /// * `terms` - Slice of terms to add
    #[inline]
    pub fn add_terms<T>(&mut self, terms: &[T]) -> &mut Self
    where
        T: AsRef<str>,
    {
        for term in terms {
            self.add_term(term.as_ref());
        }
        self
    }
}

impl<T> From<&[T]> for TermFrequency
where
    T: AsRef<str>,
{
    fn from(terms: &[T]) -> Self {
        let mut tf = TermFrequency::new();
        tf.add_terms(terms);
        tf
    }
}

/// Implementation for retrieving information from TermFrequency
impl TermFrequency {
    /// Iterator over all terms and their counts (unordered)
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.term_count
            .iter()
            .map(|(term, &count)| (term.as_str(), count))
    }

    /// Occurrence count for a specific term, 0 when absent
    #[inline]
    pub fn term_count(&self, term: &str) -> u64 {
        *self.term_count.get(term).unwrap_or(&0)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.term_count.is_empty()
    }

    /// Terms sorted by dictionary order (ascending).
    /// Gives a stable iteration order regardless of the hasher.
    #[inline]
    pub fn sorted_dict_order_vector(&self) -> Vec<(&str, u64)> {
        let mut term_list: Vec<(&str, u64)> = self.iter().collect();
        term_list.sort_unstable_by(|a, b| a.0.cmp(b.0));
        term_list
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_accumulate() {
        let mut tf = TermFrequency::new();
        tf.add_terms(&["cell", "biology", "cell"]);
        assert_eq!(tf.term_count("cell"), 2);
        assert_eq!(tf.term_count("missing"), 0);
    }

    #[test]
    fn sorted_order_is_stable() {
        let tf = TermFrequency::from(&["zeta", "alpha", "mid", "alpha"][..]);
        assert_eq!(
            tf.sorted_dict_order_vector(),
            vec![("alpha", 2), ("mid", 1), ("zeta", 1)]
        );
        assert!(TermFrequency::new().is_empty());
    }
}
