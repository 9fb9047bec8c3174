use crate::model::article::Article;
use crate::utils::normalizer::{is_stop_word, tokens};
use crate::vectorizer::{term::TermFrequency, FieldTerms, VectorField};

/// Turns raw article text into per-field term counts.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// tokens shorter than this (in chars) are dropped
    pub min_len: usize,
    pub remove_stop_words: bool,
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self {
            min_len: 2,
            remove_stop_words: true,
        }
    }
}

impl Tokenizer {
    pub fn new(min_len: usize, remove_stop_words: bool) -> Self {
        Self {
            min_len,
            remove_stop_words,
        }
    }

    pub fn tokenize(&self, text: &str) -> Vec<String> {
        tokens(text)
            .filter(|tok| tok.chars().count() >= self.min_len)
            .filter(|tok| !(self.remove_stop_words && is_stop_word(tok)))
            .collect()
    }

    pub fn term_frequency<'a, I>(&self, texts: I) -> TermFrequency
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut freq = TermFrequency::new();
        for text in texts {
            freq.add_terms(&self.tokenize(text));
        }
        freq
    }

    /// Term counts for every tracked field of an article.
    ///
    /// - title: title words
    /// - journal: journal title words
    /// - affiliation: affiliation words of every author, plus Scopus affiliations
    /// - keyword: keywords and MeSH descriptor words
    pub fn field_terms(&self, article: &Article) -> FieldTerms {
        let mut terms = FieldTerms::default();
        *terms.get_mut(VectorField::Title) = self.term_frequency([article.title.as_str()]);
        *terms.get_mut(VectorField::Journal) = self.term_frequency([article.journal.as_str()]);

        let scopus = article.scopus_affiliations.iter().flatten().map(String::as_str);
        *terms.get_mut(VectorField::Affiliation) =
            self.term_frequency(article.affiliations().chain(scopus));

        let mesh = article
            .mesh_headings
            .iter()
            .map(|heading| heading.descriptor.as_str());
        *terms.get_mut(VectorField::Keyword) =
            self.term_frequency(article.keywords.iter().map(String::as_str).chain(mesh));
        terms
    }
}
