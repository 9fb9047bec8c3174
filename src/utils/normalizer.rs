//! Text normalization shared by tokenization and the evidence strategies.

use ahash::AHashSet;

/// Words that never carry identifying signal in titles or affiliations.
pub const STOP_WORDS: &[&str] = &[
    "a", "an", "and", "are", "as", "at", "be", "by", "for", "from", "in", "into", "is", "it",
    "of", "on", "or", "that", "the", "to", "with", "via", "its", "their", "this", "these",
];

/// Affiliation words that describe the unit type rather than the unit.
const UNIT_WORDS: &[&str] = &["department", "dept", "division", "div", "program", "section", "unit"];

#[inline]
pub fn is_stop_word(token: &str) -> bool {
    STOP_WORDS.contains(&token)
}

/// Lowercase and collapse whitespace.
pub fn normalize_text(s: &str) -> String {
    s.to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Split on anything that is not alphanumeric, lowercased, empty pieces dropped.
pub fn tokens(s: &str) -> impl Iterator<Item = String> + '_ {
    s.split(|c: char| !c.is_alphanumeric())
        .filter(|piece| !piece.is_empty())
        .map(|piece| piece.to_lowercase())
}

pub fn token_set(s: &str) -> AHashSet<String> {
    tokens(s).collect()
}

/// Tokens of a phrase that carry meaning for matching (stop and unit words removed).
pub fn significant_tokens(s: &str) -> Vec<String> {
    tokens(s)
        .filter(|tok| !is_stop_word(tok) && !UNIT_WORDS.contains(&tok.as_str()))
        .collect()
}

/// True when the text contains a unit word ("Department", "Div.", ...).
pub fn names_unit(s: &str) -> bool {
    tokens(s).any(|tok| UNIT_WORDS.contains(&tok.as_str()))
}

/// True when every significant token of `phrase` occurs in `haystack`.
/// A phrase without significant tokens never matches.
pub fn contains_phrase(haystack: &AHashSet<String>, phrase: &str) -> bool {
    let needed = significant_tokens(phrase);
    !needed.is_empty() && needed.iter().all(|tok| haystack.contains(tok))
}

/// Lowercase letters and digits only; used for name parts.
pub fn normalize_name_part(s: &str) -> String {
    s.chars()
        .filter(|c| c.is_alphanumeric())
        .flat_map(char::to_lowercase)
        .collect()
}

/// Jaccard index of two token sets, 0.0 when both are empty.
pub fn token_jaccard(a: &AHashSet<String>, b: &AHashSet<String>) -> f64 {
    let union = a.union(b).count();
    if union == 0 {
        return 0.0;
    }
    a.intersection(b).count() as f64 / union as f64
}
