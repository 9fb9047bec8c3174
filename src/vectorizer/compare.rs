use crate::vectorizer::{FieldVectors, TermVector, VectorField};

/// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||), 0 against the zero vector
#[inline]
pub fn cosine_similarity(v1: &TermVector, v2: &TermVector) -> f64 {
    v1.cosine_similarity(v2)
}

#[inline]
pub fn field_similarity(a: &FieldVectors, b: &FieldVectors, field: VectorField) -> f64 {
    cosine_similarity(a.get(field), b.get(field))
}

/// Mean of the per-field similarities.
pub fn aggregate_similarity(a: &FieldVectors, b: &FieldVectors) -> f64 {
    let sum: f64 = VectorField::ALL
        .iter()
        .map(|&field| field_similarity(a, b, field))
        .sum();
    sum / VectorField::ALL.len() as f64
}
