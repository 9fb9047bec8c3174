use std::cmp::Ordering;

use num::Num;

use super::SparseVec;

impl<N> SparseVec<N>
where
    N: Num + Copy + Into<f64>,
{
    /// Dot product over the union of both index sets.
    /// d(a, b) = Σ(a_i * b_i)
    ///
    /// # Arguments
    /// * `other` - other vector
    #[inline]
    pub fn dot(&self, other: &Self) -> f64 {
        let mut a_it = self.raw_iter().fuse();
        let mut b_it = other.raw_iter().fuse();
        let mut a_next = a_it.next();
        let mut b_next = b_it.next();
        let mut dot = 0_f64;
        while let (Some((ia, va)), Some((ib, vb))) = (a_next, b_next) {
            match ia.cmp(&ib) {
                Ordering::Equal => {
                    dot += va.into() * vb.into();
                    a_next = a_it.next();
                    b_next = b_it.next();
                }
                Ordering::Less => a_next = a_it.next(),
                Ordering::Greater => b_next = b_it.next(),
            }
        }
        dot
    }

    /// ||a||^2 = Σ(a_i^2)
    #[inline]
    pub fn norm_sq(&self) -> f64 {
        self.values()
            .iter()
            .map(|&val| {
                let val: f64 = val.into();
                val * val
            })
            .sum()
    }

    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_sq().sqrt()
    }

    /// Cosine similarity
    /// cos(θ) = Σ(a_i * b_i) / (||a|| * ||b||)
    ///
    /// Returns 0.0 when either side is the zero vector.
    /// For non-negative weights the result lies in [0, 1].
    #[inline]
    pub fn cosine_similarity(&self, other: &Self) -> f64 {
        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        (self.dot(other) / (norm_a * norm_b)).clamp(0.0, 1.0)
    }
}

impl<N> SparseVec<N>
where
    N: Num + Copy,
{
    /// Element-wise sum a + b, merge-walking both index lists.
    /// Elements that cancel to zero are dropped.
    ///
    /// # Arguments
    /// * `other` - other vector
    pub fn sum_with(&self, other: &Self) -> Self {
        let mut out = Self::with_capacity(self.nnz().max(other.nnz()));
        let mut a_it = self.raw_iter().peekable();
        let mut b_it = other.raw_iter().peekable();
        loop {
            let (idx, val) = match (a_it.peek().copied(), b_it.peek().copied()) {
                (Some((ia, va)), Some((ib, vb))) => match ia.cmp(&ib) {
                    Ordering::Equal => {
                        a_it.next();
                        b_it.next();
                        (ia, va + vb)
                    }
                    Ordering::Less => {
                        a_it.next();
                        (ia, va)
                    }
                    Ordering::Greater => {
                        b_it.next();
                        (ib, vb)
                    }
                },
                (Some(a), None) => {
                    a_it.next();
                    a
                }
                (None, Some(b)) => {
                    b_it.next();
                    b
                }
                (None, None) => break,
            };
            if !val.is_zero() {
                out.push_sorted(idx, val);
            }
        }
        out
    }
}

impl SparseVec<f64> {
    /// L2-normalize in place.
    /// The zero vector is left unchanged.
    #[inline]
    pub fn normalize(&mut self) {
        let norm = self.norm();
        if norm == 0.0 || !norm.is_finite() {
            return;
        }
        self.values_mut().iter_mut().for_each(|val| *val /= norm);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vec_f64(pairs: &[(u32, f64)]) -> SparseVec<f64> {
        SparseVec::from_pairs(pairs.iter().copied())
    }

    #[test]
    fn dot_only_counts_shared_indices() {
        let a = vec_f64(&[(0, 1.0), (2, 2.0), (4, 3.0)]);
        let b = vec_f64(&[(1, 5.0), (2, 4.0), (4, 1.0)]);
        assert_eq!(a.dot(&b), 11.0);
        assert_eq!(a.dot(&b), b.dot(&a));
    }

    #[test]
    fn cosine_is_symmetric() {
        let a = vec_f64(&[(0, 0.3), (3, 1.7), (8, 0.2)]);
        let b = vec_f64(&[(0, 1.1), (8, 0.9), (9, 4.0)]);
        assert_eq!(a.cosine_similarity(&b), b.cosine_similarity(&a));
    }

    #[test]
    fn cosine_with_self_is_one() {
        let a = vec_f64(&[(1, 0.5), (2, 3.0), (7, 1.25)]);
        assert!((a.cosine_similarity(&a) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn cosine_with_zero_vector_is_zero() {
        let a = vec_f64(&[(1, 0.5)]);
        let zero = SparseVec::<f64>::new();
        assert_eq!(a.cosine_similarity(&zero), 0.0);
        assert_eq!(zero.cosine_similarity(&a), 0.0);
        assert_eq!(zero.cosine_similarity(&zero), 0.0);
    }

    #[test]
    fn normalize_gives_unit_norm() {
        let mut a = vec_f64(&[(0, 3.0), (1, 4.0)]);
        a.normalize();
        assert!((a.norm() - 1.0).abs() < 1e-12);
        assert_eq!(a.values(), &[0.6, 0.8]);
    }

    #[test]
    fn normalize_leaves_zero_vector() {
        let mut zero = SparseVec::<f64>::new();
        zero.normalize();
        assert!(zero.is_zero_vector());
    }

    #[test]
    fn sum_merges_both_index_lists() {
        let a = vec_f64(&[(0, 1.0), (2, 2.0), (5, -1.0)]);
        let b = vec_f64(&[(1, 3.0), (2, 0.5), (5, 1.0), (7, 4.0)]);
        let sum = a.sum_with(&b);
        assert_eq!(sum.indices(), &[0, 1, 2, 7]);
        assert_eq!(sum.values(), &[1.0, 3.0, 2.5, 4.0]);
        assert_eq!(SparseVec::<f64>::new().sum_with(&a), a);
    }

    #[test]
    fn integer_weights_convert_to_f64() {
        let a = SparseVec::from_pairs(vec![(0u32, 2u32), (1, 1)]);
        let b = SparseVec::from_pairs(vec![(0u32, 1u32)]);
        assert_eq!(a.dot(&b), 2.0);
        assert!((a.norm_sq() - 5.0).abs() < 1e-12);
    }
}
