pub mod math;

use num::Num;
use serde::{Deserialize, Serialize};

/// SparseVec is a sparse vector that only stores non-zero elements.
/// It holds `inds` and `vals` side by side (SoA):
/// `inds` keeps the dimension of each element,
/// `vals` keeps the value of each element.
///
/// Elements are guaranteed to be sorted by ascending index,
/// and no index appears twice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SparseVec<N>
where
    N: Num + Copy,
{
    inds: Vec<u32>,
    vals: Vec<N>,
}

impl<N> SparseVec<N>
where
    N: Num + Copy,
{
    #[inline]
    pub fn new() -> Self {
        SparseVec {
            inds: Vec::new(),
            vals: Vec::new(),
        }
    }

    #[inline]
    pub fn with_capacity(cap: usize) -> Self {
        SparseVec {
            inds: Vec::with_capacity(cap),
            vals: Vec::with_capacity(cap),
        }
    }

    /// Build a vector from `(index, value)` pairs in any order.
    /// Zero values are dropped and repeated indices are summed.
    ///
    /// # Arguments
    /// * `pairs` - element pairs
    pub fn from_pairs<I>(pairs: I) -> Self
    where
        I: IntoIterator<Item = (u32, N)>,
    {
        let mut pairs: Vec<(u32, N)> = pairs
            .into_iter()
            .filter(|(_, val)| !val.is_zero())
            .collect();
        pairs.sort_unstable_by_key(|(idx, _)| *idx);

        let mut vec = Self::with_capacity(pairs.len());
        for (idx, val) in pairs {
            match vec.inds.last() {
                Some(&last) if last == idx => {
                    if let Some(acc) = vec.vals.last_mut() {
                        *acc = *acc + val;
                    }
                }
                _ => {
                    vec.inds.push(idx);
                    vec.vals.push(val);
                }
            }
        }
        vec
    }

    /// Append an element past the current last index.
    #[inline]
    pub(crate) fn push_sorted(&mut self, idx: u32, val: N) {
        debug_assert!(self.inds.last().map_or(true, |&last| last < idx));
        self.inds.push(idx);
        self.vals.push(val);
    }

    /// number of stored (non-zero) elements
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    /// true when every element is zero
    #[inline]
    pub fn is_zero_vector(&self) -> bool {
        self.vals.iter().all(|val| val.is_zero())
    }

    /// Value at `index`, zero if the element is not stored.
    #[inline]
    pub fn get(&self, index: u32) -> N {
        match self.inds.binary_search(&index) {
            Ok(pos) => self.vals[pos],
            Err(_) => N::zero(),
        }
    }

    /// Iterate stored elements as `(index, value)` in ascending index order.
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (u32, N)> + '_ {
        self.inds.iter().copied().zip(self.vals.iter().copied())
    }

    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.inds
    }

    #[inline]
    pub fn values(&self) -> &[N] {
        &self.vals
    }

    #[inline]
    pub(crate) fn values_mut(&mut self) -> &mut [N] {
        &mut self.vals
    }

    #[inline]
    pub fn shrink_to_fit(&mut self) {
        self.inds.shrink_to_fit();
        self.vals.shrink_to_fit();
    }
}

impl<N> Default for SparseVec<N>
where
    N: Num + Copy,
{
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_sorts_and_merges() {
        let vec = SparseVec::from_pairs(vec![(5u32, 1.0f64), (2, 2.0), (5, 3.0), (9, 0.0)]);
        assert_eq!(vec.indices(), &[2, 5]);
        assert_eq!(vec.values(), &[2.0, 4.0]);
        assert_eq!(vec.nnz(), 2);
    }

    #[test]
    fn get_returns_zero_for_missing_index() {
        let vec = SparseVec::from_pairs(vec![(3u32, 7u32)]);
        assert_eq!(vec.get(3), 7);
        assert_eq!(vec.get(4), 0);
    }

    #[test]
    fn empty_vector_is_zero() {
        let vec: SparseVec<f64> = SparseVec::new();
        assert!(vec.is_zero_vector());
        assert_eq!(vec.raw_iter().count(), 0);
    }
}
