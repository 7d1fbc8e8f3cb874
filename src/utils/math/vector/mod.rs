pub mod math;

use std::fmt::{self, Debug};

use num::Num;

/// ZeroSpVec is a sparse vector that treats zero as the implicit element.
/// It keeps two parallel arrays (SoA):
/// - `inds`: logical positions of the stored elements
/// - `vals`: the stored values
///
/// `inds` is always strictly ascending and no stored value is zero.
#[derive(Clone, PartialEq)]
pub struct ZeroSpVec<N>
where
    N: Num + Copy,
{
    inds: Vec<u32>,
    vals: Vec<N>,
    len: usize,
}

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    /// Empty vector of logical length `len`
    #[inline]
    pub fn new(len: usize) -> Self {
        ZeroSpVec {
            inds: Vec::new(),
            vals: Vec::new(),
            len,
        }
    }

    #[inline]
    pub fn with_capacity(len: usize, nnz_cap: usize) -> Self {
        ZeroSpVec {
            inds: Vec::with_capacity(nnz_cap),
            vals: Vec::with_capacity(nnz_cap),
            len,
        }
    }

    /// Build from `(index, value)` pairs in any order.
    /// Zero values are skipped. Pairs must not repeat an index and every
    /// index must be `< len`.
    pub fn from_pairs<I>(len: usize, pairs: I) -> Self
    where
        I: IntoIterator<Item = (usize, N)>,
    {
        let mut pairs: Vec<(u32, N)> = pairs
            .into_iter()
            .filter(|(_, v)| !v.is_zero())
            .map(|(i, v)| {
                debug_assert!(i < len, "index {i} out of bounds for len {len}");
                (i as u32, v)
            })
            .collect();
        pairs.sort_unstable_by_key(|(i, _)| *i);
        debug_assert!(pairs.windows(2).all(|w| w[0].0 < w[1].0), "duplicate index");

        let mut vec = ZeroSpVec::with_capacity(len, pairs.len());
        for (i, v) in pairs {
            vec.inds.push(i);
            vec.vals.push(v);
        }
        vec
    }

    /// logical length (vector dimension)
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// number of stored (non-zero) elements
    #[inline]
    pub fn nnz(&self) -> usize {
        self.inds.len()
    }

    /// Value at logical position `index`.
    /// Returns `None` when out of range, zero when not stored.
    #[inline]
    pub fn get(&self, index: usize) -> Option<N> {
        if index >= self.len {
            return None;
        }
        match self.inds.binary_search(&(index as u32)) {
            Ok(pos) => Some(self.vals[pos]),
            Err(_) => Some(N::zero()),
        }
    }

    /// Iterate stored elements as `(index, value)` in ascending index order
    #[inline]
    pub fn raw_iter(&self) -> impl Iterator<Item = (usize, N)> + '_ {
        self.inds
            .iter()
            .zip(self.vals.iter())
            .map(|(&i, &v)| (i as usize, v))
    }

    #[inline]
    pub(crate) fn raw_iter_mut(&mut self) -> impl Iterator<Item = (usize, &mut N)> + '_ {
        self.inds
            .iter()
            .zip(self.vals.iter_mut())
            .map(|(&i, v)| (i as usize, v))
    }

    /// Iterate all logical elements, zeros included
    pub fn iter(&self) -> impl Iterator<Item = N> + '_ {
        let mut stored = self.raw_iter().peekable();
        (0..self.len).map(move |i| {
            let next = stored.peek().copied();
            match next {
                Some((idx, v)) if idx == i => {
                    stored.next();
                    v
                }
                _ => N::zero(),
            }
        })
    }
}

impl<N> Debug for ZeroSpVec<N>
where
    N: Num + Copy + Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            write!(f, "ZeroSpVec(len: {}, nnz: {}) ", self.len, self.nnz())?;
            f.debug_map().entries(self.raw_iter()).finish()
        } else {
            f.debug_list().entries(self.iter()).finish()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_pairs_sorts_and_skips_zeros() {
        let v = ZeroSpVec::from_pairs(6, vec![(4, 2.0_f64), (1, 0.0), (0, 1.5)]);
        assert_eq!(v.len(), 6);
        assert_eq!(v.nnz(), 2);
        assert_eq!(v.raw_iter().collect::<Vec<_>>(), vec![(0, 1.5), (4, 2.0)]);
    }

    #[test]
    fn get_distinguishes_zero_and_out_of_range() {
        let v = ZeroSpVec::from_pairs(3, vec![(2, 7u32)]);
        assert_eq!(v.get(2), Some(7));
        assert_eq!(v.get(0), Some(0));
        assert_eq!(v.get(3), None);
    }

    #[test]
    fn iter_yields_dense_view() {
        let v = ZeroSpVec::from_pairs(4, vec![(1, 3u8), (3, 1)]);
        assert_eq!(v.iter().collect::<Vec<_>>(), vec![0, 3, 0, 1]);
    }
}
