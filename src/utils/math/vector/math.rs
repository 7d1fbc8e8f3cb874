use std::cmp::Ordering;
use std::ops::AddAssign;

use num::Num;

use super::ZeroSpVec;

impl<N> ZeroSpVec<N>
where
    N: Num + Copy,
{
    /// Dot product, merging both index lists.
    ///
    /// # Arguments
    /// * `other` - vector of the same dimension
    #[inline]
    pub fn dot<R>(&self, other: &Self) -> R
    where
        R: Num + AddAssign,
        N: Into<R>,
    {
        debug_assert_eq!(
            self.len(),
            other.len(),
            "Vectors must be of the same length to compute dot product."
        );

        let mut result = R::zero();
        let mut a_it = self.raw_iter();
        let mut b_it = other.raw_iter();
        let mut a_next = a_it.next();
        let mut b_next = b_it.next();
        while let (Some((ia, va)), Some((ib, vb))) = (a_next, b_next) {
            match ia.cmp(&ib) {
                Ordering::Equal => {
                    let x: R = va.into();
                    let y: R = vb.into();
                    result += x * y;
                    a_next = a_it.next();
                    b_next = b_it.next();
                }
                Ordering::Less => a_next = a_it.next(),
                Ordering::Greater => b_next = b_it.next(),
            }
        }
        result
    }

    #[inline]
    pub fn norm_sq<R>(&self) -> R
    where
        R: Num + AddAssign + Copy,
        N: Into<R>,
    {
        let mut result = R::zero();
        for (_, v) in self.raw_iter() {
            let v: R = v.into();
            result += v * v;
        }
        result
    }
}

impl ZeroSpVec<f64> {
    #[inline]
    pub fn norm(&self) -> f64 {
        self.norm_sq::<f64>().sqrt()
    }

    /// Scale to unit L2 norm. A zero vector is left unchanged.
    pub fn l2_normalize(&mut self) {
        let norm = self.norm();
        if norm > 0.0 {
            let inv = 1.0 / norm;
            for (_, v) in self.raw_iter_mut() {
                *v *= inv;
            }
        }
    }

    /// Cosine of the angle between `self` and `other`.
    /// Zero when either side has zero magnitude.
    pub fn cosine(&self, other: &Self) -> f64 {
        let norm_a = self.norm();
        let norm_b = other.norm();
        if norm_a == 0.0 || norm_b == 0.0 {
            return 0.0;
        }
        self.dot::<f64>(other) / (norm_a * norm_b)
    }
}
