//! Portable wide registers.
//!
//! A [`Lane`] is a fixed array of `W` elements that the compiler is free to
//! keep in a vector register. All arithmetic is elementwise and wrapping.
//! Loads and stores come in two flavours: full-width ones that require the
//! slice to hold at least `W` elements, and boundary-safe ones that go
//! through the lane itself as a zero-padded scratch buffer.

use std::ops::{Add, Mul};

use crate::dtype::LaneElement;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Lane<T, const W: usize>([T; W]);

impl<T: LaneElement, const W: usize> Lane<T, W> {
    /// A lane with every element zero.
    #[inline(always)]
    pub fn zero() -> Self {
        Lane([T::ZERO; W])
    }

    /// Broadcast `value` into every element.
    #[inline(always)]
    pub fn splat(value: T) -> Self {
        Lane([value; W])
    }

    /// Full-width load of `src[..W]`.
    ///
    /// # Panics
    /// Panics if `src.len() < W`.
    #[inline(always)]
    pub fn load(src: &[T]) -> Self {
        let mut out = [T::ZERO; W];
        out.copy_from_slice(&src[..W]);
        Lane(out)
    }

    /// Load up to `W` leading elements of `src`, zero-filling the rest.
    #[inline(always)]
    pub fn load_padded(src: &[T]) -> Self {
        let mut out = [T::ZERO; W];
        let len = src.len().min(W);
        out[..len].copy_from_slice(&src[..len]);
        Lane(out)
    }

    /// Full-width store into `dst[..W]`.
    ///
    /// # Panics
    /// Panics if `dst.len() < W`.
    #[inline(always)]
    pub fn store(self, dst: &mut [T]) {
        dst[..W].copy_from_slice(&self.0);
    }

    /// Store the leading `min(dst.len(), W)` elements; nothing past the end
    /// of `dst` is touched.
    #[inline(always)]
    pub fn store_partial(self, dst: &mut [T]) {
        let len = dst.len().min(W);
        dst[..len].copy_from_slice(&self.0[..len]);
    }

    /// Multiply-accumulate: `self + a * b`, elementwise.
    #[inline(always)]
    pub fn mul_add(self, a: Self, b: Self) -> Self {
        self + a * b
    }

    /// Horizontal sum of all elements.
    #[inline(always)]
    pub fn reduce_sum(self) -> T {
        self.0.iter().fold(T::ZERO, |acc, &v| acc.wrapping_add(v))
    }

    pub fn as_array(&self) -> &[T; W] {
        &self.0
    }

    pub const fn width() -> usize {
        W
    }
}

impl<T: LaneElement, const W: usize> Add for Lane<T, W> {
    type Output = Self;

    #[inline(always)]
    fn add(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o = o.wrapping_add(r);
        }
        Lane(out)
    }
}

impl<T: LaneElement, const W: usize> Mul for Lane<T, W> {
    type Output = Self;

    #[inline(always)]
    fn mul(self, rhs: Self) -> Self {
        let mut out = self.0;
        for (o, r) in out.iter_mut().zip(rhs.0) {
            *o = o.wrapping_mul(r);
        }
        Lane(out)
    }
}

impl<T: LaneElement, const W: usize> Default for Lane<T, W> {
    fn default() -> Self {
        Self::zero()
    }
}
