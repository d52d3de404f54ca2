//! Column-blocked kernel with the contraction loop unrolled by four.
//!
//! Same block and tail layout as [`BlockedKernel`](super::BlockedKernel), but
//! each step of `k` broadcasts four A values and loads four B rows. When
//! `k + u` runs past `n`, that slot contributes a zero broadcast and a zero
//! lane, never a repeat of an earlier row.
//!
//! The four products are summed in a different order than the blocked kernel
//! accumulates them. Wrapping addition is associative and commutative, so the
//! result is still bit-identical to the scalar reference.

use super::DEFAULT_LANE_WIDTH;
use crate::dtype::LaneElement;
use crate::kernel::MatmulKernel;
use crate::lane::Lane;

const UNROLL: usize = 4;

#[derive(Debug, Clone)]
pub struct UnrolledKernel<const W: usize = DEFAULT_LANE_WIDTH>;

impl<const W: usize> UnrolledKernel<W> {
    /// # Panics
    /// Panics if `W == 0`.
    pub fn new() -> Self {
        assert!(W > 0, "lane width must be non-zero");
        UnrolledKernel
    }
}

impl<const W: usize> Default for UnrolledKernel<W> {
    fn default() -> Self {
        Self::new()
    }
}

/// Columns `j..j+W` of row `k` of `b`, zero-padded past column `n - 1`, or a
/// zero lane if `k` is past the last row.
#[inline(always)]
fn b_lane<T: LaneElement, const W: usize>(b: &[T], n: usize, k: usize, j: usize) -> Lane<T, W> {
    if k >= n {
        return Lane::zero();
    }
    if n - j >= W {
        Lane::load(&b[k * n + j..k * n + j + W])
    } else {
        Lane::load_padded(&b[k * n + j..(k + 1) * n])
    }
}

/// Broadcast of `a_row[k]`, or zero if `k` is past the end of the row.
#[inline(always)]
fn a_lane<T: LaneElement, const W: usize>(a_row: &[T], k: usize) -> Lane<T, W> {
    match a_row.get(k) {
        Some(&v) => Lane::splat(v),
        None => Lane::zero(),
    }
}

impl<T: LaneElement, const W: usize> MatmulKernel<T> for UnrolledKernel<W> {
    fn name(&self) -> &str {
        "unrolled"
    }

    fn lane_width(&self) -> usize {
        W
    }

    fn gemm(&self, a: &[T], b: &[T], c: &mut [T], n: usize) {
        for i in 0..n {
            let a_row = &a[i * n..(i + 1) * n];
            let c_row = &mut c[i * n..(i + 1) * n];

            for j in (0..n).step_by(W) {
                let mut acc = Lane::<T, W>::zero();

                for k in (0..n).step_by(UNROLL) {
                    let a0: Lane<T, W> = a_lane(a_row, k);
                    let a1: Lane<T, W> = a_lane(a_row, k + 1);
                    let a2: Lane<T, W> = a_lane(a_row, k + 2);
                    let a3: Lane<T, W> = a_lane(a_row, k + 3);

                    let b0 = b_lane(b, n, k, j);
                    let b1 = b_lane(b, n, k + 1, j);
                    let b2 = b_lane(b, n, k + 2, j);
                    let b3 = b_lane(b, n, k + 3, j);

                    let p01 = a0 * b0 + a1 * b1;
                    let p23 = a2 * b2 + a3 * b3;
                    acc = acc + (p01 + p23);
                }

                if n - j >= W {
                    acc.store(&mut c_row[j..j + W]);
                } else {
                    acc.store_partial(&mut c_row[j..]);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cpu::ScalarKernel;

    fn check<const W: usize>(n: usize) {
        let a: Vec<i64> = (0..n * n).map(|v| (v as i64 % 5) - 2).collect();
        let b: Vec<i64> = (0..n * n).map(|v| (v as i64 * 7) % 13 - 6).collect();
        let mut expected = vec![0; n * n];
        let mut got = vec![i64::MIN; n * n];
        ScalarKernel::new().gemm(&a, &b, &mut expected, n);
        UnrolledKernel::<W>::new().gemm(&a, &b, &mut got, n);
        assert_eq!(got, expected, "n={} W={}", n, W);
    }

    #[test]
    fn test_contraction_not_multiple_of_unroll() {
        // n = 5, 6, 7 leave 3, 2, 1 dangling k slots in the last step.
        for n in 5..8 {
            check::<8>(n);
        }
    }

    #[test]
    fn test_dangling_rows_contribute_nothing() {
        // With n = 1 the only B row must not be counted four times.
        let a = [3i32];
        let b = [5i32];
        let mut c = [0i32];
        UnrolledKernel::<8>::new().gemm(&a, &b, &mut c, 1);
        assert_eq!(c, [15]);
    }

    #[test]
    fn test_boundary_sizes() {
        for n in 0..20 {
            check::<8>(n);
            check::<4>(n);
        }
    }
}
