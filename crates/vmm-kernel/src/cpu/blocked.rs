//! Column-blocked kernel over portable lanes.
//!
//! For each output row `i`, the columns are walked in blocks of `W`. A block
//! accumulates `splat(A[i][k]) * B[k][j..j+W]` over the whole contraction
//! range and is then stored into `C[i][j..j+W]`.
//!
//! When fewer than `W` columns remain (the tail block), B rows are read
//! through [`Lane::load_padded`], so the missing columns contribute zero,
//! and the result goes out through [`Lane::store_partial`]. No load or store
//! ever reaches past column `n - 1`.

use super::DEFAULT_LANE_WIDTH;
use crate::dtype::LaneElement;
use crate::kernel::MatmulKernel;
use crate::lane::Lane;

#[derive(Debug, Clone)]
pub struct BlockedKernel<const W: usize = DEFAULT_LANE_WIDTH>;

impl<const W: usize> BlockedKernel<W> {
    /// # Panics
    /// Panics if `W == 0`.
    pub fn new() -> Self {
        assert!(W > 0, "lane width must be non-zero");
        BlockedKernel
    }
}

impl<const W: usize> Default for BlockedKernel<W> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: LaneElement, const W: usize> MatmulKernel<T> for BlockedKernel<W> {
    fn name(&self) -> &str {
        "blocked"
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

                if n - j >= W {
                    for (k, &a_ik) in a_row.iter().enumerate() {
                        let b_block = &b[k * n + j..k * n + j + W];
                        acc = acc.mul_add(Lane::splat(a_ik), Lane::load(b_block));
                    }
                    acc.store(&mut c_row[j..j + W]);
                } else {
                    for (k, &a_ik) in a_row.iter().enumerate() {
                        let b_tail = &b[k * n + j..(k + 1) * n];
                        acc = acc.mul_add(Lane::splat(a_ik), Lane::load_padded(b_tail));
                    }
                    acc.store_partial(&mut c_row[j..]);
                }
            }
        }
    }
}
