use std::fmt::Debug;

use crate::dtype::LaneElement;
use crate::error::{KernelError, Result};
use crate::matrix::{square_len, SquareMatrix};

/// Trait for square matrix multiplication kernels.
///
/// Every implementation computes `C = A @ B` for `n x n` row-major matrices
/// with wrapping arithmetic, and must agree bit-for-bit with
/// [`ScalarKernel`](crate::cpu::ScalarKernel) for every `n`, including
/// dimensions that are not a multiple of the kernel's lane width.
pub trait MatmulKernel<T: LaneElement>: Send + Sync + Debug {
    /// Returns the name of this kernel (e.g., "scalar", "blocked").
    fn name(&self) -> &str;

    /// Number of elements processed by one wide operation. 1 for scalar
    /// kernels.
    fn lane_width(&self) -> usize;

    /// Raw multiplication over row-major slices.
    ///
    /// - `a`, `b`: inputs of length `n * n`
    /// - `c`: output of length `n * n`, fully overwritten
    ///
    /// Lengths are expected to have been validated by the caller; use
    /// [`multiply`](Self::multiply) or [`multiply_slices`](Self::multiply_slices)
    /// for the checked entry points.
    fn gemm(&self, a: &[T], b: &[T], c: &mut [T], n: usize);

    /// Checked multiplication over flat row-major slices.
    ///
    /// # Errors
    /// Returns `LengthMismatch` if any slice does not hold exactly `n * n`
    /// elements. `c` is left untouched in that case.
    fn multiply_slices(&self, a: &[T], b: &[T], c: &mut [T], n: usize) -> Result<()> {
        for len in [a.len(), b.len(), c.len()] {
            let expected = square_len(n, len)?;
            if len != expected {
                return Err(KernelError::LengthMismatch {
                    n,
                    expected,
                    got: len,
                });
            }
        }
        tracing::trace!(kernel = self.name(), n, "multiply");
        if n > 0 {
            self.gemm(a, b, c, n);
        }
        Ok(())
    }

    /// Checked multiplication `c = a @ b`.
    ///
    /// # Errors
    /// Returns `DimensionMismatch` if the three matrices do not share a
    /// dimension. `c` is left untouched in that case.
    fn multiply(
        &self,
        a: &SquareMatrix<T>,
        b: &SquareMatrix<T>,
        c: &mut SquareMatrix<T>,
    ) -> Result<()> {
        check_dims(a, b, c)?;
        let n = a.dim();
        tracing::trace!(kernel = self.name(), n, "multiply");
        if n > 0 {
            self.gemm(a.as_slice(), b.as_slice(), c.as_mut_slice(), n);
        }
        Ok(())
    }
}

/// Verify that `a`, `b` and `c` share one dimension.
pub fn check_dims<T: LaneElement>(
    a: &SquareMatrix<T>,
    b: &SquareMatrix<T>,
    c: &SquareMatrix<T>,
) -> Result<()> {
    if a.dim() != b.dim() || b.dim() != c.dim() {
        return Err(KernelError::DimensionMismatch {
            a: a.dim(),
            b: b.dim(),
            c: c.dim(),
        });
    }
    Ok(())
}
