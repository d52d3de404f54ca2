//! `vmm-kernel` - Lane-vectorized square integer matrix multiplication.
//!
//! This crate provides:
//! - A `SquareMatrix` container for fixed-width signed integers
//! - A portable `Lane` type (width-W wide register) and its primitives
//! - A `MatmulKernel` trait with scalar, blocked and unrolled implementations
//! - An AVX2 kernel for i32 on x86_64 (feature `simd`, detected at runtime)
//!
//! Every kernel produces results bit-identical to the scalar triple loop,
//! with wrapping overflow, for any dimension including ones that are not a
//! multiple of the lane width.

#[cfg(all(feature = "simd", target_arch = "x86_64"))]
pub mod avx2;
pub mod cpu;
pub mod dtype;
pub mod error;
pub mod kernel;
pub mod lane;
pub mod matrix;

// Re-export primary types at the crate root for convenience.
pub use cpu::{select_kernel, BlockedKernel, KernelKind, ScalarKernel, UnrolledKernel};
pub use dtype::{DType, LaneElement};
pub use error::{KernelError, Result};
pub use kernel::MatmulKernel;
pub use lane::Lane;
pub use matrix::SquareMatrix;

/// Compute `c = a @ b` with the best kernel available for `T`.
///
/// # Errors
/// Returns `DimensionMismatch` if the three matrices differ in dimension.
pub fn multiply<T: LaneElement>(
    a: &SquareMatrix<T>,
    b: &SquareMatrix<T>,
    c: &mut SquareMatrix<T>,
) -> Result<()> {
    kernel::check_dims(a, b, c)?;
    select_kernel::<T>(KernelKind::Auto)?.multiply(a, b, c)
}

/// Compute `a @ b` into a newly allocated matrix.
///
/// # Errors
/// Returns `DimensionMismatch` if `a` and `b` differ in dimension.
pub fn matmul<T: LaneElement>(
    a: &SquareMatrix<T>,
    b: &SquareMatrix<T>,
) -> Result<SquareMatrix<T>> {
    let mut c = SquareMatrix::zeros(a.dim());
    multiply(a, b, &mut c)?;
    Ok(c)
}
