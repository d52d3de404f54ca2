use std::fmt;

use crate::dtype::{DType, LaneElement};
use crate::error::{KernelError, Result};
use crate::kernel::MatmulKernel;

/// Number of elements in an `n x n` matrix, or a length error if that
/// overflows `usize`.
pub(crate) fn square_len(n: usize, got: usize) -> Result<usize> {
    n.checked_mul(n).ok_or(KernelError::LengthMismatch {
        n,
        expected: usize::MAX,
        got,
    })
}

/// An owned, row-major square matrix of fixed-width integers.
///
/// The dimension may be zero. Kernels borrow matrices for the duration of a
/// single call and keep no references afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SquareMatrix<T> {
    data: Vec<T>,
    n: usize,
}

impl<T: LaneElement> SquareMatrix<T> {
    /// Wrap row-major `data` as an `n x n` matrix.
    ///
    /// # Errors
    /// Returns `LengthMismatch` if `data.len() != n * n`.
    pub fn new(data: Vec<T>, n: usize) -> Result<Self> {
        let expected = square_len(n, data.len())?;
        if data.len() != expected {
            return Err(KernelError::LengthMismatch {
                n,
                expected,
                got: data.len(),
            });
        }
        Ok(SquareMatrix { data, n })
    }

    /// Create a zero-filled `n x n` matrix.
    pub fn zeros(n: usize) -> Self {
        SquareMatrix {
            data: vec![T::ZERO; n * n],
            n,
        }
    }

    /// Create the `n x n` identity matrix.
    pub fn identity(n: usize) -> Self {
        let mut m = Self::zeros(n);
        for i in 0..n {
            m.data[i * n + i] = T::ONE;
        }
        m
    }

    /// Build a matrix from nested rows.
    ///
    /// # Errors
    /// Returns `RaggedRows` if any row's length differs from the number of rows.
    pub fn from_rows(rows: Vec<Vec<T>>) -> Result<Self> {
        let n = rows.len();
        let mut data = Vec::with_capacity(n * n);
        for (row, values) in rows.into_iter().enumerate() {
            if values.len() != n {
                return Err(KernelError::RaggedRows {
                    row,
                    expected: n,
                    got: values.len(),
                });
            }
            data.extend(values);
        }
        Ok(SquareMatrix { data, n })
    }

    /// The dimension `n` of this `n x n` matrix.
    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn is_empty(&self) -> bool {
        self.n == 0
    }

    pub fn dtype(&self) -> DType {
        T::DTYPE
    }

    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Returns row `i`.
    ///
    /// # Panics
    /// Panics if `i >= dim()`.
    pub fn row(&self, i: usize) -> &[T] {
        assert!(i < self.n, "row {} out of range for {}x{} matrix", i, self.n, self.n);
        &self.data[i * self.n..(i + 1) * self.n]
    }

    /// Returns the element at (`i`, `j`), or `None` if out of range.
    pub fn get(&self, i: usize, j: usize) -> Option<T> {
        if i < self.n && j < self.n {
            Some(self.data[i * self.n + j])
        } else {
            None
        }
    }

    /// Overwrite the element at (`i`, `j`).
    ///
    /// # Panics
    /// Panics if either index is out of range.
    pub fn set(&mut self, i: usize, j: usize, value: T) {
        assert!(
            i < self.n && j < self.n,
            "index ({}, {}) out of range for {}x{} matrix",
            i,
            j,
            self.n,
            self.n
        );
        self.data[i * self.n + j] = value;
    }

    pub fn to_rows(&self) -> Vec<Vec<T>> {
        if self.n == 0 {
            return Vec::new();
        }
        self.data.chunks(self.n).map(|r| r.to_vec()).collect()
    }

    /// Multiply `self @ other` with the given kernel, returning a new matrix.
    pub fn matmul(&self, other: &Self, kernel: &dyn MatmulKernel<T>) -> Result<Self> {
        let mut out = Self::zeros(self.n);
        kernel.multiply(self, other, &mut out)?;
        Ok(out)
    }

    pub fn into_vec(self) -> Vec<T> {
        self.data
    }
}

impl<T: LaneElement> fmt::Display for SquareMatrix<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for i in 0..self.n {
            for (j, v) in self.row(i).iter().enumerate() {
                if j > 0 {
                    write!(f, " ")?;
                }
                write!(f, "{}", v)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}
