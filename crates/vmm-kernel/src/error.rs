use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum KernelError {
    #[error("dimension mismatch: A is {a}x{a}, B is {b}x{b}, C is {c}x{c}")]
    DimensionMismatch { a: usize, b: usize, c: usize },
    #[error("buffer length mismatch for n={n}: expected {expected} elements, got {got}")]
    LengthMismatch {
        n: usize,
        expected: usize,
        got: usize,
    },
    #[error("row {row} has {got} elements but the matrix has {expected} rows")]
    RaggedRows {
        row: usize,
        expected: usize,
        got: usize,
    },
    #[error("unsupported kernel: {0}")]
    UnsupportedKernel(String),
}

pub type Result<T> = std::result::Result<T, KernelError>;
