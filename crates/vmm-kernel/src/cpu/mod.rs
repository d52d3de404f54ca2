pub mod blocked;
pub mod unrolled;

use std::fmt;
use std::str::FromStr;

use crate::dtype::LaneElement;
use crate::error::{KernelError, Result};
use crate::kernel::MatmulKernel;

pub use blocked::BlockedKernel;
pub use unrolled::UnrolledKernel;

/// Lane width of the portable kernels when none is given: 256-bit registers
/// of 32-bit elements.
pub const DEFAULT_LANE_WIDTH: usize = 8;

/// Pure-Rust scalar kernel.
///
/// The i-j-k triple loop. Every other kernel is tested against this one.
#[derive(Debug, Clone)]
pub struct ScalarKernel;

impl ScalarKernel {
    pub fn new() -> Self {
        ScalarKernel
    }
}

impl Default for ScalarKernel {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: LaneElement> MatmulKernel<T> for ScalarKernel {
    fn name(&self) -> &str {
        "scalar"
    }

    fn lane_width(&self) -> usize {
        1
    }

    fn gemm(&self, a: &[T], b: &[T], c: &mut [T], n: usize) {
        for i in 0..n {
            for j in 0..n {
                let mut sum = T::ZERO;
                for k in 0..n {
                    sum = sum.wrapping_add(a[i * n + k].wrapping_mul(b[k * n + j]));
                }
                c[i * n + j] = sum;
            }
        }
    }
}

/// Kernel selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum KernelKind {
    /// The native kernel when the CPU has one for the element type, else
    /// the portable blocked kernel.
    #[default]
    Auto,
    Scalar,
    Blocked,
    Unrolled,
    /// Architecture-specific kernel only; selection fails without one.
    Native,
}

impl fmt::Display for KernelKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KernelKind::Auto => write!(f, "auto"),
            KernelKind::Scalar => write!(f, "scalar"),
            KernelKind::Blocked => write!(f, "blocked"),
            KernelKind::Unrolled => write!(f, "unrolled"),
            KernelKind::Native => write!(f, "native"),
        }
    }
}

impl FromStr for KernelKind {
    type Err = KernelError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "auto" => Ok(KernelKind::Auto),
            "scalar" => Ok(KernelKind::Scalar),
            "blocked" => Ok(KernelKind::Blocked),
            "unrolled" => Ok(KernelKind::Unrolled),
            "native" => Ok(KernelKind::Native),
            other => Err(KernelError::UnsupportedKernel(format!(
                "unknown kernel '{}'",
                other
            ))),
        }
    }
}

/// Build the kernel named by `kind` for element type `T`.
///
/// # Errors
/// Returns `UnsupportedKernel` if `kind` is `Native` and the running CPU has
/// no native kernel for `T`.
pub fn select_kernel<T: LaneElement>(kind: KernelKind) -> Result<Box<dyn MatmulKernel<T>>> {
    let kernel: Box<dyn MatmulKernel<T>> = match kind {
        KernelKind::Auto => match T::native_kernel() {
            Some(native) => native,
            None => Box::new(BlockedKernel::<DEFAULT_LANE_WIDTH>::new()),
        },
        KernelKind::Scalar => Box::new(ScalarKernel::new()),
        KernelKind::Blocked => Box::new(BlockedKernel::<DEFAULT_LANE_WIDTH>::new()),
        KernelKind::Unrolled => Box::new(UnrolledKernel::<DEFAULT_LANE_WIDTH>::new()),
        KernelKind::Native => T::native_kernel().ok_or_else(|| {
            KernelError::UnsupportedKernel(format!(
                "no native kernel for {} on this CPU",
                T::DTYPE
            ))
        })?,
    };
    tracing::debug!(
        requested = %kind,
        selected = kernel.name(),
        lane_width = kernel.lane_width(),
        dtype = %T::DTYPE,
        "selected matmul kernel"
    );
    Ok(kernel)
}
