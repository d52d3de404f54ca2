use vmm_kernel::{select_kernel, KernelKind, MatmulKernel, Result};

/// Opaque context handle that owns the selected kernels.
pub struct VMMContext {
    pub kernel_i32: Box<dyn MatmulKernel<i32>>,
    pub kernel_i64: Box<dyn MatmulKernel<i64>>,
}

impl VMMContext {
    /// Select the kernels for `kind`.
    ///
    /// `Native` is resolved for i32 only; i64 has no native kernel and falls
    /// back to the automatic choice.
    pub fn new(kind: KernelKind) -> Result<Self> {
        let kind_i64 = match kind {
            KernelKind::Native => KernelKind::Auto,
            other => other,
        };
        Ok(Self {
            kernel_i32: select_kernel::<i32>(kind)?,
            kernel_i64: select_kernel::<i64>(kind_i64)?,
        })
    }
}
