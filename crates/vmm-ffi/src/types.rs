use vmm_kernel::KernelKind;

/// Status codes returned by all FFI functions.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VMMStatus {
    Ok = 0,
    ErrorInvalidArgument = 1,
    ErrorDimensionMismatch = 2,
    ErrorUnsupportedKernel = 3,
    ErrorInternal = 4,
}

/// Kernel selector.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum VMMKernelType {
    Auto = 0,
    Scalar = 1,
    Blocked = 2,
    Unrolled = 3,
    Native = 4,
}

impl From<VMMKernelType> for KernelKind {
    fn from(kind: VMMKernelType) -> Self {
        match kind {
            VMMKernelType::Auto => KernelKind::Auto,
            VMMKernelType::Scalar => KernelKind::Scalar,
            VMMKernelType::Blocked => KernelKind::Blocked,
            VMMKernelType::Unrolled => KernelKind::Unrolled,
            VMMKernelType::Native => KernelKind::Native,
        }
    }
}
