use std::cell::RefCell;
use std::ffi::CString;

use vmm_kernel::KernelError;

use crate::types::VMMStatus;

thread_local! {
    static LAST_ERROR: RefCell<Option<CString>> = const { RefCell::new(None) };
}

/// Store an error message for later retrieval via `vmm_last_error`.
pub fn set_last_error(msg: String) {
    tracing::debug!(error = %msg, "ffi call failed");
    LAST_ERROR.with(|e| {
        *e.borrow_mut() = CString::new(msg).ok();
    });
}

/// Take the last error message, leaving `None` in its place.
pub fn take_last_error() -> Option<CString> {
    LAST_ERROR.with(|e| e.borrow_mut().take())
}

/// Record `err` as the last error and map it to a status code.
pub fn status_for(err: KernelError) -> VMMStatus {
    let status = match err {
        KernelError::DimensionMismatch { .. } | KernelError::LengthMismatch { .. } => {
            VMMStatus::ErrorDimensionMismatch
        }
        KernelError::RaggedRows { .. } => VMMStatus::ErrorInvalidArgument,
        KernelError::UnsupportedKernel(_) => VMMStatus::ErrorUnsupportedKernel,
    };
    set_last_error(err.to_string());
    status
}
