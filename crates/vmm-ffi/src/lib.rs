mod context;
mod error;
mod types;

pub use context::*;
pub use error::*;
pub use types::*;

use std::ffi::CString;
use std::os::raw::c_char;
use std::panic::AssertUnwindSafe;

use vmm_kernel::{LaneElement, MatmulKernel};

/// Execute a closure that returns a `VMMStatus`, catching any panics
/// and converting them into `VMMStatus::ErrorInternal`.
fn catch_panic<F: FnOnce() -> VMMStatus>(f: F) -> VMMStatus {
    match std::panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(status) => status,
        Err(_) => {
            set_last_error("internal panic".to_string());
            VMMStatus::ErrorInternal
        }
    }
}

/// Create a new kernel context.
///
/// On success, writes a heap-allocated `VMMContext` pointer into `*ctx_out`
/// and returns `VMMStatus::Ok`. The caller must later call
/// `vmm_context_destroy` to free the context.
#[no_mangle]
pub extern "C" fn vmm_context_create(
    kernel: VMMKernelType,
    ctx_out: *mut *mut VMMContext,
) -> VMMStatus {
    catch_panic(|| {
        if ctx_out.is_null() {
            set_last_error("ctx_out is null".to_string());
            return VMMStatus::ErrorInvalidArgument;
        }
        let ctx = match VMMContext::new(kernel.into()) {
            Ok(c) => Box::new(c),
            Err(e) => return status_for(e),
        };
        unsafe {
            *ctx_out = Box::into_raw(ctx);
        }
        VMMStatus::Ok
    })
}

/// Destroy a context previously created by `vmm_context_create`.
///
/// Passing a null pointer is a no-op and returns `VMMStatus::Ok`.
///
/// # Safety
/// `ctx` must be null or a pointer returned by `vmm_context_create` that has
/// not already been destroyed.
#[no_mangle]
pub unsafe extern "C" fn vmm_context_destroy(ctx: *mut VMMContext) -> VMMStatus {
    if ctx.is_null() {
        return VMMStatus::Ok;
    }
    drop(Box::from_raw(ctx));
    VMMStatus::Ok
}

/// Write the name of the context's i32 kernel into `*name_out`.
///
/// The caller must free the string with `vmm_free_string`.
///
/// # Safety
/// `ctx` must be a live context and `name_out` a writable pointer.
#[no_mangle]
pub unsafe extern "C" fn vmm_context_kernel_name(
    ctx: *const VMMContext,
    name_out: *mut *mut c_char,
) -> VMMStatus {
    catch_panic(|| {
        if ctx.is_null() || name_out.is_null() {
            set_last_error("null argument".to_string());
            return VMMStatus::ErrorInvalidArgument;
        }
        let ctx = unsafe { &*ctx };
        match CString::new(ctx.kernel_i32.name()) {
            Ok(name) => {
                unsafe { *name_out = name.into_raw() };
                VMMStatus::Ok
            }
            Err(e) => {
                set_last_error(format!("kernel name encoding error: {}", e));
                VMMStatus::ErrorInternal
            }
        }
    })
}

/// Shared body of the typed matmul entry points.
///
/// # Safety
/// For `n > 0`, `a` and `b` must point to `n * n` readable elements and `c`
/// to `n * n` writable elements that overlap neither `a` nor `b`.
unsafe fn matmul_raw<T: LaneElement>(
    kernel: &dyn MatmulKernel<T>,
    a: *const T,
    b: *const T,
    c: *mut T,
    n: usize,
) -> VMMStatus {
    if n == 0 {
        return VMMStatus::Ok;
    }
    if a.is_null() || b.is_null() || c.is_null() {
        set_last_error("null matrix buffer".to_string());
        return VMMStatus::ErrorInvalidArgument;
    }
    let len = match n.checked_mul(n) {
        Some(len) => len,
        None => {
            set_last_error(format!("dimension {} overflows the address space", n));
            return VMMStatus::ErrorInvalidArgument;
        }
    };

    let a = std::slice::from_raw_parts(a, len);
    let b = std::slice::from_raw_parts(b, len);
    let c = std::slice::from_raw_parts_mut(c, len);
    match kernel.multiply_slices(a, b, c, n) {
        Ok(()) => VMMStatus::Ok,
        Err(e) => status_for(e),
    }
}

/// Multiply two `n x n` row-major i32 matrices: `c = a @ b`.
///
/// Arithmetic wraps on overflow. `n = 0` is a no-op and the pointers are not
/// read.
///
/// # Safety
/// `ctx` must be a live context. For `n > 0`, `a` and `b` must point to
/// `n * n` readable elements and `c` to `n * n` writable elements; `c` must
/// not overlap `a` or `b`.
#[no_mangle]
pub unsafe extern "C" fn vmm_matmul_i32(
    ctx: *const VMMContext,
    a: *const i32,
    b: *const i32,
    c: *mut i32,
    n: usize,
) -> VMMStatus {
    catch_panic(|| {
        if ctx.is_null() {
            set_last_error("ctx is null".to_string());
            return VMMStatus::ErrorInvalidArgument;
        }
        let ctx = unsafe { &*ctx };
        unsafe { matmul_raw(ctx.kernel_i32.as_ref(), a, b, c, n) }
    })
}

/// Multiply two `n x n` row-major i64 matrices: `c = a @ b`.
///
/// # Safety
/// Same requirements as `vmm_matmul_i32`.
#[no_mangle]
pub unsafe extern "C" fn vmm_matmul_i64(
    ctx: *const VMMContext,
    a: *const i64,
    b: *const i64,
    c: *mut i64,
    n: usize,
) -> VMMStatus {
    catch_panic(|| {
        if ctx.is_null() {
            set_last_error("ctx is null".to_string());
            return VMMStatus::ErrorInvalidArgument;
        }
        let ctx = unsafe { &*ctx };
        unsafe { matmul_raw(ctx.kernel_i64.as_ref(), a, b, c, n) }
    })
}

/// Retrieve the last error message.
///
/// Returns a pointer to a C string describing the most recent error, or
/// null if no error has occurred. The caller must free the returned string
/// with `vmm_free_string`.
#[no_mangle]
pub extern "C" fn vmm_last_error() -> *mut c_char {
    match error::take_last_error() {
        Some(e) => e.into_raw(),
        None => std::ptr::null_mut(),
    }
}

/// Free a string previously returned by `vmm_context_kernel_name` or
/// `vmm_last_error`.
///
/// # Safety
/// `s` must be null or a string handed out by this library.
#[no_mangle]
pub unsafe extern "C" fn vmm_free_string(s: *mut c_char) {
    if !s.is_null() {
        drop(CString::from_raw(s));
    }
}
