//! C ABI for catchpoint.
//!
//! Lets a host that cannot catch Rust unwinding run a computation through the
//! bridge and receive failures as a flag plus an out-error handle:
//!
//! ```c
//! catchpoint_error_t *err = NULL;
//! if (!catchpoint_try_invoke(run_step, ctx, &err)) {
//!     fprintf(stderr, "%s: %s\n", catchpoint_error_name(err), catchpoint_error_message(err));
//!     catchpoint_error_free(err);
//! }
//! ```
//!
//! Every exported function is `extern "C"`: a panic that somehow escapes the
//! bridge aborts the process rather than unwinding into foreign frames.
//! Computations use the `C-unwind` ABI so unwinding started inside them is
//! allowed to reach the bridge.

pub mod config;
mod error;
pub mod init;

use std::ffi::{CStr, c_char, c_void};
use std::ptr;
use std::sync::OnceLock;

use catchpoint_core::{Outcome, TranslatedError, UNWINDING_SUPPORTED, try_invoke};

pub use config::{CatchpointConfig, ConfigError, Settings};
pub use error::CatchpointError;

/// What [`catchpoint_error_code`] reports for a null handle. Never a real code.
pub const NULL_HANDLE_CODE: i64 = -1;

/// A computation: called once with the caller's context pointer.
pub type CatchpointComputation = unsafe extern "C-unwind" fn(context: *mut c_void);

/// Run `computation(context)` under the bridge.
///
/// Returns `true` if it completed; `*out_error` is not written. Returns
/// `false` if it raised; a new handle is written to `*out_error` unless
/// `out_error` is null, in which case the error is dropped. The caller frees
/// the handle with [`catchpoint_error_free`].
///
/// # Safety
///
/// `computation` must be sound to call with `context`. `out_error` must be null
/// or valid for a pointer-sized write.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn catchpoint_try_invoke(
    computation: CatchpointComputation,
    context: *mut c_void,
    out_error: *mut *mut CatchpointError,
) -> bool {
    match try_invoke(|| unsafe { computation(context) }) {
        Outcome::Succeeded => true,
        Outcome::Failed(err) => {
            trace_intercept(init::settings(), &err);
            if !out_error.is_null() {
                let handle = Box::into_raw(Box::new(CatchpointError::new(err)));
                unsafe { out_error.write(handle) };
            }
            false
        }
    }
}

fn trace_intercept(settings: Option<&Settings>, err: &TranslatedError) {
    if settings.is_some_and(|s| s.trace_intercepts) {
        tracing::debug!(
            name = err.exception_name(),
            message = err.message(),
            "Intercepted exception at C boundary"
        );
    }
}

/// The error's domain. Borrowed; valid until the handle is freed.
///
/// # Safety
///
/// `error` must be null or a live handle from [`catchpoint_try_invoke`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn catchpoint_error_domain(error: *const CatchpointError) -> *const c_char {
    unsafe { error.as_ref() }.map_or(ptr::null(), |e| e.domain().as_ptr())
}

/// The error's code; [`NULL_HANDLE_CODE`] for a null handle.
///
/// # Safety
///
/// `error` must be null or a live handle from [`catchpoint_try_invoke`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn catchpoint_error_code(error: *const CatchpointError) -> i64 {
    unsafe { error.as_ref() }.map_or(NULL_HANDLE_CODE, |e| e.error().code())
}

/// The exception's reason. Borrowed; valid until the handle is freed.
///
/// # Safety
///
/// `error` must be null or a live handle from [`catchpoint_try_invoke`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn catchpoint_error_message(error: *const CatchpointError) -> *const c_char {
    unsafe { error.as_ref() }.map_or(ptr::null(), |e| e.message().as_ptr())
}

/// The exception's name, or null if it could not be recovered.
///
/// # Safety
///
/// `error` must be null or a live handle from [`catchpoint_try_invoke`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn catchpoint_error_name(error: *const CatchpointError) -> *const c_char {
    unsafe { error.as_ref() }
        .and_then(CatchpointError::name)
        .map_or(ptr::null(), CStr::as_ptr)
}

/// `user_info` as a JSON object. Borrowed; valid until the handle is freed.
///
/// # Safety
///
/// `error` must be null or a live handle from [`catchpoint_try_invoke`].
#[unsafe(no_mangle)]
pub unsafe extern "C" fn catchpoint_error_user_info_json(
    error: *const CatchpointError,
) -> *const c_char {
    unsafe { error.as_ref() }.map_or(ptr::null(), |e| e.user_info_json().as_ptr())
}

/// Release a handle. Null is accepted.
///
/// # Safety
///
/// `error` must be null or a handle from [`catchpoint_try_invoke`] that has not
/// been freed yet.
#[unsafe(no_mangle)]
pub unsafe extern "C" fn catchpoint_error_free(error: *mut CatchpointError) {
    if !error.is_null() {
        drop(unsafe { Box::from_raw(error) });
    }
}

/// Load configuration, start logging, and install the panic hook if
/// configured. Safe to call more than once; later calls return the first
/// result.
#[unsafe(no_mangle)]
pub extern "C" fn catchpoint_init() -> bool {
    static INITIALIZED: OnceLock<bool> = OnceLock::new();

    *INITIALIZED.get_or_init(|| match init::apply() {
        Ok(_) => true,
        Err(err) => {
            tracing::error!("catchpoint initialization failed: {err:#}");
            false
        }
    })
}

/// Whether this build intercepts unwinding. `false` means raised exceptions
/// abort the process.
#[unsafe(no_mangle)]
pub extern "C" fn catchpoint_unwinding_supported() -> bool {
    UNWINDING_SUPPORTED
}
