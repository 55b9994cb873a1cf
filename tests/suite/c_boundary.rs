//! The C ABI seen from a caller holding raw pointers.

use std::ffi::{CStr, c_char, c_void};
use std::ptr;
use std::sync::atomic::{AtomicUsize, Ordering};

use catchpoint_ffi::{
    CatchpointError, catchpoint_error_code, catchpoint_error_free, catchpoint_error_message,
    catchpoint_error_name, catchpoint_error_user_info_json, catchpoint_init,
    catchpoint_try_invoke,
};
use catchpoint_types::{EXCEPTION_NAME_KEY, NATIVE_EXCEPTION_CODE};

use crate::common::{ReleaseCounter, bounds_error};

extern "C-unwind" fn raise_bounds_error(_context: *mut c_void) {
    bounds_error().raise()
}

extern "C-unwind" fn release_then_raise(context: *mut c_void) {
    let counter = unsafe { &*context.cast::<ReleaseCounter>() };
    let _guard = counter.acquire();
    panic!("failed while holding a resource");
}

extern "C-unwind" fn bump(context: *mut c_void) {
    let calls = unsafe { &*context.cast::<AtomicUsize>() };
    calls.fetch_add(1, Ordering::SeqCst);
}

fn read(ptr: *const c_char) -> String {
    assert!(!ptr.is_null());
    unsafe { CStr::from_ptr(ptr) }
        .to_string_lossy()
        .into_owned()
}

fn context_of<T>(value: &T) -> *mut c_void {
    ptr::from_ref(value).cast_mut().cast()
}

#[test]
fn failure_then_success_through_c_abi() {
    let mut first: *mut CatchpointError = ptr::null_mut();
    let mut second: *mut CatchpointError = ptr::null_mut();
    let calls = AtomicUsize::new(0);

    let first_ok =
        unsafe { catchpoint_try_invoke(raise_bounds_error, ptr::null_mut(), &raw mut first) };
    let second_ok = unsafe { catchpoint_try_invoke(bump, context_of(&calls), &raw mut second) };

    assert!(!first_ok);
    assert!(second_ok);
    assert!(!first.is_null());
    assert!(second.is_null());
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    unsafe {
        assert_eq!(catchpoint_error_code(first), NATIVE_EXCEPTION_CODE);
        assert_eq!(read(catchpoint_error_message(first)), "index out of range");
        assert_eq!(read(catchpoint_error_name(first)), "BoundsError");

        let info: serde_json::Value =
            serde_json::from_str(&read(catchpoint_error_user_info_json(first))).expect("json");
        assert_eq!(info["index"], "5");
        assert_eq!(info[EXCEPTION_NAME_KEY], "BoundsError");

        catchpoint_error_free(first);
    }
}

#[test]
fn computation_cleanup_runs_once_across_c_abi() {
    let counter = ReleaseCounter::default();
    let mut out: *mut CatchpointError = ptr::null_mut();

    let ok = unsafe { catchpoint_try_invoke(release_then_raise, context_of(&counter), &raw mut out) };

    assert!(!ok);
    assert_eq!(counter.releases(), 1);
    unsafe {
        assert_eq!(
            read(catchpoint_error_message(out)),
            "failed while holding a resource"
        );
        catchpoint_error_free(out);
    }
}

#[test]
fn init_is_idempotent() {
    let first = catchpoint_init();
    let second = catchpoint_init();
    assert_eq!(first, second);
}
