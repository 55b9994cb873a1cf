//! Heap handle carrying a [`TranslatedError`] across the C boundary.

use std::ffi::{CStr, CString};

use catchpoint_core::TranslatedError;

const REPLACEMENT: &str = "\u{FFFD}";

/// Opaque to C. Strings are precomputed so accessors can hand out borrowed
/// pointers that live as long as the handle.
#[derive(Debug)]
pub struct CatchpointError {
    error: TranslatedError,
    domain: CString,
    message: CString,
    name: Option<CString>,
    user_info_json: CString,
}

impl CatchpointError {
    #[must_use]
    pub fn new(error: TranslatedError) -> Self {
        let user_info_json =
            serde_json::to_string(error.user_info()).unwrap_or_else(|_| "{}".to_string());
        Self {
            domain: c_string(error.domain()),
            message: c_string(error.message()),
            name: error.exception_name().map(c_string),
            user_info_json: c_string(&user_info_json),
            error,
        }
    }

    #[must_use]
    pub fn error(&self) -> &TranslatedError {
        &self.error
    }

    pub(crate) fn domain(&self) -> &CStr {
        &self.domain
    }

    pub(crate) fn message(&self) -> &CStr {
        &self.message
    }

    pub(crate) fn name(&self) -> Option<&CStr> {
        self.name.as_deref()
    }

    pub(crate) fn user_info_json(&self) -> &CStr {
        &self.user_info_json
    }
}

/// NUL-terminated copy of `value`; interior NULs become U+FFFD.
fn c_string(value: &str) -> CString {
    CString::new(value.replace('\0', REPLACEMENT)).unwrap_or_default()
}
