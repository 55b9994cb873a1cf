//! The caller-visible error value produced when a bridged computation raised.

use std::collections::BTreeMap;
use std::panic::panic_any;

use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::exception::{GENERIC_PANIC_NAME, NativeException};

/// Domain string identifying catchpoint as the origin of a [`TranslatedError`].
pub const NATIVE_EXCEPTION_DOMAIN: &str = "catchpoint.native-exception";

/// The single code reported for every intercepted exception.
///
/// Exceptions are not classified; callers that need finer handling inspect
/// the name stored under [`EXCEPTION_NAME_KEY`].
pub const NATIVE_EXCEPTION_CODE: i64 = 0;

/// `user_info` key holding the original exception's name.
pub const EXCEPTION_NAME_KEY: &str = "exception.name";

/// Structured, language-neutral error describing an intercepted exception.
///
/// Only obtainable by translating a [`NativeException`], so `domain` and
/// `code` are always the reserved values.
///
/// # Serde
///
/// Serializes as `{"domain", "code", "message", "userInfo"}` for consumers on
/// the far side of a language boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Error)]
#[error("{domain} ({code}): {message}")]
pub struct TranslatedError {
    domain: &'static str,
    code: i64,
    message: String,
    #[serde(rename = "userInfo")]
    user_info: BTreeMap<String, Value>,
}

impl TranslatedError {
    #[must_use]
    pub fn domain(&self) -> &'static str {
        self.domain
    }

    #[must_use]
    pub fn code(&self) -> i64 {
        self.code
    }

    /// The exception's reason, verbatim.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Metadata carried by the exception plus its name under [`EXCEPTION_NAME_KEY`].
    #[must_use]
    pub fn user_info(&self) -> &BTreeMap<String, Value> {
        &self.user_info
    }

    /// The original exception name, if still present in `user_info`.
    #[must_use]
    pub fn exception_name(&self) -> Option<&str> {
        self.user_info.get(EXCEPTION_NAME_KEY).and_then(Value::as_str)
    }

    /// Rebuild a raisable record from this error.
    ///
    /// The name comes back out of `user_info`; the remaining entries become the
    /// record's metadata.
    #[must_use]
    pub fn into_exception(self) -> NativeException {
        let mut user_info = self.user_info;
        let name = match user_info.remove(EXCEPTION_NAME_KEY) {
            Some(Value::String(name)) => name,
            _ => GENERIC_PANIC_NAME.to_string(),
        };
        NativeException::new(name, self.message).with_user_info(user_info)
    }

    /// Raise this error unchanged so an outer bridge reports it verbatim.
    pub fn raise(self) -> ! {
        panic_any(self)
    }
}

impl From<NativeException> for TranslatedError {
    fn from(exception: NativeException) -> Self {
        let (name, reason, mut user_info) = exception.into_parts();
        // The reserved key wins over metadata that happens to reuse it.
        user_info.insert(EXCEPTION_NAME_KEY.to_string(), Value::String(name));
        Self {
            domain: NATIVE_EXCEPTION_DOMAIN,
            code: NATIVE_EXCEPTION_CODE,
            message: reason,
            user_info,
        }
    }
}
