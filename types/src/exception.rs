//! Structured exception records raised through the unwind mechanism.
//!
//! A [`NativeException`] is the panic payload catchpoint understands natively:
//! a category name, a human-readable reason, and optional metadata. Raising one
//! unwinds the stack exactly like `panic!`; a bridge further up the stack turns
//! it back into a value.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::panic_any;

use serde_json::Value;

/// Name given to panics that did not carry a [`NativeException`] payload.
pub const GENERIC_PANIC_NAME: &str = "Panic";

/// Reason used when a panic payload is neither a string nor a known record.
pub const UNKNOWN_PANIC_REASON: &str = "unknown panic";

/// A named exception with a reason and auxiliary metadata.
///
/// Construct with [`NativeException::new`], attach metadata with
/// [`with_info`](Self::with_info), and raise with [`raise`](Self::raise).
#[derive(Debug, Clone, PartialEq)]
pub struct NativeException {
    name: String,
    reason: String,
    user_info: BTreeMap<String, Value>,
}

impl NativeException {
    #[must_use]
    pub fn new(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            reason: reason.into(),
            user_info: BTreeMap::new(),
        }
    }

    /// Record produced for an ordinary `panic!` with the given message.
    #[must_use]
    pub fn generic(reason: impl Into<String>) -> Self {
        Self::new(GENERIC_PANIC_NAME, reason)
    }

    /// Attach one metadata entry. A later entry with the same key replaces the earlier one.
    pub fn with_info(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.user_info.insert(key.into(), value.into());
        self
    }

    /// Attach every entry of `info`, replacing existing keys.
    pub fn with_user_info<K, V>(mut self, info: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        self.user_info
            .extend(info.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    #[must_use]
    pub fn user_info(&self) -> &BTreeMap<String, Value> {
        &self.user_info
    }

    #[must_use]
    pub fn into_parts(self) -> (String, String, BTreeMap<String, Value>) {
        (self.name, self.reason, self.user_info)
    }

    /// Raise this exception on the current thread.
    ///
    /// The record becomes the panic payload, so the nearest enclosing bridge
    /// recovers it intact. Without an enclosing bridge this behaves like any
    /// other uncaught panic.
    pub fn raise(self) -> ! {
        panic_any(self)
    }
}

impl fmt::Display for NativeException {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.name, self.reason)
    }
}
