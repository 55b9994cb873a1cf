//! Exception bridge for catchpoint.
//!
//! Runs a caller-supplied computation and guarantees that any unwinding it
//! starts stops at the bridge and comes back as a [`TranslatedError`] value.
//!
//! ```text
//! caller -> try_invoke(computation) -> protected scope -> computation()
//!                |                                          |
//!                v                                          v
//!        Outcome::Succeeded            raise / panic! -> payload -> TranslatedError
//!                                                                  |
//!                                                                  v
//!                                                      Outcome::Failed(err)
//! ```
//!
//! The interception point exists in one function of [`bridge`]; nothing else in
//! the workspace catches unwinding directly.

#![forbid(unsafe_code)]

pub mod bridge;
pub mod hook;
mod payload;

pub use bridge::{ExceptionBridge, UNWINDING_SUPPORTED, bridged, try_invoke, try_invoke_into};
pub use catchpoint_types::{
    EXCEPTION_NAME_KEY, GENERIC_PANIC_NAME, NATIVE_EXCEPTION_CODE, NATIVE_EXCEPTION_DOMAIN,
    NativeException, Outcome, TranslatedError, UNKNOWN_PANIC_REASON,
};
pub use hook::{install_quiet_hook, quiet_hook_installed};
pub use payload::{exception_from_payload, translate_payload};

/// Raise a [`NativeException`] with no metadata.
pub fn raise(name: impl Into<String>, reason: impl Into<String>) -> ! {
    NativeException::new(name, reason).raise()
}
