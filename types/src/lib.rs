//! Core value types for catchpoint.
//!
//! This crate holds the records that cross a bridge: the exception a
//! computation raises, the error a caller receives, and the outcome that
//! discriminates between them. No IO, no async, no catching; catching lives in
//! `catchpoint-core`.

#![forbid(unsafe_code)]

mod exception;
mod outcome;
mod translated;

pub use exception::{GENERIC_PANIC_NAME, NativeException, UNKNOWN_PANIC_REASON};
pub use outcome::Outcome;
pub use translated::{
    EXCEPTION_NAME_KEY, NATIVE_EXCEPTION_CODE, NATIVE_EXCEPTION_DOMAIN, TranslatedError,
};
