//! Panic payload normalization.
//!
//! Recognized payloads, in order:
//! - [`TranslatedError`] re-raised by a caller, kept verbatim
//! - [`NativeException`]
//! - `&'static str` and `String` from `panic!`, named [`GENERIC_PANIC_NAME`]
//! - anything else, named [`GENERIC_PANIC_NAME`] with [`UNKNOWN_PANIC_REASON`]
//!
//! [`GENERIC_PANIC_NAME`]: catchpoint_types::GENERIC_PANIC_NAME

use std::any::Any;
use std::mem;

use catchpoint_types::{NativeException, TranslatedError, UNKNOWN_PANIC_REASON};

use crate::bridge::protected;

/// Translate a payload obtained from unwinding.
///
/// Also usable on the `Err` side of `JoinHandle::join`, where another thread's
/// panic has already been captured by the runtime.
pub fn translate_payload(payload: Box<dyn Any + Send + 'static>) -> TranslatedError {
    match payload.downcast::<TranslatedError>() {
        Ok(err) => *err,
        Err(other) => exception_from_payload(other).into(),
    }
}

/// Normalize a payload into an exception record.
pub fn exception_from_payload(payload: Box<dyn Any + Send + 'static>) -> NativeException {
    let payload = match payload.downcast::<NativeException>() {
        Ok(exception) => return *exception,
        Err(other) => other,
    };
    if let Some(message) = payload.downcast_ref::<&'static str>() {
        return NativeException::generic(*message);
    }
    let payload = match payload.downcast::<String>() {
        Ok(message) => return NativeException::generic(*message),
        Err(other) => other,
    };
    discard(payload);
    NativeException::generic(UNKNOWN_PANIC_REASON)
}

/// Drop an opaque payload without letting its destructor unwind past us.
fn discard(payload: Box<dyn Any + Send + 'static>) {
    if let Err(nested) = protected(move || drop(payload)) {
        // Dropping this one could panic again.
        mem::forget(nested);
    }
}
