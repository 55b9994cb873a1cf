//! The exception bridge.
//!
//! [`try_invoke`] runs a computation once on the calling thread inside a
//! protected scope. Unwinding started by the computation stops here and comes
//! back as [`Outcome::Failed`]; normal completion is [`Outcome::Succeeded`].
//!
//! ```text
//! Idle -> Running -> Succeeded
//!                 \-> Failed(TranslatedError)
//! ```
//!
//! Each call is a fresh traversal. The bridge keeps nothing between calls, does
//! not log, and never re-raises. While a call is running, a per-thread depth
//! counter is raised so a panic hook can tell bridged raises from fatal ones.
//!
//! # Not intercepted
//!
//! Aborts (stack overflow, `panic = "abort"` builds, a panic raised while
//! already unwinding, foreign exceptions) and panics on other threads take the
//! normal process-termination path.

use std::any::Any;
use std::cell::Cell;
use std::panic::{AssertUnwindSafe, catch_unwind};

use catchpoint_types::{Outcome, TranslatedError};

use crate::payload::translate_payload;

/// Whether this build can intercept unwinding at all.
pub const UNWINDING_SUPPORTED: bool = cfg!(panic = "unwind");

/// Handle naming the bridge component. Carries no state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExceptionBridge;

impl ExceptionBridge {
    /// See [`try_invoke`].
    pub fn try_invoke<F>(computation: F) -> Outcome
    where
        F: FnOnce(),
    {
        try_invoke(computation)
    }

    /// See [`try_invoke_into`].
    pub fn try_invoke_into<F>(computation: F, slot: &mut Option<TranslatedError>) -> bool
    where
        F: FnOnce(),
    {
        try_invoke_into(computation, slot)
    }
}

/// Run `computation` once and report whether it raised.
///
/// The computation is treated as unwind safe. If it raises after partially
/// updating state it borrowed, that state is the caller's to inspect.
pub fn try_invoke<F>(computation: F) -> Outcome
where
    F: FnOnce(),
{
    match protected(computation) {
        Ok(()) => Outcome::Succeeded,
        Err(payload) => Outcome::Failed(translate_payload(payload)),
    }
}

/// Flag-plus-out-error form of [`try_invoke`].
///
/// Returns `true` when the computation completed. `slot` is written only when
/// it returns `false`; on success it is left exactly as the caller passed it.
pub fn try_invoke_into<F>(computation: F, slot: &mut Option<TranslatedError>) -> bool
where
    F: FnOnce(),
{
    try_invoke(computation).report_into(slot)
}

thread_local! {
    static DEPTH: Cell<usize> = const { Cell::new(0) };
}

/// Whether a protected scope is active on the current thread.
///
/// Only meaningful from the panicking thread, e.g. inside a panic hook.
#[must_use]
pub fn bridged() -> bool {
    DEPTH.with(|depth| depth.get() > 0)
}

/// Marks the current thread as bridged until dropped.
struct DepthGuard;

impl DepthGuard {
    fn enter() -> Self {
        DEPTH.with(|depth| depth.set(depth.get() + 1));
        Self
    }
}

impl Drop for DepthGuard {
    fn drop(&mut self) {
        DEPTH.with(|depth| depth.set(depth.get().saturating_sub(1)));
    }
}

/// The only place catchpoint installs an interception point.
pub(crate) fn protected<F, R>(f: F) -> Result<R, Box<dyn Any + Send + 'static>>
where
    F: FnOnce() -> R,
{
    let _depth = DepthGuard::enter();
    catch_unwind(AssertUnwindSafe(f))
}
