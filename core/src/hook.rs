//! Opt-in panic hook for hosts that raise exceptions as control flow.
//!
//! The default hook prints every raise to stderr, including exceptions a bridge
//! is about to absorb. [`install_quiet_hook`] reports structured raises that a
//! bridge on the same thread will intercept through `tracing` instead. Every
//! other panic, including a structured raise with no bridge above it, goes to
//! the hook it replaced.
//!
//! The bridge itself never installs this; a host opts in once at startup.

use std::panic::{self, PanicHookInfo};
use std::sync::Once;

use catchpoint_types::{NativeException, TranslatedError};

use crate::bridge::bridged;

static INSTALL: Once = Once::new();

/// Install the quiet hook. Later calls are no-ops.
pub fn install_quiet_hook() {
    INSTALL.call_once(|| {
        let previous = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if !(bridged() && report_structured(info)) {
                previous(info);
            }
        }));
    });
}

#[must_use]
pub fn quiet_hook_installed() -> bool {
    INSTALL.is_completed()
}

fn report_structured(info: &PanicHookInfo<'_>) -> bool {
    let location = info.location().map(ToString::to_string);
    let payload = info.payload();

    if let Some(exception) = payload.downcast_ref::<NativeException>() {
        tracing::debug!(
            name = exception.name(),
            reason = exception.reason(),
            location = location.as_deref(),
            "Native exception raised"
        );
        return true;
    }
    if let Some(err) = payload.downcast_ref::<TranslatedError>() {
        tracing::debug!(
            name = err.exception_name(),
            reason = err.message(),
            location = location.as_deref(),
            "Translated error re-raised"
        );
        return true;
    }
    false
}
