//! End-to-end scenarios for a single bridged call.

use catchpoint_core::{
    EXCEPTION_NAME_KEY, NATIVE_EXCEPTION_CODE, NATIVE_EXCEPTION_DOMAIN, Outcome, TranslatedError,
    try_invoke, try_invoke_into,
};
use serde_json::json;

use crate::common::bounds_error;

#[test]
fn computation_that_returns_succeeds() {
    let mut slot: Option<TranslatedError> = None;

    assert!(try_invoke_into(|| {}, &mut slot));
    assert!(slot.is_none());
    assert_eq!(try_invoke(|| {}), Outcome::Succeeded);
}

#[test]
fn bounds_error_is_translated() {
    let mut slot = None;
    let ok = try_invoke_into(|| bounds_error().raise(), &mut slot);

    assert!(!ok);
    let err = slot.expect("slot written on failure");
    assert_eq!(
        serde_json::to_value(&err).expect("serialize"),
        json!({
            "domain": NATIVE_EXCEPTION_DOMAIN,
            "code": NATIVE_EXCEPTION_CODE,
            "message": "index out of range",
            "userInfo": {
                "index": "5",
                EXCEPTION_NAME_KEY: "BoundsError",
            },
        })
    );
}

#[test]
fn success_after_failure_is_independent() {
    let mut first = None;
    let mut second = None;

    assert!(!try_invoke_into(|| bounds_error().raise(), &mut first));
    assert!(try_invoke_into(|| {}, &mut second));

    assert!(first.is_some());
    assert!(second.is_none());
}

#[test]
fn reusing_a_slot_keeps_the_stale_error_but_reports_success() {
    let mut slot = None;

    assert!(!try_invoke_into(|| bounds_error().raise(), &mut slot));
    let stale = slot.clone();

    // The discriminator, not the slot, says whether this call failed.
    assert!(try_invoke_into(|| {}, &mut slot));
    assert_eq!(slot, stale);
}
