//! Bridge properties across calls, threads, and nesting.

use std::cell::RefCell;
use std::thread;

use anyhow::Context;
use catchpoint_core::{
    ExceptionBridge, GENERIC_PANIC_NAME, NativeException, Outcome, raise, try_invoke,
};
use serde_json::json;

use crate::common::{ReleaseCounter, bounds_error};

#[test]
fn raise_helper_carries_name_and_reason() {
    let err = try_invoke(|| raise("ConfigError", "missing key"))
        .into_error()
        .expect("raised");

    assert_eq!(err.exception_name(), Some("ConfigError"));
    assert_eq!(err.message(), "missing key");
}

#[test]
fn plain_panic_is_contained() {
    let err = try_invoke(|| {
        let items: Vec<u8> = Vec::new();
        let index = items.len() + 3;
        assert_eq!(items[index], 0);
    })
    .into_error()
    .expect("raised");

    assert_eq!(err.exception_name(), Some(GENERIC_PANIC_NAME));
    assert!(err.message().contains("index out of bounds"));
}

#[test]
fn scoped_resource_is_released_exactly_once() {
    let counter = ReleaseCounter::default();

    let outcome = try_invoke(|| {
        let _guard = counter.acquire();
        bounds_error().raise();
    });

    assert!(!outcome.is_success());
    assert_eq!(counter.releases(), 1);
}

#[test]
fn resource_released_once_on_success_too() {
    let counter = ReleaseCounter::default();

    let outcome = try_invoke(|| {
        let _guard = counter.acquire();
    });

    assert!(outcome.is_success());
    assert_eq!(counter.releases(), 1);
}

#[test]
fn side_effects_before_raising_are_kept() {
    let log = RefCell::new(Vec::new());

    let outcome = try_invoke(|| {
        log.borrow_mut().push("step 1");
        raise("StepFailed", "step 2 failed");
    });

    assert!(!outcome.is_success());
    assert_eq!(*log.borrow(), vec!["step 1"]);
}

#[test]
fn concurrent_calls_are_independent() {
    let results: Vec<(usize, Outcome)> = thread::scope(|scope| {
        let handles: Vec<_> = (0..8)
            .map(|i| {
                scope.spawn(move || {
                    let outcome = try_invoke(|| {
                        if i % 2 == 0 {
                            NativeException::new("Worker", format!("worker {i}")).raise();
                        }
                    });
                    (i, outcome)
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|h| h.join().expect("bridge contained the panic"))
            .collect()
    });

    for (i, outcome) in results {
        if i % 2 == 0 {
            let err = outcome.into_error().expect("even workers raise");
            assert_eq!(err.message(), format!("worker {i}"));
        } else {
            assert!(outcome.is_success());
        }
    }
}

#[test]
fn inner_bridge_absorbs_its_exception() {
    let mut inner = None;

    let outer = try_invoke(|| {
        inner = try_invoke(|| raise("Inner", "handled inside")).into_error();
    });

    assert!(outer.is_success());
    assert_eq!(inner.expect("inner failed").message(), "handled inside");
}

#[test]
fn explicit_re_raise_reaches_outer_bridge() {
    let outer = ExceptionBridge::try_invoke(|| {
        if let Outcome::Failed(err) = try_invoke(|| bounds_error().raise()) {
            err.into_exception().with_info("rethrown", true).raise();
        }
    });

    let err = outer.into_error().expect("re-raised");
    assert_eq!(err.exception_name(), Some("BoundsError"));
    assert_eq!(err.user_info()["index"], json!("5"));
    assert_eq!(err.user_info()["rethrown"], json!(true));
}

#[test]
fn failure_lifts_into_anyhow() {
    fn run() -> anyhow::Result<()> {
        try_invoke(|| raise("Lifted", "through question mark"))
            .into_result()
            .context("bridged step failed")?;
        Ok(())
    }

    let err = run().expect_err("failed");
    let rendered = format!("{err:#}");
    assert!(rendered.contains("bridged step failed"));
    assert!(rendered.contains("through question mark"));
}
