// SPDX-License-Identifier: MIT OR Apache-2.0
//! Causal-chain behaviour across foreign error types.

use std::error::Error;
use std::sync::Arc;

use anyhow::Context;
use faultline_error::{
    Cause, Fault, WrapErr, catalog, fast_new, fast_newf, fast_wrap, find_fault, is_fault, wrap, wrapf,
};

#[derive(Debug, thiserror::Error)]
enum RepoError {
    #[error("query failed")]
    Query(#[source] Fault),
    #[error("storage unavailable")]
    Io(#[from] std::io::Error),
}

fn load_user(id: u32) -> Result<String, RepoError> {
    if id == 0 {
        return Err(RepoError::Io(std::io::Error::other("connection refused")));
    }
    Err(RepoError::Query(fast_newf(
        &catalog::NOT_FOUND,
        format_args!("user {id} not found"),
    )))
}

// ── wrapping ─────────────────────────────────────────────────────────

#[test]
fn wrap_foreign_error_keeps_it_as_cause() {
    let err = fast_wrap(std::io::Error::other("disk full"), &catalog::INTERNAL);
    let cause = err.source().expect("cause recorded");
    assert!(cause.downcast_ref::<std::io::Error>().is_some());
    assert_eq!(err.to_string(), "Internal Server Error: disk full");
}

#[test]
fn wrap_twice_is_identity() {
    let once = fast_wrap(std::io::Error::other("x"), &catalog::TIMEOUT);
    let stamp = once.timestamp();
    let twice = wrap(once, &catalog::INTERNAL);
    let thrice = wrap(twice, &catalog::BAD_REQUEST);
    assert_eq!(thrice.code(), "TIMEOUT");
    assert_eq!(thrice.timestamp(), stamp);
    assert_eq!(thrice.to_string(), "Request Timeout: x");
}

#[test]
fn thiserror_source_fault_is_found() {
    let err = load_user(7).unwrap_err();
    assert!(is_fault(&err));
    let wrapped = wrap(err, &catalog::INTERNAL);
    assert_eq!(wrapped.code(), "NOT_FOUND");
    assert_eq!(wrapped.message(), "user 7 not found");
}

#[test]
fn thiserror_without_fault_is_wrapped() {
    let wrapped = load_user(0).wrap_err(&catalog::INTERNAL).unwrap_err();
    assert_eq!(wrapped.code(), "INTERNAL");
    assert_eq!(
        wrapped.to_string(),
        "Internal Server Error: storage unavailable"
    );
    let repo = wrapped.source().unwrap().downcast_ref::<RepoError>();
    assert!(matches!(repo, Some(RepoError::Io(_))));
}

#[test]
fn anyhow_context_chain_is_searched() {
    let err = Err::<(), _>(fast_new(&catalog::FORBIDDEN))
        .context("checking permissions")
        .context("handling request")
        .unwrap_err();
    let wrapped = wrap(err, &catalog::INTERNAL);
    assert_eq!(wrapped.code(), "FORBIDDEN");
}

#[test]
fn anyhow_without_fault_becomes_cause() {
    let err = anyhow::anyhow!("bad checksum").context("reading block 9");
    let wrapped = wrapf(err, &catalog::INTERNAL, |m| format!("{m} while restoring"));
    assert_eq!(wrapped.message(), "Internal Server Error while restoring");
    assert_eq!(
        wrapped.to_string(),
        "Internal Server Error while restoring: reading block 9"
    );
}

#[test]
fn fault_converts_into_anyhow() {
    fn handler() -> anyhow::Result<()> {
        let limited: Result<(), Fault> = Err(fast_new(&catalog::RATE_LIMIT));
        limited?;
        Ok(())
    }
    let err = handler().unwrap_err();
    let fault = err.downcast_ref::<Fault>().expect("fault preserved");
    assert_eq!(fault.http_status(), 429);
}

// ── chain traversal ──────────────────────────────────────────────────

#[test]
fn unwrap_walks_every_link() {
    let root = std::io::Error::other("socket closed");
    let inner = fast_wrap(root, &catalog::TIMEOUT);
    let outer = faultline_error::Builder::new()
        .with_code(&catalog::INTERNAL)
        .with_message("checkout failed")
        .with_cause(inner)
        .with_fast_mode(true)
        .build();

    let mut chain = Vec::new();
    let mut current: Option<&(dyn Error + 'static)> = Some(&outer);
    while let Some(e) = current {
        chain.push(e.to_string());
        current = e.source();
    }
    assert_eq!(
        chain,
        [
            "checkout failed: Request Timeout: socket closed",
            "Request Timeout: socket closed",
            "socket closed",
        ]
    );
}

#[test]
fn cause_handle_rewraps_to_inner_fault() {
    let outer = faultline_error::Builder::new()
        .with_cause(fast_new(&catalog::NOT_FOUND))
        .with_fast_mode(true)
        .build();
    let cause: Cause = outer.cause().expect("cause recorded").clone();
    assert!(is_fault(&*cause));

    let rewrapped = fast_wrap(cause, &catalog::INTERNAL);
    assert_eq!(rewrapped.code(), "NOT_FOUND");
    assert_eq!(rewrapped.to_string(), "Not Found");
}

#[test]
fn boxed_and_arced_faults_are_not_double_wrapped() {
    let boxed = wrap(Box::new(fast_new(&catalog::FORBIDDEN)), &catalog::INTERNAL);
    assert_eq!(boxed.code(), "FORBIDDEN");
    assert_eq!(boxed.to_string(), "Forbidden");

    let arced = wrap(Arc::new(fast_new(&catalog::CONFLICT)), &catalog::INTERNAL);
    assert_eq!(arced.code(), "CONFLICT");
    assert_eq!(arced.to_string(), "Resource Conflict");
}

#[test]
fn anyhow_over_shared_fault_is_searched() {
    let shared: Cause = Arc::new(fast_new(&catalog::RATE_LIMIT));
    let err = anyhow::Error::new(shared).context("calling billing");
    let wrapped = wrap(err, &catalog::INTERNAL);
    assert_eq!(wrapped.code(), "RATE_LIMIT");
}

#[test]
fn builder_cause_does_not_collapse() {
    let inner = fast_new(&catalog::NOT_FOUND);
    let outer = faultline_error::Builder::new()
        .with_cause(inner)
        .with_fast_mode(true)
        .build();
    assert_eq!(outer.code(), "INTERNAL");
    assert_eq!(
        find_fault(outer.source().unwrap()).map(Fault::code),
        Some("NOT_FOUND")
    );
}

#[test]
fn result_ok_passes_through_untouched() {
    let ok: Result<Vec<u8>, std::io::Error> = Ok(vec![1, 2, 3]);
    assert_eq!(ok.wrap_err(&catalog::INTERNAL).unwrap(), [1, 2, 3]);
}

#[test]
fn question_mark_with_wrap_err() {
    fn service() -> Result<String, Fault> {
        let name = load_user(3).fast_wrap_err(&catalog::INTERNAL)?;
        Ok(name)
    }
    let err = service().unwrap_err();
    assert_eq!(err.code(), "NOT_FOUND");
}
