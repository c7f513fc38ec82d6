// SPDX-License-Identifier: MIT OR Apache-2.0
//! Reuse pool for [`Fault`] storage.
//!
//! High-throughput paths can recycle fault allocations (chiefly the message
//! buffer) instead of building a new value per error. A [`PooledFault`] is
//! exclusively owned by its holder; dropping it clears every field and
//! hands the storage back, on normal return and during unwinding alike.

use std::fmt;
use std::mem;
use std::ops::{Deref, DerefMut};
use std::sync::{Mutex, PoisonError};
use tracing::trace;

use crate::fault::WrapTarget;
use crate::settings::Capture;
use crate::{BoxError, Cause, ErrorCode, Fault};

/// Bounded free list of recycled faults.
///
/// ```
/// use faultline_error::{FaultPool, catalog};
///
/// let pool = FaultPool::new(4);
/// {
///     let err = pool.acquire_fast(&catalog::RATE_LIMIT);
///     assert_eq!(err.http_status(), 429);
/// }
/// assert_eq!(pool.available(), 1);
/// ```
#[derive(Debug)]
pub struct FaultPool {
    free: Mutex<Vec<Fault>>,
    capacity: usize,
}

impl FaultPool {
    /// Create a pool retaining at most `capacity` idle faults.
    pub fn new(capacity: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(capacity)),
            capacity,
        }
    }

    /// Maximum number of idle faults kept.
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of idle faults ready for reuse.
    pub fn available(&self) -> usize {
        self.lock().len()
    }

    /// Pooled equivalent of [`new`](crate::new).
    pub fn acquire(&self, code: &ErrorCode) -> PooledFault<'_> {
        self.fill(code, format_args!("{}", code.message()), None, Capture::Simplified)
    }

    /// Pooled equivalent of [`fast_new`](crate::fast_new).
    pub fn acquire_fast(&self, code: &ErrorCode) -> PooledFault<'_> {
        self.fill(code, format_args!("{}", code.message()), None, Capture::Skip)
    }

    /// Pooled equivalent of [`newf`](crate::newf).
    pub fn acquire_fmt(&self, code: &ErrorCode, args: fmt::Arguments<'_>) -> PooledFault<'_> {
        self.fill(code, args, None, Capture::Simplified)
    }

    /// Pooled equivalent of [`fast_newf`](crate::fast_newf).
    pub fn acquire_fmt_fast(&self, code: &ErrorCode, args: fmt::Arguments<'_>) -> PooledFault<'_> {
        self.fill(code, args, None, Capture::Skip)
    }

    /// Pooled equivalent of [`wrap`](crate::wrap).
    ///
    /// An existing fault in `err`'s chain is handed out as-is, exactly like
    /// the unpooled form.
    pub fn acquire_wrapped(&self, err: impl Into<BoxError>, code: &ErrorCode) -> PooledFault<'_> {
        match WrapTarget::classify(err.into()) {
            WrapTarget::Existing(fault) => self.hold(fault),
            WrapTarget::Foreign(cause) => self.fill(
                code,
                format_args!("{}", code.message()),
                Some(cause),
                Capture::Simplified,
            ),
        }
    }

    fn fill(
        &self,
        code: &ErrorCode,
        message: fmt::Arguments<'_>,
        cause: Option<Cause>,
        capture: Capture,
    ) -> PooledFault<'_> {
        let mut fault = self.lock().pop().unwrap_or_else(Fault::blank);
        fault.refill(code, message, cause, capture);
        self.hold(fault)
    }

    fn hold(&self, fault: Fault) -> PooledFault<'_> {
        PooledFault {
            pool: self,
            fault,
            detached: false,
        }
    }

    fn release(&self, mut fault: Fault) {
        fault.reset();
        let mut free = self.lock();
        if free.len() < self.capacity {
            free.push(fault);
        } else {
            trace!(capacity = self.capacity, "fault pool full; dropping storage");
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<Fault>> {
        // Idle faults are always reset, so a poisoned list is still valid.
        self.free.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Default for FaultPool {
    fn default() -> Self {
        Self::new(64)
    }
}

/// A fault on loan from a [`FaultPool`].
pub struct PooledFault<'p> {
    pool: &'p FaultPool,
    fault: Fault,
    detached: bool,
}

impl PooledFault<'_> {
    /// Take the fault out of the pool for good.
    pub fn into_fault(mut self) -> Fault {
        self.detached = true;
        mem::replace(&mut self.fault, Fault::blank())
    }
}

impl Deref for PooledFault<'_> {
    type Target = Fault;

    fn deref(&self) -> &Fault {
        &self.fault
    }
}

impl DerefMut for PooledFault<'_> {
    fn deref_mut(&mut self) -> &mut Fault {
        &mut self.fault
    }
}

impl fmt::Debug for PooledFault<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&self.fault, f)
    }
}

impl fmt::Display for PooledFault<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.fault, f)
    }
}

impl Drop for PooledFault<'_> {
    fn drop(&mut self) {
        if !self.detached {
            self.pool.release(mem::replace(&mut self.fault, Fault::blank()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{catalog, fast_new};
    use std::panic::{self, AssertUnwindSafe};

    #[test]
    fn acquire_sets_identity() {
        let pool = FaultPool::new(2);
        let f = pool.acquire_fast(&catalog::NOT_FOUND);
        assert_eq!(f.code(), "NOT_FOUND");
        assert_eq!(f.message(), "Not Found");
        assert_eq!(f.stack_trace(), "");
    }

    #[test]
    fn drop_returns_storage() {
        let pool = FaultPool::new(2);
        assert_eq!(pool.available(), 0);
        drop(pool.acquire_fast(&catalog::INTERNAL));
        assert_eq!(pool.available(), 1);
        let _held = pool.acquire_fast(&catalog::INTERNAL);
        assert_eq!(pool.available(), 0);
    }

    #[test]
    fn reuse_never_leaks_previous_state() {
        let pool = FaultPool::new(1);
        {
            let mut f = pool.acquire_wrapped(std::io::Error::other("disk full"), &catalog::INTERNAL);
            f.insert_metadata("path", "/var/data");
            assert!(f.cause().is_some());
        }
        let f = pool.acquire_fmt_fast(&catalog::TIMEOUT, format_args!("{}ms", 250));
        assert_eq!(f.message(), "250ms");
        assert!(f.cause().is_none());
        assert!(f.metadata().is_none());
        assert_eq!(f.to_string(), "250ms");
    }

    #[test]
    fn capacity_bounds_retained_storage() {
        let pool = FaultPool::new(2);
        let a = pool.acquire_fast(&catalog::INTERNAL);
        let b = pool.acquire_fast(&catalog::INTERNAL);
        let c = pool.acquire_fast(&catalog::INTERNAL);
        drop((a, b, c));
        assert_eq!(pool.available(), 2);
    }

    #[test]
    fn into_fault_detaches() {
        let pool = FaultPool::new(2);
        let owned = pool.acquire_fast(&catalog::FORBIDDEN).into_fault();
        assert_eq!(pool.available(), 0);
        assert_eq!(owned.code(), "FORBIDDEN");
    }

    #[test]
    fn wrapped_fault_passes_through() {
        let pool = FaultPool::new(2);
        let original = fast_new(&catalog::CONFLICT);
        let stamp = original.timestamp();
        let f = pool.acquire_wrapped(original, &catalog::INTERNAL);
        assert_eq!(f.code(), "CONFLICT");
        assert_eq!(f.timestamp(), stamp);
    }

    #[test]
    fn wrapped_shared_cause_passes_through() {
        let pool = FaultPool::new(2);
        let shared: Cause = std::sync::Arc::new(fast_new(&catalog::NOT_FOUND));
        let f = pool.acquire_wrapped(shared, &catalog::INTERNAL);
        assert_eq!(f.code(), "NOT_FOUND");
        assert!(f.cause().is_none());
    }

    #[test]
    fn released_on_unwind() {
        let pool = FaultPool::new(2);
        let result = panic::catch_unwind(AssertUnwindSafe(|| {
            let _f = pool.acquire_fast(&catalog::INTERNAL);
            panic!("handler blew up");
        }));
        assert!(result.is_err());
        assert_eq!(pool.available(), 1);
    }

    #[test]
    fn concurrent_acquire_release() {
        let pool = FaultPool::new(8);
        std::thread::scope(|s| {
            for t in 0..8 {
                let pool = &pool;
                s.spawn(move || {
                    for i in 0..200 {
                        let mut f =
                            pool.acquire_fmt_fast(&catalog::RATE_LIMIT, format_args!("{t}-{i}"));
                        assert!(f.metadata().is_none());
                        f.insert_metadata("thread", t);
                        assert_eq!(f.message(), format!("{t}-{i}"));
                    }
                });
            }
        });
        assert!(pool.available() <= pool.capacity());
    }
}
