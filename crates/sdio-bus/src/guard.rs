use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use portable_atomic::{AtomicBool, AtomicUsize, Ordering};

use crate::claim::HostClaim;
use crate::func::SdioFunc;

/// Serializes every use of an SDIO function.
///
/// The function is owned by the guard. [`with_bus_claimed`](Self::with_bus_claimed)
/// locks it, claims the host, runs the closure, and releases the host
/// before the lock is dropped. Callers contend on `M`; there is no
/// acquisition timeout, so a stuck transfer blocks everyone behind it.
pub struct BusGuard<M: RawMutex, F: SdioFunc> {
    func: Mutex<M, RefCell<F>>,
    held: AtomicBool,
    claims: AtomicUsize,
}

impl<M: RawMutex, F: SdioFunc> BusGuard<M, F> {
    /// Take ownership of `func`.
    pub const fn new(func: F) -> Self {
        Self {
            func: Mutex::new(RefCell::new(func)),
            held: AtomicBool::new(false),
            claims: AtomicUsize::new(0),
        }
    }

    /// Run `f` with the host claimed.
    ///
    /// The host is released when `f` returns, whatever it returns.
    ///
    /// # Panics
    ///
    /// Panics if called again from inside `f`.
    pub fn with_bus_claimed<R>(
        &self,
        f: impl FnOnce(&mut HostClaim<'_, F>) -> R,
    ) -> R {
        self.func.lock(|cell| {
            let mut func = cell.borrow_mut();
            self.claims.fetch_add(1, Ordering::Relaxed);
            let mut claim = HostClaim::new(&mut *func, &self.held);
            f(&mut claim)
        })
    }

    /// Whether a claim is outstanding right now.
    pub fn is_claimed(&self) -> bool {
        self.held.load(Ordering::Acquire)
    }

    /// Number of claims served since construction.
    pub fn claim_count(&self) -> usize {
        self.claims.load(Ordering::Relaxed)
    }

    /// Give the function back.
    pub fn into_inner(self) -> F {
        self.func.into_inner().into_inner()
    }
}
