use portable_atomic::{AtomicBool, Ordering};

use crate::func::SdioFunc;

/// RAII proof that the host is claimed.
///
/// Created only by [`BusGuard::with_bus_claimed`](crate::BusGuard::with_bus_claimed).
/// Dropping the claim releases the host, so the host is given back on
/// every path out of the guarded closure, including unwinding.
pub struct HostClaim<'a, F: SdioFunc> {
    func: &'a mut F,
    held: &'a AtomicBool,
}

impl<F: SdioFunc> Drop for HostClaim<'_, F> {
    fn drop(&mut self) {
        self.func.release_host();
        self.held.store(false, Ordering::Release);
    }
}

impl<'a, F: SdioFunc> HostClaim<'a, F> {
    /// Claim the host. Only called by `BusGuard`.
    pub(crate) fn new(func: &'a mut F, held: &'a AtomicBool) -> Self {
        func.claim_host();
        held.store(true, Ordering::Release);
        Self { func, held }
    }

    #[inline]
    pub fn readb(&mut self, addr: u32) -> Result<u8, F::Error> {
        self.func.readb(addr)
    }

    #[inline]
    pub fn writeb(&mut self, addr: u32, value: u8) -> Result<(), F::Error> {
        self.func.writeb(addr, value)
    }

    #[inline]
    pub fn memcpy_fromio(
        &mut self,
        addr: u32,
        dst: &mut [u8],
    ) -> Result<(), F::Error> {
        self.func.memcpy_fromio(addr, dst)
    }

    #[inline]
    pub fn memcpy_toio(&mut self, addr: u32, src: &[u8]) -> Result<(), F::Error> {
        self.func.memcpy_toio(addr, src)
    }

    pub fn enable_func(&mut self) -> Result<(), F::Error> {
        self.func.enable_func()
    }

    pub fn disable_func(&mut self) -> Result<(), F::Error> {
        self.func.disable_func()
    }

    pub fn hw_reset(&mut self) -> Result<(), F::Error> {
        self.func.hw_reset()
    }

    /// Read-only access to the claimed function.
    pub fn func(&self) -> &F {
        self.func
    }
}
