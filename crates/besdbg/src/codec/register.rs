//! CMD52 register access.
//!
//! The chip's SDIO slave registers are only reachable one byte at a
//! time. A WORD or DWORD register is read or written as consecutive
//! bytes; combining them is up to the caller.

use sdio_bus::{HostClaim, SdioFunc};

/// Read `dst.len()` bytes starting at `addr`, one CMD52 per byte.
///
/// Stops at the first failing byte. `dst` is partially written in that
/// case and must be discarded.
pub fn read<F: SdioFunc>(
    claim: &mut HostClaim<'_, F>,
    addr: u32,
    dst: &mut [u8],
) -> Result<(), F::Error> {
    for (offset, byte) in dst.iter_mut().enumerate() {
        *byte = claim.readb(addr.wrapping_add(offset as u32))?;
    }
    Ok(())
}

/// Write `src` starting at `addr`, one CMD52 per byte.
pub fn write<F: SdioFunc>(
    claim: &mut HostClaim<'_, F>,
    addr: u32,
    src: &[u8],
) -> Result<(), F::Error> {
    for (offset, &byte) in src.iter().enumerate() {
        claim.writeb(addr.wrapping_add(offset as u32), byte)?;
    }
    Ok(())
}
