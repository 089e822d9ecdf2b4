//! CMD53 memory access. Block sizing is left to the transport.

use sdio_bus::{HostClaim, SdioFunc};

pub fn read<F: SdioFunc>(
    claim: &mut HostClaim<'_, F>,
    addr: u32,
    dst: &mut [u8],
) -> Result<(), F::Error> {
    claim.memcpy_fromio(addr, dst)
}

pub fn write<F: SdioFunc>(
    claim: &mut HostClaim<'_, F>,
    addr: u32,
    src: &[u8],
) -> Result<(), F::Error> {
    claim.memcpy_toio(addr, src)
}
