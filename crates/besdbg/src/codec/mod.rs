//! Translation of requests into bus primitives.
//!
//! Every function here takes a [`HostClaim`], so it can only run inside
//! [`BusGuard::with_bus_claimed`](sdio_bus::BusGuard::with_bus_claimed).
//! Length and pointer checks belong to the dispatcher.

pub mod block;
pub mod register;

use sdio_bus::{HostClaim, SdioFunc};

use crate::request::TransferKind;

pub(crate) fn read<F: SdioFunc>(
    claim: &mut HostClaim<'_, F>,
    kind: TransferKind,
    addr: u32,
    dst: &mut [u8],
) -> Result<(), F::Error> {
    if kind.is_block() {
        block::read(claim, addr, dst)
    } else {
        register::read(claim, addr, dst)
    }
}

pub(crate) fn write<F: SdioFunc>(
    claim: &mut HostClaim<'_, F>,
    kind: TransferKind,
    addr: u32,
    src: &[u8],
) -> Result<(), F::Error> {
    if kind.is_block() {
        block::write(claim, addr, src)
    } else {
        register::write(claim, addr, src)
    }
}
