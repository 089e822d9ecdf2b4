#![no_std]
//! Exclusive access to an SDIO function.
//!
//! An [`SdioFunc`] is the transport a driver talks to: byte-wide (CMD52)
//! and block (CMD53) transfers, function enable/disable and card reset.
//! None of those may run unless the host is claimed, so the function is
//! moved into a [`BusGuard`] and the transfer primitives are only
//! reachable through the [`HostClaim`] handed out by
//! [`BusGuard::with_bus_claimed`].

mod claim;
mod func;
mod guard;
mod types;

pub use claim::HostClaim;
pub use func::SdioFunc;
pub use guard::BusGuard;
pub use types::{CardQuirks, SdioDeviceId, SDIO_ANY_ID};
