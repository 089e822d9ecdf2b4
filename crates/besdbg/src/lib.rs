#![no_std]
//! Debug access to a BES2600 over SDIO.
//!
//! A control client reads and writes the chip's CMD52 registers and its
//! CMD53-addressed memory, and can power-cycle it, through a handful of
//! bounded requests. All bus traffic for one device is serialized by an
//! [`sdio_bus::BusGuard`], so concurrent clients never interleave their
//! byte-wise register sequences.

extern crate alloc;

// This mod MUST go first, so that the others see its macros.
pub(crate) mod fmt;

pub mod codec;
mod config;
mod device;
mod driver;
mod error;
pub mod lifecycle;
mod platform;
mod request;

pub use crate::config::{DriverConfig, BES2600_IDS, WAKE_SETTLE_MS};
pub use crate::device::BesDevice;
pub use crate::driver::Driver;
pub use crate::error::Error;
pub use crate::lifecycle::LifecycleState;
pub use crate::platform::{
    ChannelRegistry, DevNum, Fault, UserAccess, UserPtr, WakeLineProvider,
};
pub use crate::request::TransferKind;

pub use besdbg_icd as icd;
pub use sdio_bus;
