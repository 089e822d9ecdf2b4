//! Services the driver consumes from its host environment.

use besdbg_icd::Errno;
use embedded_hal::digital::{OutputPin, PinState};

/// Address in the control client's memory.
///
/// Never dereferenced by the driver; only handed back to [`UserAccess`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct UserPtr(u64);

impl UserPtr {
    pub const fn new(addr: u64) -> Self {
        Self(addr)
    }

    pub const fn addr(self) -> u64 {
        self.0
    }

    pub const fn is_null(self) -> bool {
        self.0 == 0
    }
}

/// A copy across the client boundary touched memory it may not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Fault;

/// Copies between driver-owned buffers and client memory.
pub trait UserAccess {
    /// Fill `dst` from `dst.len()` bytes at `src`.
    fn copy_from_user(&mut self, dst: &mut [u8], src: UserPtr)
        -> Result<(), Fault>;

    /// Write all of `src` to client memory at `dst`.
    fn copy_to_user(&mut self, dst: UserPtr, src: &[u8]) -> Result<(), Fault>;
}

/// Major/minor pair identifying a published control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DevNum {
    pub major: u32,
    pub minor: u32,
}

/// The device class control channels are published in.
///
/// Publishing is three steps and each has an inverse; the driver undoes
/// them in reverse order.
pub trait ChannelRegistry {
    /// Reserve a channel number.
    fn alloc_region(&mut self, name: &'static str) -> Result<DevNum, Errno>;

    /// Make the channel reachable.
    fn add_channel(&mut self, devt: DevNum) -> Result<(), Errno>;

    /// Create the visible node for the channel in the class.
    fn publish(&mut self, devt: DevNum, name: &'static str)
        -> Result<(), Errno>;

    fn retract(&mut self, devt: DevNum);

    fn del_channel(&mut self, devt: DevNum);

    fn free_region(&mut self, devt: DevNum);
}

/// Hands out GPIO lines by consumer name.
///
/// A line is released when it is dropped.
pub trait WakeLineProvider {
    type Line: OutputPin;

    fn get_output(
        &mut self,
        con_id: &'static str,
        initial: PinState,
    ) -> Result<Self::Line, Errno>;
}
