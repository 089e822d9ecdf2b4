use crate::types::{CardQuirks, SdioDeviceId};

/// Abstracts a single function of an SDIO card.
///
/// Identity queries ([`num`](Self::num), [`id`](Self::id),
/// [`is_compatible`](Self::is_compatible)) and [`add_quirks`](Self::add_quirks)
/// are usable before the function is handed to a
/// [`BusGuard`](crate::BusGuard). Everything else requires the host to be
/// claimed and is reached through a [`HostClaim`](crate::HostClaim).
pub trait SdioFunc {
    /// Transport error reported by a failed command.
    type Error: core::fmt::Debug;

    /// Function number on the card (0 is the common I/O area).
    fn num(&self) -> u8;

    /// Vendor/device pair read from the function's CIS.
    fn id(&self) -> SdioDeviceId;

    /// Whether the device-tree node bound to this function carries the
    /// given `compatible` string.
    fn is_compatible(&self, compatible: &str) -> bool;

    /// OR the given quirks into the card's quirk set.
    fn add_quirks(&mut self, quirks: CardQuirks);

    /// Take exclusive ownership of the host controller.
    fn claim_host(&mut self);

    /// Give the host controller back.
    fn release_host(&mut self);

    /// Single-byte read (CMD52).
    fn readb(&mut self, addr: u32) -> Result<u8, Self::Error>;

    /// Single-byte write (CMD52).
    fn writeb(&mut self, addr: u32, value: u8) -> Result<(), Self::Error>;

    /// Block read from a fixed base address (CMD53). The transport picks
    /// the block size and splits the transfer as it sees fit.
    fn memcpy_fromio(
        &mut self,
        addr: u32,
        dst: &mut [u8],
    ) -> Result<(), Self::Error>;

    /// Block write to a fixed base address (CMD53).
    fn memcpy_toio(&mut self, addr: u32, src: &[u8])
        -> Result<(), Self::Error>;

    fn enable_func(&mut self) -> Result<(), Self::Error>;

    fn disable_func(&mut self) -> Result<(), Self::Error>;

    /// Hardware reset of the card the function lives on.
    fn hw_reset(&mut self) -> Result<(), Self::Error>;
}
