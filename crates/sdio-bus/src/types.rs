use bitflags::bitflags;

/// Wildcard for either half of an [`SdioDeviceId`].
pub const SDIO_ANY_ID: u16 = 0xffff;

/// Vendor/device pair used to bind a driver to a function.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SdioDeviceId {
    pub vendor: u16,
    pub device: u16,
}

impl SdioDeviceId {
    pub const fn new(vendor: u16, device: u16) -> Self {
        Self { vendor, device }
    }

    /// Whether `self`, taken as an id-table entry, accepts `id`.
    pub fn matches(&self, id: &SdioDeviceId) -> bool {
        (self.vendor == SDIO_ANY_ID || self.vendor == id.vendor)
            && (self.device == SDIO_ANY_ID || self.device == id.device)
    }
}

bitflags! {
    /// Card quirks understood by the MMC core.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct CardQuirks: u32 {
        /// Allow CMD52 access to function 0 registers outside the CCCR.
        const LENIENT_FN0          = 1 << 0;
        /// Use the function block size for byte-mode transfers.
        const BLKSZ_FOR_BYTE_MODE  = 1 << 1;
        /// Card has a non-standard CCCR/CIS layout.
        const NONSTD_SDIO          = 1 << 2;
        /// Byte-mode transfers of 512 bytes are broken; use block mode.
        const BROKEN_BYTE_MODE_512 = 1 << 8;
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CardQuirks {
    fn format(&self, f: defmt::Formatter) {
        defmt::write!(f, "CardQuirks({=u32:#x})", self.bits())
    }
}
