use sdio_bus::{CardQuirks, SdioDeviceId};

/// Vendor/device ids the driver binds to.
pub const BES2600_IDS: &[SdioDeviceId] = &[SdioDeviceId::new(0xbe57, 0x2002)];

/// Wait after raising the wake line before the chip answers on the bus.
pub const WAKE_SETTLE_MS: u32 = 10;

/// Static parameters of a [`Driver`](crate::Driver).
#[derive(Debug, Clone, Copy)]
pub struct DriverConfig {
    /// Driver name as registered with the bus core.
    pub name: &'static str,
    /// Name of the published control channel.
    pub channel_name: &'static str,
    /// Device-tree `compatible` the function's node must carry.
    pub compatible: &'static str,
    /// The only function number the driver attaches to.
    pub function: u8,
    pub id_table: &'static [SdioDeviceId],
    /// Consumer name of the wake GPIO.
    pub wake_line: &'static str,
    pub settle_delay_ms: u32,
    /// Quirks applied to the card at probe time.
    pub quirks: CardQuirks,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            name: "besdbg_sdio",
            channel_name: "besdbg",
            compatible: "bestechnic,bes2600",
            function: 1,
            id_table: BES2600_IDS,
            wake_line: "device-wakeup",
            settle_delay_ms: WAKE_SETTLE_MS,
            quirks: CardQuirks::LENIENT_FN0
                .union(CardQuirks::BROKEN_BYTE_MODE_512),
        }
    }
}
