use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use sdio_bus::{BusGuard, SdioDeviceId, SdioFunc};

use besdbg_icd::Errno;

use crate::config::DriverConfig;
use crate::device::BesDevice;
use crate::error::Error;
use crate::lifecycle::Lifecycle;
use crate::platform::{ChannelRegistry, DevNum, WakeLineProvider};

/// The debug driver: binds BES2600 functions and publishes one control
/// channel per attached device in the registry it owns.
pub struct Driver<R: ChannelRegistry> {
    registry: R,
    config: DriverConfig,
}

impl<R: ChannelRegistry> Driver<R> {
    pub fn new(registry: R) -> Self {
        Self::with_config(registry, DriverConfig::default())
    }

    pub fn with_config(registry: R, config: DriverConfig) -> Self {
        Self { registry, config }
    }

    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    pub fn registry(&self) -> &R {
        &self.registry
    }

    /// Tear the driver down and hand the registry back.
    pub fn into_registry(self) -> R {
        self.registry
    }

    /// Whether `id` is in the driver's id table.
    pub fn matches(&self, id: &SdioDeviceId) -> bool {
        self.config.id_table.iter().any(|entry| entry.matches(id))
    }

    /// Attach to `func`.
    ///
    /// On success the wake line is high, the control channel is published
    /// and the function is enabled, or left disabled if enabling failed.
    /// On failure everything done so far is undone in reverse order and
    /// `func` and the wake line are dropped.
    pub fn probe<M, F, G, D>(
        &mut self,
        mut func: F,
        gpio: &mut G,
        delay: D,
    ) -> Result<BesDevice<M, F, G::Line, D>, Error<F::Error>>
    where
        M: RawMutex,
        F: SdioFunc,
        G: WakeLineProvider,
        D: DelayNs,
    {
        let config = self.config;

        if func.num() != config.function || !self.matches(&func.id()) {
            debug!("not binding to function {}", func.num());
            return Err(Error::NoDevice);
        }

        info!("probe start");

        if !func.is_compatible(config.compatible) {
            error!("OF node for function {} is missing", config.function);
            return Err(Error::NoDevice);
        }

        func.add_quirks(config.quirks);

        let line = gpio
            .get_output(config.wake_line, PinState::Low)
            .map_err(|e| {
                error!("can't get {} gpio: {}", config.wake_line, e);
                Error::Os(e)
            })?;

        let lifecycle: Lifecycle<M, G::Line, D> =
            Lifecycle::new(line, delay, config.settle_delay_ms);
        lifecycle.power_up()?;

        let devt = match self.publish_channel() {
            Ok(devt) => devt,
            Err(e) => {
                lifecycle.power_down();
                return Err(Error::Os(e));
            }
        };

        let device = BesDevice::new(BusGuard::new(func), lifecycle, devt);
        device.lifecycle.enable_function(&device.bus);

        info!("probe success");
        Ok(device)
    }

    fn publish_channel(&mut self) -> Result<DevNum, Errno> {
        let name = self.config.channel_name;

        let devt = self.registry.alloc_region(name).map_err(|e| {
            error!("can't allocate chrdev region: {}", e);
            e
        })?;

        if let Err(e) = self.registry.add_channel(devt) {
            error!("can't add cdev: {}", e);
            self.registry.free_region(devt);
            return Err(e);
        }

        if let Err(e) = self.registry.publish(devt, name) {
            error!("can't create device node: {}", e);
            self.registry.del_channel(devt);
            self.registry.free_region(devt);
            return Err(e);
        }

        Ok(devt)
    }

    /// Detach `device`: retract its channel, disable the function and
    /// drop the wake line. Calling it again is harmless.
    pub fn remove<M, F, W, D>(&mut self, device: &mut BesDevice<M, F, W, D>)
    where
        M: RawMutex,
        F: SdioFunc,
        W: OutputPin,
        D: DelayNs,
    {
        if let Some(devt) = device.devt.take() {
            self.registry.retract(devt);
            self.registry.del_channel(devt);
            self.registry.free_region(devt);
        }

        device.lifecycle.shutdown(&device.bus);
    }
}
