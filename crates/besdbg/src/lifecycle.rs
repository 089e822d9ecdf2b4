//! Wake line, reset and function enable sequencing.

use core::cell::RefCell;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{OutputPin, PinState};
use portable_atomic::{AtomicU8, Ordering};
use sdio_bus::{BusGuard, SdioFunc};

use crate::error::Error;
use crate::fmt::Dbg;

/// Where the device is in its attach/detach lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u8)]
pub enum LifecycleState {
    Unattached = 0,
    /// Wake line high and settled; function not enabled yet.
    WakeAsserted = 1,
    FunctionEnabled = 2,
    /// Attached, but enabling the function failed. Transfers will most
    /// likely fail until a reset succeeds.
    FunctionDisabledButAttached = 3,
    Detached = 4,
}

impl LifecycleState {
    fn from_u8(raw: u8) -> Self {
        match raw {
            1 => LifecycleState::WakeAsserted,
            2 => LifecycleState::FunctionEnabled,
            3 => LifecycleState::FunctionDisabledButAttached,
            4 => LifecycleState::Detached,
            _ => LifecycleState::Unattached,
        }
    }

    /// Whether requests may be served in this state.
    pub fn is_attached(self) -> bool {
        matches!(
            self,
            LifecycleState::WakeAsserted
                | LifecycleState::FunctionEnabled
                | LifecycleState::FunctionDisabledButAttached
        )
    }
}

struct WakeControl<W, D> {
    line: W,
    delay: D,
}

impl<W: OutputPin, D: DelayNs> WakeControl<W, D> {
    fn drive(&mut self, level: PinState) -> Result<(), W::Error> {
        self.line.set_state(level)
    }

    /// Drive low, logging a failure instead of returning it.
    fn release(&mut self) {
        if let Err(e) = self.drive(PinState::Low) {
            warn!("unable to deassert wake line: {:?}", Dbg(&e));
        }
    }
}

/// Drives the device through its lifecycle.
///
/// The wake line and delay provider sit in their own lock so lifecycle
/// steps can run through `&self`. That lock is always taken before the
/// bus guard, never after.
pub struct Lifecycle<M: RawMutex, W, D> {
    wake: Mutex<M, RefCell<WakeControl<W, D>>>,
    settle_delay_ms: u32,
    state: AtomicU8,
}

impl<M, W, D> Lifecycle<M, W, D>
where
    M: RawMutex,
    W: OutputPin,
    D: DelayNs,
{
    pub fn new(line: W, delay: D, settle_delay_ms: u32) -> Self {
        Self {
            wake: Mutex::new(RefCell::new(WakeControl { line, delay })),
            settle_delay_ms,
            state: AtomicU8::new(LifecycleState::Unattached as u8),
        }
    }

    pub fn state(&self) -> LifecycleState {
        LifecycleState::from_u8(self.state.load(Ordering::Acquire))
    }

    fn set_state(&self, state: LifecycleState) {
        trace!("lifecycle -> {:?}", state);
        self.state.store(state as u8, Ordering::Release);
    }

    /// Raise the wake line and wait for the chip to settle.
    pub fn power_up<E>(&self) -> Result<(), Error<E>> {
        self.wake.lock(|cell| {
            let mut wake = cell.borrow_mut();
            wake.drive(PinState::High).map_err(|e| {
                error!("unable to assert wake line: {:?}", Dbg(&e));
                Error::WakeLine
            })?;
            wake.delay.delay_ms(self.settle_delay_ms);
            self.set_state(LifecycleState::WakeAsserted);
            Ok(())
        })
    }

    /// Enable the function. A failure is logged and the device stays
    /// attached in [`LifecycleState::FunctionDisabledButAttached`].
    pub fn enable_function<F: SdioFunc>(
        &self,
        bus: &BusGuard<M, F>,
    ) -> LifecycleState {
        let state = match bus.with_bus_claimed(|claim| claim.enable_func()) {
            Ok(()) => LifecycleState::FunctionEnabled,
            Err(e) => {
                warn!("can't enable func: {:?}", Dbg(&e));
                LifecycleState::FunctionDisabledButAttached
            }
        };
        self.set_state(state);
        state
    }

    /// Power-cycle the chip and bring the function back up.
    ///
    /// A failed hardware reset is logged and the sequence carries on. A
    /// failed re-enable ends the reset with [`Error::Bus`]; the wake line
    /// stays high.
    pub fn reset<F: SdioFunc>(
        &self,
        bus: &BusGuard<M, F>,
    ) -> Result<(), Error<F::Error>> {
        self.wake.lock(|cell| {
            let mut wake = cell.borrow_mut();

            wake.release();

            if let Err(e) = bus.with_bus_claimed(|claim| claim.hw_reset()) {
                warn!("unable to reset sdio: {:?}", Dbg(&e));
            }

            if let Err(e) = wake.drive(PinState::High) {
                warn!("unable to assert wake line: {:?}", Dbg(&e));
            }
            wake.delay.delay_ms(self.settle_delay_ms);

            match bus.with_bus_claimed(|claim| claim.enable_func()) {
                Ok(()) => {
                    self.set_state(LifecycleState::FunctionEnabled);
                    Ok(())
                }
                Err(e) => {
                    error!("can't re-enable func after reset: {:?}", Dbg(&e));
                    self.set_state(LifecycleState::FunctionDisabledButAttached);
                    Err(Error::Bus(e))
                }
            }
        })
    }

    /// Disable the function and drop the wake line. Does nothing if the
    /// device is not attached.
    pub fn shutdown<F: SdioFunc>(&self, bus: &BusGuard<M, F>) {
        if !self.state().is_attached() {
            return;
        }

        if let Err(e) = bus.with_bus_claimed(|claim| claim.disable_func()) {
            warn!("can't disable func: {:?}", Dbg(&e));
        }

        self.wake.lock(|cell| cell.borrow_mut().release());
        self.set_state(LifecycleState::Detached);
    }

    /// Drop the wake line without touching the bus.
    pub fn power_down(&self) {
        self.wake.lock(|cell| cell.borrow_mut().release());
        self.set_state(LifecycleState::Unattached);
    }
}
