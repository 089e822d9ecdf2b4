use alloc::vec::Vec;

use besdbg_icd::{BesdbgData, Command};
use embassy_sync::blocking_mutex::raw::RawMutex;
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;
use sdio_bus::{BusGuard, SdioFunc};

use crate::codec;
use crate::error::Error;
use crate::fmt::Dbg;
use crate::lifecycle::{Lifecycle, LifecycleState};
use crate::platform::{DevNum, UserAccess, UserPtr};
use crate::request::TransferKind;

/// One attached BES2600 function.
///
/// Shared by reference between callers; every bus access goes through
/// the device's [`BusGuard`]. Created by [`Driver::probe`](crate::Driver::probe)
/// and torn down by [`Driver::remove`](crate::Driver::remove).
pub struct BesDevice<M: RawMutex, F: SdioFunc, W, D> {
    pub(crate) bus: BusGuard<M, F>,
    pub(crate) lifecycle: Lifecycle<M, W, D>,
    pub(crate) devt: Option<DevNum>,
}

/// Allocate the per-request buffer without aborting on exhaustion.
fn stage<E>(len: usize) -> Result<Vec<u8>, Error<E>> {
    let mut buf = Vec::new();
    buf.try_reserve_exact(len)
        .map_err(|_| Error::ResourceExhausted)?;
    buf.resize(len, 0);
    Ok(buf)
}

impl<M, F, W, D> BesDevice<M, F, W, D>
where
    M: RawMutex,
    F: SdioFunc,
    W: OutputPin,
    D: DelayNs,
{
    pub(crate) fn new(
        bus: BusGuard<M, F>,
        lifecycle: Lifecycle<M, W, D>,
        devt: DevNum,
    ) -> Self {
        Self { bus, lifecycle, devt: Some(devt) }
    }

    pub fn state(&self) -> LifecycleState {
        self.lifecycle.state()
    }

    /// Control channel this device is published under, until removed.
    pub fn devt(&self) -> Option<DevNum> {
        self.devt
    }

    pub fn bus(&self) -> &BusGuard<M, F> {
        &self.bus
    }

    fn ensure_attached(&self) -> Result<(), Error<F::Error>> {
        if self.state().is_attached() {
            Ok(())
        } else {
            Err(Error::NoDevice)
        }
    }

    /// Power-cycle the chip; see [`Lifecycle::reset`].
    pub fn reset(&self) -> Result<(), Error<F::Error>> {
        self.ensure_attached()?;
        self.lifecycle.reset(&self.bus)
    }

    /// Read `len` bytes at `addr`.
    ///
    /// Nothing is returned unless every byte was read.
    pub fn read(
        &self,
        kind: TransferKind,
        addr: u32,
        len: usize,
    ) -> Result<Vec<u8>, Error<F::Error>> {
        self.ensure_attached()?;
        if !kind.is_read() {
            return Err(Error::InvalidArgument);
        }
        let len = kind.check_len(len)?;
        self.read_staged(kind, addr, len)
    }

    /// Write `src` at `addr`.
    pub fn write(
        &self,
        kind: TransferKind,
        addr: u32,
        src: &[u8],
    ) -> Result<(), Error<F::Error>> {
        self.ensure_attached()?;
        if kind.is_read() {
            return Err(Error::InvalidArgument);
        }
        kind.check_len(src.len())?;
        self.write_claimed(kind, addr, src)
    }

    fn read_staged(
        &self,
        kind: TransferKind,
        addr: u32,
        len: usize,
    ) -> Result<Vec<u8>, Error<F::Error>> {
        let mut buf = stage(len)?;
        self.bus
            .with_bus_claimed(|claim| codec::read(claim, kind, addr, &mut buf))
            .map_err(|e| {
                error!("{:?} of {} at {:#x} failed: {:?}", kind, len, addr, Dbg(&e));
                Error::Bus(e)
            })?;
        Ok(buf)
    }

    fn write_claimed(
        &self,
        kind: TransferKind,
        addr: u32,
        src: &[u8],
    ) -> Result<(), Error<F::Error>> {
        self.bus
            .with_bus_claimed(|claim| codec::write(claim, kind, addr, src))
            .map_err(|e| {
                error!(
                    "{:?} of {} at {:#x} failed: {:?}",
                    kind,
                    src.len(),
                    addr,
                    Dbg(&e)
                );
                Error::Bus(e)
            })
    }

    /// Serve one request from a control client.
    ///
    /// The request is checked before anything is allocated or claimed.
    /// Write payloads are copied in before the bus is claimed; read
    /// results are copied out after it is released, and dropped if that
    /// copy faults.
    pub fn dispatch<U: UserAccess>(
        &self,
        kind: TransferKind,
        request: &BesdbgData,
        user: &mut U,
    ) -> Result<(), Error<F::Error>> {
        self.ensure_attached()?;
        let (len, ptr) = kind.validate(request)?;

        if kind.is_read() {
            let data = self.read_staged(kind, request.reg, len)?;
            user.copy_to_user(ptr, &data).map_err(|_| {
                warn!("{:?}: fault copying {} bytes out", kind, len);
                Error::TransferBoundary
            })
        } else {
            let mut data = stage(len)?;
            user.copy_from_user(&mut data, ptr).map_err(|_| {
                warn!("{:?}: fault copying {} bytes in", kind, len);
                Error::TransferBoundary
            })?;
            self.write_claimed(kind, request.reg, &data)
        }
    }

    /// Decode and serve an ioctl. `arg` points at a [`BesdbgData`] record
    /// for every command except reset.
    pub fn ioctl<U: UserAccess>(
        &self,
        cmd: u32,
        arg: UserPtr,
        user: &mut U,
    ) -> Result<(), Error<F::Error>> {
        let command = Command::try_from(cmd).map_err(|_| {
            debug!("unknown ioctl {:#x}", cmd);
            Error::InvalidArgument
        })?;

        let Some(kind) = TransferKind::from_command(command) else {
            return self.reset();
        };

        let mut raw = [0u8; BesdbgData::SIZE];
        user.copy_from_user(&mut raw, arg)
            .map_err(|_| Error::TransferBoundary)?;
        let request = BesdbgData::from_ne_bytes(&raw);

        self.dispatch(kind, &request, user)
    }
}
