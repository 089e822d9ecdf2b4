#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard};

use besdbg::icd::Errno;
use besdbg::sdio_bus::{CardQuirks, SdioDeviceId, SdioFunc};
use besdbg::{
    BesDevice, ChannelRegistry, DevNum, Driver, Fault, UserAccess, UserPtr,
    WakeLineProvider,
};
use embassy_sync::blocking_mutex::raw::{NoopRawMutex, RawMutex};
use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{self, ErrorType, OutputPin, PinState};

// ---------------------------------------------------------------------------
// Shared rig
// ---------------------------------------------------------------------------

/// Everything the collaborators do, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    Claim,
    Release,
    ReadB(u32),
    WriteB(u32, u8),
    BlockRead(u32, usize),
    BlockWrite(u32, usize),
    Enable,
    Disable,
    HwReset,
    Quirks(u32),
    WakeAcquired(bool),
    WakeHigh,
    WakeLow,
    WakeReleased,
    DelayNs(u32),
    AllocRegion,
    AddChannel,
    Publish,
    Retract,
    DelChannel,
    FreeRegion,
    CopyIn(u64, usize),
    CopyOut(u64, usize),
}

impl Event {
    pub fn is_bus(&self) -> bool {
        matches!(
            self,
            Event::Claim
                | Event::Release
                | Event::ReadB(_)
                | Event::WriteB(..)
                | Event::BlockRead(..)
                | Event::BlockWrite(..)
                | Event::Enable
                | Event::Disable
                | Event::HwReset
        )
    }

    pub fn is_transfer(&self) -> bool {
        matches!(
            self,
            Event::ReadB(_)
                | Event::WriteB(..)
                | Event::BlockRead(..)
                | Event::BlockWrite(..)
        )
    }
}

#[derive(Debug, Default)]
pub struct Faults {
    /// Fail the n-th (0-based) `readb` made on this rig.
    pub readb_at: Option<usize>,
    pub writeb_at: Option<usize>,
    pub block: bool,
    pub enable: bool,
    pub disable: bool,
    pub hw_reset: bool,
    pub wake: bool,
    pub gpio: Option<Errno>,
    pub alloc_region: Option<Errno>,
    pub add_channel: Option<Errno>,
    pub publish: Option<Errno>,
}

#[derive(Default)]
pub struct RigState {
    pub events: Vec<Event>,
    pub mem: HashMap<u32, u8>,
    pub faults: Faults,
    pub claimed: bool,
    pub violations: usize,
    pub quirks: u32,
    readb_count: usize,
    writeb_count: usize,
}

#[derive(Clone, Default)]
pub struct Rig(Arc<Mutex<RigState>>);

impl Rig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> MutexGuard<'_, RigState> {
        self.0.lock().unwrap()
    }

    fn push(&self, event: Event) {
        self.state().events.push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.state().events.clone()
    }

    pub fn clear_events(&self) {
        self.state().events.clear();
    }

    pub fn bus_events(&self) -> Vec<Event> {
        self.events().into_iter().filter(Event::is_bus).collect()
    }

    pub fn transfers(&self) -> Vec<Event> {
        self.events().into_iter().filter(Event::is_transfer).collect()
    }

    pub fn violations(&self) -> usize {
        self.state().violations
    }

    pub fn load(&self, base: u32, bytes: &[u8]) {
        let mut s = self.state();
        for (i, &b) in bytes.iter().enumerate() {
            s.mem.insert(base + i as u32, b);
        }
    }

    pub fn peek(&self, base: u32, len: usize) -> Vec<u8> {
        let s = self.state();
        (0..len)
            .map(|i| *s.mem.get(&(base + i as u32)).unwrap_or(&0))
            .collect()
    }

    pub fn set_faults(&self, f: impl FnOnce(&mut Faults)) {
        f(&mut self.state().faults);
    }
}

// ---------------------------------------------------------------------------
// Mock SDIO function
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MockBusError;

pub struct MockFunc {
    rig: Rig,
    pub num: u8,
    pub id: SdioDeviceId,
    pub compatible: &'static str,
}

impl MockFunc {
    pub fn new(rig: &Rig) -> Self {
        Self {
            rig: rig.clone(),
            num: 1,
            id: SdioDeviceId::new(0xbe57, 0x2002),
            compatible: "bestechnic,bes2600",
        }
    }

    /// Record a claimed-only operation.
    fn op(&self, event: Event) -> MutexGuard<'_, RigState> {
        let mut s = self.rig.state();
        if !s.claimed {
            s.violations += 1;
        }
        s.events.push(event);
        s
    }
}

impl SdioFunc for MockFunc {
    type Error = MockBusError;

    fn num(&self) -> u8 {
        self.num
    }

    fn id(&self) -> SdioDeviceId {
        self.id
    }

    fn is_compatible(&self, compatible: &str) -> bool {
        self.compatible == compatible
    }

    fn add_quirks(&mut self, quirks: CardQuirks) {
        let mut s = self.rig.state();
        s.quirks |= quirks.bits();
        s.events.push(Event::Quirks(quirks.bits()));
    }

    fn claim_host(&mut self) {
        let mut s = self.rig.state();
        if s.claimed {
            s.violations += 1;
        }
        s.claimed = true;
        s.events.push(Event::Claim);
    }

    fn release_host(&mut self) {
        let mut s = self.rig.state();
        if !s.claimed {
            s.violations += 1;
        }
        s.claimed = false;
        s.events.push(Event::Release);
    }

    fn readb(&mut self, addr: u32) -> Result<u8, MockBusError> {
        let mut s = self.op(Event::ReadB(addr));
        let n = s.readb_count;
        s.readb_count += 1;
        if s.faults.readb_at == Some(n) {
            return Err(MockBusError);
        }
        Ok(*s.mem.get(&addr).unwrap_or(&0))
    }

    fn writeb(&mut self, addr: u32, value: u8) -> Result<(), MockBusError> {
        let mut s = self.op(Event::WriteB(addr, value));
        let n = s.writeb_count;
        s.writeb_count += 1;
        if s.faults.writeb_at == Some(n) {
            return Err(MockBusError);
        }
        s.mem.insert(addr, value);
        Ok(())
    }

    fn memcpy_fromio(
        &mut self,
        addr: u32,
        dst: &mut [u8],
    ) -> Result<(), MockBusError> {
        let s = self.op(Event::BlockRead(addr, dst.len()));
        if s.faults.block {
            return Err(MockBusError);
        }
        for (i, byte) in dst.iter_mut().enumerate() {
            *byte = *s.mem.get(&(addr + i as u32)).unwrap_or(&0);
        }
        Ok(())
    }

    fn memcpy_toio(&mut self, addr: u32, src: &[u8]) -> Result<(), MockBusError> {
        let mut s = self.op(Event::BlockWrite(addr, src.len()));
        if s.faults.block {
            return Err(MockBusError);
        }
        for (i, &byte) in src.iter().enumerate() {
            s.mem.insert(addr + i as u32, byte);
        }
        Ok(())
    }

    fn enable_func(&mut self) -> Result<(), MockBusError> {
        let s = self.op(Event::Enable);
        if s.faults.enable {
            Err(MockBusError)
        } else {
            Ok(())
        }
    }

    fn disable_func(&mut self) -> Result<(), MockBusError> {
        let s = self.op(Event::Disable);
        if s.faults.disable {
            Err(MockBusError)
        } else {
            Ok(())
        }
    }

    fn hw_reset(&mut self) -> Result<(), MockBusError> {
        let s = self.op(Event::HwReset);
        if s.faults.hw_reset {
            Err(MockBusError)
        } else {
            Ok(())
        }
    }
}

// ---------------------------------------------------------------------------
// Wake line, GPIO provider, delay
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct MockPinError;

impl digital::Error for MockPinError {
    fn kind(&self) -> digital::ErrorKind {
        digital::ErrorKind::Other
    }
}

pub struct MockPin {
    rig: Rig,
}

impl ErrorType for MockPin {
    type Error = MockPinError;
}

impl OutputPin for MockPin {
    fn set_low(&mut self) -> Result<(), MockPinError> {
        let mut s = self.rig.state();
        if s.faults.wake {
            return Err(MockPinError);
        }
        s.events.push(Event::WakeLow);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), MockPinError> {
        let mut s = self.rig.state();
        if s.faults.wake {
            return Err(MockPinError);
        }
        s.events.push(Event::WakeHigh);
        Ok(())
    }
}

impl Drop for MockPin {
    fn drop(&mut self) {
        self.rig.push(Event::WakeReleased);
    }
}

pub struct MockGpio {
    rig: Rig,
}

impl MockGpio {
    pub fn new(rig: &Rig) -> Self {
        Self { rig: rig.clone() }
    }
}

impl WakeLineProvider for MockGpio {
    type Line = MockPin;

    fn get_output(
        &mut self,
        con_id: &'static str,
        initial: PinState,
    ) -> Result<MockPin, Errno> {
        assert_eq!(con_id, "device-wakeup");
        let mut s = self.rig.state();
        if let Some(errno) = s.faults.gpio {
            return Err(errno);
        }
        s.events.push(Event::WakeAcquired(initial == PinState::High));
        Ok(MockPin { rig: self.rig.clone() })
    }
}

pub struct MockDelay {
    rig: Rig,
}

impl MockDelay {
    pub fn new(rig: &Rig) -> Self {
        Self { rig: rig.clone() }
    }
}

impl DelayNs for MockDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.rig.push(Event::DelayNs(ns));
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay_ns(ms * 1_000_000);
    }
}

// ---------------------------------------------------------------------------
// Channel registry
// ---------------------------------------------------------------------------

pub struct MockRegistry {
    rig: Rig,
    next_major: u32,
    pub live: Vec<DevNum>,
}

impl MockRegistry {
    pub fn new(rig: &Rig) -> Self {
        Self { rig: rig.clone(), next_major: 240, live: Vec::new() }
    }
}

impl ChannelRegistry for MockRegistry {
    fn alloc_region(&mut self, name: &'static str) -> Result<DevNum, Errno> {
        assert_eq!(name, "besdbg");
        let mut s = self.rig.state();
        if let Some(errno) = s.faults.alloc_region {
            return Err(errno);
        }
        s.events.push(Event::AllocRegion);
        let devt = DevNum { major: self.next_major, minor: 0 };
        self.next_major += 1;
        self.live.push(devt);
        Ok(devt)
    }

    fn add_channel(&mut self, _devt: DevNum) -> Result<(), Errno> {
        let mut s = self.rig.state();
        if let Some(errno) = s.faults.add_channel {
            return Err(errno);
        }
        s.events.push(Event::AddChannel);
        Ok(())
    }

    fn publish(
        &mut self,
        _devt: DevNum,
        name: &'static str,
    ) -> Result<(), Errno> {
        assert_eq!(name, "besdbg");
        let mut s = self.rig.state();
        if let Some(errno) = s.faults.publish {
            return Err(errno);
        }
        s.events.push(Event::Publish);
        Ok(())
    }

    fn retract(&mut self, _devt: DevNum) {
        self.rig.push(Event::Retract);
    }

    fn del_channel(&mut self, _devt: DevNum) {
        self.rig.push(Event::DelChannel);
    }

    fn free_region(&mut self, devt: DevNum) {
        self.rig.push(Event::FreeRegion);
        let before = self.live.len();
        self.live.retain(|d| *d != devt);
        assert_eq!(before, self.live.len() + 1, "region freed twice");
    }
}

// ---------------------------------------------------------------------------
// Client memory
// ---------------------------------------------------------------------------

/// A client address space made of disjoint regions.
pub struct MockUser {
    rig: Rig,
    regions: HashMap<u64, Vec<u8>>,
    pub fault_in: bool,
    pub fault_out: bool,
}

impl MockUser {
    pub fn new(rig: &Rig) -> Self {
        Self {
            rig: rig.clone(),
            regions: HashMap::new(),
            fault_in: false,
            fault_out: false,
        }
    }

    pub fn map(&mut self, base: u64, bytes: Vec<u8>) -> UserPtr {
        self.regions.insert(base, bytes);
        UserPtr::new(base)
    }

    pub fn region(&self, base: u64) -> &[u8] {
        &self.regions[&base]
    }

    fn find(&mut self, addr: u64, len: usize) -> Option<&mut [u8]> {
        self.regions.iter_mut().find_map(|(&base, bytes)| {
            let start = addr.checked_sub(base)? as usize;
            let end = start.checked_add(len)?;
            bytes.get_mut(start..end)
        })
    }
}

impl UserAccess for MockUser {
    fn copy_from_user(
        &mut self,
        dst: &mut [u8],
        src: UserPtr,
    ) -> Result<(), Fault> {
        self.rig.push(Event::CopyIn(src.addr(), dst.len()));
        if self.fault_in {
            return Err(Fault);
        }
        let bytes = self.find(src.addr(), dst.len()).ok_or(Fault)?;
        dst.copy_from_slice(bytes);
        Ok(())
    }

    fn copy_to_user(&mut self, dst: UserPtr, src: &[u8]) -> Result<(), Fault> {
        self.rig.push(Event::CopyOut(dst.addr(), src.len()));
        if self.fault_out {
            return Err(Fault);
        }
        let bytes = self.find(dst.addr(), src.len()).ok_or(Fault)?;
        bytes.copy_from_slice(src);
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

pub type TestDevice<M = NoopRawMutex> =
    BesDevice<M, MockFunc, MockPin, MockDelay>;

pub fn driver(rig: &Rig) -> Driver<MockRegistry> {
    Driver::new(MockRegistry::new(rig))
}

pub fn attach<M: RawMutex>(
    rig: &Rig,
) -> (Driver<MockRegistry>, TestDevice<M>) {
    let mut driver = driver(rig);
    let device = driver
        .probe(MockFunc::new(rig), &mut MockGpio::new(rig), MockDelay::new(rig))
        .expect("probe failed");
    rig.clear_events();
    (driver, device)
}

/// Settle delay as seen by `DelayNs::delay_ns`.
pub const SETTLE_NS: u32 = 10_000_000;
