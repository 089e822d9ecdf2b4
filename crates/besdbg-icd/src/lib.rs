#![cfg_attr(not(feature = "use-std"), no_std)]
//! Interface shared by the besdbg driver and its control clients: the
//! request record, the ioctl command numbers and the error codes that
//! come back.

use byteorder::{ByteOrder, NativeEndian};
use serde::{Deserialize, Serialize};

mod errno;
pub mod ioctl;

pub use errno::Errno;

// Constants
pub const BESDBG_MAGIC: u8 = 0xEE;

/// Largest register read, in bytes.
pub const REG_READ_MAX: u32 = 32;
/// Largest register write, in bytes.
pub const REG_WRITE_MAX: u32 = 64 * 1024;
/// Largest block transfer in either direction, in bytes.
pub const MEM_MAX: u32 = 64 * 1024;

pub const BESDBG_IOCTL_RESET: u32 = ioctl::io(BESDBG_MAGIC, 0x10);
pub const BESDBG_IOCTL_REG_READ: u32 =
    ioctl::ior(BESDBG_MAGIC, 0x11, BesdbgData::SIZE);
pub const BESDBG_IOCTL_REG_WRITE: u32 =
    ioctl::iow(BESDBG_MAGIC, 0x12, BesdbgData::SIZE);
pub const BESDBG_IOCTL_MEM_READ: u32 =
    ioctl::ior(BESDBG_MAGIC, 0x13, BesdbgData::SIZE);
pub const BESDBG_IOCTL_MEM_WRITE: u32 =
    ioctl::iow(BESDBG_MAGIC, 0x14, BesdbgData::SIZE);

/// Request record passed by address with every data-carrying command.
///
/// Laid out as `struct { u32 reg; u32 len; u64 data; }` in native
/// endianness; `data` is the client-space address of the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(C)]
pub struct BesdbgData {
    pub reg: u32,
    pub len: u32,
    pub data: u64,
}

impl BesdbgData {
    pub const SIZE: usize = 16;

    pub const fn new(reg: u32, len: u32, data: u64) -> Self {
        Self { reg, len, data }
    }

    pub fn from_ne_bytes(buf: &[u8; Self::SIZE]) -> Self {
        Self {
            reg: NativeEndian::read_u32(&buf[0..4]),
            len: NativeEndian::read_u32(&buf[4..8]),
            data: NativeEndian::read_u64(&buf[8..16]),
        }
    }

    pub fn to_ne_bytes(&self) -> [u8; Self::SIZE] {
        let mut buf = [0u8; Self::SIZE];
        NativeEndian::write_u32(&mut buf[0..4], self.reg);
        NativeEndian::write_u32(&mut buf[4..8], self.len);
        NativeEndian::write_u64(&mut buf[8..16], self.data);
        buf
    }
}

/// Commands accepted on the control channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    Reset,
    RegRead,
    RegWrite,
    MemRead,
    MemWrite,
}

impl Command {
    pub const fn code(self) -> u32 {
        match self {
            Command::Reset => BESDBG_IOCTL_RESET,
            Command::RegRead => BESDBG_IOCTL_REG_READ,
            Command::RegWrite => BESDBG_IOCTL_REG_WRITE,
            Command::MemRead => BESDBG_IOCTL_MEM_READ,
            Command::MemWrite => BESDBG_IOCTL_MEM_WRITE,
        }
    }

    /// Upper bound on `BesdbgData::len`, or `None` for commands without
    /// a payload.
    pub const fn max_len(self) -> Option<u32> {
        match self {
            Command::Reset => None,
            Command::RegRead => Some(REG_READ_MAX),
            Command::RegWrite => Some(REG_WRITE_MAX),
            Command::MemRead | Command::MemWrite => Some(MEM_MAX),
        }
    }
}

impl TryFrom<u32> for Command {
    type Error = Errno;

    fn try_from(code: u32) -> Result<Self, Self::Error> {
        match code {
            BESDBG_IOCTL_RESET => Ok(Command::Reset),
            BESDBG_IOCTL_REG_READ => Ok(Command::RegRead),
            BESDBG_IOCTL_REG_WRITE => Ok(Command::RegWrite),
            BESDBG_IOCTL_MEM_READ => Ok(Command::MemRead),
            BESDBG_IOCTL_MEM_WRITE => Ok(Command::MemWrite),
            _ => Err(Errno::EINVAL),
        }
    }
}

impl From<Command> for u32 {
    fn from(command: Command) -> u32 {
        command.code()
    }
}
