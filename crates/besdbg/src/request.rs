use besdbg_icd::{BesdbgData, Command, MEM_MAX, REG_READ_MAX, REG_WRITE_MAX};

use crate::error::Error;
use crate::platform::UserPtr;

/// The four data-carrying operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransferKind {
    /// Byte-wise CMD52 reads at incrementing addresses.
    RegisterRead,
    /// Byte-wise CMD52 writes at incrementing addresses.
    RegisterWrite,
    /// One CMD53 read from a base address.
    BlockRead,
    /// One CMD53 write to a base address.
    BlockWrite,
}

impl TransferKind {
    pub const fn max_len(self) -> u32 {
        match self {
            TransferKind::RegisterRead => REG_READ_MAX,
            TransferKind::RegisterWrite => REG_WRITE_MAX,
            TransferKind::BlockRead | TransferKind::BlockWrite => MEM_MAX,
        }
    }

    pub const fn is_read(self) -> bool {
        matches!(self, TransferKind::RegisterRead | TransferKind::BlockRead)
    }

    pub const fn is_block(self) -> bool {
        matches!(self, TransferKind::BlockRead | TransferKind::BlockWrite)
    }

    pub const fn command(self) -> Command {
        match self {
            TransferKind::RegisterRead => Command::RegRead,
            TransferKind::RegisterWrite => Command::RegWrite,
            TransferKind::BlockRead => Command::MemRead,
            TransferKind::BlockWrite => Command::MemWrite,
        }
    }

    /// `None` for [`Command::Reset`], which carries no payload.
    pub const fn from_command(command: Command) -> Option<Self> {
        match command {
            Command::Reset => None,
            Command::RegRead => Some(TransferKind::RegisterRead),
            Command::RegWrite => Some(TransferKind::RegisterWrite),
            Command::MemRead => Some(TransferKind::BlockRead),
            Command::MemWrite => Some(TransferKind::BlockWrite),
        }
    }

    /// Length must be non-zero and within this kind's bound.
    pub fn check_len<E>(self, len: usize) -> Result<usize, Error<E>> {
        if len == 0 || len > self.max_len() as usize {
            return Err(Error::InvalidArgument);
        }
        Ok(len)
    }

    /// Validate a client request record, returning the payload length
    /// and location.
    pub fn validate<E>(
        self,
        request: &BesdbgData,
    ) -> Result<(usize, UserPtr), Error<E>> {
        let ptr = UserPtr::new(request.data);
        if ptr.is_null() {
            return Err(Error::InvalidArgument);
        }
        let len = self.check_len(request.len as usize)?;
        Ok((len, ptr))
    }
}
