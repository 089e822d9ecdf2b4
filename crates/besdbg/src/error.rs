use besdbg_icd::Errno;

#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error<BusE> {
    /// Bad length, null buffer or unknown command. Nothing reached the bus.
    InvalidArgument,
    /// The staging buffer could not be allocated.
    ResourceExhausted,
    /// The transport failed a transfer or lifecycle step.
    Bus(BusE),
    /// Copying to or from client memory faulted.
    TransferBoundary,
    /// The function is not ours, or the device is gone.
    NoDevice,
    /// The wake line could not be driven.
    WakeLine,
    /// A platform collaborator failed with its own code.
    Os(Errno),
}

impl<BusE> Error<BusE> {
    /// Error code reported to the control client.
    pub fn errno(&self) -> Errno {
        match self {
            Error::InvalidArgument => Errno::EINVAL,
            Error::ResourceExhausted => Errno::ENOMEM,
            Error::Bus(_) | Error::WakeLine => Errno::EIO,
            Error::TransferBoundary => Errno::EFAULT,
            Error::NoDevice => Errno::ENODEV,
            Error::Os(errno) => *errno,
        }
    }
}

impl<BusE: core::fmt::Debug> core::fmt::Display for Error<BusE> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            Error::InvalidArgument => write!(f, "Invalid argument"),
            Error::ResourceExhausted => {
                write!(f, "Unable to allocate staging buffer")
            }
            Error::Bus(err) => write!(f, "SDIO bus error: {:?}", err),
            Error::TransferBoundary => {
                write!(f, "Fault copying to or from client memory")
            }
            Error::NoDevice => write!(f, "No such device"),
            Error::WakeLine => write!(f, "Unable to drive wake line"),
            Error::Os(errno) => write!(f, "Platform error: {}", errno),
        }
    }
}

impl<BusE> From<Errno> for Error<BusE> {
    fn from(errno: Errno) -> Self {
        Error::Os(errno)
    }
}
