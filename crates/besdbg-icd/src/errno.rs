/// OS error categories a request can fail with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(i32)]
pub enum Errno {
    /// I/O error on the bus.
    EIO = 5,
    /// Out of memory.
    ENOMEM = 12,
    /// Bad address in client memory.
    EFAULT = 14,
    /// Device or resource busy.
    EBUSY = 16,
    /// No such device.
    ENODEV = 19,
    /// Invalid argument.
    EINVAL = 22,
}

impl Errno {
    /// Positive error number.
    pub const fn code(self) -> i32 {
        self as i32
    }

    /// Negated error number, as returned from a kernel entry point.
    pub const fn to_return(self) -> i32 {
        -(self as i32)
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code.abs() {
            5 => Some(Self::EIO),
            12 => Some(Self::ENOMEM),
            14 => Some(Self::EFAULT),
            16 => Some(Self::EBUSY),
            19 => Some(Self::ENODEV),
            22 => Some(Self::EINVAL),
            _ => None,
        }
    }
}

impl core::fmt::Display for Errno {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg = match self {
            Errno::EIO => "I/O error",
            Errno::ENOMEM => "out of memory",
            Errno::EFAULT => "bad address",
            Errno::EBUSY => "device or resource busy",
            Errno::ENODEV => "no such device",
            Errno::EINVAL => "invalid argument",
        };
        write!(f, "{} ({})", msg, self.code())
    }
}
