//! Linux `_IO`/`_IOR`/`_IOW` command number encoding.

const NRBITS: u32 = 8;
const TYPEBITS: u32 = 8;
const SIZEBITS: u32 = 14;

const NRSHIFT: u32 = 0;
const TYPESHIFT: u32 = NRSHIFT + NRBITS;
const SIZESHIFT: u32 = TYPESHIFT + TYPEBITS;
const DIRSHIFT: u32 = SIZESHIFT + SIZEBITS;

const NONE: u32 = 0;
const WRITE: u32 = 1;
const READ: u32 = 2;

const fn ioc(dir: u32, ty: u8, nr: u8, size: usize) -> u32 {
    (dir << DIRSHIFT)
        | ((size as u32) << SIZESHIFT)
        | ((ty as u32) << TYPESHIFT)
        | ((nr as u32) << NRSHIFT)
}

/// `_IO(ty, nr)`
pub const fn io(ty: u8, nr: u8) -> u32 {
    ioc(NONE, ty, nr, 0)
}

/// `_IOR(ty, nr, size)`: the kernel writes `size` bytes to the caller.
pub const fn ior(ty: u8, nr: u8, size: usize) -> u32 {
    ioc(READ, ty, nr, size)
}

/// `_IOW(ty, nr, size)`: the caller passes `size` bytes in.
pub const fn iow(ty: u8, nr: u8, size: usize) -> u32 {
    ioc(WRITE, ty, nr, size)
}
