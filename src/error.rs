use std::fmt;

/// Errors raised by the address space, the CPU and the coordinator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
  /// An access touched a byte outside the allocated address space.
  ///
  /// `address` is wider than `u16` so that the second byte of a 16-bit
  /// access at 0xffff can be reported.
  OutOfBounds { address: u32 },
  /// A bus write targeted the read-only ROM region.
  WriteProtected { address: u16 },
  /// The backing buffer could not be allocated.
  OutOfMemory,
  /// A bank image is larger than the window it is mounted into.
  InvalidBankSize { size: usize, max: usize },
  /// The coordinator was driven before `initialize()` or after `shutdown()`.
  NotInitialized,
}

impl Error {
  /// Fatal errors mean an invariant was broken mid-execution and emulation
  /// must stop. The rest are startup results the caller may act on.
  pub fn is_fatal(&self) -> bool {
    match self {
      Error::OutOfBounds { .. } |
      Error::WriteProtected { .. } |
      Error::NotInitialized => true,
      Error::OutOfMemory | Error::InvalidBankSize { .. } => false,
    }
  }
}

impl fmt::Display for Error {
  fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
    match self {
      Error::OutOfBounds { address } => {
        write!(f, "bus access out of bounds at 0x{:05x}", address)
      }
      Error::WriteProtected { address } => {
        write!(f, "write to read-only region at 0x{:04x}", address)
      }
      Error::OutOfMemory => write!(f, "failed to allocate the address space"),
      Error::InvalidBankSize { size, max } => write!(
        f,
        "bank image of {} bytes exceeds the {} byte window",
        size,
        max
      ),
      Error::NotInitialized => write!(f, "emulator is not initialized"),
    }
  }
}

impl std::error::Error for Error {}

pub type Result<T> = std::result::Result<T, Error>;
