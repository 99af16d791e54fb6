//! The flat 16-bit address space shared by the CPU and the peripherals.

use crate::error::{Error, Result};

/// Bytes in the full 16-bit address range.
pub const SIZE: usize = 0x10000;
/// Bytes in each of the two cartridge ROM windows.
pub const BANK_SIZE: usize = 0x4000;
/// Start of the switchable ROM window.
pub const SWITCHABLE_BANK: usize = 0x4000;
/// Bus writes below this address are rejected.
pub const WRITE_PROTECT_END: u16 = 0x8000;

/// Interrupt request flags.
pub const IF: u16 = 0xff0f;
/// Interrupt enable mask.
pub const IE: u16 = 0xffff;

/// Byte-addressable memory. Addresses below `WRITE_PROTECT_END` hold the
/// two mounted ROM banks and are read-only through the bus write API.
#[derive(Debug, Default)]
pub struct Memory {
  buf: Vec<u8>,
}

impl Memory {
  /// An unallocated address space. Call `init()` before use.
  pub fn new() -> Memory {
    Memory { buf: Vec::new() }
  }

  /// Allocate and zero-fill the full address range, releasing any previous
  /// buffer first.
  pub fn init(&mut self) -> Result<()> {
    self.release();
    let mut buf = Vec::new();
    buf.try_reserve_exact(SIZE).map_err(|_| Error::OutOfMemory)?;
    buf.resize(SIZE, 0);
    self.buf = buf;
    info!("Allocated {} bytes of address space", SIZE);
    Ok(())
  }

  /// Free the backing buffer. Safe to call when nothing is allocated.
  pub fn release(&mut self) {
    if !self.buf.is_empty() {
      info!("Released address space");
    }
    self.buf = Vec::new();
  }

  pub fn is_allocated(&self) -> bool {
    !self.buf.is_empty()
  }

  /// Raw view of the whole buffer.
  pub fn as_slice(&self) -> &[u8] {
    &self.buf
  }

  fn index(&self, addr: u32) -> Result<usize> {
    let idx = addr as usize;
    if idx < self.buf.len() {
      Ok(idx)
    } else {
      Err(Error::OutOfBounds { address: addr })
    }
  }

  fn check_write(&self, addr: u16) -> Result<usize> {
    let idx = self.index(u32::from(addr))?;
    if addr < WRITE_PROTECT_END {
      return Err(Error::WriteProtected { address: addr });
    }
    Ok(idx)
  }

  /// Read a byte at address `addr`.
  pub fn read8(&self, addr: u16) -> Result<u8> {
    let idx = self.index(u32::from(addr))?;
    Ok(self.buf[idx])
  }

  /// Read a 2-byte little-endian word from `addr`.
  pub fn read16(&self, addr: u16) -> Result<u16> {
    let lo = self.index(u32::from(addr))?;
    let hi = self.index(u32::from(addr) + 1)?;
    Ok(u16::from_le_bytes([self.buf[lo], self.buf[hi]]))
  }

  /// Write `value` at address `addr`.
  pub fn write8(&mut self, addr: u16, value: u8) -> Result<()> {
    let idx = self.check_write(addr)?;
    self.buf[idx] = value;
    Ok(())
  }

  /// Write a 2-byte little-endian word to `addr`.
  pub fn write16(&mut self, addr: u16, value: u16) -> Result<()> {
    let lo = self.check_write(addr)?;
    let hi = self.index(u32::from(addr) + 1)?;
    let [l, h] = value.to_le_bytes();
    self.buf[lo] = l;
    self.buf[hi] = h;
    Ok(())
  }

  /// Increment the byte at `addr`, returning the value it held before.
  pub fn increment8(&mut self, addr: u16) -> Result<u8> {
    let old = self.read8(addr)?;
    self.write8(addr, old.wrapping_add(1))?;
    Ok(old)
  }

  /// Decrement the byte at `addr`, returning the value it held before.
  pub fn decrement8(&mut self, addr: u16) -> Result<u8> {
    let old = self.read8(addr)?;
    self.write8(addr, old.wrapping_sub(1))?;
    Ok(old)
  }

  /// Increment the word at `addr`, returning the value it held before.
  pub fn increment16(&mut self, addr: u16) -> Result<u16> {
    let old = self.read16(addr)?;
    self.write16(addr, old.wrapping_add(1))?;
    Ok(old)
  }

  /// Decrement the word at `addr`, returning the value it held before.
  pub fn decrement16(&mut self, addr: u16) -> Result<u16> {
    let old = self.read16(addr)?;
    self.write16(addr, old.wrapping_sub(1))?;
    Ok(old)
  }

  /// Copy bank 0 of a cartridge to 0x0000.
  pub fn mount_fixed_bank(&mut self, data: &[u8]) -> Result<()> {
    self.mount(0, data)
  }

  /// Copy the switchable bank of a cartridge to 0x4000.
  pub fn mount_switchable_bank(&mut self, data: &[u8]) -> Result<()> {
    self.mount(SWITCHABLE_BANK, data)
  }

  fn mount(&mut self, base: usize, data: &[u8]) -> Result<()> {
    if data.len() > BANK_SIZE {
      return Err(Error::InvalidBankSize {
        size: data.len(),
        max: BANK_SIZE,
      });
    }
    if !self.is_allocated() {
      return Err(Error::OutOfBounds { address: base as u32 });
    }
    self.buf[base..base + data.len()].copy_from_slice(data);
    info!("Mounted {} bytes at 0x{:04x}", data.len(), base);
    Ok(())
  }
}
