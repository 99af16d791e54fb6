use crate::error::Result;
use crate::mem::Memory;

/// A unit stepped by the coordinator once per tick, after the CPU.
///
/// Peripherals observe and update their memory mapped registers directly
/// through the shared address space.
pub trait Peripheral {
  fn step(&mut self, mem: &mut Memory) -> Result<()>;
}
