use crate::apu::Apu;
use crate::cpu::CPU;
use crate::error::{Error, Result};
use crate::gpu::Gpu;
use crate::mem::{Memory, BANK_SIZE};
use crate::peripheral::Peripheral;

/// Owns the address space and steps every unit against it in a fixed
/// order: CPU, then video, then audio.
#[derive(Debug, Default)]
pub struct GameBoy {
  cpu: CPU,
  mem: Memory,
  gpu: Gpu,
  apu: Apu,

  initialized: bool,
  ticks: u64,
}

impl GameBoy {
  pub fn new() -> GameBoy {
    GameBoy::default()
  }

  /// Allocate the address space. Safe to call again after `shutdown`.
  pub fn initialize(&mut self) -> Result<()> {
    self.mem.init()?;
    self.initialized = true;
    Ok(())
  }

  pub fn is_initialized(&self) -> bool {
    self.initialized
  }

  /// Copy a cartridge image into the two ROM windows. Only the first two
  /// banks are mapped; anything after them is ignored.
  pub fn mount_rom(&mut self, image: &[u8]) -> Result<()> {
    if !self.initialized {
      return Err(Error::NotInitialized);
    }
    let (fixed, rest) = image.split_at(image.len().min(BANK_SIZE));
    let switchable = &rest[..rest.len().min(BANK_SIZE)];
    if rest.len() > BANK_SIZE {
      debug!(
        "Image has {} bytes beyond the first two banks, not mapped",
        rest.len() - BANK_SIZE
      );
    }
    self.mem.mount_fixed_bank(fixed)?;
    self.mem.mount_switchable_bank(switchable)
  }

  /// Run one tick: deliver pending interrupts, step the CPU once, then each
  /// peripheral. Return the CPU cycles consumed.
  pub fn tick(&mut self) -> Result<u32> {
    if !self.initialized {
      return Err(Error::NotInitialized);
    }
    let mut t = self.cpu.service_interrupts(&mut self.mem)?;
    t += self.cpu.step(&mut self.mem)?;
    self.gpu.step(&mut self.mem)?;
    self.apu.step(&mut self.mem)?;
    self.ticks += 1;
    Ok(t)
  }

  /// Tick until `limit` ticks have run (forever when `None`) or an error
  /// stops emulation. Return the number of ticks run by this call.
  pub fn run(&mut self, limit: Option<u64>) -> Result<u64> {
    let start = self.ticks;
    while limit.map_or(true, |n| self.ticks - start < n) {
      self.tick()?;
    }
    Ok(self.ticks - start)
  }

  /// Release the address space. A no-op once already shut down.
  pub fn shutdown(&mut self) {
    if !self.initialized {
      return;
    }
    self.mem.release();
    self.initialized = false;
  }

  /// Ticks run since construction.
  pub fn ticks(&self) -> u64 {
    self.ticks
  }

  pub fn cpu(&self) -> &CPU {
    &self.cpu
  }

  pub fn cpu_mut(&mut self) -> &mut CPU {
    &mut self.cpu
  }

  pub fn mem(&self) -> &Memory {
    &self.mem
  }

  pub fn mem_mut(&mut self) -> &mut Memory {
    &mut self.mem
  }

  pub fn gpu(&self) -> &Gpu {
    &self.gpu
  }

  pub fn apu(&self) -> &Apu {
    &self.apu
  }
}
