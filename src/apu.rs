use crate::error::Result;
use crate::mem::Memory;
use crate::peripheral::Peripheral;

/// Sound on/off register.
pub const NR52: u16 = 0xff26;

const SOUND_ON: u8 = 0x80;

/// Audio unit stub. No samples are produced.
#[derive(Debug, Default)]
pub struct Apu {
  enabled: bool,
  active_ticks: u64,
}

impl Apu {
  pub fn new() -> Apu {
    Apu::default()
  }

  pub fn enabled(&self) -> bool {
    self.enabled
  }

  /// Ticks stepped with sound switched on.
  pub fn active_ticks(&self) -> u64 {
    self.active_ticks
  }
}

impl Peripheral for Apu {
  fn step(&mut self, mem: &mut Memory) -> Result<()> {
    let on = mem.read8(NR52)? & SOUND_ON != 0;
    if on != self.enabled {
      debug!("Sound {}", if on { "on" } else { "off" });
      self.enabled = on;
    }
    if on {
      self.active_ticks += 1;
    }
    Ok(())
  }
}
