use crate::error::Result;
use crate::mem::Memory;
use crate::peripheral::Peripheral;

/// LCD control register.
pub const LCDC: u16 = 0xff40;

/// LCDC bit 7: display enabled.
const LCD_ON: u8 = 0x80;

/// Video unit stub. Tracks the display enable bit and how many ticks the
/// display was on for; nothing is rendered.
#[derive(Debug, Default)]
pub struct Gpu {
  enabled: bool,
  active_ticks: u64,
}

impl Gpu {
  pub fn new() -> Gpu {
    Gpu::default()
  }

  pub fn enabled(&self) -> bool {
    self.enabled
  }

  pub fn active_ticks(&self) -> u64 {
    self.active_ticks
  }
}

impl Peripheral for Gpu {
  fn step(&mut self, mem: &mut Memory) -> Result<()> {
    let on = mem.read8(LCDC)? & LCD_ON != 0;
    if on != self.enabled {
      debug!("LCD {}", if on { "on" } else { "off" });
      self.enabled = on;
    }
    if on {
      self.active_ticks += 1;
    }
    Ok(())
  }
}
