pub const Z: u8 = 0x80;
pub const N: u8 = 0x40;
pub const H: u8 = 0x20;
pub const C: u8 = 0x10;

/// The flag byte. Only the top nibble is stored; the low nibble always
/// reads as zero.
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq)]
pub struct Flags(u8);

impl Flags {
  pub fn from_bits(bits: u8) -> Flags {
    Flags(bits & 0xf0)
  }

  pub fn new(z: bool, n: bool, h: bool, c: bool) -> Flags {
    let mut f = Flags(0);
    f.set_z(z);
    f.set_n(n);
    f.set_h(h);
    f.set_c(c);
    f
  }

  pub fn bits(self) -> u8 {
    self.0
  }

  pub fn z(self) -> bool {
    //! Zero flag
    self.0 & Z != 0
  }
  pub fn n(self) -> bool {
    //! Subtract flag
    self.0 & N != 0
  }
  pub fn h(self) -> bool {
    //! Half carry flag
    self.0 & H != 0
  }
  pub fn c(self) -> bool {
    //! Carry flag
    self.0 & C != 0
  }

  fn set(&mut self, mask: u8, on: bool) {
    if on {
      self.0 |= mask;
    } else {
      self.0 &= !mask;
    }
  }

  pub fn set_z(&mut self, on: bool) {
    self.set(Z, on);
  }
  pub fn set_n(&mut self, on: bool) {
    self.set(N, on);
  }
  pub fn set_h(&mut self, on: bool) {
    self.set(H, on);
  }
  pub fn set_c(&mut self, on: bool) {
    self.set(C, on);
  }
}

#[derive(Debug, Default, Clone, Eq, PartialEq)]
pub struct Registers {
  /// General-purpose registers.
  pub a: u8,
  pub b: u8,
  pub c: u8,
  pub d: u8,
  pub e: u8,
  pub f: Flags, // Flag register.
  pub h: u8,
  pub l: u8,

  /// Program counter.
  pub pc: u16,

  /// Stack pointer.
  pub sp: u16,
}

impl Registers {
  /// All registers zeroed.
  pub fn new() -> Registers {
    Registers::default()
  }

  /// Register state left behind by the boot ROM on a DMG.
  pub fn post_boot() -> Registers {
    Registers {
      a: 0x01,
      f: Flags::from_bits(0xb0),
      b: 0x00,
      c: 0x13,
      d: 0x00,
      e: 0xd8,
      h: 0x01,
      l: 0x4d,

      sp: 0xfffe,
      pc: 0x100,
    }
  }

  pub fn af(&self) -> u16 {
    u16::from_be_bytes([self.a, self.f.bits()])
  }
  pub fn bc(&self) -> u16 {
    u16::from_be_bytes([self.b, self.c])
  }
  pub fn de(&self) -> u16 {
    u16::from_be_bytes([self.d, self.e])
  }
  pub fn hl(&self) -> u16 {
    u16::from_be_bytes([self.h, self.l])
  }

  pub fn set_af(&mut self, value: u16) {
    let [a, f] = value.to_be_bytes();
    self.a = a;
    self.f = Flags::from_bits(f);
  }
  pub fn set_bc(&mut self, value: u16) {
    let [b, c] = value.to_be_bytes();
    self.b = b;
    self.c = c;
  }
  pub fn set_de(&mut self, value: u16) {
    let [d, e] = value.to_be_bytes();
    self.d = d;
    self.e = e;
  }
  pub fn set_hl(&mut self, value: u16) {
    let [h, l] = value.to_be_bytes();
    self.h = h;
    self.l = l;
  }

  pub fn hl_inc(&mut self) {
    self.set_hl(self.hl().wrapping_add(1));
  }
  pub fn hl_dec(&mut self) {
    self.set_hl(self.hl().wrapping_sub(1));
  }
}
