//! Flag arithmetic. Every function computes its flags from the operands as
//! they were before the operation, then returns the result.

use crate::cpu::reg::Flags;

pub fn add(f: &mut Flags, a: u8, n: u8) -> u8 {
  adc_with(f, a, n, 0)
}

pub fn adc(f: &mut Flags, a: u8, n: u8) -> u8 {
  let c = u8::from(f.c());
  adc_with(f, a, n, c)
}

/// The carry joins both nibble and byte sums unmasked, as on hardware.
fn adc_with(f: &mut Flags, a: u8, n: u8, c: u8) -> u8 {
  let h = (a & 0xf) + (n & 0xf) + c > 0xf;
  let carry = u16::from(a) + u16::from(n) + u16::from(c) > 0xff;
  let result = a.wrapping_add(n).wrapping_add(c);
  *f = Flags::new(result == 0, false, h, carry);
  result
}

pub fn sub(f: &mut Flags, a: u8, n: u8) -> u8 {
  sbc_with(f, a, n, 0)
}

pub fn sbc(f: &mut Flags, a: u8, n: u8) -> u8 {
  let c = u8::from(f.c());
  sbc_with(f, a, n, c)
}

fn sbc_with(f: &mut Flags, a: u8, n: u8, c: u8) -> u8 {
  let h = (a & 0xf) < (n & 0xf) + c;
  let borrow = u16::from(a) < u16::from(n) + u16::from(c);
  let result = a.wrapping_sub(n).wrapping_sub(c);
  *f = Flags::new(result == 0, true, h, borrow);
  result
}

pub fn and(f: &mut Flags, a: u8, n: u8) -> u8 {
  let result = a & n;
  *f = Flags::new(result == 0, false, true, false);
  result
}

pub fn or(f: &mut Flags, a: u8, n: u8) -> u8 {
  let result = a | n;
  *f = Flags::new(result == 0, false, false, false);
  result
}

pub fn xor(f: &mut Flags, a: u8, n: u8) -> u8 {
  let result = a ^ n;
  *f = Flags::new(result == 0, false, false, false);
  result
}

/// Compare: flags of `a - n`, result discarded.
pub fn cp(f: &mut Flags, a: u8, n: u8) {
  sub(f, a, n);
}

/// Carry is left as it was.
pub fn inc(f: &mut Flags, n: u8) -> u8 {
  let result = n.wrapping_add(1);
  f.set_z(result == 0);
  f.set_n(false);
  f.set_h((n & 0xf) + 1 > 0xf);
  result
}

/// Carry is left as it was.
pub fn dec(f: &mut Flags, n: u8) -> u8 {
  let result = n.wrapping_sub(1);
  f.set_z(result == 0);
  f.set_n(true);
  f.set_h((n & 0xf) < 1);
  result
}

/// `ADD HL,rr`. Zero is left as it was.
pub fn add16(f: &mut Flags, hl: u16, n: u16) -> u16 {
  f.set_n(false);
  f.set_h((hl & 0x0fff) + (n & 0x0fff) > 0x0fff);
  f.set_c(u32::from(hl) + u32::from(n) > 0xffff);
  hl.wrapping_add(n)
}

/// `SP + e` for `ADD SP,e` and `LD HL,SP+e`. The carries come from the
/// unsigned addition of the low bytes.
pub fn add_sp(f: &mut Flags, sp: u16, e: u8) -> u16 {
  let lo = sp & 0xff;
  let n = u16::from(e);
  *f = Flags::new(
    false,
    false,
    (lo & 0xf) + (n & 0xf) > 0xf,
    lo + n > 0xff,
  );
  sp.wrapping_add(e as i8 as u16)
}

/// Decimal-adjust the accumulator after a BCD add or subtract.
pub fn daa(f: &mut Flags, a: u8) -> u8 {
  let mut adjust = 0;
  let mut carry = f.c();
  let result = if !f.n() {
    if carry || a > 0x99 {
      adjust |= 0x60;
      carry = true;
    }
    if f.h() || (a & 0xf) > 0x9 {
      adjust |= 0x06;
    }
    a.wrapping_add(adjust)
  } else {
    if carry {
      adjust |= 0x60;
    }
    if f.h() {
      adjust |= 0x06;
    }
    a.wrapping_sub(adjust)
  };
  f.set_z(result == 0);
  f.set_h(false);
  f.set_c(carry);
  result
}

fn shifted(f: &mut Flags, result: u8, carry: bool) -> u8 {
  *f = Flags::new(result == 0, false, false, carry);
  result
}

pub fn rlc(f: &mut Flags, n: u8) -> u8 {
  shifted(f, n.rotate_left(1), n & 0x80 != 0)
}

pub fn rrc(f: &mut Flags, n: u8) -> u8 {
  shifted(f, n.rotate_right(1), n & 0x01 != 0)
}

pub fn rl(f: &mut Flags, n: u8) -> u8 {
  let c = u8::from(f.c());
  shifted(f, (n << 1) | c, n & 0x80 != 0)
}

pub fn rr(f: &mut Flags, n: u8) -> u8 {
  let c = u8::from(f.c());
  shifted(f, (n >> 1) | (c << 7), n & 0x01 != 0)
}

pub fn sla(f: &mut Flags, n: u8) -> u8 {
  shifted(f, n << 1, n & 0x80 != 0)
}

pub fn sra(f: &mut Flags, n: u8) -> u8 {
  // Sign extend.
  shifted(f, ((n as i8) >> 1) as u8, n & 0x01 != 0)
}

pub fn srl(f: &mut Flags, n: u8) -> u8 {
  shifted(f, n >> 1, n & 0x01 != 0)
}

pub fn swap(f: &mut Flags, n: u8) -> u8 {
  shifted(f, n.rotate_left(4), false)
}

/// Test bit `b` of `n`. Carry is left as it was.
pub fn bit(f: &mut Flags, b: u8, n: u8) {
  f.set_z(n & (1 << b) == 0);
  f.set_n(false);
  f.set_h(true);
}
