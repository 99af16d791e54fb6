use crate::cpu::{Flags, State, CPU};
use crate::error::Error;
use crate::mem::{Memory, IE, IF};

const START: u16 = 0xc000;

fn init() -> (CPU, Memory) {
  let mut cpu = CPU::new();
  let mut mem = Memory::new();
  mem.init().unwrap();
  // Start in WRAM so test programs are writable.
  cpu.regs.pc = START;
  cpu.regs.sp = 0xfffe;
  (cpu, mem)
}

/// Write `code` at PC, run one step and check its length and timing.
fn run(cpu: &mut CPU, mem: &mut Memory, code: &[u8], len: u16, cycles: u32) {
  let start = cpu.regs.pc;
  for (i, byte) in code.iter().enumerate() {
    mem.write8(start + i as u16, *byte).unwrap();
  }
  let t = cpu.step(mem).unwrap();
  assert_eq!(t, cycles, "cycles for {:02x?}", code);
  assert_eq!(cpu.last_cycles(), cycles);
  assert_eq!(cpu.regs.pc, start.wrapping_add(len), "pc for {:02x?}", code);
}

/// Like `run`, for control transfers that land at an absolute `target`.
fn jump(cpu: &mut CPU, mem: &mut Memory, code: &[u8], target: u16, cycles: u32) {
  let len = target.wrapping_sub(cpu.regs.pc);
  run(cpu, mem, code, len, cycles);
}

fn flags(z: bool, n: bool, h: bool, c: bool) -> Flags {
  Flags::new(z, n, h, c)
}

#[test]
fn nop() {
  let (mut cpu, mut mem) = init();
  run(&mut cpu, &mut mem, &[0x00], 1, 4);
  assert_eq!(cpu.cycles(), 4);
}

#[test]
fn ld_nn_n() {
  macro_rules! run_test {
    ($reg:ident, $opcode:expr) => {{
      let (mut cpu, mut mem) = init();
      let f = cpu.regs.f;
      run(&mut cpu, &mut mem, &[$opcode, 0x42], 2, 8);
      assert_eq!(cpu.regs.f, f);
      assert_eq!(cpu.regs.$reg, 0x42);
    }};
  }
  run_test!(b, 0x06);
  run_test!(c, 0x0e);
  run_test!(d, 0x16);
  run_test!(e, 0x1e);
  run_test!(h, 0x26);
  run_test!(l, 0x2e);
  run_test!(a, 0x3e);
}

#[test]
fn ld_r1_r2() {
  macro_rules! reg_reg {
    ($r1:ident, $r2:ident, $opcode:expr) => {{
      let (mut cpu, mut mem) = init();
      cpu.regs.$r2 = 0x42;
      let f = cpu.regs.f;
      run(&mut cpu, &mut mem, &[$opcode], 1, 4);
      assert_eq!(cpu.regs.f, f);
      assert_eq!(cpu.regs.$r1, 0x42);
      assert_eq!(cpu.regs.$r2, 0x42);
    }};
  }

  reg_reg!(a, a, 0x7f);
  reg_reg!(a, b, 0x78);
  reg_reg!(a, c, 0x79);
  reg_reg!(a, d, 0x7a);
  reg_reg!(a, e, 0x7b);

  reg_reg!(b, b, 0x40);
  reg_reg!(b, c, 0x41);
  reg_reg!(b, d, 0x42);
  reg_reg!(b, e, 0x43);
  reg_reg!(b, a, 0x47);

  reg_reg!(c, b, 0x48);
  reg_reg!(d, e, 0x53);
  reg_reg!(e, d, 0x5a);
  reg_reg!(l, a, 0x6f);
  reg_reg!(h, a, 0x67);
}

#[test]
fn ld_hl_indirect() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_hl(0xd000);
  cpu.regs.b = 0x99;
  run(&mut cpu, &mut mem, &[0x70], 1, 8);
  assert_eq!(mem.read8(0xd000), Ok(0x99));

  run(&mut cpu, &mut mem, &[0x5e], 1, 8);
  assert_eq!(cpu.regs.e, 0x99);

  run(&mut cpu, &mut mem, &[0x36, 0x17], 2, 12);
  assert_eq!(mem.read8(0xd000), Ok(0x17));
}

#[test]
fn ldi_a_hl() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_hl(0xc100);
  mem.write8(0xc100, 0x42).unwrap();
  run(&mut cpu, &mut mem, &[0x2a], 1, 8);
  assert_eq!(cpu.regs.a, 0x42);
  assert_eq!(cpu.regs.hl(), 0xc101);
}

#[test]
fn ldd_hl_a() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_hl(0xc100);
  cpu.regs.a = 0x24;
  run(&mut cpu, &mut mem, &[0x32], 1, 8);
  assert_eq!(mem.read8(0xc100), Ok(0x24));
  assert_eq!(cpu.regs.hl(), 0xc0ff);

  run(&mut cpu, &mut mem, &[0x3a], 1, 8);
  assert_eq!(cpu.regs.hl(), 0xc0fe);
}

#[test]
fn ld_bc_de_indirect() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_bc(0xd010);
  cpu.regs.set_de(0xd020);
  cpu.regs.a = 0x5a;
  run(&mut cpu, &mut mem, &[0x02], 1, 8);
  run(&mut cpu, &mut mem, &[0x12], 1, 8);
  assert_eq!(mem.read8(0xd010), Ok(0x5a));
  assert_eq!(mem.read8(0xd020), Ok(0x5a));

  mem.write8(0xd010, 0x77).unwrap();
  run(&mut cpu, &mut mem, &[0x0a], 1, 8);
  assert_eq!(cpu.regs.a, 0x77);
}

#[test]
fn ld_16_bit() {
  let (mut cpu, mut mem) = init();
  run(&mut cpu, &mut mem, &[0x01, 0x34, 0x12], 3, 12);
  assert_eq!(cpu.regs.bc(), 0x1234);
  run(&mut cpu, &mut mem, &[0x31, 0x00, 0xd0], 3, 12);
  assert_eq!(cpu.regs.sp, 0xd000);

  run(&mut cpu, &mut mem, &[0x08, 0x00, 0xd1], 3, 20);
  assert_eq!(mem.read16(0xd100), Ok(0xd000));

  cpu.regs.set_hl(0xcff0);
  run(&mut cpu, &mut mem, &[0xf9], 1, 8);
  assert_eq!(cpu.regs.sp, 0xcff0);

  run(&mut cpu, &mut mem, &[0xf8, 0xfe], 2, 12);
  assert_eq!(cpu.regs.hl(), 0xcfee);
  assert_eq!(cpu.regs.f, flags(false, false, false, true));
}

#[test]
fn ld_absolute_and_high_page() {
  let (mut cpu, mut mem) = init();
  cpu.regs.a = 0x81;
  run(&mut cpu, &mut mem, &[0xea, 0x00, 0xd2], 3, 16);
  assert_eq!(mem.read8(0xd200), Ok(0x81));
  run(&mut cpu, &mut mem, &[0xe0, 0x80], 2, 12);
  assert_eq!(mem.read8(0xff80), Ok(0x81));
  cpu.regs.c = 0x81;
  run(&mut cpu, &mut mem, &[0xe2], 1, 8);
  assert_eq!(mem.read8(0xff81), Ok(0x81));

  mem.write8(0xff90, 0x3c).unwrap();
  run(&mut cpu, &mut mem, &[0xf0, 0x90], 2, 12);
  assert_eq!(cpu.regs.a, 0x3c);
  mem.write8(0xd300, 0x4d).unwrap();
  run(&mut cpu, &mut mem, &[0xfa, 0x00, 0xd3], 3, 16);
  assert_eq!(cpu.regs.a, 0x4d);
  cpu.regs.c = 0x90;
  run(&mut cpu, &mut mem, &[0xf2], 1, 8);
  assert_eq!(cpu.regs.a, 0x3c);
}

#[test]
fn push_pop() {
  let (mut cpu, mut mem) = init();
  cpu.push(&mut mem, 0xbeef).unwrap();
  assert_eq!(cpu.regs.sp, 0xfffc);
  assert_eq!(mem.read16(0xfffc), Ok(0xbeef));
  assert_eq!(cpu.pop(&mut mem), Ok(0xbeef));
  assert_eq!(cpu.regs.sp, 0xfffe);
}

#[test]
fn push_pop_opcodes() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_bc(0x1234);
  run(&mut cpu, &mut mem, &[0xc5], 1, 16);
  assert_eq!(cpu.regs.sp, 0xfffc);
  run(&mut cpu, &mut mem, &[0xd1], 1, 12);
  assert_eq!(cpu.regs.de(), 0x1234);
  assert_eq!(cpu.regs.sp, 0xfffe);

  // POP AF drops the low nibble of F.
  cpu.push(&mut mem, 0x12ff).unwrap();
  run(&mut cpu, &mut mem, &[0xf1], 1, 12);
  assert_eq!(cpu.regs.af(), 0x12f0);
}

#[test]
fn push_into_rom_is_fatal() {
  let (mut cpu, mut mem) = init();
  cpu.regs.sp = 0x0100;
  assert_eq!(
    cpu.push(&mut mem, 0x1234),
    Err(Error::WriteProtected { address: 0x00fe })
  );
  assert_eq!(cpu.regs.sp, 0x0100);
}

#[test]
fn alu_registers() {
  let (mut cpu, mut mem) = init();
  cpu.regs.a = 0x0f;
  cpu.regs.b = 0x01;
  run(&mut cpu, &mut mem, &[0x80], 1, 4);
  assert_eq!(cpu.regs.a, 0x10);
  assert_eq!(cpu.regs.f, flags(false, false, true, false));

  run(&mut cpu, &mut mem, &[0x90], 1, 4);
  assert_eq!(cpu.regs.a, 0x0f);
  assert_eq!(cpu.regs.f, flags(false, true, true, false));

  run(&mut cpu, &mut mem, &[0xaf], 1, 4);
  assert_eq!(cpu.regs.a, 0x00);
  assert_eq!(cpu.regs.f, flags(true, false, false, false));
}

#[test]
fn alu_immediate_and_memory() {
  let (mut cpu, mut mem) = init();
  cpu.regs.a = 0xf0;
  run(&mut cpu, &mut mem, &[0xe6, 0x0f], 2, 8);
  assert_eq!(cpu.regs.a, 0x00);
  assert_eq!(cpu.regs.f, flags(true, false, true, false));

  run(&mut cpu, &mut mem, &[0xf6, 0x81], 2, 8);
  assert_eq!(cpu.regs.a, 0x81);

  cpu.regs.set_hl(0xd000);
  mem.write8(0xd000, 0x81).unwrap();
  run(&mut cpu, &mut mem, &[0xbe], 1, 8);
  assert_eq!(cpu.regs.a, 0x81);
  assert_eq!(cpu.regs.f, flags(true, true, false, false));

  run(&mut cpu, &mut mem, &[0xfe, 0x90], 2, 8);
  assert!(cpu.regs.f.c());

  // SBC A,n with carry set from the compare.
  run(&mut cpu, &mut mem, &[0xde, 0x01], 2, 8);
  assert_eq!(cpu.regs.a, 0x7f);
  assert_eq!(cpu.regs.f, flags(false, true, true, false));

  // ADC A,(HL)
  cpu.regs.f.set_c(true);
  run(&mut cpu, &mut mem, &[0x8e], 1, 8);
  assert_eq!(cpu.regs.a, 0x01);
  assert_eq!(cpu.regs.f, flags(false, false, true, true));
}

#[test]
fn inc_dec_preserve_carry() {
  let (mut cpu, mut mem) = init();
  cpu.regs.a = 0xff;
  cpu.regs.f = flags(false, false, false, true);
  run(&mut cpu, &mut mem, &[0x3c], 1, 4);
  assert_eq!(cpu.regs.a, 0x00);
  assert_eq!(cpu.regs.f, flags(true, false, true, true));
  run(&mut cpu, &mut mem, &[0x3d], 1, 4);
  assert_eq!(cpu.regs.a, 0xff);
  assert_eq!(cpu.regs.f, flags(false, true, true, true));
}

#[test]
fn inc_dec_hl_indirect() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_hl(0xd000);
  mem.write8(0xd000, 0x0f).unwrap();
  run(&mut cpu, &mut mem, &[0x34], 1, 12);
  assert_eq!(mem.read8(0xd000), Ok(0x10));
  assert_eq!(cpu.regs.f, flags(false, false, true, false));
  run(&mut cpu, &mut mem, &[0x35], 1, 12);
  assert_eq!(mem.read8(0xd000), Ok(0x0f));
  assert_eq!(cpu.regs.f, flags(false, true, true, false));
}

#[test]
fn inc_dec_16_bit() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_de(0x00ff);
  let f = cpu.regs.f;
  run(&mut cpu, &mut mem, &[0x13], 1, 8);
  assert_eq!(cpu.regs.de(), 0x0100);
  run(&mut cpu, &mut mem, &[0x0b], 1, 8);
  assert_eq!(cpu.regs.bc(), 0xffff);
  run(&mut cpu, &mut mem, &[0x33], 1, 8);
  assert_eq!(cpu.regs.sp, 0xffff);
  assert_eq!(cpu.regs.f, f);
}

#[test]
fn add_hl_and_sp() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_hl(0x8a23);
  cpu.regs.set_bc(0x0605);
  cpu.regs.f = flags(true, true, false, false);
  run(&mut cpu, &mut mem, &[0x09], 1, 8);
  assert_eq!(cpu.regs.hl(), 0x9028);
  assert_eq!(cpu.regs.f, flags(true, false, true, false));

  run(&mut cpu, &mut mem, &[0x29], 1, 8);
  assert_eq!(cpu.regs.hl(), 0x2050);
  assert!(cpu.regs.f.c());

  cpu.regs.sp = 0xfff8;
  run(&mut cpu, &mut mem, &[0xe8, 0x02], 2, 16);
  assert_eq!(cpu.regs.sp, 0xfffa);
  assert_eq!(cpu.regs.f, flags(false, false, false, false));
}

#[test]
fn accumulator_rotates_clear_zero() {
  let (mut cpu, mut mem) = init();
  cpu.regs.a = 0x80;
  run(&mut cpu, &mut mem, &[0x17], 1, 4);
  assert_eq!(cpu.regs.a, 0x00);
  assert_eq!(cpu.regs.f, flags(false, false, false, true));

  run(&mut cpu, &mut mem, &[0x1f], 1, 4);
  assert_eq!(cpu.regs.a, 0x80);
  assert_eq!(cpu.regs.f, flags(false, false, false, false));

  run(&mut cpu, &mut mem, &[0x07], 1, 4);
  assert_eq!(cpu.regs.a, 0x01);
  assert!(cpu.regs.f.c());

  run(&mut cpu, &mut mem, &[0x0f], 1, 4);
  assert_eq!(cpu.regs.a, 0x80);
  assert!(cpu.regs.f.c());
}

#[test]
fn misc_flags() {
  let (mut cpu, mut mem) = init();
  cpu.regs.a = 0x35;
  cpu.regs.f = flags(true, false, false, false);
  run(&mut cpu, &mut mem, &[0x2f], 1, 4);
  assert_eq!(cpu.regs.a, 0xca);
  assert_eq!(cpu.regs.f, flags(true, true, true, false));

  run(&mut cpu, &mut mem, &[0x37], 1, 4);
  assert_eq!(cpu.regs.f, flags(true, false, false, true));
  run(&mut cpu, &mut mem, &[0x3f], 1, 4);
  assert_eq!(cpu.regs.f, flags(true, false, false, false));

  cpu.regs.a = 0x45;
  cpu.regs.b = 0x38;
  run(&mut cpu, &mut mem, &[0x80], 1, 4);
  run(&mut cpu, &mut mem, &[0x27], 1, 4);
  assert_eq!(cpu.regs.a, 0x83);
}

#[test]
fn jp() {
  let (mut cpu, mut mem) = init();
  jump(&mut cpu, &mut mem, &[0xc3, 0x00, 0xd0], 0xd000, 16);

  let (mut cpu, mut mem) = init();
  cpu.regs.set_hl(0xd123);
  jump(&mut cpu, &mut mem, &[0xe9], 0xd123, 4);
}

#[test]
fn jp_conditional() {
  let (mut cpu, mut mem) = init();
  cpu.regs.f = flags(true, false, false, false);
  // JP NZ not taken.
  run(&mut cpu, &mut mem, &[0xc2, 0x00, 0xd0], 3, 12);
  // JP Z taken.
  cpu.regs.pc = START;
  jump(&mut cpu, &mut mem, &[0xca, 0x00, 0xd0], 0xd000, 16);
}

#[test]
fn jr() {
  let (mut cpu, mut mem) = init();
  run(&mut cpu, &mut mem, &[0x18, 0x05], 7, 12);

  // Backwards, relative to the following instruction.
  let (mut cpu, mut mem) = init();
  cpu.regs.pc = 0xc010;
  mem.write8(0xc010, 0x18).unwrap();
  mem.write8(0xc011, 0xfe).unwrap();
  assert_eq!(cpu.step(&mut mem), Ok(12));
  assert_eq!(cpu.regs.pc, 0xc010);

  let (mut cpu, mut mem) = init();
  cpu.regs.f = flags(false, false, false, true);
  run(&mut cpu, &mut mem, &[0x30, 0x10], 2, 8);
  cpu.regs.pc = START;
  run(&mut cpu, &mut mem, &[0x38, 0x10], 0x12, 12);
}

#[test]
fn call_ret() {
  let (mut cpu, mut mem) = init();
  jump(&mut cpu, &mut mem, &[0xcd, 0x00, 0xd0], 0xd000, 24);
  assert_eq!(cpu.regs.sp, 0xfffc);
  assert_eq!(mem.read16(0xfffc), Ok(START + 3));

  jump(&mut cpu, &mut mem, &[0xc9], START + 3, 16);
  assert_eq!(cpu.regs.sp, 0xfffe);
}

#[test]
fn call_ret_conditional() {
  let (mut cpu, mut mem) = init();
  cpu.regs.f = flags(false, false, false, false);
  // CALL Z not taken: nothing pushed.
  run(&mut cpu, &mut mem, &[0xcc, 0x00, 0xd0], 3, 12);
  assert_eq!(cpu.regs.sp, 0xfffe);

  cpu.regs.pc = START;
  jump(&mut cpu, &mut mem, &[0xc4, 0x00, 0xd0], 0xd000, 24);
  // RET C not taken.
  run(&mut cpu, &mut mem, &[0xd8], 1, 8);
  cpu.regs.pc = 0xd000;
  // RET NC taken.
  jump(&mut cpu, &mut mem, &[0xd0], START + 3, 20);
  assert_eq!(cpu.regs.sp, 0xfffe);
}

#[test]
fn rst() {
  let (mut cpu, mut mem) = init();
  cpu.regs.pc = 0xc800;
  mem.write8(0xc800, 0xef).unwrap();
  assert_eq!(cpu.step(&mut mem), Ok(16));
  assert_eq!(cpu.regs.pc, 0x0028);
  assert_eq!(mem.read16(cpu.regs.sp), Ok(0xc801));
}

#[test]
fn reti_enables_interrupts() {
  let (mut cpu, mut mem) = init();
  cpu.push(&mut mem, 0xd000).unwrap();
  jump(&mut cpu, &mut mem, &[0xd9], 0xd000, 16);
  assert!(cpu.ime());
}

#[test]
fn di_ei() {
  let (mut cpu, mut mem) = init();
  run(&mut cpu, &mut mem, &[0xfb], 1, 4);
  assert!(cpu.ime());
  run(&mut cpu, &mut mem, &[0xf3], 1, 4);
  assert!(!cpu.ime());
}

#[test]
fn halt() {
  let (mut cpu, mut mem) = init();
  run(&mut cpu, &mut mem, &[0x76], 1, 4);
  assert_eq!(cpu.state(), State::LowPower);

  // No fetch, no time while halted.
  let pc = cpu.regs.pc;
  assert_eq!(cpu.step(&mut mem), Ok(0));
  assert_eq!(cpu.regs.pc, pc);

  cpu.wake();
  assert_eq!(cpu.state(), State::Running);
}

#[test]
fn halted_cpu_does_not_touch_the_bus() {
  let (mut cpu, mut mem) = init();
  run(&mut cpu, &mut mem, &[0x76], 1, 4);
  // Any bus access fails once the space is released.
  mem.release();
  assert_eq!(cpu.step(&mut mem), Ok(0));
  cpu.wake();
  assert!(cpu.step(&mut mem).is_err());
}

#[test]
fn stop() {
  let (mut cpu, mut mem) = init();
  run(&mut cpu, &mut mem, &[0x10, 0x00], 2, 4);
  assert!(cpu.is_halted());
}

#[test]
fn illegal_opcode_is_a_nop() {
  for opcode in &[0xd3, 0xdb, 0xdd, 0xe3, 0xe4, 0xeb, 0xec, 0xed, 0xf4, 0xfc, 0xfd] {
    let (mut cpu, mut mem) = init();
    let regs = cpu.regs.clone();
    run(&mut cpu, &mut mem, &[*opcode], 1, 4);
    assert_eq!(cpu.regs.a, regs.a);
    assert_eq!(cpu.regs.f, regs.f);
    assert_eq!(cpu.regs.sp, regs.sp);
  }
}

#[test]
fn cb_prefix_uses_extended_table() {
  // 0xcb 0x00 is RLC B, not NOP.
  let (mut cpu, mut mem) = init();
  cpu.regs.b = 0x81;
  run(&mut cpu, &mut mem, &[0xcb, 0x00], 2, 8);
  assert_eq!(cpu.regs.b, 0x03);
  assert!(cpu.regs.f.c());

  // 0xcb 0x3e is SRL (HL), not LD A,n.
  let (mut cpu, mut mem) = init();
  cpu.regs.set_hl(0xd000);
  mem.write8(0xd000, 0x02).unwrap();
  run(&mut cpu, &mut mem, &[0xcb, 0x3e], 2, 16);
  assert_eq!(mem.read8(0xd000), Ok(0x01));
  assert_eq!(cpu.regs.a, 0x00);
}

#[test]
fn cb_swap() {
  macro_rules! run_test {
    ($reg:ident, $opcode:expr) => {{
      let (mut cpu, mut mem) = init();
      cpu.regs.$reg = 0xa5;
      run(&mut cpu, &mut mem, &[0xcb, $opcode], 2, 8);
      assert_eq!(cpu.regs.$reg, 0x5a);
      assert_eq!(cpu.regs.f, flags(false, false, false, false));
    }};
  }
  run_test!(b, 0x30);
  run_test!(c, 0x31);
  run_test!(d, 0x32);
  run_test!(e, 0x33);
  run_test!(h, 0x34);
  run_test!(l, 0x35);
  run_test!(a, 0x37);
}

#[test]
fn cb_bit_res_set() {
  let (mut cpu, mut mem) = init();
  cpu.regs.a = 0x80;
  cpu.regs.f = flags(false, true, false, true);
  run(&mut cpu, &mut mem, &[0xcb, 0x7f], 2, 8);
  assert_eq!(cpu.regs.f, flags(false, false, true, true));
  run(&mut cpu, &mut mem, &[0xcb, 0x47], 2, 8);
  assert_eq!(cpu.regs.f, flags(true, false, true, true));

  run(&mut cpu, &mut mem, &[0xcb, 0xbf], 2, 8);
  assert_eq!(cpu.regs.a, 0x00);
  run(&mut cpu, &mut mem, &[0xcb, 0xc7], 2, 8);
  assert_eq!(cpu.regs.a, 0x01);

  cpu.regs.set_hl(0xd000);
  run(&mut cpu, &mut mem, &[0xcb, 0xde], 2, 16);
  assert_eq!(mem.read8(0xd000), Ok(0x08));
  run(&mut cpu, &mut mem, &[0xcb, 0x5e], 2, 12);
  assert!(!cpu.regs.f.z());
  run(&mut cpu, &mut mem, &[0xcb, 0x9e], 2, 16);
  assert_eq!(mem.read8(0xd000), Ok(0x00));
}

#[test]
fn write_to_rom_is_fatal() {
  let (mut cpu, mut mem) = init();
  cpu.regs.set_hl(0x2000);
  mem.write8(START, 0x77).unwrap();
  assert_eq!(
    cpu.step(&mut mem),
    Err(Error::WriteProtected { address: 0x2000 })
  );
}

#[test]
fn service_interrupt() {
  let (mut cpu, mut mem) = init();
  cpu.set_ime(true);
  mem.write8(IE, 0x05).unwrap();
  mem.write8(IF, 0x04).unwrap();
  assert_eq!(cpu.service_interrupts(&mut mem), Ok(20));
  assert_eq!(cpu.regs.pc, 0x0050);
  assert_eq!(mem.read16(cpu.regs.sp), Ok(START));
  assert_eq!(mem.read8(IF), Ok(0x00));
  assert!(!cpu.ime());
}

#[test]
fn interrupt_priority() {
  let (mut cpu, mut mem) = init();
  cpu.set_ime(true);
  mem.write8(IE, 0x1f).unwrap();
  mem.write8(IF, 0x12).unwrap();
  cpu.service_interrupts(&mut mem).unwrap();
  assert_eq!(cpu.regs.pc, 0x0048);
  assert_eq!(mem.read8(IF), Ok(0x10));
}

#[test]
fn pending_interrupt_wakes_without_ime() {
  let (mut cpu, mut mem) = init();
  run(&mut cpu, &mut mem, &[0x76], 1, 4);
  mem.write8(IF, 0x01).unwrap();
  // Requested but not enabled.
  assert_eq!(cpu.service_interrupts(&mut mem), Ok(0));
  assert!(cpu.is_halted());

  mem.write8(IE, 0x01).unwrap();
  assert_eq!(cpu.service_interrupts(&mut mem), Ok(0));
  assert!(!cpu.is_halted());
  assert_eq!(cpu.regs.pc, START + 1);
  assert_eq!(mem.read8(IF), Ok(0x01));
}
