//! Opcode descriptor tables.
//!
//! `BASE` is indexed by the first opcode byte, `EXTENDED` by the byte that
//! follows the 0xcb prefix. Both are built at compile time and never change.
//! Cycle counts are machine clock cycles (a NOP is 4). For conditional
//! control flow the table holds the not-taken cost; the taken cost is
//! returned by the operation itself.

pub const PREFIX: u8 = 0xcb;

/// 8-bit operand in the order the opcodes encode it (bits 0-2 or 3-5).
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum R8 {
  B,
  C,
  D,
  E,
  H,
  L,
  /// The byte addressed by HL.
  HLm,
  A,
}

impl R8 {
  const fn decode(bits: u8) -> R8 {
    match bits & 0x7 {
      0 => R8::B,
      1 => R8::C,
      2 => R8::D,
      3 => R8::E,
      4 => R8::H,
      5 => R8::L,
      6 => R8::HLm,
      _ => R8::A,
    }
  }

  const fn is_mem(self) -> bool {
    matches!(self, R8::HLm)
  }
}

/// Register pairs for 16-bit loads and arithmetic.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum R16 {
  BC,
  DE,
  HL,
  SP,
}

impl R16 {
  const fn decode(bits: u8) -> R16 {
    match bits & 0x3 {
      0 => R16::BC,
      1 => R16::DE,
      2 => R16::HL,
      _ => R16::SP,
    }
  }
}

/// Register pairs for PUSH and POP.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Stack {
  BC,
  DE,
  HL,
  AF,
}

impl Stack {
  const fn decode(bits: u8) -> Stack {
    match bits & 0x3 {
      0 => Stack::BC,
      1 => Stack::DE,
      2 => Stack::HL,
      _ => Stack::AF,
    }
  }
}

/// Indirect accumulator addressing: `(BC)`, `(DE)`, `(HL+)`, `(HL-)`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Ind {
  BC,
  DE,
  HLI,
  HLD,
}

impl Ind {
  const fn decode(bits: u8) -> Ind {
    match bits & 0x3 {
      0 => Ind::BC,
      1 => Ind::DE,
      2 => Ind::HLI,
      _ => Ind::HLD,
    }
  }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Cond {
  Always,
  NZ,
  Z,
  NC,
  C,
}

impl Cond {
  const fn decode(bits: u8) -> Cond {
    match bits & 0x3 {
      0 => Cond::NZ,
      1 => Cond::Z,
      2 => Cond::NC,
      _ => Cond::C,
    }
  }
}

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum AluOp {
  Add,
  Adc,
  Sub,
  Sbc,
  And,
  Xor,
  Or,
  Cp,
}

impl AluOp {
  const fn decode(bits: u8) -> AluOp {
    match bits & 0x7 {
      0 => AluOp::Add,
      1 => AluOp::Adc,
      2 => AluOp::Sub,
      3 => AluOp::Sbc,
      4 => AluOp::And,
      5 => AluOp::Xor,
      6 => AluOp::Or,
      _ => AluOp::Cp,
    }
  }
}

/// Rotates and shifts of the 0xcb family.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum ShiftOp {
  Rlc,
  Rrc,
  Rl,
  Rr,
  Sla,
  Sra,
  Swap,
  Srl,
}

impl ShiftOp {
  const fn decode(bits: u8) -> ShiftOp {
    match bits & 0x7 {
      0 => ShiftOp::Rlc,
      1 => ShiftOp::Rrc,
      2 => ShiftOp::Rl,
      3 => ShiftOp::Rr,
      4 => ShiftOp::Sla,
      5 => ShiftOp::Sra,
      6 => ShiftOp::Swap,
      _ => ShiftOp::Srl,
    }
  }
}

/// What an opcode does. Executed by `Cpu::execute`.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Op {
  Nop,
  /// Reserved opcode, executed as a no-op.
  Illegal,
  /// The 0xcb prefix; the real operation lives in `EXTENDED`.
  Prefix,
  Stop,
  Halt,
  Di,
  Ei,

  /// `LD r,r'`
  Ld(R8, R8),
  /// `LD r,n`
  LdImm(R8),
  /// `LD rr,nn`
  LdImm16(R16),
  /// `LD (BC)/(DE)/(HL+)/(HL-),A`
  StoreA(Ind),
  /// `LD A,(BC)/(DE)/(HL+)/(HL-)`
  LoadA(Ind),
  /// `LD (nn),A`
  StoreAAbs,
  /// `LD A,(nn)`
  LoadAAbs,
  /// `LDH (n),A`
  StoreHigh,
  /// `LDH A,(n)`
  LoadHigh,
  /// `LD (C),A`
  StoreHighC,
  /// `LD A,(C)`
  LoadHighC,
  /// `LD (nn),SP`
  StoreSp,
  /// `LD SP,HL`
  LdSpHl,
  /// `LD HL,SP+e`
  LdHlSp,
  Push(Stack),
  Pop(Stack),

  /// ALU operation on A and a register or `(HL)`.
  Alu(AluOp, R8),
  /// ALU operation on A and an immediate byte.
  AluImm(AluOp),
  Inc(R8),
  Dec(R8),
  Inc16(R16),
  Dec16(R16),
  AddHl(R16),
  AddSp,

  Rlca,
  Rrca,
  Rla,
  Rra,
  Daa,
  Cpl,
  Scf,
  Ccf,

  Jp(Cond),
  JpHl,
  Jr(Cond),
  Call(Cond),
  Ret(Cond),
  Reti,
  Rst(u8),

  Shift(ShiftOp, R8),
  Bit(u8, R8),
  Res(u8, R8),
  Set(u8, R8),
}

/// One opcode descriptor.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Instruction {
  pub opcode: u8,
  /// Total length in bytes, including the opcode (and prefix).
  pub length: u8,
  /// Base cost in clock cycles.
  pub cycles: u32,
  pub op: Op,
}

impl Instruction {
  const fn new(opcode: u8, length: u8, cycles: u32, op: Op) -> Instruction {
    Instruction {
      opcode,
      length,
      cycles,
      op,
    }
  }
}

pub static BASE: [Instruction; 256] = build_base();
pub static EXTENDED: [Instruction; 256] = build_extended();

const fn build_base() -> [Instruction; 256] {
  let mut table = [Instruction::new(0, 1, 4, Op::Illegal); 256];
  let mut i = 0;
  while i < 256 {
    table[i] = decode_base(i as u8);
    i += 1;
  }
  table
}

const fn build_extended() -> [Instruction; 256] {
  let mut table = [Instruction::new(0, 2, 8, Op::Illegal); 256];
  let mut i = 0;
  while i < 256 {
    table[i] = decode_extended(i as u8);
    i += 1;
  }
  table
}

const fn decode_base(op: u8) -> Instruction {
  use Instruction as I;

  let dst = R8::decode(op >> 3);
  let src = R8::decode(op);
  let rr = R16::decode(op >> 4);
  match op {
    0x00 => I::new(op, 1, 4, Op::Nop),
    0x10 => I::new(op, 2, 4, Op::Stop),
    0x76 => I::new(op, 1, 4, Op::Halt),
    0xf3 => I::new(op, 1, 4, Op::Di),
    0xfb => I::new(op, 1, 4, Op::Ei),
    PREFIX => I::new(op, 1, 4, Op::Prefix),

    0x01 | 0x11 | 0x21 | 0x31 => I::new(op, 3, 12, Op::LdImm16(rr)),
    0x02 | 0x12 | 0x22 | 0x32 => {
      I::new(op, 1, 8, Op::StoreA(Ind::decode(op >> 4)))
    }
    0x0a | 0x1a | 0x2a | 0x3a => {
      I::new(op, 1, 8, Op::LoadA(Ind::decode(op >> 4)))
    }
    0x03 | 0x13 | 0x23 | 0x33 => I::new(op, 1, 8, Op::Inc16(rr)),
    0x0b | 0x1b | 0x2b | 0x3b => I::new(op, 1, 8, Op::Dec16(rr)),
    0x09 | 0x19 | 0x29 | 0x39 => I::new(op, 1, 8, Op::AddHl(rr)),
    0x04 | 0x0c | 0x14 | 0x1c | 0x24 | 0x2c | 0x34 | 0x3c => {
      I::new(op, 1, if dst.is_mem() { 12 } else { 4 }, Op::Inc(dst))
    }
    0x05 | 0x0d | 0x15 | 0x1d | 0x25 | 0x2d | 0x35 | 0x3d => {
      I::new(op, 1, if dst.is_mem() { 12 } else { 4 }, Op::Dec(dst))
    }
    0x06 | 0x0e | 0x16 | 0x1e | 0x26 | 0x2e | 0x36 | 0x3e => {
      I::new(op, 2, if dst.is_mem() { 12 } else { 8 }, Op::LdImm(dst))
    }
    0x07 => I::new(op, 1, 4, Op::Rlca),
    0x0f => I::new(op, 1, 4, Op::Rrca),
    0x17 => I::new(op, 1, 4, Op::Rla),
    0x1f => I::new(op, 1, 4, Op::Rra),
    0x27 => I::new(op, 1, 4, Op::Daa),
    0x2f => I::new(op, 1, 4, Op::Cpl),
    0x37 => I::new(op, 1, 4, Op::Scf),
    0x3f => I::new(op, 1, 4, Op::Ccf),
    0x08 => I::new(op, 3, 20, Op::StoreSp),
    0x18 => I::new(op, 2, 12, Op::Jr(Cond::Always)),
    0x20 | 0x28 | 0x30 | 0x38 => {
      I::new(op, 2, 8, Op::Jr(Cond::decode(op >> 3)))
    }

    0x40..=0x7f => {
      let cycles = if dst.is_mem() || src.is_mem() { 8 } else { 4 };
      I::new(op, 1, cycles, Op::Ld(dst, src))
    }
    0x80..=0xbf => {
      let cycles = if src.is_mem() { 8 } else { 4 };
      I::new(op, 1, cycles, Op::Alu(AluOp::decode(op >> 3), src))
    }

    0xc0 | 0xc8 | 0xd0 | 0xd8 => {
      I::new(op, 1, 8, Op::Ret(Cond::decode(op >> 3)))
    }
    0xc9 => I::new(op, 1, 16, Op::Ret(Cond::Always)),
    0xd9 => I::new(op, 1, 16, Op::Reti),
    0xc1 | 0xd1 | 0xe1 | 0xf1 => {
      I::new(op, 1, 12, Op::Pop(Stack::decode(op >> 4)))
    }
    0xc5 | 0xd5 | 0xe5 | 0xf5 => {
      I::new(op, 1, 16, Op::Push(Stack::decode(op >> 4)))
    }
    0xc2 | 0xca | 0xd2 | 0xda => {
      I::new(op, 3, 12, Op::Jp(Cond::decode(op >> 3)))
    }
    0xc3 => I::new(op, 3, 16, Op::Jp(Cond::Always)),
    0xe9 => I::new(op, 1, 4, Op::JpHl),
    0xc4 | 0xcc | 0xd4 | 0xdc => {
      I::new(op, 3, 12, Op::Call(Cond::decode(op >> 3)))
    }
    0xcd => I::new(op, 3, 24, Op::Call(Cond::Always)),
    0xc6 | 0xce | 0xd6 | 0xde | 0xe6 | 0xee | 0xf6 | 0xfe => {
      I::new(op, 2, 8, Op::AluImm(AluOp::decode(op >> 3)))
    }
    0xc7 | 0xcf | 0xd7 | 0xdf | 0xe7 | 0xef | 0xf7 | 0xff => {
      I::new(op, 1, 16, Op::Rst(op & 0x38))
    }

    0xe0 => I::new(op, 2, 12, Op::StoreHigh),
    0xf0 => I::new(op, 2, 12, Op::LoadHigh),
    0xe2 => I::new(op, 1, 8, Op::StoreHighC),
    0xf2 => I::new(op, 1, 8, Op::LoadHighC),
    0xea => I::new(op, 3, 16, Op::StoreAAbs),
    0xfa => I::new(op, 3, 16, Op::LoadAAbs),
    0xe8 => I::new(op, 2, 16, Op::AddSp),
    0xf8 => I::new(op, 2, 12, Op::LdHlSp),
    0xf9 => I::new(op, 1, 8, Op::LdSpHl),

    // 0xd3 0xdb 0xdd 0xe3 0xe4 0xeb 0xec 0xed 0xf4 0xfc 0xfd
    _ => I::new(op, 1, 4, Op::Illegal),
  }
}

const fn decode_extended(op: u8) -> Instruction {
  let r = R8::decode(op);
  let b = (op >> 3) & 0x7;
  let (cycles, kind) = match op >> 6 {
    0 => (16, Op::Shift(ShiftOp::decode(op >> 3), r)),
    1 => (12, Op::Bit(b, r)),
    2 => (16, Op::Res(b, r)),
    _ => (16, Op::Set(b, r)),
  };
  Instruction::new(op, 2, if r.is_mem() { cycles } else { 8 }, kind)
}
