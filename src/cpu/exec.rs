use crate::cpu::alu;
use crate::cpu::reg::Flags;
use crate::cpu::table::{AluOp, Cond, Ind, Instruction, Op, ShiftOp, Stack, R16, R8};
use crate::cpu::{Flow, Operand, State, CPU};
use crate::error::Result;
use crate::mem::Memory;

impl CPU {
  /// Execute one decoded instruction. PC still points at its first byte.
  pub(super) fn execute(
    &mut self,
    mem: &mut Memory,
    ins: &Instruction,
    operand: Operand,
  ) -> Result<Flow> {
    let next = self.regs.pc.wrapping_add(u16::from(ins.length));

    match ins.op {
      Op::Nop => (),
      Op::Illegal => {
        warn!(
          "Illegal opcode 0x{:02x} at 0x{:04x}, ignoring",
          ins.opcode,
          self.regs.pc
        );
      }
      Op::Prefix => unreachable!("0xcb is dispatched through EXTENDED"),
      Op::Stop | Op::Halt => {
        debug!("{:?} at pc=0x{:04x}", ins.op, self.regs.pc);
        self.state = State::LowPower;
      }
      Op::Di => self.set_ime(false),
      Op::Ei => self.set_ime(true),

      Op::Ld(dst, src) => {
        let n = self.read_r8(mem, src)?;
        self.write_r8(mem, dst, n)?;
      }
      Op::LdImm(r) => self.write_r8(mem, r, operand.byte())?,
      Op::LdImm16(rr) => self.set_r16(rr, operand.word()),
      Op::StoreA(ind) => {
        mem.write8(self.indirect(ind), self.regs.a)?;
        self.adjust_hl(ind);
      }
      Op::LoadA(ind) => {
        self.regs.a = mem.read8(self.indirect(ind))?;
        self.adjust_hl(ind);
      }
      Op::StoreAAbs => mem.write8(operand.word(), self.regs.a)?,
      Op::LoadAAbs => self.regs.a = mem.read8(operand.word())?,
      Op::StoreHigh => mem.write8(high(operand.byte()), self.regs.a)?,
      Op::LoadHigh => self.regs.a = mem.read8(high(operand.byte()))?,
      Op::StoreHighC => mem.write8(high(self.regs.c), self.regs.a)?,
      Op::LoadHighC => self.regs.a = mem.read8(high(self.regs.c))?,
      Op::StoreSp => mem.write16(operand.word(), self.regs.sp)?,
      Op::LdSpHl => self.regs.sp = self.regs.hl(),
      Op::LdHlSp => {
        let sp = self.regs.sp;
        let hl = alu::add_sp(&mut self.regs.f, sp, operand.byte());
        self.regs.set_hl(hl);
      }
      Op::Push(pair) => {
        let value = self.stack_pair(pair);
        self.push(mem, value)?;
      }
      Op::Pop(pair) => {
        let value = self.pop(mem)?;
        self.set_stack_pair(pair, value);
      }

      Op::Alu(op, r) => {
        let n = self.read_r8(mem, r)?;
        self.alu(op, n);
      }
      Op::AluImm(op) => self.alu(op, operand.byte()),
      Op::Inc(R8::HLm) => {
        let old = mem.increment8(self.regs.hl())?;
        alu::inc(&mut self.regs.f, old);
      }
      Op::Dec(R8::HLm) => {
        let old = mem.decrement8(self.regs.hl())?;
        alu::dec(&mut self.regs.f, old);
      }
      Op::Inc(r) => {
        let n = self.read_r8(mem, r)?;
        let result = alu::inc(&mut self.regs.f, n);
        self.write_r8(mem, r, result)?;
      }
      Op::Dec(r) => {
        let n = self.read_r8(mem, r)?;
        let result = alu::dec(&mut self.regs.f, n);
        self.write_r8(mem, r, result)?;
      }
      Op::Inc16(rr) => self.set_r16(rr, self.r16(rr).wrapping_add(1)),
      Op::Dec16(rr) => self.set_r16(rr, self.r16(rr).wrapping_sub(1)),
      Op::AddHl(rr) => {
        let (hl, n) = (self.regs.hl(), self.r16(rr));
        let result = alu::add16(&mut self.regs.f, hl, n);
        self.regs.set_hl(result);
      }
      Op::AddSp => {
        let sp = self.regs.sp;
        self.regs.sp = alu::add_sp(&mut self.regs.f, sp, operand.byte());
      }

      // The accumulator rotates always clear Z.
      Op::Rlca => self.rotate_a(alu::rlc),
      Op::Rrca => self.rotate_a(alu::rrc),
      Op::Rla => self.rotate_a(alu::rl),
      Op::Rra => self.rotate_a(alu::rr),
      Op::Daa => {
        let a = self.regs.a;
        self.regs.a = alu::daa(&mut self.regs.f, a);
      }
      Op::Cpl => {
        self.regs.a = !self.regs.a;
        self.regs.f.set_n(true);
        self.regs.f.set_h(true);
      }
      Op::Scf => {
        self.regs.f.set_n(false);
        self.regs.f.set_h(false);
        self.regs.f.set_c(true);
      }
      Op::Ccf => {
        let c = self.regs.f.c();
        self.regs.f.set_n(false);
        self.regs.f.set_h(false);
        self.regs.f.set_c(!c);
      }

      Op::Jp(cond) => return Ok(self.branch(cond, operand.word(), 16)),
      Op::JpHl => {
        return Ok(Flow::Jump {
          target: self.regs.hl(),
          cycles: None,
        });
      }
      Op::Jr(cond) => {
        let target = next.wrapping_add(operand.byte() as i8 as u16);
        return Ok(self.branch(cond, target, 12));
      }
      Op::Call(cond) => {
        if !self.check(cond) {
          return Ok(Flow::Next);
        }
        self.push(mem, next)?;
        return Ok(self.branch(cond, operand.word(), 24));
      }
      Op::Ret(cond) => {
        if !self.check(cond) {
          return Ok(Flow::Next);
        }
        let target = self.pop(mem)?;
        return Ok(self.branch(cond, target, 20));
      }
      Op::Reti => {
        let target = self.pop(mem)?;
        self.set_ime(true);
        return Ok(Flow::Jump {
          target,
          cycles: None,
        });
      }
      Op::Rst(vector) => {
        self.push(mem, next)?;
        return Ok(Flow::Jump {
          target: u16::from(vector),
          cycles: None,
        });
      }

      Op::Shift(op, r) => {
        let n = self.read_r8(mem, r)?;
        let f = &mut self.regs.f;
        let result = match op {
          ShiftOp::Rlc => alu::rlc(f, n),
          ShiftOp::Rrc => alu::rrc(f, n),
          ShiftOp::Rl => alu::rl(f, n),
          ShiftOp::Rr => alu::rr(f, n),
          ShiftOp::Sla => alu::sla(f, n),
          ShiftOp::Sra => alu::sra(f, n),
          ShiftOp::Swap => alu::swap(f, n),
          ShiftOp::Srl => alu::srl(f, n),
        };
        self.write_r8(mem, r, result)?;
      }
      Op::Bit(b, r) => {
        let n = self.read_r8(mem, r)?;
        alu::bit(&mut self.regs.f, b, n);
      }
      Op::Res(b, r) => {
        let n = self.read_r8(mem, r)?;
        self.write_r8(mem, r, n & !(1 << b))?;
      }
      Op::Set(b, r) => {
        let n = self.read_r8(mem, r)?;
        self.write_r8(mem, r, n | (1 << b))?;
      }
    }

    Ok(Flow::Next)
  }

  fn read_r8(&self, mem: &Memory, r: R8) -> Result<u8> {
    Ok(match r {
      R8::A => self.regs.a,
      R8::B => self.regs.b,
      R8::C => self.regs.c,
      R8::D => self.regs.d,
      R8::E => self.regs.e,
      R8::H => self.regs.h,
      R8::L => self.regs.l,
      R8::HLm => mem.read8(self.regs.hl())?,
    })
  }

  fn write_r8(&mut self, mem: &mut Memory, r: R8, value: u8) -> Result<()> {
    match r {
      R8::A => self.regs.a = value,
      R8::B => self.regs.b = value,
      R8::C => self.regs.c = value,
      R8::D => self.regs.d = value,
      R8::E => self.regs.e = value,
      R8::H => self.regs.h = value,
      R8::L => self.regs.l = value,
      R8::HLm => mem.write8(self.regs.hl(), value)?,
    }
    Ok(())
  }

  fn r16(&self, rr: R16) -> u16 {
    match rr {
      R16::BC => self.regs.bc(),
      R16::DE => self.regs.de(),
      R16::HL => self.regs.hl(),
      R16::SP => self.regs.sp,
    }
  }

  fn set_r16(&mut self, rr: R16, value: u16) {
    match rr {
      R16::BC => self.regs.set_bc(value),
      R16::DE => self.regs.set_de(value),
      R16::HL => self.regs.set_hl(value),
      R16::SP => self.regs.sp = value,
    }
  }

  fn stack_pair(&self, pair: Stack) -> u16 {
    match pair {
      Stack::BC => self.regs.bc(),
      Stack::DE => self.regs.de(),
      Stack::HL => self.regs.hl(),
      Stack::AF => self.regs.af(),
    }
  }

  fn set_stack_pair(&mut self, pair: Stack, value: u16) {
    match pair {
      Stack::BC => self.regs.set_bc(value),
      Stack::DE => self.regs.set_de(value),
      Stack::HL => self.regs.set_hl(value),
      // The flag nibble is masked by set_af.
      Stack::AF => self.regs.set_af(value),
    }
  }

  fn indirect(&self, ind: Ind) -> u16 {
    match ind {
      Ind::BC => self.regs.bc(),
      Ind::DE => self.regs.de(),
      Ind::HLI | Ind::HLD => self.regs.hl(),
    }
  }

  /// Post-transfer index update for `(HL+)` and `(HL-)`.
  fn adjust_hl(&mut self, ind: Ind) {
    match ind {
      Ind::HLI => self.regs.hl_inc(),
      Ind::HLD => self.regs.hl_dec(),
      Ind::BC | Ind::DE => (),
    }
  }

  fn alu(&mut self, op: AluOp, n: u8) {
    let a = self.regs.a;
    let f = &mut self.regs.f;
    self.regs.a = match op {
      AluOp::Add => alu::add(f, a, n),
      AluOp::Adc => alu::adc(f, a, n),
      AluOp::Sub => alu::sub(f, a, n),
      AluOp::Sbc => alu::sbc(f, a, n),
      AluOp::And => alu::and(f, a, n),
      AluOp::Xor => alu::xor(f, a, n),
      AluOp::Or => alu::or(f, a, n),
      AluOp::Cp => {
        alu::cp(f, a, n);
        a
      }
    };
  }

  fn rotate_a(&mut self, rotate: fn(&mut Flags, u8) -> u8) {
    let a = self.regs.a;
    self.regs.a = rotate(&mut self.regs.f, a);
    self.regs.f.set_z(false);
  }

  fn check(&self, cond: Cond) -> bool {
    match cond {
      Cond::Always => true,
      Cond::NZ => !self.regs.f.z(),
      Cond::Z => self.regs.f.z(),
      Cond::NC => !self.regs.f.c(),
      Cond::C => self.regs.f.c(),
    }
  }

  /// Jump to `target` if `cond` holds. A taken conditional branch costs
  /// `taken` cycles; unconditional ones keep the table cost.
  fn branch(&self, cond: Cond, target: u16, taken: u32) -> Flow {
    if !self.check(cond) {
      return Flow::Next;
    }
    let cycles = match cond {
      Cond::Always => None,
      _ => Some(taken),
    };
    Flow::Jump { target, cycles }
  }
}

/// Address in the 0xff00 I/O page.
fn high(offset: u8) -> u16 {
  0xff00 | u16::from(offset)
}
