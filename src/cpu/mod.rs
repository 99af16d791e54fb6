mod alu;
mod exec;
pub mod reg;
pub mod table;

#[cfg(test)]
mod optest;

use crate::error::Result;
use crate::mem::{Memory, IE, IF};

pub use self::reg::{Flags, Registers};
use self::table::{Instruction, BASE, EXTENDED, PREFIX};

/// Clock cycles spent dispatching an interrupt.
const INTERRUPT_CYCLES: u32 = 20;

#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum State {
  Running,
  /// Halted or stopped until an interrupt arrives.
  LowPower,
}

/// Inline operand bytes that follow an opcode.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub enum Operand {
  None,
  Byte(u8),
  Word(u16),
}

// Operand width is fixed per opcode by the descriptor length.
impl Operand {
  fn byte(self) -> u8 {
    match self {
      Operand::Byte(n) => n,
      _ => unreachable!("expected a byte operand, got {:?}", self),
    }
  }

  fn word(self) -> u16 {
    match self {
      Operand::Word(nn) => nn,
      _ => unreachable!("expected a word operand, got {:?}", self),
    }
  }
}

/// How an executed operation left the program counter.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
enum Flow {
  /// Fall through to the next instruction at the table cost.
  Next,
  /// PC was set explicitly. `cycles` overrides the table cost when present.
  Jump { target: u16, cycles: Option<u32> },
}

#[derive(Debug)]
pub struct CPU {
  pub regs: Registers,

  state: State,
  /// Interrupt master enable.
  ime: bool,

  /// Cycles taken by the last step.
  last: u32,
  /// Total cycles since construction.
  cycles: u64,
}

impl Default for CPU {
  fn default() -> Self {
    Self::new()
  }
}

impl CPU {
  pub fn new() -> CPU {
    CPU::with_registers(Registers::new())
  }

  pub fn with_registers(regs: Registers) -> CPU {
    CPU {
      regs,
      state: State::Running,
      ime: false,
      last: 0,
      cycles: 0,
    }
  }

  pub fn state(&self) -> State {
    self.state
  }

  pub fn is_halted(&self) -> bool {
    self.state == State::LowPower
  }

  /// Leave low-power mode.
  pub fn wake(&mut self) {
    if self.state == State::LowPower {
      debug!("Waking at pc=0x{:04x}", self.regs.pc);
    }
    self.state = State::Running;
  }

  pub fn ime(&self) -> bool {
    self.ime
  }

  pub fn set_ime(&mut self, on: bool) {
    if self.ime != on {
      debug!("IME {} at pc=0x{:04x}", on, self.regs.pc);
    }
    self.ime = on;
  }

  /// Cycles consumed by the most recent step.
  pub fn last_cycles(&self) -> u32 {
    self.last
  }

  /// Cycles consumed since construction.
  pub fn cycles(&self) -> u64 {
    self.cycles
  }

  /// Run one instruction.
  /// Return the clock cycles taken; zero while in low-power mode.
  pub fn step(&mut self, mem: &mut Memory) -> Result<u32> {
    let t = if self.state == State::LowPower {
      0
    } else {
      self.exec(mem)?
    };
    self.account(t);
    Ok(t)
  }

  fn account(&mut self, t: u32) {
    self.last = t;
    self.cycles += u64::from(t);
  }

  /// Fetch, decode and execute the instruction at PC.
  fn exec(&mut self, mem: &mut Memory) -> Result<u32> {
    let pc = self.regs.pc;
    let opcode = mem.read8(pc)?;
    let (ins, operand) = if opcode == PREFIX {
      let ins = &EXTENDED[usize::from(mem.read8(pc.wrapping_add(1))?)];
      (ins, Operand::None)
    } else {
      let ins = &BASE[usize::from(opcode)];
      (ins, self.fetch_operand(mem, ins)?)
    };
    trace!("0x{:04x}: {:02x} {:?} {:?}", pc, opcode, ins.op, operand);

    match self.execute(mem, ins, operand)? {
      Flow::Next => {
        self.regs.pc = pc.wrapping_add(u16::from(ins.length));
        Ok(ins.cycles)
      }
      Flow::Jump { target, cycles } => {
        self.regs.pc = target;
        Ok(cycles.unwrap_or(ins.cycles))
      }
    }
  }

  /// Read the immediate bytes that follow the opcode of `ins`.
  fn fetch_operand(&self, mem: &Memory, ins: &Instruction) -> Result<Operand> {
    let at = self.regs.pc.wrapping_add(1);
    let operand = match ins.length {
      1 => Operand::None,
      2 => Operand::Byte(mem.read8(at)?),
      _ => Operand::Word(mem.read16(at)?),
    };
    Ok(operand)
  }

  /// Push `value`: SP drops by two, then the word is written at SP.
  pub fn push(&mut self, mem: &mut Memory, value: u16) -> Result<()> {
    let sp = self.regs.sp.wrapping_sub(2);
    mem.write16(sp, value)?;
    self.regs.sp = sp;
    Ok(())
  }

  /// Pop a word: read at SP, then SP rises by two.
  pub fn pop(&mut self, mem: &mut Memory) -> Result<u16> {
    let value = mem.read16(self.regs.sp)?;
    self.regs.sp = self.regs.sp.wrapping_add(2);
    Ok(value)
  }

  /// Push PC and jump to an interrupt vector, masking further interrupts.
  /// Return the clock cycles taken.
  pub fn interrupt(&mut self, mem: &mut Memory, vector: u16) -> Result<u32> {
    self.wake();
    self.ime = false;
    let pc = self.regs.pc;
    self.push(mem, pc)?;
    trace!("Interrupt 0x{:02x} from pc=0x{:04x}", vector, pc);
    self.regs.pc = vector;
    self.account(INTERRUPT_CYCLES);
    Ok(INTERRUPT_CYCLES)
  }

  /// Check IE against IF. Any pending request wakes the CPU; if interrupts
  /// are enabled the highest priority one is acknowledged and dispatched.
  /// Return the clock cycles taken.
  pub fn service_interrupts(&mut self, mem: &mut Memory) -> Result<u32> {
    let requested = mem.read8(IF)?;
    let pending = mem.read8(IE)? & requested & 0x1f;
    if pending == 0 {
      return Ok(0);
    }
    self.wake();
    if !self.ime {
      return Ok(0);
    }

    // Bit 0 (VBlank) has the highest priority.
    let bit = pending.trailing_zeros() as u16;
    mem.write8(IF, requested & !(1 << bit))?;
    self.interrupt(mem, 0x40 + 8 * bit)
  }
}
