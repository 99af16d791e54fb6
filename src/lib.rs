//! Cycle-stepped Game Boy core: a flat 64 KiB address space, an LR35902
//! interpreter and a coordinator that ticks them together with stub video
//! and audio units.

#[macro_use]
extern crate log;

pub mod apu;
pub mod cpu;
pub mod error;
pub mod gameboy;
pub mod gpu;
pub mod mem;
pub mod peripheral;

pub use crate::cpu::{Registers, CPU};
pub use crate::error::{Error, Result};
pub use crate::gameboy::GameBoy;
pub use crate::mem::Memory;
