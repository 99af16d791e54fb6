#[macro_use]
extern crate log;

use anyhow::{anyhow, Context};
use clap::{crate_version, App, Arg};
use log::LevelFilter;

use gb_core::{GameBoy, Registers, CPU};

use std::fs;
use std::process;

fn main() {
  if let Err(e) = run() {
    error!("{:#}", e);
    process::exit(1);
  }
}

fn run() -> anyhow::Result<()> {
  let matches = App::new("gb-core")
    .version(crate_version!())
    .about("Runs a Game Boy ROM on the headless CPU core")
    .arg(
      Arg::with_name("ROM")
        .help("Cartridge image to run")
        .required(true)
        .index(1),
    )
    .arg(
      Arg::with_name("ticks")
        .long("ticks")
        .value_name("N")
        .takes_value(true)
        .help("Stop after N ticks"),
    )
    .arg(
      Arg::with_name("zeroed")
        .long("zeroed")
        .help("Start from zeroed registers at 0x0000 instead of post-boot"),
    )
    .arg(
      Arg::with_name("v")
        .short("v")
        .multiple(true)
        .help("Increase log verbosity"),
    )
    .get_matches();

  let level = match matches.occurrences_of("v") {
    0 => LevelFilter::Info,
    1 => LevelFilter::Debug,
    _ => LevelFilter::Trace,
  };
  env_logger::Builder::new()
    .filter_level(level)
    .parse_default_env()
    .init();

  let limit = match matches.value_of("ticks") {
    Some(n) => {
      let n = n.parse::<u64>().with_context(|| format!("invalid tick count {:?}", n))?;
      Some(n)
    }
    None => None,
  };

  // Required by clap.
  let path = matches.value_of("ROM").ok_or_else(|| anyhow!("no ROM given"))?;
  let rom = fs::read(path).with_context(|| format!("failed to read {}", path))?;
  info!("Loaded {} ({} bytes)", path, rom.len());

  let mut gb = GameBoy::new();
  gb.initialize().context("failed to allocate address space")?;
  gb.mount_rom(&rom).context("failed to mount ROM")?;
  if !matches.is_present("zeroed") {
    *gb.cpu_mut() = CPU::with_registers(Registers::post_boot());
  }

  let result = gb.run(limit);
  let pc = gb.cpu().regs.pc;
  info!("Ran {} ticks, {} cycles", gb.ticks(), gb.cpu().cycles());
  gb.shutdown();

  result.with_context(|| format!("emulation stopped at pc=0x{:04x}", pc))?;
  Ok(())
}
