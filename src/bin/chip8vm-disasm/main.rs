// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! chip8vm-disasm: lists a ROM one instruction word at a time

use chip8vm::{error::Result, *};
use gumdrop::*;
use owo_colors::OwoColorize;
use std::{fs::read, path::PathBuf};

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Options, Hash)]
struct Arguments {
    #[options(help = "Show help text")]
    help: bool,
    #[options(help = "Load a ROM to disassemble", free, required)]
    pub file: PathBuf,
    #[options(help = "Start disassembling at offset...")]
    pub offset: usize,
    #[options(help = "Print without colors")]
    pub plain: bool,
}

fn main() -> Result<()> {
    let options = Arguments::parse_args_default_or_exit();
    let contents = read(&options.file)?;
    let disassembler = if options.plain {
        Dis::plain()
    } else {
        Dis::default()
    };
    let origin = PROGRAM_START as usize + options.offset;
    let words = contents.get(options.offset..).unwrap_or_default();
    for (addr, pair) in words.chunks(2).enumerate() {
        let addr = origin + 2 * addr;
        match *pair {
            [hi, lo] => {
                let insn = u16::from_be_bytes([hi, lo]);
                println!(
                    "{addr:03x}: {} {:04x}",
                    disassembler.once(insn),
                    insn.bright_black()
                );
            }
            [byte] => println!("{addr:03x}: {:<6} {byte:02x}", "db"),
            _ => (),
        }
    }
    Ok(())
}
