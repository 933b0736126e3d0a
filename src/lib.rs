// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! A virtual machine for the Chip-8 fantasy console.
//!
//! A [MachineState] holds the machine image; an [Engine] owns one and advances
//! it by one instruction per [Engine::step]. Loading programs from disk,
//! drawing the screen, playing the beep, and reading the keyboard are left to
//! whatever drives the engine, through the flags and [Keypad] it exposes.

pub mod engine;
pub mod error;
pub mod keymap;
pub mod state;

pub use engine::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    random::{ByteSequence, RandomSource, ThreadRandom},
    Engine, Flow,
};
pub use error::{Error, Result};
pub use keymap::KeyMap;
pub use state::*;

/// Common imports for chip8vm
pub mod prelude {
    pub use super::*;
}
