// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Fetches, decodes, and runs instructions against a [MachineState]


pub mod behavior;
pub mod flags;
pub mod instruction;
pub mod random;

use self::{
    flags::Flags,
    instruction::{
        disassembler::{Dis, Disassembler},
        Insn,
    },
    random::{RandomSource, ThreadRandom},
};
use crate::{
    error::{Error, Result},
    state::{Keypad, MachineState},
};
use owo_colors::OwoColorize;
use std::fmt::Debug;

type Reg = usize;
type Adr = u16;
type Nib = u8;

/// What an instruction did with the program counter
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Flow {
    /// Ran normally; the timers ticked and pc moved to the next instruction
    Advanced,
    /// Set pc itself; the timers did not tick
    Jumped,
    /// `Fx0A` found no key held; nothing changed, and it will run again next step
    WaitingForInput,
}

/// Owns a [MachineState] and executes instructions against it, one per [Engine::step]
pub struct Engine {
    /// Flags that control how the engine behaves, but which aren't inherent to the machine
    pub flags: Flags,
    state: MachineState,
    random: Box<dyn RandomSource>,
    disassembler: Dis,
    cycle: usize,
}

impl Engine {
    /// Constructs an engine around a blank machine, drawing random bytes from the OS
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let engine = Engine::new();
    /// assert_eq!(0x200, engine.state().pc());
    /// ```
    pub fn new() -> Self {
        Self::with_random(Box::new(ThreadRandom))
    }

    /// Constructs an engine around a blank machine, with the provided [RandomSource]
    pub fn with_random(random: Box<dyn RandomSource>) -> Self {
        Engine {
            flags: Flags::default(),
            state: MachineState::new(),
            random,
            disassembler: Dis::default(),
            cycle: 0,
        }
    }

    /// Loads a program from disk into program memory
    pub fn load_program(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        self.state.load_program(rom)?;
        Ok(self)
    }

    /// Loads bytes into program memory
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        self.state.load_program_bytes(rom)?;
        Ok(self)
    }

    /// Gets a read-only view of the machine
    pub fn state(&self) -> &MachineState {
        &self.state
    }

    /// Borrows the key latches, so input can be forwarded between steps
    pub fn keypad(&mut self) -> Keypad<'_> {
        self.state.keypad()
    }

    /// Sets a general purpose register.
    /// If the register doesn't exist, returns [Error::InvalidRegister]
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut engine = Engine::new();
    /// engine.set_v(0x4, 0x41).unwrap();
    /// assert_eq!(0x41, engine.state().v()[4]);
    /// assert!(engine.set_v(0x10, 0).is_err());
    /// ```
    pub fn set_v(&mut self, reg: Reg, value: u8) -> Result<()> {
        if let Some(gpr) = self.state.variables.get_mut(reg) {
            *gpr = value;
            Ok(())
        } else {
            Err(Error::InvalidRegister { reg })
        }
    }

    /// Reports whether the screen needs redrawing, and clears the request
    pub fn take_draw(&mut self) -> bool {
        std::mem::take(&mut self.state.need_draw)
    }

    /// Reports whether a beep is due, and clears the request
    pub fn take_beep(&mut self) -> bool {
        std::mem::take(&mut self.state.play_beep)
    }

    /// Gets the number of instructions the engine has executed
    pub fn cycle(&self) -> usize {
        self.cycle
    }

    /// Executes exactly one instruction.
    ///
    /// Returns [Error::UnknownOpcode] if the word at pc is not an instruction,
    /// and [Error::StackOverflow]/[Error::StackUnderflow] on a call with a full stack
    /// or a return with an empty one. On error, the machine is left untouched.
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut engine = Engine::new();
    /// engine.load_program_bytes(&[
    ///     0x00, 0xe0, // cls
    ///     0x12, 0x02, // jp 202
    /// ]).unwrap();
    /// assert_eq!(Flow::Advanced, engine.step().unwrap());
    /// assert_eq!(0x202, engine.state().pc());
    /// assert_eq!(Flow::Jumped, engine.step().unwrap());
    /// assert_eq!(0x202, engine.state().pc());
    /// assert_eq!(2, engine.cycle());
    /// ```
    pub fn step(&mut self) -> Result<Flow> {
        let word = self.state.fetch();
        let insn = Insn::from_word(word).ok_or(Error::UnknownOpcode { word })?;

        // Print opcode disassembly:
        if self.flags.debug {
            eprintln!(
                "{:3} {:03x}: {:<36}",
                self.cycle.bright_black(),
                self.state.program_counter,
                self.disassembler.once(word)
            );
        }

        let flow = self.execute(insn)?;
        self.cycle += 1;
        if flow == Flow::Advanced {
            self.epilogue();
        }
        Ok(flow)
    }

    /// Ticks both timers, raising a beep as the sound timer runs out, and moves to the next instruction
    fn epilogue(&mut self) {
        let state = &mut self.state;
        if state.delay_timer > 0 {
            state.delay_timer -= 1;
        }
        if state.sound_timer > 0 {
            if state.sound_timer == 1 {
                state.play_beep = true;
            }
            state.sound_timer -= 1;
        }
        state.program_counter = state.program_counter.wrapping_add(2);
    }

    /// Dumps the current state of all registers, and the cycle count
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let engine = Engine::new();
    /// engine.dump();
    /// ```
    /// outputs
    /// ```text
    /// PC: 0200, SP: 0000, I: 0000
    /// v0: 00 v1: 00 v2: 00 v3: 00
    /// v4: 00 v5: 00 v6: 00 v7: 00
    /// v8: 00 v9: 00 vA: 00 vB: 00
    /// vC: 00 vD: 00 vE: 00 vF: 00
    /// DLY: 0, SND: 0, CYC:      0
    /// ```
    pub fn dump(&self) {
        std::println!("{}", self.dump_string());
    }

    fn dump_string(&self) -> String {
        let state = &self.state;
        format!(
            "PC: {:04x}, SP: {:04x}, I: {:04x}\n{}DLY: {}, SND: {}, CYC: {:6}",
            state.program_counter,
            state.stack_pointer,
            state.index,
            state
                .variables
                .into_iter()
                .enumerate()
                .map(|(i, gpr)| {
                    format!(
                        "v{i:X}: {gpr:02x}{}",
                        match i % 4 {
                            3 => "\n",
                            _ => " ",
                        }
                    )
                })
                .collect::<String>(),
            state.delay_timer,
            state.sound_timer,
            self.cycle,
        )
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field("flags", &self.flags)
            .field("state", &self.state)
            .field("random", &self.random)
            .field("cycle", &self.cycle)
            .finish_non_exhaustive()
    }
}
