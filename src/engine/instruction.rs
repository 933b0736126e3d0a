// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)
#![allow(clippy::bad_bit_mask)]
//! Contains the definition of an instruction, [Insn]

pub mod disassembler;

use imperative_rs::InstructionSet;
use std::fmt::Display;

/// One decoded instruction word.
///
/// Field names follow the opcode patterns: `x` and `y` select registers,
/// `A` is a 12-bit address, `B` an immediate byte, and `n` a nibble.
#[allow(non_snake_case, missing_docs)]
#[derive(Clone, Copy, Debug, InstructionSet, PartialEq, Eq)]
pub enum Insn {
    /// | 00e0 | Clear the screen
    #[opcode = "0x00e0"]
    ClearScreen,
    /// | 00ee | Return from subroutine
    #[opcode = "0x00ee"]
    Return,
    /// | 1aaa | Jump to an absolute address
    #[opcode = "0x1AAA"]
    Jump { A: u16 },
    /// | 2aaa | Push pc onto the stack, then jump to a
    #[opcode = "0x2AAA"]
    Call { A: u16 },
    /// | 3xbb | Skip next instruction if vX == b
    #[opcode = "0x3xBB"]
    SkipEqualsByte { B: u8, x: usize },
    /// | 4xbb | Skip next instruction if vX != b
    #[opcode = "0x4xBB"]
    SkipNotEqualsByte { B: u8, x: usize },
    /// | 5xy0 | Skip next instruction if vX == vY
    #[opcode = "0x5xy0"]
    SkipEquals { y: usize, x: usize },
    /// | 6xbb | Load immediate byte b into vX
    #[opcode = "0x6xBB"]
    LoadByte { B: u8, x: usize },
    /// | 7xbb | Add immediate byte b to vX, without carry
    #[opcode = "0x7xBB"]
    AddByte { B: u8, x: usize },
    /// | 8xy0 | vX = vY
    #[opcode = "0x8xy0"]
    Load { y: usize, x: usize },
    /// | 8xy1 | vX |= vY
    #[opcode = "0x8xy1"]
    Or { y: usize, x: usize },
    /// | 8xy2 | vX &= vY
    #[opcode = "0x8xy2"]
    And { y: usize, x: usize },
    /// | 8xy3 | vX ^= vY
    #[opcode = "0x8xy3"]
    Xor { y: usize, x: usize },
    /// | 8xy4 | vX += vY, vF = carry
    #[opcode = "0x8xy4"]
    Add { y: usize, x: usize },
    /// | 8xy5 | vX -= vY, vF = not borrow
    #[opcode = "0x8xy5"]
    Sub { y: usize, x: usize },
    /// | 8xy6 | vX >>= 1, vF = bit shifted out
    #[opcode = "0x8xy6"]
    ShiftRight { y: usize, x: usize },
    /// | 8xy7 | vX = vY - vX, vF = not borrow
    #[opcode = "0x8xy7"]
    BackwardsSub { y: usize, x: usize },
    /// | 8xyE | vX <<= 1, vF = bit shifted out
    #[opcode = "0x8xye"]
    ShiftLeft { y: usize, x: usize },
    /// | 9xy0 | Skip next instruction if vX != vY
    #[opcode = "0x9xy0"]
    SkipNotEquals { y: usize, x: usize },
    /// | Aaaa | I = a
    #[opcode = "0xaAAA"]
    LoadIndex { A: u16 },
    /// | Baaa | Jump to a + v0
    #[opcode = "0xbAAA"]
    JumpIndexed { A: u16 },
    /// | Cxbb | vX = random byte & b
    #[opcode = "0xcxBB"]
    Random { B: u8, x: usize },
    /// | Dxyn | Draw n-byte sprite at (vX, vY)
    #[opcode = "0xdxyn"]
    Draw { y: usize, x: usize, n: u8 },
    /// | Ex9E | Skip next instruction if key vX is held
    #[opcode = "0xex9e"]
    SkipKeyHeld { x: usize },
    /// | ExA1 | Skip next instruction if key vX is not held
    #[opcode = "0xexa1"]
    SkipKeyNotHeld { x: usize },
    /// | Fx07 | vX = DT
    #[opcode = "0xfx07"]
    GetDelay { x: usize },
    /// | Fx0A | Wait for a key, then vX = key
    #[opcode = "0xfx0a"]
    WaitKey { x: usize },
    /// | Fx15 | DT = vX
    #[opcode = "0xfx15"]
    SetDelay { x: usize },
    /// | Fx18 | ST = vX
    #[opcode = "0xfx18"]
    SetSound { x: usize },
    /// | Fx1E | I += vX, vF = overflow past 0xfff
    #[opcode = "0xfx1e"]
    AddIndex { x: usize },
    /// | Fx29 | I = address of glyph vX
    #[opcode = "0xfx29"]
    Glyph { x: usize },
    /// | Fx33 | Store BCD of vX at I[0..3]
    #[opcode = "0xfx33"]
    Bcd { x: usize },
    /// | Fx55 | Store v0..=vX at I, then I += x + 1
    #[opcode = "0xfx55"]
    StoreRegisters { x: usize },
    /// | Fx65 | Load v0..=vX from I, then I += x + 1
    #[opcode = "0xfx65"]
    LoadRegisters { x: usize },
}

impl Insn {
    /// Decodes a single instruction word, if it's valid
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// assert_eq!(Some(Insn::Jump { A: 0x234 }), Insn::from_word(0x1234));
    /// assert_eq!(None, Insn::from_word(0x00ff));
    /// ```
    pub fn from_word(word: u16) -> Option<Self> {
        Insn::decode(&word.to_be_bytes())
            .ok()
            .map(|(_, insn)| insn)
    }
}

impl Display for Insn {
    #[rustfmt::skip]
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Insn::ClearScreen                => write!(f, "cls    "),
            Insn::Return                     => write!(f, "ret    "),
            Insn::Jump { A }                 => write!(f, "jp     {A:03x}"),
            Insn::Call { A }                 => write!(f, "call   {A:03x}"),
            Insn::SkipEqualsByte { B, x }    => write!(f, "se     v{x:X}, #{B:02x}"),
            Insn::SkipNotEqualsByte { B, x } => write!(f, "sne    v{x:X}, #{B:02x}"),
            Insn::SkipEquals { y, x }        => write!(f, "se     v{x:X}, v{y:X}"),
            Insn::LoadByte { B, x }          => write!(f, "ld     v{x:X}, #{B:02x}"),
            Insn::AddByte { B, x }           => write!(f, "add    v{x:X}, #{B:02x}"),
            Insn::Load { y, x }              => write!(f, "ld     v{x:X}, v{y:X}"),
            Insn::Or { y, x }                => write!(f, "or     v{x:X}, v{y:X}"),
            Insn::And { y, x }               => write!(f, "and    v{x:X}, v{y:X}"),
            Insn::Xor { y, x }               => write!(f, "xor    v{x:X}, v{y:X}"),
            Insn::Add { y, x }               => write!(f, "add    v{x:X}, v{y:X}"),
            Insn::Sub { y, x }               => write!(f, "sub    v{x:X}, v{y:X}"),
            Insn::ShiftRight { y, x }        => write!(f, "shr    v{x:X}, v{y:X}"),
            Insn::BackwardsSub { y, x }      => write!(f, "subn   v{x:X}, v{y:X}"),
            Insn::ShiftLeft { y, x }         => write!(f, "shl    v{x:X}, v{y:X}"),
            Insn::SkipNotEquals { y, x }     => write!(f, "sne    v{x:X}, v{y:X}"),
            Insn::LoadIndex { A }            => write!(f, "ld     I, {A:03x}"),
            Insn::JumpIndexed { A }          => write!(f, "jp     v0, {A:03x}"),
            Insn::Random { B, x }            => write!(f, "rnd    v{x:X}, #{B:02x}"),
            Insn::Draw { y, x, n }           => write!(f, "drw    v{x:X}, v{y:X}, #{n:x}"),
            Insn::SkipKeyHeld { x }          => write!(f, "skp    v{x:X}"),
            Insn::SkipKeyNotHeld { x }       => write!(f, "sknp   v{x:X}"),
            Insn::GetDelay { x }             => write!(f, "ld     v{x:X}, DT"),
            Insn::WaitKey { x }              => write!(f, "ld     v{x:X}, K"),
            Insn::SetDelay { x }             => write!(f, "ld     DT, v{x:X}"),
            Insn::SetSound { x }             => write!(f, "ld     ST, v{x:X}"),
            Insn::AddIndex { x }             => write!(f, "add    I, v{x:X}"),
            Insn::Glyph { x }                => write!(f, "ld     F, v{x:X}"),
            Insn::Bcd { x }                  => write!(f, "ld     B, v{x:X}"),
            Insn::StoreRegisters { x }       => write!(f, "ld     [I], v{x:X}"),
            Insn::LoadRegisters { x }        => write!(f, "ld     v{x:X}, [I]"),
        }
    }
}
