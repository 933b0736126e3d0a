// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Error type for the virtual machine

use thiserror::Error;

/// Result type, equivalent to [std::result::Result]<T, [enum@Error]>
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for the virtual machine.
///
/// Every variant is fatal to the running program: there is no well-defined
/// way to continue once the machine image is in one of these states.
#[derive(Debug, Error)]
pub enum Error {
    /// The fetched word does not match any instruction
    #[error("opcode {word:04x} not recognized")]
    UnknownOpcode {
        /// The offending word
        word: u16,
    },
    /// The program image does not fit in program memory
    #[error("program is {size} bytes, but only {max} bytes of program memory exist")]
    ProgramTooLarge {
        /// Size of the rejected image
        size: usize,
        /// Bytes available starting at the program origin
        max: usize,
    },
    /// A subroutine call found every return slot in use
    #[error("call stack overflow at {addr:03x}")]
    StackOverflow {
        /// Address of the offending call
        addr: u16,
    },
    /// A return found no return address on the stack
    #[error("call stack underflow at {addr:03x}")]
    StackUnderflow {
        /// Address of the offending return
        addr: u16,
    },
    /// Tried to press a key that doesn't exist
    #[error("tried to press key {key:X} which does not exist")]
    InvalidKey {
        /// The offending key
        key: usize,
    },
    /// Tried to set an out-of-bounds register
    #[error("tried to access register v{reg:X} which does not exist")]
    InvalidRegister {
        /// The offending register
        reg: usize,
    },
    /// Error originated in [std::io]
    #[error(transparent)]
    IoError(#[from] std::io::Error),
}
