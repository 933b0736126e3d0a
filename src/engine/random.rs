// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Sources of random bytes for `Cxbb`

use rand::{rngs::StdRng, RngCore};
use std::fmt::Debug;

/// Produces the bytes `Cxbb` masks into a register
pub trait RandomSource: Debug {
    /// Gets the next random byte
    fn next_byte(&mut self) -> u8;
}

/// Draws from the thread-local generator, seeded by the OS
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ThreadRandom;

impl RandomSource for ThreadRandom {
    fn next_byte(&mut self) -> u8 {
        rand::random()
    }
}

impl RandomSource for StdRng {
    fn next_byte(&mut self) -> u8 {
        (self.next_u32() & 0xff) as u8
    }
}

/// Replays a fixed list of bytes, starting over when it runs out
/// # Examples
/// ```rust
/// # use chip8vm::*;
/// let mut bytes = ByteSequence::new(vec![1, 2]);
/// assert_eq!(1, bytes.next_byte());
/// assert_eq!(2, bytes.next_byte());
/// assert_eq!(1, bytes.next_byte());
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ByteSequence {
    bytes: Vec<u8>,
    next: usize,
}

impl ByteSequence {
    /// Creates a sequence over the given bytes
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        ByteSequence {
            bytes: bytes.into(),
            next: 0,
        }
    }
}

impl RandomSource for ByteSequence {
    /// An empty sequence always produces 0
    fn next_byte(&mut self) -> u8 {
        let Some(&byte) = self.bytes.get(self.next) else {
            return 0;
        };
        self.next = (self.next + 1) % self.bytes.len();
        byte
    }
}
