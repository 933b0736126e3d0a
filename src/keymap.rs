// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Translates physical keys into the 16 logical keys of the keypad
//!
//! The default layout puts the hexadecimal keypad on the left of a QWERTY keyboard:
//! ```text
//! 1 2 3 4      1 2 3 C
//! q w e r  =>  4 5 6 D
//! a s d f      7 8 9 E
//! z x c v      A 0 B F
//! ```

use crate::{error::Result, state::Keypad};

/// A fixed table from physical keys to logical key indices
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct KeyMap {
    table: [(char, usize); 16],
}

impl KeyMap {
    /// Builds a map from (physical key, logical key) pairs
    pub fn new(table: [(char, usize); 16]) -> Self {
        KeyMap { table }
    }

    /// Looks up the logical key for a physical key, ignoring case
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let map = KeyMap::default();
    /// assert_eq!(Some(0xd), map.lookup('R'));
    /// assert_eq!(None, map.lookup('p'));
    /// ```
    pub fn lookup(&self, key: char) -> Option<usize> {
        self.table
            .iter()
            .find(|(physical, _)| physical.eq_ignore_ascii_case(&key))
            .map(|&(_, logical)| logical)
    }

    /// Forwards a physical key event to the keypad.
    ///
    /// Keys not in the table are ignored. Reports whether a latch changed.
    pub fn handle(&self, keypad: &mut Keypad<'_>, key: char, down: bool) -> Result<bool> {
        match self.lookup(key) {
            Some(logical) => keypad.set(logical, down),
            None => Ok(false),
        }
    }
}

impl Default for KeyMap {
    #[rustfmt::skip]
    fn default() -> Self {
        Self::new([
            ('1', 0x1), ('2', 0x2), ('3', 0x3), ('4', 0xc),
            ('q', 0x4), ('w', 0x5), ('e', 0x6), ('r', 0xd),
            ('a', 0x7), ('s', 0x8), ('d', 0x9), ('f', 0xe),
            ('z', 0xa), ('x', 0x0), ('c', 0xb), ('v', 0xf),
        ])
    }
}
