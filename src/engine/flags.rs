// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Represents flags that control the [Engine](super::Engine) but aren't part of the machine

/// Represents flags that aid in operation, but aren't inherent to the machine
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Flags {
    /// Set when debug (live disassembly) mode enabled
    pub debug: bool,
}

impl Flags {
    /// Toggles debug mode
    ///
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut engine = Engine::new();
    /// assert_eq!(false, engine.flags.debug);
    /// // Toggle debug mode
    /// engine.flags.debug();
    /// assert_eq!(true, engine.flags.debug);
    /// ```
    pub fn debug(&mut self) {
        self.debug = !self.debug
    }
}
