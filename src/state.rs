// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! The machine image: memory, registers, stack, timers, screen, and key latches

use crate::error::{Error, Result};
use std::fmt::{Debug, Display, Formatter};

/// Bytes of addressable memory
pub const MEMORY_SIZE: usize = 0x1000;
/// Where programs are loaded, and where execution begins
pub const PROGRAM_START: u16 = 0x200;
/// Largest program image the loader accepts
pub const PROGRAM_MAX: usize = MEMORY_SIZE - PROGRAM_START as usize;
/// Screen width, in pixels
pub const WIDTH: usize = 64;
/// Screen height, in pixels
pub const HEIGHT: usize = 32;
/// Number of return-address slots
pub const STACK_SIZE: usize = 16;
/// Bytes per hexadecimal glyph in the font table
pub const GLYPH_SIZE: u16 = 5;
/// Value of a held key latch
pub const PRESSED: u8 = 1;

/// Hexadecimal font, glyph `g` at offset `5 * g`
pub const FONT: [u8; 80] = [
    0xf0, 0x90, 0x90, 0x90, 0xf0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xf0, 0x10, 0xf0, 0x80, 0xf0, // 2
    0xf0, 0x10, 0xf0, 0x10, 0xf0, // 3
    0x90, 0x90, 0xf0, 0x10, 0x10, // 4
    0xf0, 0x80, 0xf0, 0x10, 0xf0, // 5
    0xf0, 0x80, 0xf0, 0x90, 0xf0, // 6
    0xf0, 0x10, 0x20, 0x40, 0x40, // 7
    0xf0, 0x90, 0xf0, 0x90, 0xf0, // 8
    0xf0, 0x90, 0xf0, 0x10, 0xf0, // 9
    0xf0, 0x90, 0xf0, 0x90, 0x90, // A
    0xe0, 0x90, 0xe0, 0x90, 0xe0, // B
    0xf0, 0x80, 0x80, 0x80, 0xf0, // C
    0xe0, 0x90, 0x90, 0x90, 0xe0, // D
    0xf0, 0x80, 0xf0, 0x80, 0xf0, // E
    0xf0, 0x80, 0xf0, 0x80, 0x80, // F
];

/// The complete state of the machine.
///
/// Owned by an [Engine](crate::Engine), which is the only thing that executes
/// instructions against it. Input reaches it through a [Keypad], which can only
/// touch the key latches.
#[derive(Clone, PartialEq, Eq)]
pub struct MachineState {
    pub(crate) memory: [u8; MEMORY_SIZE],
    pub(crate) display_buffer: [u8; WIDTH * HEIGHT],
    pub(crate) stack: [u16; STACK_SIZE],
    pub(crate) stack_pointer: usize,
    pub(crate) variables: [u8; 16],
    pub(crate) keys: [u8; 16],
    pub(crate) delay_timer: u8,
    pub(crate) sound_timer: u8,
    pub(crate) program_counter: u16,
    pub(crate) index: u16,
    pub(crate) need_draw: bool,
    pub(crate) play_beep: bool,
}

impl MachineState {
    /// Creates a blank machine with the font loaded and the program counter at `0x200`
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let state = MachineState::new();
    /// assert_eq!(0x200, state.pc());
    /// assert_eq!(&FONT[..], &state.memory()[..80]);
    /// ```
    pub fn new() -> Self {
        let mut memory = [0; MEMORY_SIZE];
        memory[..FONT.len()].copy_from_slice(&FONT);
        MachineState {
            memory,
            display_buffer: [0; WIDTH * HEIGHT],
            stack: [0; STACK_SIZE],
            stack_pointer: 0,
            variables: [0; 16],
            keys: [0; 16],
            delay_timer: 0,
            sound_timer: 0,
            program_counter: PROGRAM_START,
            index: 0,
            need_draw: false,
            play_beep: false,
        }
    }

    /// Loads a program from disk into program memory
    pub fn load_program(&mut self, rom: impl AsRef<std::path::Path>) -> Result<&mut Self> {
        self.load_program_bytes(&std::fs::read(rom)?)
    }

    /// Loads bytes into program memory, clearing whatever was there before.
    ///
    /// Returns [Error::ProgramTooLarge] if the image doesn't fit.
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut state = MachineState::new();
    /// state.load_program_bytes(&[0x00, 0xe0]).unwrap();
    /// assert_eq!(&[0x00, 0xe0], &state.memory()[0x200..0x202]);
    ///
    /// assert!(state.load_program_bytes(&[0; 0xe01]).is_err());
    /// ```
    pub fn load_program_bytes(&mut self, rom: &[u8]) -> Result<&mut Self> {
        if rom.len() > PROGRAM_MAX {
            return Err(Error::ProgramTooLarge {
                size: rom.len(),
                max: PROGRAM_MAX,
            });
        }
        let program = &mut self.memory[PROGRAM_START as usize..];
        program.fill(0);
        program[..rom.len()].copy_from_slice(rom);
        Ok(self)
    }

    /// Borrows the key latches, and nothing else
    pub fn keypad(&mut self) -> Keypad<'_> {
        Keypad {
            keys: &mut self.keys,
        }
    }

    /// Gets a [Display]able view of the screen
    pub fn screen(&self) -> ScreenView<'_> {
        ScreenView {
            cells: &self.display_buffer,
        }
    }

    /// Gets the whole of memory
    pub fn memory(&self) -> &[u8] {
        &self.memory
    }

    /// Gets the display buffer, one byte per pixel, row-major
    pub fn display_buffer(&self) -> &[u8] {
        &self.display_buffer
    }

    /// Gets the general purpose registers
    pub fn v(&self) -> &[u8] {
        &self.variables
    }

    /// Gets the key latches
    pub fn keys(&self) -> &[u8] {
        &self.keys
    }

    /// Gets the return-address slots
    pub fn stack(&self) -> &[u16] {
        &self.stack
    }

    /// Gets the index of the topmost return address
    pub fn stack_pointer(&self) -> usize {
        self.stack_pointer
    }

    /// Gets the program counter
    pub fn pc(&self) -> u16 {
        self.program_counter
    }

    /// Gets the I register
    pub fn i(&self) -> u16 {
        self.index
    }

    /// Gets the value in the Delay Timer register
    pub fn delay(&self) -> u8 {
        self.delay_timer
    }

    /// Gets the value in the Sound Timer register
    pub fn sound(&self) -> u8 {
        self.sound_timer
    }

    /// Whether the screen changed since the renderer last looked
    pub fn need_draw(&self) -> bool {
        self.need_draw
    }

    /// Whether the sound timer ran out since the audio device last looked
    pub fn play_beep(&self) -> bool {
        self.play_beep
    }

    /// Reads a byte, wrapping the address into memory
    #[inline(always)]
    pub(crate) fn read(&self, addr: u16) -> u8 {
        self.memory[addr as usize % MEMORY_SIZE]
    }

    /// Writes a byte, wrapping the address into memory.
    ///
    /// The font and the rest of the reserved region below `0x200` are read-only.
    #[inline(always)]
    pub(crate) fn write(&mut self, addr: u16, value: u8) {
        let addr = addr as usize % MEMORY_SIZE;
        if addr >= PROGRAM_START as usize {
            self.memory[addr] = value;
        }
    }

    /// Reads the big-endian word at the program counter
    #[inline(always)]
    pub(crate) fn fetch(&self) -> u16 {
        let pc = self.program_counter;
        u16::from_be_bytes([self.read(pc), self.read(pc.wrapping_add(1))])
    }
}

impl Default for MachineState {
    fn default() -> Self {
        Self::new()
    }
}

impl Debug for MachineState {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MachineState")
            .field("stack", &self.stack)
            .field("stack_pointer", &self.stack_pointer)
            .field("variables", &self.variables)
            .field("keys", &self.keys)
            .field("delay_timer", &self.delay_timer)
            .field("sound_timer", &self.sound_timer)
            .field("program_counter", &self.program_counter)
            .field("index", &self.index)
            .field("need_draw", &self.need_draw)
            .field("play_beep", &self.play_beep)
            .finish_non_exhaustive()
    }
}

/// Mutable access to the 16 key latches, for whatever translates physical input
#[derive(Debug)]
pub struct Keypad<'a> {
    keys: &'a mut [u8; 16],
}

impl Keypad<'_> {
    /// Presses a key, and reports whether the key's state changed.
    /// If key does not exist, returns [Error::InvalidKey].
    ///
    /// # Examples
    /// ```rust
    /// # use chip8vm::*;
    /// let mut state = MachineState::new();
    ///
    /// // press key `7`
    /// assert!(state.keypad().press(0x7).unwrap());
    /// // it was already pressed, so nothing's changed.
    /// assert!(!state.keypad().press(0x7).unwrap());
    /// ```
    pub fn press(&mut self, key: usize) -> Result<bool> {
        self.set(key, true)
    }

    /// Releases a key, and reports whether the key's state changed.
    /// If key is outside range `0..=0xF`, returns [Error::InvalidKey].
    pub fn release(&mut self, key: usize) -> Result<bool> {
        self.set(key, false)
    }

    /// Sets a key to held or released, and reports whether its state changed
    pub fn set(&mut self, key: usize, down: bool) -> Result<bool> {
        let latch = self.keys.get_mut(key).ok_or(Error::InvalidKey { key })?;
        let value = if down { PRESSED } else { 0 };
        let changed = *latch != value;
        *latch = value;
        Ok(changed)
    }
}

/// Renders the display buffer as text for terminals
#[derive(Clone, Copy, Debug)]
pub struct ScreenView<'a> {
    cells: &'a [u8; WIDTH * HEIGHT],
}

#[cfg(feature = "drawille")]
impl Display for ScreenView<'_> {
    /// Draws the screen in braille, four rows of pixels per line
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        use drawille::Canvas;
        let mut canvas = Canvas::new(WIDTH as u32, HEIGHT as u32);
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, &cell)| cell != 0)
            .for_each(|(index, _)| canvas.set((index % WIDTH) as u32, (index / WIDTH) as u32));
        writeln!(f, "{}", canvas.frame())
    }
}

#[cfg(not(feature = "drawille"))]
impl Display for ScreenView<'_> {
    /// Draws the screen in block characters, one row of pixels per line
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for row in self.cells.chunks_exact(WIDTH) {
            let line: String = row
                .iter()
                .map(|&cell| if cell != 0 { '█' } else { ' ' })
                .collect();
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_blank() {
        let state = MachineState::new();
        assert_eq!(&FONT[..], &state.memory[..FONT.len()]);
        assert!(state.memory[FONT.len()..].iter().all(|&b| b == 0));
        assert!(state.display_buffer.iter().all(|&p| p == 0));
        assert_eq!(state.variables, [0; 16]);
        assert_eq!(state.program_counter, PROGRAM_START);
        assert_eq!((state.index, state.stack_pointer), (0, 0));
        assert!(!state.need_draw && !state.play_beep);
    }

    #[test]
    fn load_replaces_previous_program() {
        let mut state = MachineState::new();
        state.load_program_bytes(&[0xaa; 8]).unwrap();
        state.load_program_bytes(&[0x12, 0x34]).unwrap();
        assert_eq!(&state.memory[0x200..0x204], &[0x12, 0x34, 0, 0]);
    }

    #[test]
    fn load_largest_program() {
        let mut state = MachineState::new();
        state.load_program_bytes(&[0xff; PROGRAM_MAX]).unwrap();
        assert_eq!(state.memory[MEMORY_SIZE - 1], 0xff);
        // the font is untouched
        assert_eq!(&FONT[..], &state.memory[..FONT.len()]);
    }

    #[test]
    fn load_too_large() {
        let mut state = MachineState::new();
        let err = state
            .load_program_bytes(&[0; PROGRAM_MAX + 1])
            .expect_err("image is one byte too large");
        assert!(matches!(
            err,
            Error::ProgramTooLarge { size, max } if size == PROGRAM_MAX + 1 && max == PROGRAM_MAX
        ));
    }

    #[test]
    fn reserved_region_is_read_only() {
        let mut state = MachineState::new();
        state.write(0x000, 0x55);
        state.write(0x1ff, 0x55);
        state.write(0x200, 0x55);
        assert_eq!(state.memory[0x000], FONT[0]);
        assert_eq!(state.memory[0x1ff], 0);
        assert_eq!(state.memory[0x200], 0x55);
    }

    #[test]
    fn addresses_wrap() {
        let mut state = MachineState::new();
        state.write(0x1234, 0x99);
        assert_eq!(state.read(0x0234), 0x99);
        state.program_counter = 0xfff;
        state.memory[0xfff] = 0xab;
        assert_eq!(state.fetch(), 0xabf0);
    }

    #[test]
    fn keypad_reports_changes() {
        let mut state = MachineState::new();
        let mut keypad = state.keypad();
        assert!(keypad.press(0xf).unwrap());
        assert!(!keypad.set(0xf, true).unwrap());
        assert!(keypad.release(0xf).unwrap());
        assert!(!keypad.release(0xf).unwrap());
        assert!(matches!(
            keypad.press(0x10),
            Err(Error::InvalidKey { key: 0x10 })
        ));
    }

    #[test]
    #[cfg(not(feature = "drawille"))]
    fn screen_view() {
        let mut state = MachineState::new();
        state.display_buffer[0] = 1;
        state.display_buffer[WIDTH + 2] = 1;
        let text = state.screen().to_string();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("█"));
        assert_eq!(lines.next(), Some("  █"));
        assert_eq!(text.lines().count(), HEIGHT);
    }

    #[test]
    #[cfg(feature = "drawille")]
    fn screen_view() {
        let mut state = MachineState::new();
        let blank = state.screen().to_string();
        assert!(blank.chars().all(|c| c.is_whitespace() || c == '\u{2800}'));
        state.display_buffer[0] = 1;
        state.display_buffer[WIDTH + 2] = 1;
        let text = state.screen().to_string();
        // (0, 0) is the first dot of cell 0; (2, 1) the second dot of cell 1
        assert!(text.lines().next().unwrap_or_default().contains("⠁⠂"));
    }
}
