// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Contains implementations for each [Insn]
//!
//! Every instruction reports a [Flow]. Skips move pc forward by 2 here;
//! the epilogue in [Engine::step] moves it past the instruction itself.

use super::*;
use crate::state::{GLYPH_SIZE, HEIGHT, PRESSED, STACK_SIZE, WIDTH};

impl Engine {
    /// Executes a single [Insn]
    #[rustfmt::skip]
    #[inline(always)]
    pub(super) fn execute(&mut self, instruction: Insn) -> Result<Flow> {
        Ok(match instruction {
            Insn::ClearScreen                   => self.clear_screen(),
            Insn::Return                        => self.ret()?,
            Insn::Jump              { A       } => self.jump(A),
            Insn::Call              { A       } => self.call(A)?,
            Insn::SkipEqualsByte    { x, B    } => self.skip_equals_immediate(x, B),
            Insn::SkipNotEqualsByte { x, B    } => self.skip_not_equals_immediate(x, B),
            Insn::SkipEquals        { x, y    } => self.skip_equals(x, y),
            Insn::LoadByte          { x, B    } => self.load_immediate(x, B),
            Insn::AddByte           { x, B    } => self.add_immediate(x, B),
            Insn::Load              { x, y    } => self.load(x, y),
            Insn::Or                { x, y    } => self.or(x, y),
            Insn::And               { x, y    } => self.and(x, y),
            Insn::Xor               { x, y    } => self.xor(x, y),
            Insn::Add               { x, y    } => self.add(x, y),
            Insn::Sub               { x, y    } => self.sub(x, y),
            Insn::ShiftRight        { x, ..   } => self.shift_right(x),
            Insn::BackwardsSub      { x, y    } => self.backwards_sub(x, y),
            Insn::ShiftLeft         { x, ..   } => self.shift_left(x),
            Insn::SkipNotEquals     { x, y    } => self.skip_not_equals(x, y),
            Insn::LoadIndex         { A       } => self.load_i_immediate(A),
            Insn::JumpIndexed       { A       } => self.jump_indexed(A),
            Insn::Random            { x, B    } => self.rand(x, B),
            Insn::Draw              { x, y, n } => self.draw(x, y, n),
            Insn::SkipKeyHeld       { x       } => self.skip_key_equals(x),
            Insn::SkipKeyNotHeld    { x       } => self.skip_key_not_equals(x),
            Insn::GetDelay          { x       } => self.load_delay_timer(x),
            Insn::WaitKey           { x       } => self.wait_for_key(x),
            Insn::SetDelay          { x       } => self.store_delay_timer(x),
            Insn::SetSound          { x       } => self.store_sound_timer(x),
            Insn::AddIndex          { x       } => self.add_i(x),
            Insn::Glyph             { x       } => self.load_sprite(x),
            Insn::Bcd               { x       } => self.bcd_convert(x),
            Insn::StoreRegisters    { x       } => self.store_dma(x),
            Insn::LoadRegisters     { x       } => self.load_dma(x),
        })
    }

    /// Skips the next instruction when `condition` holds
    #[inline(always)]
    fn skip_if(&mut self, condition: bool) -> Flow {
        if condition {
            self.state.program_counter = self.state.program_counter.wrapping_add(2);
        }
        Flow::Advanced
    }
}

/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`00e0`| Clear screen memory to all 0       |
/// |`00ee`| Return from subroutine             |
impl Engine {
    /// |`00e0`| Clears the screen memory to 0
    #[inline(always)]
    pub(super) fn clear_screen(&mut self) -> Flow {
        self.state.display_buffer.fill(0);
        self.state.need_draw = true;
        Flow::Advanced
    }
    /// |`00ee`| Returns from subroutine
    ///
    /// pc is restored to the call itself; the epilogue steps past it.
    #[inline(always)]
    pub(super) fn ret(&mut self) -> Result<Flow> {
        let state = &mut self.state;
        if state.stack_pointer == 0 {
            return Err(Error::StackUnderflow {
                addr: state.program_counter,
            });
        }
        state.program_counter = state.stack[state.stack_pointer];
        state.stack_pointer -= 1;
        Ok(Flow::Advanced)
    }
}

/// |`1aaa`| Sets pc to an absolute address
impl Engine {
    /// |`1aaa`| Sets the program counter to an absolute address
    #[inline(always)]
    pub(super) fn jump(&mut self, a: Adr) -> Flow {
        self.state.program_counter = a;
        Flow::Jumped
    }
}

/// |`2aaa`| Pushes pc onto the stack, then jumps to a
impl Engine {
    /// |`2aaa`| Pushes pc onto the stack, then jumps to a
    ///
    /// Slot 0 is never written, so 15 calls may be outstanding at once.
    #[inline(always)]
    pub(super) fn call(&mut self, a: Adr) -> Result<Flow> {
        let state = &mut self.state;
        if state.stack_pointer + 1 >= STACK_SIZE {
            return Err(Error::StackOverflow {
                addr: state.program_counter,
            });
        }
        state.stack_pointer += 1;
        state.stack[state.stack_pointer] = state.program_counter;
        state.program_counter = a;
        Ok(Flow::Jumped)
    }
}

/// |`3xbb`| Skips next instruction if register X == b
impl Engine {
    /// |`3xbb`| Skips the next instruction if register X == b
    #[inline(always)]
    pub(super) fn skip_equals_immediate(&mut self, x: Reg, b: u8) -> Flow {
        self.skip_if(self.state.variables[x] == b)
    }
}

/// |`4xbb`| Skips next instruction if register X != b
impl Engine {
    /// |`4xbb`| Skips the next instruction if register X != b
    #[inline(always)]
    pub(super) fn skip_not_equals_immediate(&mut self, x: Reg, b: u8) -> Flow {
        self.skip_if(self.state.variables[x] != b)
    }
}

/// |`5xy0`| Skip next instruction if vX == vY
impl Engine {
    /// |`5xy0`| Skips the next instruction if register X == register Y
    #[inline(always)]
    pub(super) fn skip_equals(&mut self, x: Reg, y: Reg) -> Flow {
        self.skip_if(self.state.variables[x] == self.state.variables[y])
    }
}

/// |`6xbb`| Loads immediate byte b into register vX
impl Engine {
    /// |`6xbb`| Loads immediate byte b into register vX
    #[inline(always)]
    pub(super) fn load_immediate(&mut self, x: Reg, b: u8) -> Flow {
        self.state.variables[x] = b;
        Flow::Advanced
    }
}

/// |`7xbb`| Adds immediate byte b to register vX
impl Engine {
    /// |`7xbb`| Adds immediate byte b to register vX. vF is untouched.
    #[inline(always)]
    pub(super) fn add_immediate(&mut self, x: Reg, b: u8) -> Flow {
        self.state.variables[x] = self.state.variables[x].wrapping_add(b);
        Flow::Advanced
    }
}

/// |`8xyn`| Performs ALU operation
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`8xy0`| X = Y                              |
/// |`8xy1`| X = X \| Y                         |
/// |`8xy2`| X = X & Y                          |
/// |`8xy3`| X = X ^ Y                          |
/// |`8xy4`| X = X + Y; Set vF=carry            |
/// |`8xy5`| X = X - Y; Set vF=not borrow       |
/// |`8xy6`| X = X >> 1; Set vF=shifted bit     |
/// |`8xy7`| X = Y - X; Set vF=not borrow       |
/// |`8xyE`| X = X << 1; Set vF=shifted bit     |
///
/// The flagged operations write vF *before* the result, so when X or Y is vF,
/// the result is computed from the new flag.
impl Engine {
    /// |`8xy0`| Loads the value of y into x
    #[inline(always)]
    pub(super) fn load(&mut self, x: Reg, y: Reg) -> Flow {
        self.state.variables[x] = self.state.variables[y];
        Flow::Advanced
    }
    /// |`8xy1`| Performs bitwise or of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn or(&mut self, x: Reg, y: Reg) -> Flow {
        self.state.variables[x] |= self.state.variables[y];
        Flow::Advanced
    }
    /// |`8xy2`| Performs bitwise and of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn and(&mut self, x: Reg, y: Reg) -> Flow {
        self.state.variables[x] &= self.state.variables[y];
        Flow::Advanced
    }
    /// |`8xy3`| Performs bitwise xor of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn xor(&mut self, x: Reg, y: Reg) -> Flow {
        self.state.variables[x] ^= self.state.variables[y];
        Flow::Advanced
    }
    /// |`8xy4`| Performs addition of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn add(&mut self, x: Reg, y: Reg) -> Flow {
        let v = &mut self.state.variables;
        v[0xf] = ((v[x] as u16 + v[y] as u16) > 0xff).into();
        v[x] = v[x].wrapping_add(v[y]);
        Flow::Advanced
    }
    /// |`8xy5`| Performs subtraction of vX and vY, and stores the result in vX
    #[inline(always)]
    pub(super) fn sub(&mut self, x: Reg, y: Reg) -> Flow {
        let v = &mut self.state.variables;
        v[0xf] = (v[x] > v[y]).into();
        v[x] = v[x].wrapping_sub(v[y]);
        Flow::Advanced
    }
    /// |`8xy6`| Performs bitwise right shift of vX
    #[inline(always)]
    pub(super) fn shift_right(&mut self, x: Reg) -> Flow {
        let v = &mut self.state.variables;
        v[0xf] = v[x] & 1;
        v[x] >>= 1;
        Flow::Advanced
    }
    /// |`8xy7`| Performs subtraction of vY and vX, and stores the result in vX
    #[inline(always)]
    pub(super) fn backwards_sub(&mut self, x: Reg, y: Reg) -> Flow {
        let v = &mut self.state.variables;
        v[0xf] = (v[y] > v[x]).into();
        v[x] = v[y].wrapping_sub(v[x]);
        Flow::Advanced
    }
    /// |`8xyE`| Performs bitwise left shift of vX
    #[inline(always)]
    pub(super) fn shift_left(&mut self, x: Reg) -> Flow {
        let v = &mut self.state.variables;
        v[0xf] = v[x] >> 7;
        v[x] <<= 1;
        Flow::Advanced
    }
}

/// |`9xy0`| Skip next instruction if vX != vY
impl Engine {
    /// |`9xy0`| Skip next instruction if X != y
    #[inline(always)]
    pub(super) fn skip_not_equals(&mut self, x: Reg, y: Reg) -> Flow {
        self.skip_if(self.state.variables[x] != self.state.variables[y])
    }
}

/// |`Aaaa`| Load address #a into register I
impl Engine {
    /// |`Aadr`| Load address #adr into register I
    #[inline(always)]
    pub(super) fn load_i_immediate(&mut self, a: Adr) -> Flow {
        self.state.index = a;
        Flow::Advanced
    }
}

/// |`Baaa`| Jump to &adr + v0
impl Engine {
    /// |`Badr`| Jump to &adr + v0
    #[inline(always)]
    pub(super) fn jump_indexed(&mut self, a: Adr) -> Flow {
        self.state.program_counter = a.wrapping_add(self.state.variables[0] as Adr);
        Flow::Jumped
    }
}

/// |`Cxbb`| Stores a random number & the provided byte into vX
impl Engine {
    /// |`Cxbb`| Stores a random number & the provided byte into vX
    #[inline(always)]
    pub(super) fn rand(&mut self, x: Reg, b: u8) -> Flow {
        self.state.variables[x] = self.random.next_byte() & b;
        Flow::Advanced
    }
}

/// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
impl Engine {
    /// |`Dxyn`| Draws n-byte sprite to the screen at coordinates (vX, vY)
    ///
    /// Each set bit toggles one pixel, and vF takes that pixel's old value.
    /// The last toggled pixel decides vF; if no bit is set, vF is untouched.
    /// Pixels past the right or bottom edge land wherever the row-major
    /// index falls, wrapped to the size of the screen.
    #[inline(always)]
    pub(super) fn draw(&mut self, x: Reg, y: Reg, n: Nib) -> Flow {
        let state = &mut self.state;
        let (x, y) = (state.variables[x] as usize, state.variables[y] as usize);
        for line in 0..n as usize {
            let sprite = state.read(state.index.wrapping_add(line as Adr));
            for bit in 0..8 {
                if sprite & (0x80 >> bit) == 0 {
                    continue;
                }
                let cell = ((y + line) * WIDTH + x + bit) % (WIDTH * HEIGHT);
                state.variables[0xf] = state.display_buffer[cell];
                state.display_buffer[cell] ^= 1;
            }
        }
        state.need_draw = true;
        Flow::Advanced
    }
}

/// |`Exbb`| Skips instruction on value of keypress
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`eX9e`| Skip next instruction if key vX is held     |
/// |`eXa1`| Skip next instruction if key vX is not held |
///
/// Only the low nibble of vX selects the key.
impl Engine {
    /// |`Ex9E`| Skip next instruction if key vX is held
    #[inline(always)]
    pub(super) fn skip_key_equals(&mut self, x: Reg) -> Flow {
        let key = self.state.variables[x] as usize & 0xf;
        self.skip_if(self.state.keys[key] == PRESSED)
    }
    /// |`ExA1`| Skip next instruction if key vX is not held
    #[inline(always)]
    pub(super) fn skip_key_not_equals(&mut self, x: Reg) -> Flow {
        let key = self.state.variables[x] as usize & 0xf;
        self.skip_if(self.state.keys[key] != PRESSED)
    }
}

/// |`Fxbb`| Performs IO
///
/// |opcode| effect                             |
/// |------|------------------------------------|
/// |`fX07`| Set vX to value in delay timer     |
/// |`fX0a`| Wait for input, store key in vX    |
/// |`fX15`| Set delay timer to the value in vX |
/// |`fX18`| Set sound timer to the value in vX |
/// |`fX1e`| Add vX to I                        |
/// |`fX29`| Load sprite for character x into I |
/// |`fX33`| BCD convert X into I[0..3]         |
/// |`fX55`| DMA Stor from I to registers 0..=X |
/// |`fX65`| DMA Load from I to registers 0..=X |
impl Engine {
    /// |`Fx07`| Get the current DT, and put it in vX
    /// ```py
    /// vX = DT
    /// ```
    #[inline(always)]
    pub(super) fn load_delay_timer(&mut self, x: Reg) -> Flow {
        self.state.variables[x] = self.state.delay_timer;
        Flow::Advanced
    }
    /// |`Fx0A`| Wait for key, then vX = K
    ///
    /// When several keys are held, the highest one wins.
    #[inline(always)]
    pub(super) fn wait_for_key(&mut self, x: Reg) -> Flow {
        match self.state.keys.iter().rposition(|&key| key != 0) {
            Some(key) => {
                self.state.variables[x] = key as u8;
                Flow::Advanced
            }
            None => Flow::WaitingForInput,
        }
    }
    /// |`Fx15`| Load vX into DT
    /// ```py
    /// DT = vX
    /// ```
    #[inline(always)]
    pub(super) fn store_delay_timer(&mut self, x: Reg) -> Flow {
        self.state.delay_timer = self.state.variables[x];
        Flow::Advanced
    }
    /// |`Fx18`| Load vX into ST
    /// ```py
    /// ST = vX;
    /// ```
    #[inline(always)]
    pub(super) fn store_sound_timer(&mut self, x: Reg) -> Flow {
        self.state.sound_timer = self.state.variables[x];
        Flow::Advanced
    }
    /// |`Fx1e`| Add vX to I, flagging a result past the end of memory
    /// ```py
    /// vF = I + vX > 0xfff;
    /// I += vX;
    /// ```
    #[inline(always)]
    pub(super) fn add_i(&mut self, x: Reg) -> Flow {
        let state = &mut self.state;
        let sum = state.index as u32 + state.variables[x] as u32;
        state.variables[0xf] = (sum > 0xfff).into();
        state.index = state.index.wrapping_add(state.variables[x] as Adr);
        Flow::Advanced
    }
    /// |`Fx29`| Load sprite for character x into I
    /// ```py
    /// I = sprite(X);
    /// ```
    #[inline(always)]
    pub(super) fn load_sprite(&mut self, x: Reg) -> Flow {
        self.state.index = self.state.variables[x] as Adr * GLYPH_SIZE;
        Flow::Advanced
    }
    /// |`Fx33`| BCD convert X into I`[0..3]`
    #[inline(always)]
    pub(super) fn bcd_convert(&mut self, x: Reg) -> Flow {
        let (x, i) = (self.state.variables[x], self.state.index);
        self.state.write(i, x / 100);
        self.state.write(i.wrapping_add(1), x / 10 % 10);
        self.state.write(i.wrapping_add(2), x % 10);
        Flow::Advanced
    }
    /// |`Fx55`| DMA Stor from I to registers 0..=X
    ///
    /// Leaves I as I+X+1 after the transfer is done.
    #[inline(always)]
    pub(super) fn store_dma(&mut self, x: Reg) -> Flow {
        let i = self.state.index;
        for reg in 0..=x {
            self.state
                .write(i.wrapping_add(reg as Adr), self.state.variables[reg]);
        }
        self.state.index = i.wrapping_add(x as Adr + 1);
        Flow::Advanced
    }
    /// |`Fx65`| DMA Load from I to registers 0..=X
    ///
    /// Leaves I as I+X+1 after the transfer is done.
    #[inline(always)]
    pub(super) fn load_dma(&mut self, x: Reg) -> Flow {
        let i = self.state.index;
        for reg in 0..=x {
            self.state.variables[reg] = self.state.read(i.wrapping_add(reg as Adr));
        }
        self.state.index = i.wrapping_add(x as Adr + 1);
        Flow::Advanced
    }
}
