// (c) 2023 John A. Breaux
// This code is licensed under MIT license (see LICENSE for details)

//! Exercises the instruction decode logic.
use super::*;

const INDX: &[u8; 16] = b"\0\x01\x02\x03\x04\x05\x06\x07\x08\x09\x0a\x0b\x0c\x0d\x0e\x0f";

/// runs one arbitrary operation on a brand new engine
/// returns the engine for inspection
fn run_single_op(op: &[u8]) -> Engine {
    let mut engine = Engine::with_random(Box::new(ByteSequence::new(vec![0xff])));
    engine.load_program_bytes(op).unwrap();
    engine.state.variables = *INDX;
    engine.step().unwrap(); // will panic if unimplemented
    engine
}

#[rustfmt::skip]
mod sys {
    use super::*;
    #[test]                 fn cls()   { run_single_op(b"\x00\xe0"); }
    #[test] #[should_panic] fn ret()   { run_single_op(b"\x00\xee"); }
    #[test] #[should_panic] fn u0420() { run_single_op(b"\x04\x20"); }
    #[test] #[should_panic] fn u00ff() { run_single_op(b"\x00\xff"); }
}
#[rustfmt::skip]
mod jump {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\x12\x30").state.pc()); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\x12\x31").state.pc()); }
}
#[rustfmt::skip]
mod call {
    use super::*;
    #[test] fn aligned()   { assert_eq!(0x230, run_single_op(b"\x22\x30").state.pc()); }
    #[test] fn unaligned() { assert_eq!(0x231, run_single_op(b"\x22\x31").state.pc()); }
}
#[rustfmt::skip]
mod seb {
    use super::*;
    #[test] fn skip()    { assert_eq!(0x204, run_single_op(b"\x30\x00").state.pc()); }
    #[test] fn no_skip() { assert_eq!(0x202, run_single_op(b"\x30\x01").state.pc()); }
}
#[rustfmt::skip]
mod sneb {
    use super::*;
    #[test] fn skip()    { assert_eq!(0x204, run_single_op(b"\x40\x01").state.pc()); }
    #[test] fn no_skip() { assert_eq!(0x202, run_single_op(b"\x40\x00").state.pc()); }
}
#[rustfmt::skip]
mod se {
    use super::*;
    #[test] fn skip()    { assert_eq!(0x204, run_single_op(b"\x50\x00").state.pc()); }
    #[test] fn no_skip() { assert_eq!(0x202, run_single_op(b"\x50\x10").state.pc()); }
    #[test] #[should_panic] fn u5xy1() { run_single_op(b"\x50\x01"); }
}
#[rustfmt::skip]
mod movb {
    use super::*;
    #[test] fn movb() { assert_eq!(0xa5, run_single_op(b"\x6a\xa5").state.v()[0xa]); }
}
#[rustfmt::skip]
mod addb {
    use super::*;
    #[test] fn addb() { assert_eq!(0x0a + 0x05, run_single_op(b"\x7a\x05").state.v()[0xa]); }
}
#[rustfmt::skip]
mod alu {
    use super::*;
    #[test] fn mov()  { assert_eq!(0x3, run_single_op(b"\x81\x30").state.v()[0x1]); }
    #[test] fn or()   { assert_eq!(0x1 | 0x6, run_single_op(b"\x81\x61").state.v()[0x1]); }
    #[test] fn and()  { assert_eq!(0x3 & 0x6, run_single_op(b"\x83\x62").state.v()[0x3]); }
    #[test] fn xor()  { assert_eq!(0x3 ^ 0x6, run_single_op(b"\x83\x63").state.v()[0x3]); }
    #[test] fn add()  { assert_eq!(0x3 + 0x6, run_single_op(b"\x83\x64").state.v()[0x3]); }
    #[test] fn sub()  { assert_eq!(0x6 - 0x3, run_single_op(b"\x86\x35").state.v()[0x6]); }
    #[test] fn shr()  { assert_eq!(0x6 >> 1, run_single_op(b"\x86\x06").state.v()[0x6]); }
    #[test] fn bsub() { assert_eq!(0x6 - 0x3, run_single_op(b"\x83\x67").state.v()[0x3]); }
    #[test] fn shl()  { assert_eq!(0x6 << 1, run_single_op(b"\x86\x0e").state.v()[0x6]); }
    #[test] #[should_panic] fn u8xy8() { run_single_op(b"\x86\x08"); }
}
#[rustfmt::skip]
mod sne {
    use super::*;
    #[test] fn skip()    { assert_eq!(0x204, run_single_op(b"\x90\x10").state.pc()); }
    #[test] fn no_skip() { assert_eq!(0x202, run_single_op(b"\x90\x00").state.pc()); }
}
#[rustfmt::skip]
mod mem {
    use super::*;
    #[test] fn movi() { assert_eq!(0x123, run_single_op(b"\xa1\x23").state.i()); }
    #[test] fn jmpr() { assert_eq!(0x123, run_single_op(b"\xb1\x23").state.pc()); }
    #[test] fn rand() { assert_eq!(0x3c, run_single_op(b"\xc5\x3c").state.v()[0x5]); }
}
#[rustfmt::skip]
mod draw {
    use super::*;
    #[test] fn draw() { assert!(run_single_op(b"\xd0\x05").state.need_draw()); }
}
#[rustfmt::skip]
mod keys {
    use super::*;
    #[test] fn sek()  { assert_eq!(0x202, run_single_op(b"\xe0\x9e").state.pc()); }
    #[test] fn snek() { assert_eq!(0x204, run_single_op(b"\xe0\xa1").state.pc()); }
    #[test] #[should_panic] fn uexff() { run_single_op(b"\xe0\xff"); }
}
#[rustfmt::skip]
mod fx {
    use super::*;
    #[test] fn getdt() { assert_eq!(0, run_single_op(b"\xf5\x07").state.v()[0x5]); }
    #[test] fn waitk() { assert_eq!(0x200, run_single_op(b"\xf5\x0a").state.pc()); }
    #[test] fn setdt() { assert_eq!(0x4, run_single_op(b"\xf5\x15").state.delay()); }
    #[test] fn movst() { assert_eq!(0x4, run_single_op(b"\xf5\x18").state.sound()); }
    #[test] fn addi()  { assert_eq!(0x5, run_single_op(b"\xf5\x1e").state.i()); }
    #[test] fn font()  { assert_eq!(0x5 * 5, run_single_op(b"\xf5\x29").state.i()); }
    #[test] fn bcd()   { assert_eq!(0x0, run_single_op(b"\xf5\x33").state.i()); }
    #[test] fn dmao()  { assert_eq!(0x6, run_single_op(b"\xf5\x55").state.i()); }
    #[test] fn dmai()  { assert_eq!(0x6, run_single_op(b"\xf5\x65").state.i()); }
    #[test] #[should_panic] fn ufxff() { run_single_op(b"\xf5\xff"); }
}

/// Every word decodes to an instruction that disassembles, or to nothing
#[test]
fn exhaustive() {
    let dis = Dis::plain();
    let valid = (0..=0xffffu16)
        .filter(|&word| {
            let insn = Insn::from_word(word);
            let text = dis.once(word);
            assert_eq!(insn.is_none(), text.contains("inval"), "{word:04x}: {text}");
            insn.is_some()
        })
        .count();
    // 1nnn, 2nnn, Annn, Bnnn
    let addressed = 4 * 0x1000;
    // 3xbb, 4xbb, 6xbb, 7xbb, Cxbb
    let immediate = 5 * 0x1000;
    // 5xy0, 8xy[0-7e], 9xy0
    let register = 11 * 0x100;
    // Dxyn
    let draw = 0x1000;
    // Ex9e, Exa1, Fx{07,0a,15,18,1e,29,33,55,65}
    let single = 11 * 0x10;
    assert_eq!(2 + addressed + immediate + register + draw + single, valid);
}
