//! Decoding of 16-bit CHIP-8 instruction words.
//!
//! Field names follow the usual CHIP-8 notation: `x` and `y` are register
//! indices, `n`/`nn`/`nnn` are 4/8/12-bit immediates.

use std::fmt;

/// Index of a V register, always in 0x0..=0xf.
pub type Reg = u8;

/// A decoded CHIP-8 instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Instruction {
    /// 00E0
    ClearScreen,
    /// 00EE
    Return,
    /// 1NNN
    Jump(u16),
    /// 2NNN
    Call(u16),
    /// 3XNN
    SkipEqImm(Reg, u8),
    /// 4XNN
    SkipNeImm(Reg, u8),
    /// 5XY0
    SkipEqReg(Reg, Reg),
    /// 6XNN
    LoadImm(Reg, u8),
    /// 7XNN, no carry flag
    AddImm(Reg, u8),
    /// 8XY0
    Move(Reg, Reg),
    /// 8XY1
    Or(Reg, Reg),
    /// 8XY2
    And(Reg, Reg),
    /// 8XY3
    Xor(Reg, Reg),
    /// 8XY4
    AddReg(Reg, Reg),
    /// 8XY5
    SubReg(Reg, Reg),
    /// 8XY6
    ShiftRight(Reg, Reg),
    /// 8XY7
    SubReversed(Reg, Reg),
    /// 8XYE
    ShiftLeft(Reg, Reg),
    /// 9XY0
    SkipNeReg(Reg, Reg),
    /// ANNN
    LoadIndex(u16),
    /// BNNN
    JumpOffset(u16),
    /// CXNN
    Random(Reg, u8),
    /// DXYN
    Draw(Reg, Reg, u8),
    /// EX9E
    SkipKeyPressed(Reg),
    /// EXA1
    SkipKeyNotPressed(Reg),
    /// FX07
    LoadDelay(Reg),
    /// FX0A
    WaitKey(Reg),
    /// FX15
    SetDelay(Reg),
    /// FX18
    SetSound(Reg),
    /// FX1E
    AddIndex(Reg),
    /// FX29
    LoadGlyph(Reg),
    /// FX33
    StoreBcd(Reg),
    /// FX55
    StoreRegs(Reg),
    /// FX65
    LoadRegs(Reg),
    /// anything else; executes as a no-op
    Unknown(u16),
}

impl Instruction {
    pub fn decode(word: u16) -> Self {
        use Instruction::*;

        let t = (word >> 12) as u8;
        let x = (word >> 8 & 0xf) as u8;
        let y = (word >> 4 & 0xf) as u8;
        let n = (word & 0xf) as u8;
        let nn = (word & 0xff) as u8;
        let nnn = word & 0xfff;

        match t {
            0x0 => match word {
                0x00e0 => ClearScreen,
                0x00ee => Return,
                _ => Unknown(word),
            },
            0x1 => Jump(nnn),
            0x2 => Call(nnn),
            0x3 => SkipEqImm(x, nn),
            0x4 => SkipNeImm(x, nn),
            0x5 if n == 0 => SkipEqReg(x, y),
            0x6 => LoadImm(x, nn),
            0x7 => AddImm(x, nn),
            0x8 => match n {
                0x0 => Move(x, y),
                0x1 => Or(x, y),
                0x2 => And(x, y),
                0x3 => Xor(x, y),
                0x4 => AddReg(x, y),
                0x5 => SubReg(x, y),
                0x6 => ShiftRight(x, y),
                0x7 => SubReversed(x, y),
                0xe => ShiftLeft(x, y),
                _ => Unknown(word),
            },
            0x9 if n == 0 => SkipNeReg(x, y),
            0xa => LoadIndex(nnn),
            0xb => JumpOffset(nnn),
            0xc => Random(x, nn),
            0xd => Draw(x, y, n),
            0xe => match nn {
                0x9e => SkipKeyPressed(x),
                0xa1 => SkipKeyNotPressed(x),
                _ => Unknown(word),
            },
            0xf => match nn {
                0x07 => LoadDelay(x),
                0x0a => WaitKey(x),
                0x15 => SetDelay(x),
                0x18 => SetSound(x),
                0x1e => AddIndex(x),
                0x29 => LoadGlyph(x),
                0x33 => StoreBcd(x),
                0x55 => StoreRegs(x),
                0x65 => LoadRegs(x),
                _ => Unknown(word),
            },
            _ => Unknown(word),
        }
    }
}

impl From<u16> for Instruction {
    fn from(word: u16) -> Self {
        Instruction::decode(word)
    }
}

/// disassembly, in roughly the Cowgod mnemonics
impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Instruction::*;
        match *self {
            ClearScreen => write!(f, "CLS"),
            Return => write!(f, "RET"),
            Jump(a) => write!(f, "JP {:#05x}", a),
            Call(a) => write!(f, "CALL {:#05x}", a),
            SkipEqImm(x, nn) => write!(f, "SE V{:X}, {:#04x}", x, nn),
            SkipNeImm(x, nn) => write!(f, "SNE V{:X}, {:#04x}", x, nn),
            SkipEqReg(x, y) => write!(f, "SE V{:X}, V{:X}", x, y),
            LoadImm(x, nn) => write!(f, "LD V{:X}, {:#04x}", x, nn),
            AddImm(x, nn) => write!(f, "ADD V{:X}, {:#04x}", x, nn),
            Move(x, y) => write!(f, "LD V{:X}, V{:X}", x, y),
            Or(x, y) => write!(f, "OR V{:X}, V{:X}", x, y),
            And(x, y) => write!(f, "AND V{:X}, V{:X}", x, y),
            Xor(x, y) => write!(f, "XOR V{:X}, V{:X}", x, y),
            AddReg(x, y) => write!(f, "ADD V{:X}, V{:X}", x, y),
            SubReg(x, y) => write!(f, "SUB V{:X}, V{:X}", x, y),
            ShiftRight(x, y) => write!(f, "SHR V{:X}, V{:X}", x, y),
            SubReversed(x, y) => write!(f, "SUBN V{:X}, V{:X}", x, y),
            ShiftLeft(x, y) => write!(f, "SHL V{:X}, V{:X}", x, y),
            SkipNeReg(x, y) => write!(f, "SNE V{:X}, V{:X}", x, y),
            LoadIndex(a) => write!(f, "LD I, {:#05x}", a),
            JumpOffset(a) => write!(f, "JP V0, {:#05x}", a),
            Random(x, nn) => write!(f, "RND V{:X}, {:#04x}", x, nn),
            Draw(x, y, n) => write!(f, "DRW V{:X}, V{:X}, {}", x, y, n),
            SkipKeyPressed(x) => write!(f, "SKP V{:X}", x),
            SkipKeyNotPressed(x) => write!(f, "SKNP V{:X}", x),
            LoadDelay(x) => write!(f, "LD V{:X}, DT", x),
            WaitKey(x) => write!(f, "LD V{:X}, K", x),
            SetDelay(x) => write!(f, "LD DT, V{:X}", x),
            SetSound(x) => write!(f, "LD ST, V{:X}", x),
            AddIndex(x) => write!(f, "ADD I, V{:X}", x),
            LoadGlyph(x) => write!(f, "LD F, V{:X}", x),
            StoreBcd(x) => write!(f, "LD B, V{:X}", x),
            StoreRegs(x) => write!(f, "LD [I], V{:X}", x),
            LoadRegs(x) => write!(f, "LD V{:X}, [I]", x),
            Unknown(word) => write!(f, "DW {:#06x}", word),
        }
    }
}
