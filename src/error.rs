use std::io;

use thiserror::Error;

/// Everything that can go wrong loading or running a CHIP-8 program.
///
/// Unknown opcodes are not errors: they decode to
/// [`Instruction::Unknown`](crate::instruction::Instruction::Unknown) and do nothing.
#[derive(Debug, Error)]
pub enum Chip8Error {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// the program region was filled with the first `max` bytes only
    #[error("ROM is too large, only the first {max} bytes were loaded")]
    RomTooLarge { max: usize },

    #[error("call stack overflow at {pc:#05x}")]
    StackOverflow { pc: u16 },

    #[error("return with empty call stack at {pc:#05x}")]
    StackUnderflow { pc: u16 },
}
