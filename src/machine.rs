//! # machine
//!
//! All of the state of a CHIP-8 virtual machine, in one owned value:
//!
//!  * V0-VF        8 bit general purpose registers; VF doubles as the flag
//!                 register and is clobbered by arithmetic, shifts and draws
//!  * I            16 bit index register (12 bits usable)
//!  * PC           program counter, starts at 0x200
//!  * memory       4K, font at 0x050, program at 0x200
//!  * stack        24 return addresses, outside of addressable memory
//!  * DT, ST       delay and sound timers, count down at 60Hz
//!  * framebuffer  64x32 monochrome, packed 8 pixels to a byte
//!  * keypad       the key currently held down, if any
//!
//! The interpreter mutates it; the environment pokes the keypad and timers
//! and reads the framebuffer back out.
use std::io;

use crate::error::Chip8Error;
use crate::framebuffer::FrameBuffer;
use crate::memory::{Chip8Memory, CHIP8_PROGRAM_ADDR};
use crate::stack::CallStack;
use crate::timer::Timers;

pub const CHIP8_REGISTER_COUNT: usize = 16;

/// index of the flag register
pub const VF: usize = 0xf;

#[derive(Debug, Clone)]
pub struct Machine {
    pub v: [u8; CHIP8_REGISTER_COUNT],
    pub i: u16,
    pub pc: u16,
    pub memory: Chip8Memory,
    pub stack: CallStack,
    pub timers: Timers,
    pub framebuffer: FrameBuffer,
    /// hex key held this cycle; `None` when nothing is pressed
    pub keypad: Option<u8>,
    /// set by a draw, cleared once the frame has been presented
    pub redraw: bool,
    pub running: bool,
}

impl Default for Machine {
    fn default() -> Self {
        Self::new()
    }
}

impl Machine {
    /// a freshly powered-on machine with the font loaded and no program
    pub fn new() -> Self {
        Machine {
            v: [0; CHIP8_REGISTER_COUNT],
            i: 0,
            pc: CHIP8_PROGRAM_ADDR,
            memory: Chip8Memory::new(),
            stack: CallStack::new(),
            timers: Timers::new(),
            framebuffer: FrameBuffer::new(),
            keypad: None,
            redraw: false,
            running: true,
        }
    }

    /// reset everything and load the ROM read from `reader` at 0x200
    ///
    /// The machine is usable even when this fails: an oversized ROM is
    /// truncated, a read error keeps what arrived before it, and an empty
    /// ROM just leaves the program area zeroed.
    pub fn init(&mut self, reader: &mut impl io::Read) -> Result<usize, Chip8Error> {
        *self = Self::new();
        self.memory.load_program(reader)
    }
}
