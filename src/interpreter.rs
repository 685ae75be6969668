//! # interpreter
//!
//! One call to [`Chip8Interpreter::step`] is one CHIP-8 instruction cycle:
//!
//!  1. fetch the big-endian word at PC, then advance PC by 2, so jumps and
//!     calls that set PC aren't clobbered afterwards
//!  2. decode it into an [`Instruction`]
//!  3. execute it against the [`Machine`]
//!
//! Unknown encodings are no-ops. FX0A "blocks" by rewinding PC so that it is
//! fetched again next cycle; nothing here ever loops.
//!
//! Addresses formed from I and PC wrap at the top of memory. Running off
//! either end of the call stack stops the program with an error.
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::config::Quirks;
use crate::error::Chip8Error;
use crate::instruction::Instruction;
use crate::machine::{Machine, VF};
use crate::memory::{Chip8Memory, MemoryMap};

/// the largest sprite DXYN can draw
const CHIP8_MAX_SPRITE_ROWS: usize = 15;

pub struct Chip8Interpreter {
    quirks: Quirks,
    rng: StdRng,
}

impl Chip8Interpreter {
    /// a seed gives a repeatable CXNN sequence
    pub fn new(quirks: Quirks, seed: Option<u64>) -> Self {
        let rng = match seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };
        Chip8Interpreter { quirks, rng }
    }

    pub fn quirks(&self) -> Quirks {
        self.quirks
    }

    /// run exactly one fetch/decode/execute cycle, returning what was executed
    pub fn step(&mut self, m: &mut Machine) -> Result<Instruction, Chip8Error> {
        let pc = m.pc;
        let word = m.memory.get_word(pc);
        m.pc = pc.wrapping_add(2) & 0xfff;

        let instruction = Instruction::decode(word);
        log::trace!("{:#05x}: {:04x}  {}", pc, word, instruction);

        self.execute(m, instruction)?;
        Ok(instruction)
    }

    /// apply `instruction` to `m`; assumes PC has already moved past it
    pub fn execute(&mut self, m: &mut Machine, instruction: Instruction) -> Result<(), Chip8Error> {
        use Instruction::*;

        match instruction {
            ClearScreen => {
                m.framebuffer.clear();
                m.redraw = true;
            }
            Return => {
                m.pc = m.stack.pop().ok_or(Chip8Error::StackUnderflow {
                    pc: m.pc.wrapping_sub(2),
                })?;
            }
            Jump(addr) => m.pc = addr,
            Call(addr) => {
                m.stack.push(m.pc).ok_or(Chip8Error::StackOverflow {
                    pc: m.pc.wrapping_sub(2),
                })?;
                m.pc = addr;
            }
            SkipEqImm(x, nn) => skip_if(m.v[x as usize] == nn, m),
            SkipNeImm(x, nn) => skip_if(m.v[x as usize] != nn, m),
            SkipEqReg(x, y) => skip_if(m.v[x as usize] == m.v[y as usize], m),
            SkipNeReg(x, y) => skip_if(m.v[x as usize] != m.v[y as usize], m),
            LoadImm(x, nn) => m.v[x as usize] = nn,
            AddImm(x, nn) => m.v[x as usize] = m.v[x as usize].wrapping_add(nn),
            Move(x, y) => m.v[x as usize] = m.v[y as usize],
            Or(x, y) => m.v[x as usize] |= m.v[y as usize],
            And(x, y) => m.v[x as usize] &= m.v[y as usize],
            Xor(x, y) => m.v[x as usize] ^= m.v[y as usize],

            // flag results are written last so that they win when X is F
            AddReg(x, y) => {
                let (sum, carry) = m.v[x as usize].overflowing_add(m.v[y as usize]);
                m.v[x as usize] = sum;
                m.v[VF] = carry as u8;
            }
            SubReg(x, y) => {
                let (diff, borrow) = m.v[x as usize].overflowing_sub(m.v[y as usize]);
                m.v[x as usize] = diff;
                m.v[VF] = !borrow as u8;
            }
            SubReversed(x, y) => {
                let (diff, borrow) = m.v[y as usize].overflowing_sub(m.v[x as usize]);
                m.v[x as usize] = diff;
                m.v[VF] = !borrow as u8;
            }
            ShiftRight(x, y) => {
                let src = self.shift_source(m, x, y);
                m.v[x as usize] = src >> 1;
                m.v[VF] = src & 1;
            }
            ShiftLeft(x, y) => {
                let src = self.shift_source(m, x, y);
                m.v[x as usize] = src << 1;
                m.v[VF] = src >> 7 & 1;
            }

            LoadIndex(addr) => m.i = addr,
            JumpOffset(addr) => {
                let offset_reg = if self.quirks.jump_uses_vx {
                    (addr >> 8) as usize
                } else {
                    0
                };
                m.pc = (addr + m.v[offset_reg] as u16) & 0xfff;
            }
            Random(x, nn) => m.v[x as usize] = self.rng.gen::<u8>() & nn,
            Draw(x, y, n) => {
                let rows = (n as usize).min(CHIP8_MAX_SPRITE_ROWS);
                let mut sprite = [0u8; CHIP8_MAX_SPRITE_ROWS];
                for (row, byte) in sprite[..rows].iter_mut().enumerate() {
                    *byte = m.memory.read_byte(m.i.wrapping_add(row as u16));
                }
                let (vx, vy) = (m.v[x as usize], m.v[y as usize]);
                let collision = m.framebuffer.draw_sprite(vx, vy, &sprite[..rows]);
                m.v[VF] = collision as u8;
                m.redraw = true;
            }
            SkipKeyPressed(x) => skip_if(m.keypad == Some(m.v[x as usize]), m),
            SkipKeyNotPressed(x) => skip_if(m.keypad != Some(m.v[x as usize]), m),

            LoadDelay(x) => m.v[x as usize] = m.timers.delay,
            SetDelay(x) => m.timers.delay = m.v[x as usize],
            SetSound(x) => m.timers.sound = m.v[x as usize],
            WaitKey(x) => match m.keypad {
                Some(key) => m.v[x as usize] = key,
                None => m.pc = m.pc.wrapping_sub(2) & 0xfff,
            },
            AddIndex(x) => {
                m.i = m.i.wrapping_add(m.v[x as usize] as u16);
                m.v[VF] = (m.i > 0x0fff) as u8;
            }
            LoadGlyph(x) => m.i = Chip8Memory::glyph_addr(m.v[x as usize]),
            StoreBcd(x) => {
                let value = m.v[x as usize];
                m.memory.write(&[value / 100, value / 10 % 10, value % 10], m.i);
            }
            StoreRegs(x) => {
                for r in 0..=x as usize {
                    m.memory.write_byte(m.i.wrapping_add(r as u16), m.v[r]);
                }
                self.advance_index(m, x);
            }
            LoadRegs(x) => {
                for r in 0..=x as usize {
                    m.v[r] = m.memory.read_byte(m.i.wrapping_add(r as u16));
                }
                self.advance_index(m, x);
            }
            Unknown(word) => log::debug!("ignoring unknown opcode {:04x}", word),
        }
        Ok(())
    }

    fn shift_source(&self, m: &Machine, x: u8, y: u8) -> u8 {
        if self.quirks.shift_uses_vy {
            m.v[y as usize]
        } else {
            m.v[x as usize]
        }
    }

    fn advance_index(&self, m: &mut Machine, x: u8) {
        if self.quirks.load_store_increments_i {
            m.i = m.i.wrapping_add(x as u16 + 1);
        }
    }
}

fn skip_if(condition: bool, m: &mut Machine) {
    if condition {
        m.pc = m.pc.wrapping_add(2) & 0xfff;
    }
}
