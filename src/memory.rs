use std::io::{self, Read};

use crate::error::Chip8Error;

// NB. addresses are u16 as per the chip-8 and wrap at the top of RAM; lengths
//     are usize to stop endless casting

/// Represents the byte-addressable memory seen by the interpreter
pub trait MemoryMap {
    /// read one byte; `addr` wraps modulo the size of RAM
    fn read_byte(&self, addr: u16) -> u8;

    /// write one byte; `addr` wraps modulo the size of RAM
    fn write_byte(&mut self, addr: u16, value: u8);

    /// get a big-endian two-byte word (instruction fetch)
    fn get_word(&self, addr: u16) -> u16 {
        (self.read_byte(addr) as u16) << 8 | self.read_byte(addr.wrapping_add(1)) as u16
    }

    /// write a chunk of bytes into "RAM", wrapping past the top
    fn write(&mut self, data: &[u8], addr: u16) {
        for (offset, byte) in data.iter().enumerate() {
            self.write_byte(addr.wrapping_add(offset as u16), *byte);
        }
    }

    /// get a r/o slice of the underlying memory; does not wrap
    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8];
}

/// how much RAM we have
pub const CHIP8_RAM_SIZE_BYTES: usize = 4096;

/// where the program is loaded
pub const CHIP8_PROGRAM_ADDR: u16 = 0x0200;

/// largest program that fits between `CHIP8_PROGRAM_ADDR` and the top of RAM
pub const CHIP8_PROGRAM_MAX_BYTES: usize = CHIP8_RAM_SIZE_BYTES - CHIP8_PROGRAM_ADDR as usize;

pub const CHIP8_FONT_ADDR: u16 = 0x050;
pub const CHIP8_FONT_GLYPH_BYTES: u16 = 5;

/// Defines the CHIP-8 memory map used here:
///   0x0000-0x01ff  reserved; hex font at 0x0050
///   0x0200-0x0fff  program
///
/// display and stack live outside of addressable memory
#[derive(Clone)]
pub struct Chip8Memory {
    bytes: Box<[u8]>,
}

impl std::fmt::Debug for Chip8Memory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Chip8Memory")
            .field("len", &self.bytes.len())
            .finish()
    }
}

impl MemoryMap for Chip8Memory {
    fn read_byte(&self, addr: u16) -> u8 {
        self.bytes[addr as usize % CHIP8_RAM_SIZE_BYTES]
    }

    fn write_byte(&mut self, addr: u16, value: u8) {
        self.bytes[addr as usize % CHIP8_RAM_SIZE_BYTES] = value;
    }

    fn get_ro_slice(&self, addr: u16, len: usize) -> &[u8] {
        let a = addr as usize;
        &self.bytes[a..(a + len)]
    }
}

impl Default for Chip8Memory {
    fn default() -> Self {
        Self::new()
    }
}

impl Chip8Memory {
    /// zeroed RAM with the font baked in
    pub fn new() -> Self {
        let mut mm = Chip8Memory {
            bytes: vec![0u8; CHIP8_RAM_SIZE_BYTES].into_boxed_slice(),
        };
        mm.write(&CHIP8_FONT, CHIP8_FONT_ADDR);
        mm
    }

    /// address of the glyph for the low nibble of `digit`; glyphs are 5 bytes
    /// apart, so this is `0x050 + 5 * digit`, not `0x050 + digit`
    pub fn glyph_addr(digit: u8) -> u16 {
        CHIP8_FONT_ADDR + (digit & 0xf) as u16 * CHIP8_FONT_GLYPH_BYTES
    }

    /// load a CHIP-8 program at 0x200, returning how many bytes were stored
    ///
    /// An oversized program is truncated to fit and reported as
    /// [`Chip8Error::RomTooLarge`]; memory still holds the truncated image.
    /// Likewise a read error part way through leaves whatever arrived before
    /// it in memory.
    pub fn load_program(&mut self, reader: &mut impl io::Read) -> Result<usize, Chip8Error> {
        let mut buf = Vec::with_capacity(CHIP8_PROGRAM_MAX_BYTES + 1);
        // one byte over is enough to know it doesn't fit
        let read = reader
            .take(CHIP8_PROGRAM_MAX_BYTES as u64 + 1)
            .read_to_end(&mut buf);
        let loaded = self.load_bytes(&buf);
        if let Err(e) = read {
            log::warn!("ROM read failed after {} bytes", buf.len());
            return Err(e.into());
        }
        loaded
    }

    fn load_bytes(&mut self, rom: &[u8]) -> Result<usize, Chip8Error> {
        let len = rom.len().min(CHIP8_PROGRAM_MAX_BYTES);
        self.write(&rom[..len], CHIP8_PROGRAM_ADDR);
        if rom.len() > CHIP8_PROGRAM_MAX_BYTES {
            log::warn!("ROM truncated to {} bytes", CHIP8_PROGRAM_MAX_BYTES);
            return Err(Chip8Error::RomTooLarge {
                max: CHIP8_PROGRAM_MAX_BYTES,
            });
        }
        Ok(len)
    }
}

const CHIP8_FONT: [u8; 80] = [
    0xF0, 0x90, 0x90, 0x90, 0xF0, // 0
    0x20, 0x60, 0x20, 0x20, 0x70, // 1
    0xF0, 0x10, 0xF0, 0x80, 0xF0, // 2
    0xF0, 0x10, 0xF0, 0x10, 0xF0, // 3
    0x90, 0x90, 0xF0, 0x10, 0x10, // 4
    0xF0, 0x80, 0xF0, 0x10, 0xF0, // 5
    0xF0, 0x80, 0xF0, 0x90, 0xF0, // 6
    0xF0, 0x10, 0x20, 0x40, 0x40, // 7
    0xF0, 0x90, 0xF0, 0x90, 0xF0, // 8
    0xF0, 0x90, 0xF0, 0x10, 0xF0, // 9
    0xF0, 0x90, 0xF0, 0x90, 0x90, // A
    0xE0, 0x90, 0xE0, 0x90, 0xE0, // B
    0xF0, 0x80, 0x80, 0x80, 0xF0, // C
    0xE0, 0x90, 0x90, 0x90, 0xE0, // D
    0xF0, 0x80, 0xF0, 0x80, 0xF0, // E
    0xF0, 0x80, 0xF0, 0x80, 0x80, // F
];
