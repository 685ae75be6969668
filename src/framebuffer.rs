pub const CHIP8_SCREEN_WIDTH: usize = 64;
pub const CHIP8_SCREEN_HEIGHT: usize = 32;

/// 8 pixels per byte, most significant bit leftmost
pub const CHIP8_ROW_BYTES: usize = CHIP8_SCREEN_WIDTH / 8;
pub const CHIP8_FRAMEBUFFER_BYTES: usize = CHIP8_ROW_BYTES * CHIP8_SCREEN_HEIGHT;

/// Monochrome 64x32 bitmap, packed row-major: byte `y * 8 + x / 8` holds
/// pixels `x & !7 ..= x | 7` of row `y`.
#[derive(Clone, PartialEq, Eq)]
pub struct FrameBuffer {
    bytes: [u8; CHIP8_FRAMEBUFFER_BYTES],
}

impl Default for FrameBuffer {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for FrameBuffer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for row in self.bytes.chunks(CHIP8_ROW_BYTES) {
            for byte in row {
                write!(f, "{:08b}", byte)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

impl FrameBuffer {
    pub fn new() -> Self {
        FrameBuffer {
            bytes: [0; CHIP8_FRAMEBUFFER_BYTES],
        }
    }

    pub fn clear(&mut self) {
        self.bytes = [0; CHIP8_FRAMEBUFFER_BYTES];
    }

    /// the packed buffer, as handed to a display
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// is the pixel at (x, y) lit? coordinates wrap
    pub fn pixel(&self, x: usize, y: usize) -> bool {
        let (x, y) = (x % CHIP8_SCREEN_WIDTH, y % CHIP8_SCREEN_HEIGHT);
        self.bytes[y * CHIP8_ROW_BYTES + x / 8] >> (7 - x % 8) & 1 == 1
    }

    pub fn lit_count(&self) -> u32 {
        self.bytes.iter().map(|b| b.count_ones()).sum()
    }

    /// XOR an 8-pixel-wide sprite onto the screen with its top-left corner at
    /// (x, y), wrapping both ways. Returns true if any lit pixel was turned off.
    pub fn draw_sprite(&mut self, x: u8, y: u8, sprite: &[u8]) -> bool {
        let x = x as usize % CHIP8_SCREEN_WIDTH;
        let mut y = y as usize % CHIP8_SCREEN_HEIGHT;
        let offset = x % 8;

        // a sprite row straddles two screen bytes unless x is byte-aligned
        let left_col = x / 8;
        let right_col = ((x + 8) % CHIP8_SCREEN_WIDTH) / 8;

        let mut collision = false;
        for row in sprite {
            let wide = (*row as u16) << (8 - offset);
            let left = (wide >> 8) as u8;
            let right = wide as u8;

            let left_idx = y * CHIP8_ROW_BYTES + left_col;
            let right_idx = y * CHIP8_ROW_BYTES + right_col;

            collision |= self.bytes[left_idx] & left != 0;
            collision |= self.bytes[right_idx] & right != 0;

            self.bytes[left_idx] ^= left;
            self.bytes[right_idx] ^= right;

            y = (y + 1) % CHIP8_SCREEN_HEIGHT;
        }
        collision
    }
}
