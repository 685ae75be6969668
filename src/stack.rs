/// how many return addresses fit on the call stack
pub const CHIP8_STACK_DEPTH: usize = 24;

/// Bounded stack of subroutine return addresses. `push` and `pop` refuse to
/// go past either end rather than wrapping.
#[derive(Debug, Clone)]
pub struct CallStack {
    slots: [u16; CHIP8_STACK_DEPTH],
    len: usize,
}

impl Default for CallStack {
    fn default() -> Self {
        Self::new()
    }
}

impl CallStack {
    pub fn new() -> Self {
        CallStack {
            slots: [0; CHIP8_STACK_DEPTH],
            len: 0,
        }
    }

    /// returns `None` when the stack is already full
    #[must_use]
    pub fn push(&mut self, addr: u16) -> Option<()> {
        let slot = self.slots.get_mut(self.len)?;
        *slot = addr;
        self.len += 1;
        Some(())
    }

    pub fn pop(&mut self) -> Option<u16> {
        self.len = self.len.checked_sub(1)?;
        Some(self.slots[self.len])
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}
