/// one 60Hz timer period, rounded down to whole milliseconds
pub const CHIP8_TIMER_PERIOD_MS: u32 = 16;

/// The delay and sound timers. Both count down towards zero at 60Hz,
/// independently of how fast instructions are being executed.
#[derive(Debug, Default, Clone)]
pub struct Timers {
    pub delay: u8,
    pub sound: u8,
    elapsed_ms: u32,
}

impl Timers {
    pub fn new() -> Self {
        Self::default()
    }

    /// account for `elapsed_ms` of wallclock time. leftover time short of a
    /// full period is carried to the next call
    pub fn tick(&mut self, elapsed_ms: u32) {
        self.elapsed_ms = self.elapsed_ms.saturating_add(elapsed_ms);
        if self.elapsed_ms < CHIP8_TIMER_PERIOD_MS {
            return;
        }
        let periods = self.elapsed_ms / CHIP8_TIMER_PERIOD_MS;
        self.elapsed_ms %= CHIP8_TIMER_PERIOD_MS;

        let periods = u8::try_from(periods).unwrap_or(u8::MAX);
        self.delay = self.delay.saturating_sub(periods);
        self.sound = self.sound.saturating_sub(periods);
    }
}
