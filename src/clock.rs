use std::time::{Duration, Instant};

/// Tells the environment how much time has passed, to drive the timers
pub trait Clock {
    /// whole milliseconds since the previous call
    fn elapsed_ms(&mut self) -> u32;
}

/// real time, with sub-millisecond leftovers carried forward so that fast
/// cycles still add up
#[derive(Debug)]
pub struct WallClock {
    last: Instant,
    carry: Duration,
}

impl Default for WallClock {
    fn default() -> Self {
        Self::new()
    }
}

impl WallClock {
    pub fn new() -> Self {
        WallClock {
            last: Instant::now(),
            carry: Duration::ZERO,
        }
    }
}

impl Clock for WallClock {
    fn elapsed_ms(&mut self) -> u32 {
        let now = Instant::now();
        let elapsed = now - self.last + self.carry;
        self.last = now;

        let ms = elapsed.as_millis().min(u32::MAX as u128) as u32;
        self.carry = elapsed.saturating_sub(Duration::from_millis(ms as u64));
        ms
    }
}

/// the same step every time; for tests and deterministic runs
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub u32);

impl Clock for FixedClock {
    fn elapsed_ms(&mut self) -> u32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let mut c = FixedClock(16);
        assert_eq!(c.elapsed_ms(), 16);
        assert_eq!(c.elapsed_ms(), 16);
    }

    #[test]
    fn test_wall_clock_measures_sleep() {
        let mut c = WallClock::new();
        std::thread::sleep(Duration::from_millis(20));
        assert!(c.elapsed_ms() >= 20);
        assert!(c.carry < Duration::from_millis(1));
    }
}
