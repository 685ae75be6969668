use std::time::Duration;

/// Behaviours that differ between historical CHIP-8 interpreters. All off
/// gives the common modern behaviour.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Quirks {
    /// 8XY6/8XYE shift VY into VX, as on the COSMAC VIP
    pub shift_uses_vy: bool,
    /// BNNN jumps to NNN + VX where X is the top nibble of NNN (SUPER-CHIP)
    pub jump_uses_vx: bool,
    /// FX55/FX65 leave I pointing just past the last register transferred
    pub load_store_increments_i: bool,
}

/// Runtime settings for an emulation session
#[derive(Debug, Clone)]
pub struct Config {
    /// instructions executed per second of wallclock time
    pub cycles_per_second: u32,
    pub quirks: Quirks,
    /// terminals report key presses but not releases, so treat a key as
    /// held down for this long after its last press
    pub key_hold: Duration,
    /// seed for CXNN; random if unset
    pub seed: Option<u64>,
    /// stop after this many cycles; runs until quit if unset
    pub max_cycles: Option<u64>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            cycles_per_second: 700,
            quirks: Quirks::default(),
            key_hold: Duration::from_millis(100),
            seed: None,
            max_cycles: None,
        }
    }
}

impl Config {
    /// how long one instruction cycle should take; zero means unthrottled
    pub fn cycle_period(&self) -> Duration {
        match self.cycles_per_second {
            0 => Duration::ZERO,
            hz => Duration::from_secs(1) / hz,
        }
    }
}
