//! # environment
//!
//! Sets everything up and runs the main loop. Each cycle is:
//!
//!  1. poll input, updating the keypad or stopping on quit
//!  2. feed elapsed time to the timers
//!  3. execute one instruction
//!  4. present the framebuffer, if the instruction changed it
//!
//! Instructions run as fast as possible then sleep out the rest of the cycle
//! period, so the pacing is right on average rather than per-instruction.
use std::time::Instant;

use crate::clock::Clock;
use crate::config::Config;
use crate::display::Display;
use crate::error::Chip8Error;
use crate::input::{Input, KeyState};
use crate::interpreter::Chip8Interpreter;
use crate::machine::Machine;

pub struct Environment<'a> {
    machine: Machine,
    interpreter: Chip8Interpreter,
    display: &'a mut dyn Display,
    input: &'a mut dyn Input,
    clock: &'a mut dyn Clock,
    config: Config,
}

impl<'a> Environment<'a> {
    /// `machine` should already have its program loaded
    pub fn new(
        config: Config,
        machine: Machine,
        display: &'a mut dyn Display,
        input: &'a mut dyn Input,
        clock: &'a mut dyn Clock,
    ) -> Self {
        Environment {
            machine,
            interpreter: Chip8Interpreter::new(config.quirks, config.seed),
            display,
            input,
            clock,
            config,
        }
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    /// one full cycle: input, timers, instruction, display
    pub fn cycle(&mut self) -> Result<(), Chip8Error> {
        match self.input.poll()? {
            KeyState::Quit => {
                log::info!("quit requested");
                self.machine.running = false;
                return Ok(());
            }
            KeyState::Held(key) => self.machine.keypad = Some(key),
            KeyState::NoKey => self.machine.keypad = None,
        }

        self.machine.timers.tick(self.clock.elapsed_ms());
        self.interpreter.step(&mut self.machine)?;

        if self.machine.redraw {
            self.display.draw(self.machine.framebuffer.as_bytes())?;
            self.machine.redraw = false;
        }
        Ok(())
    }

    /// cycle until quit, an error, or the configured cycle limit; returns
    /// the number of instructions executed
    pub fn main_loop(&mut self) -> Result<u64, Chip8Error> {
        let period = self.config.cycle_period();
        let mut cycles = 0u64;
        log::info!(
            "running at {} cycles/s with {:?}",
            self.config.cycles_per_second,
            self.interpreter.quirks()
        );

        while self.machine.running {
            if self.config.max_cycles.is_some_and(|max| cycles >= max) {
                log::info!("stopping after {} cycles", cycles);
                break;
            }
            let start = Instant::now();
            self.cycle()?;
            if !self.machine.running {
                break;
            }
            cycles += 1;

            if let Some(rest) = period.checked_sub(start.elapsed()) {
                spin_sleep::sleep(rest);
            }
        }
        Ok(cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FixedClock;
    use crate::display::DummyDisplay;
    use crate::input::DummyInput;
    use crate::machine::VF;

    fn unthrottled() -> Config {
        Config {
            cycles_per_second: 0,
            seed: Some(0),
            ..Config::default()
        }
    }

    fn loaded(rom: &[u8]) -> Result<Machine, Chip8Error> {
        let mut m = Machine::new();
        m.init(&mut &rom[..])?;
        Ok(m)
    }

    #[rustfmt::skip]
    const LOGO_PROGRAM: [u8; 22] = [
        0x00, 0xe0, // CLS
        0x60, 0x0c, // LD V0, 0xC
        0xf0, 0x29, // LD F, V0
        0x61, 0x00, // LD V1, 0
        0x62, 0x00, // LD V2, 0
        0xd1, 0x25, // DRW V1, V2, 5
        0x60, 0x08, // LD V0, 8
        0xf0, 0x29, // LD F, V0
        0x61, 0x05, // LD V1, 5
        0xd1, 0x25, // DRW V1, V2, 5
        0x12, 0x14, // JP 0x214
    ];

    #[test]
    fn test_logo_program_end_to_end() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::default();
        let mut clock = FixedClock(1);
        let mut env = Environment::new(
            Config {
                max_cycles: Some(40),
                ..unthrottled()
            },
            loaded(&LOGO_PROGRAM)?,
            &mut display,
            &mut input,
            &mut clock,
        );
        assert_eq!(env.main_loop()?, 40);
        assert_eq!(env.machine().pc, 0x214);
        assert_eq!(env.machine().v[VF], 0);

        // "C" at x=0 and "8" at x=5, which straddles the first two bytes
        let mut expected = [0u8; 256];
        let rows = [
            (0xf7, 0x80),
            (0x84, 0x80),
            (0x87, 0x80),
            (0x84, 0x80),
            (0xf7, 0x80),
        ];
        for (y, (left, right)) in rows.iter().enumerate() {
            expected[y * 8] = *left;
            expected[y * 8 + 1] = *right;
        }

        // CLS and both draws each present a frame
        assert_eq!(display.frames_drawn, 3);
        assert_eq!(display.last_frame, expected.to_vec());
        Ok(())
    }

    #[test]
    fn test_no_redraw_without_display_change() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::default();
        let mut clock = FixedClock(0);
        let machine = loaded(&[0x60, 0x01, 0x12, 0x02])?;
        let mut env = Environment::new(unthrottled(), machine, &mut display, &mut input, &mut clock);
        for _ in 0..10 {
            env.cycle()?;
        }
        assert!(!env.machine().redraw);
        assert_eq!(display.frames_drawn, 0);
        Ok(())
    }

    #[test]
    fn test_wait_key_resumes_on_press() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[KeyState::NoKey, KeyState::NoKey, KeyState::Held(0x7)]);
        let mut clock = FixedClock(0);
        // LD V3, K; JP 0x202
        let machine = loaded(&[0xf3, 0x0a, 0x12, 0x02])?;
        let mut env = Environment::new(unthrottled(), machine, &mut display, &mut input, &mut clock);
        env.cycle()?;
        env.cycle()?;
        assert_eq!(env.machine().pc, 0x200);
        env.cycle()?;
        assert_eq!(env.machine().pc, 0x202);
        assert_eq!(env.machine().v[3], 0x7);
        env.cycle()?;
        assert_eq!(env.machine().keypad, None);
        Ok(())
    }

    #[test]
    fn test_quit_stops_loop() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::new(&[KeyState::NoKey, KeyState::NoKey, KeyState::Quit]);
        let mut clock = FixedClock(0);
        let machine = loaded(&[0x12, 0x00])?;
        let mut env = Environment::new(unthrottled(), machine, &mut display, &mut input, &mut clock);
        assert_eq!(env.main_loop()?, 2);
        assert!(!env.machine().running);
        Ok(())
    }

    #[test]
    fn test_timers_follow_clock_not_instructions() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::default();
        let mut clock = FixedClock(16);
        // LD VA, 10; LD DT, VA; JP 0x204
        let machine = loaded(&[0x6a, 0x0a, 0xfa, 0x15, 0x12, 0x04])?;
        let mut env = Environment::new(unthrottled(), machine, &mut display, &mut input, &mut clock);
        for _ in 0..5 {
            env.cycle()?;
        }
        assert_eq!(env.machine().timers.delay, 7);
        Ok(())
    }

    #[test]
    fn test_stack_error_ends_loop() {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::default();
        let mut clock = FixedClock(0);
        let machine = loaded(&[0x00, 0xee]).unwrap();
        let mut env = Environment::new(unthrottled(), machine, &mut display, &mut input, &mut clock);
        assert!(matches!(env.main_loop(), Err(Chip8Error::StackUnderflow { pc: 0x200 })));
    }

    #[test]
    fn test_empty_rom_still_runs() -> Result<(), Chip8Error> {
        let mut display = DummyDisplay::new();
        let mut input = DummyInput::default();
        let mut clock = FixedClock(0);
        let mut env = Environment::new(
            Config {
                max_cycles: Some(8),
                ..unthrottled()
            },
            loaded(&[])?,
            &mut display,
            &mut input,
            &mut clock,
        );
        // 0000 is an unknown opcode, so this just walks through memory
        assert_eq!(env.main_loop()?, 8);
        assert_eq!(env.machine().pc, 0x210);
        Ok(())
    }

    #[test]
    fn test_truncated_rom_still_runs() -> Result<(), Chip8Error> {
        // JP 0x200 repeated well past the end of memory
        let rom: Vec<u8> = [0x12, 0x00].repeat(0x800);
        let mut machine = Machine::new();
        assert!(matches!(machine.init(&mut rom.as_slice()), Err(Chip8Error::RomTooLarge { .. })));

        let mut display = DummyDisplay::new();
        let mut input = DummyInput::default();
        let mut clock = FixedClock(0);
        let mut env = Environment::new(
            Config {
                max_cycles: Some(3),
                ..unthrottled()
            },
            machine,
            &mut display,
            &mut input,
            &mut clock,
        );
        assert_eq!(env.main_loop()?, 3);
        assert_eq!(env.machine().pc, 0x200);
        Ok(())
    }
}
