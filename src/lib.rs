//! A CHIP-8 virtual machine that renders to the terminal.
//!
//! ## Design
//!
//! * one owned [`Machine`](machine::Machine) holds all of the VM state
//! * the [`Chip8Interpreter`](interpreter::Chip8Interpreter) runs exactly one
//!   instruction per `step`, against a `&mut Machine`
//! * display, input and clock are traits, so the interpreter doesn't need to
//!   know how the screen works, where keys come from or what time it is
//! * CHIP-8 instructions run as fast as possible then sleep, to match the
//!   configured speed; so not quite authentic
//! * timers count down from elapsed wallclock time, not instruction count
//! * historical quirks (shift source, jump offset register, I after
//!   load/store) are configurable
//!
//! Model
//!
//! ```text
//! Environment
//!  |-- display, input, clock, config
//!  |-- machine(memory, registers, stack, timers, framebuffer, keypad)
//!  |-- interpreter(quirks, rng)
//!  `-- main loop
//!       |-- keypad = input.poll()
//!       |-- timers.tick(clock.elapsed_ms())
//!       |-- interpreter.step(machine)
//!       |-- if machine.redraw { display.draw(framebuffer) }
//!       `-- sleep(cycle period - time taken)
//! ```
pub mod clock;
pub mod config;
pub mod display;
pub mod environment;
pub mod error;
pub mod framebuffer;
pub mod input;
pub mod instruction;
pub mod interpreter;
pub mod machine;
pub mod memory;
pub mod stack;
pub mod timer;

pub use error::Chip8Error;
