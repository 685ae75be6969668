use std::error::Error;
use std::fs::File;
use std::path::{Path, PathBuf};
use std::time::Duration;

use chip8_vm::clock::WallClock;
use chip8_vm::config::{Config, Quirks};
use chip8_vm::display::MonoTermDisplay;
use chip8_vm::environment::Environment;
use chip8_vm::input::TermInput;
use chip8_vm::machine::Machine;
use chip8_vm::Chip8Error;
use clap::{Parser, ValueEnum};
use simplelog::{LevelFilter, WriteLogger};

/// Run a CHIP-8 program in the terminal. Keys 1234/qwer/asdf/zxcv are the
/// hex keypad; Esc quits.
#[derive(Parser)]
#[command(name = "chip8-vm")]
#[command(version)]
struct Cli {
    /// ROM image to load at 0x200
    rom: PathBuf,

    /// Instructions per second
    #[arg(short, long, default_value = "700")]
    speed: u32,

    /// 8XY6/8XYE shift VY into VX
    #[arg(long)]
    shift_quirk: bool,

    /// BNNN jumps to NNN + VX instead of NNN + V0
    #[arg(long)]
    jump_quirk: bool,

    /// FX55/FX65 advance I past the registers transferred
    #[arg(long)]
    load_store_quirk: bool,

    /// Milliseconds a key counts as held after it is pressed
    #[arg(long, default_value = "100")]
    key_hold: u64,

    /// Seed for the random number instruction
    #[arg(long)]
    seed: Option<u64>,

    /// Stop after this many instructions
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Where to write the log; the terminal is busy with the display
    #[arg(long, default_value = "chip8-vm.log")]
    log_file: PathBuf,

    /// How much to log
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    log_level: LogLevel,
}

#[derive(Clone, Copy, ValueEnum)]
enum LogLevel {
    Off,
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl From<LogLevel> for LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => LevelFilter::Off,
            LogLevel::Error => LevelFilter::Error,
            LogLevel::Warn => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::Trace => LevelFilter::Trace,
        }
    }
}

impl Cli {
    fn config(&self) -> Config {
        Config {
            cycles_per_second: self.speed,
            quirks: Quirks {
                shift_uses_vy: self.shift_quirk,
                jump_uses_vx: self.jump_quirk,
                load_store_increments_i: self.load_store_quirk,
            },
            key_hold: Duration::from_millis(self.key_hold),
            seed: self.seed,
            max_cycles: self.max_cycles,
        }
    }
}

/// owns the terminal for as long as the program runs; it's given back when
/// this returns
fn run(config: Config, machine: Machine) -> Result<u64, Chip8Error> {
    let mut display = MonoTermDisplay::chip8()?;
    let mut input = TermInput::new(config.key_hold)?;
    let mut clock = WallClock::new();
    let mut env = Environment::new(config, machine, &mut display, &mut input, &mut clock);
    env.main_loop()
}

/// load the ROM while stderr is still visible; a bad ROM still leaves a
/// runnable, if empty or truncated, machine
fn load(path: &Path) -> Machine {
    let mut machine = Machine::new();
    let loaded = File::open(path)
        .map_err(Chip8Error::from)
        .and_then(|mut f| machine.init(&mut f));
    match loaded {
        Ok(len) => log::info!("loaded {} byte program from {}", len, path.display()),
        Err(e) => {
            eprintln!("Could not load ROM at {}: {}", path.display(), e);
            log::error!("could not load ROM at {}: {}", path.display(), e);
        }
    }
    machine
}

fn main() -> Result<(), Box<dyn Error>> {
    let cli = Cli::parse();

    WriteLogger::init(
        cli.log_level.into(),
        simplelog::Config::default(),
        File::create(&cli.log_file)?,
    )?;

    let machine = load(&cli.rom);
    match run(cli.config(), machine) {
        Ok(cycles) => {
            log::info!("finished after {} cycles", cycles);
            Ok(())
        }
        Err(e) => {
            log::error!("{}", e);
            Err(e.into())
        }
    }
}
