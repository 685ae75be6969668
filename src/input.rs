use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyModifiers};
use crossterm::terminal;
use std::collections::{HashMap, VecDeque};
use std::io;
use std::time::{Duration, Instant};

/// left-hand side of a qwerty keyboard laid out like the COSMAC hex keypad:
///
/// ```text
/// 1 2 3 4      1 2 3 C
/// q w e r  =>  4 5 6 D
/// a s d f      7 8 9 E
/// z x c v      A 0 B F
/// ```
const CHIP8_CONVENTIONAL_KEYMAP: [(char, u8); 16] = [
    ('x', 0x00),
    ('1', 0x01),
    ('2', 0x02),
    ('3', 0x03),
    ('q', 0x04),
    ('w', 0x05),
    ('e', 0x06),
    ('a', 0x07),
    ('s', 0x08),
    ('d', 0x09),
    ('z', 0x0a),
    ('c', 0x0b),
    ('4', 0x0c),
    ('r', 0x0d),
    ('f', 0x0e),
    ('v', 0x0f),
];

/// What the keypad looks like this cycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyState {
    /// a hex key, 0x0..=0xf, is down
    Held(u8),
    NoKey,
    /// the user wants out
    Quit,
}

/// reads keypresses
pub trait Input {
    /// called once per cycle, before the instruction is executed
    fn poll(&mut self) -> Result<KeyState, io::Error>;
}

/// Terminals report presses but never releases, so a key is treated as
/// held for a fixed time after it was last pressed
#[derive(Debug)]
struct KeyHold {
    held: Option<(u8, Instant)>,
    hold: Duration,
}

impl KeyHold {
    fn new(hold: Duration) -> Self {
        KeyHold { held: None, hold }
    }

    /// the keypad as of `now`, given the latest key pressed since the last
    /// update, if any
    fn update(&mut self, pressed: Option<u8>, now: Instant) -> KeyState {
        if let Some(key) = pressed {
            self.held = Some((key, now));
            return KeyState::Held(key);
        }
        match self.held {
            Some((key, since)) if now.saturating_duration_since(since) < self.hold => {
                KeyState::Held(key)
            }
            _ => {
                self.held = None;
                KeyState::NoKey
            }
        }
    }
}

/// keypad on the controlling terminal, read with crossterm in raw mode
pub struct TermInput {
    keymap: HashMap<char, u8>,
    keys: KeyHold,
}

impl TermInput {
    /// `hold` is how long a key counts as down after it was last seen, as
    /// terminals only report presses
    pub fn new(hold: Duration) -> Result<Self, io::Error> {
        terminal::enable_raw_mode()?;
        Ok(TermInput {
            keymap: HashMap::from(CHIP8_CONVENTIONAL_KEYMAP),
            keys: KeyHold::new(hold),
        })
    }
}

fn map_key(keymap: &HashMap<char, u8>, evt: KeyEvent) -> Option<KeyState> {
    match evt.code {
        KeyCode::Esc => Some(KeyState::Quit),
        // raw mode swallows SIGINT
        KeyCode::Char('c') if evt.modifiers.contains(KeyModifiers::CONTROL) => Some(KeyState::Quit),
        KeyCode::Char(key) => match keymap.get(&key.to_ascii_lowercase()) {
            Some(mapped_key) => Some(KeyState::Held(*mapped_key)),
            None => {
                log::debug!("can't map {:?} to a COSMAC key", key);
                None
            }
        },
        _ => None,
    }
}

impl Drop for TermInput {
    fn drop(&mut self) {
        if let Err(e) = terminal::disable_raw_mode() {
            log::warn!("failed to leave raw mode: {}", e);
        }
    }
}

impl Input for TermInput {
    fn poll(&mut self) -> Result<KeyState, io::Error> {
        let mut pressed = None;
        while event::poll(Duration::from_millis(0))? {
            if let Event::Key(evt) = event::read()? {
                match map_key(&self.keymap, evt) {
                    Some(KeyState::Quit) => return Ok(KeyState::Quit),
                    Some(KeyState::Held(key)) => pressed = Some(key),
                    _ => {}
                }
            }
        }
        Ok(self.keys.update(pressed, Instant::now()))
    }
}

/// dummy Input implementation for testing; plays back a script of key
/// states, then reports no key forever
#[derive(Debug, Default)]
pub struct DummyInput {
    script: VecDeque<KeyState>,
}

impl DummyInput {
    pub fn new(script: &[KeyState]) -> Self {
        DummyInput {
            script: script.iter().copied().collect(),
        }
    }
}

impl Input for DummyInput {
    fn poll(&mut self) -> Result<KeyState, io::Error> {
        Ok(self.script.pop_front().unwrap_or(KeyState::NoKey))
    }
}
