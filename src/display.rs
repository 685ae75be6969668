use std::io;

use crossterm::cursor::{Hide, Show};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen};
use tui::backend::CrosstermBackend;
use tui::layout::Rect;
use tui::style::{Color, Style};
use tui::symbols::Marker;
use tui::widgets::canvas::{Canvas, Points};
use tui::widgets::{Block, Borders};
use tui::Terminal;

use crate::framebuffer::{CHIP8_SCREEN_HEIGHT, CHIP8_SCREEN_WIDTH};

/// Where frames go. The environment presents the framebuffer here after any
/// instruction that changed it, and at no other time.
pub trait Display {
    /// draw a whole frame, packed 8 pixels to a byte, MSB leftmost
    fn draw(&mut self, data: &[u8]) -> Result<(), io::Error>;
}

// width and height in pixels; always one bit per pixel
struct Resolution(usize, usize);

impl Resolution {
    fn pixel_count(&self) -> usize {
        self.0 * self.1
    }

    fn byte_count(&self) -> usize {
        self.pixel_count() / 8
    }

    fn x_bounds(&self) -> [f64; 2] {
        [0.0, (self.0 - 1) as f64]
    }

    fn y_bounds(&self) -> [f64; 2] {
        [-1.0 * (self.1 - 1) as f64, 0.0]
    }

    /// canvas coordinates of every pixel whose value is `bitplane`; y grows
    /// downwards on the chip-8 but upwards on the canvas
    fn bitplane_from_data<'a>(
        &self,
        data: &'a [u8],
        bitplane: u8,
    ) -> impl std::iter::Iterator<Item = (f64, f64)> + 'a {
        let mut count = self.pixel_count();
        let w = self.0;
        std::iter::from_fn(move || {
            while count > 0 {
                count -= 1;
                let bit = 1 & (data[count / 8] >> (7 - count % 8));
                if bit == bitplane {
                    return Some((
                        (count % w) as f64,        // x
                        -1.0 * (count / w) as f64, // y
                    ));
                }
            }
            None
        })
    }
}

/// monochrome display in a terminal, rendered using TUI and Crossterm
pub struct MonoTermDisplay {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
    resolution: Resolution,
}

impl MonoTermDisplay {
    /// takes over the terminal's alternate screen until dropped
    pub fn new(x: usize, y: usize) -> Result<MonoTermDisplay, io::Error> {
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen, Hide)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        terminal.clear()?;
        Ok(MonoTermDisplay {
            terminal,
            resolution: Resolution(x, y),
        })
    }

    /// standard 64x32 chip-8 screen
    pub fn chip8() -> Result<MonoTermDisplay, io::Error> {
        Self::new(CHIP8_SCREEN_WIDTH, CHIP8_SCREEN_HEIGHT)
    }
}

impl Drop for MonoTermDisplay {
    fn drop(&mut self) {
        if let Err(e) = execute!(io::stdout(), Show, LeaveAlternateScreen) {
            log::warn!("failed to restore terminal: {}", e);
        }
    }
}

impl Display for MonoTermDisplay {
    fn draw(&mut self, data: &[u8]) -> Result<(), io::Error> {
        // make sure we're given exactly the right amount of data to draw
        assert_eq!(
            data.len(),
            self.resolution.byte_count(),
            "MonoTermDisplay must have correct-sized data to draw"
        );

        let resolution = &self.resolution;
        // for now this assumes a 1:1 ratio between terminal, chip8 and the
        // internal TUI canvas
        self.terminal.draw(|f| {
            let size = Rect::new(0, 0, 2 + resolution.0 as u16, 2 + resolution.1 as u16);

            let canvas = Canvas::default()
                .block(
                    Block::default()
                        .title("CHIP-8")
                        .borders(Borders::ALL)
                        .style(Style::default().bg(Color::Black)),
                )
                .x_bounds(resolution.x_bounds())
                .y_bounds(resolution.y_bounds())
                .marker(Marker::Block)
                .paint(|ctx| {
                    // only lit pixels need painting over the black background
                    ctx.draw(&Points {
                        coords: &resolution.bitplane_from_data(data, 1).collect::<Vec<_>>(),
                        color: Color::White,
                    });
                });
            f.render_widget(canvas, size);
        })?;
        Ok(())
    }
}

/// useful for testing non-display routines; remembers what it was asked to draw
#[derive(Debug, Default)]
pub struct DummyDisplay {
    pub frames_drawn: usize,
    pub last_frame: Vec<u8>,
}

impl DummyDisplay {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Display for DummyDisplay {
    fn draw(&mut self, data: &[u8]) -> Result<(), io::Error> {
        self.frames_drawn += 1;
        self.last_frame = data.to_vec();
        Ok(())
    }
}
