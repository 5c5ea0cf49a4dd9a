use crate::config::AppConfig;
use crate::models::Snapshot;
use crate::renderer::widgets::{self, RenderContext};
use crate::renderer::{Colours, Style};
use log::warn;
use std::io::{self, Write};

const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";
const HIDE_CURSOR: &str = "\x1b[?25l";
const SHOW_CURSOR: &str = "\x1b[?25h";

impl Style {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            bar_width: config.bar_width,
            colours: if config.color {
                Colours::default()
            } else {
                Colours::plain()
            },
            notice: None,
        }
    }
}

// Create the dashboard text for one snapshot
pub fn render(style: &Style, snapshot: &Snapshot) -> String {
    let mut frame = String::with_capacity(2048);
    let mut ctx = RenderContext {
        style,
        snapshot,
        out: &mut frame,
    };

    widgets::render_header(&mut ctx);
    widgets::render_cpu(&mut ctx);
    widgets::render_memory(&mut ctx);
    widgets::render_disks(&mut ctx);
    widgets::render_networks(&mut ctx);
    widgets::render_gpu(&mut ctx);

    frame
}

/// Owns the output stream. Write failures are logged, never returned: a
/// broken terminal must not stop sampling.
pub struct Terminal<W: Write> {
    out: W,
    cursor_hidden: bool,
}

impl Terminal<io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(io::stdout())
    }
}

impl<W: Write> Terminal<W> {
    pub fn new(out: W) -> Self {
        Self {
            out,
            cursor_hidden: false,
        }
    }

    /// Clears the screen and draws `frame` from the top-left corner.
    pub fn draw(&mut self, frame: &str) {
        let result = (|| -> io::Result<()> {
            if !self.cursor_hidden {
                self.out.write_all(HIDE_CURSOR.as_bytes())?;
                self.cursor_hidden = true;
            }
            self.out.write_all(CLEAR_SCREEN.as_bytes())?;
            self.out.write_all(frame.as_bytes())?;
            self.out.flush()
        })();
        if let Err(e) = result {
            warn!("Failed to draw dashboard: {}", e);
        }
    }

    pub fn restore(&mut self) {
        if !self.cursor_hidden {
            return;
        }
        self.cursor_hidden = false;
        let result = self
            .out
            .write_all(SHOW_CURSOR.as_bytes())
            .and_then(|_| self.out.flush());
        if let Err(e) = result {
            warn!("Failed to restore terminal: {}", e);
        }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
