//! Markdown output for the terminal.
//!
//! Core display types produce markdown. With color enabled it is styled with
//! termimad; otherwise it is printed unchanged so output stays easy to pipe
//! and to assert on in tests.

use std::io::{self, Write};

use anyhow::{Context, Result};
use termimad::{crossterm::style::Color, MadSkin};

pub struct TerminalRenderer {
    rich_enabled: bool,
    skin: MadSkin,
}

impl TerminalRenderer {
    pub fn new(rich_enabled: bool) -> Self {
        let mut skin = MadSkin::default();
        skin.set_headers_fg(Color::DarkCyan);
        skin.bold.set_fg(Color::Yellow);
        skin.italic.set_fg(Color::Magenta);
        skin.bullet.set_fg(Color::DarkCyan);

        Self { rich_enabled, skin }
    }

    /// Write markdown to stdout.
    pub fn render(&self, markdown: &str) -> Result<()> {
        let mut stdout = io::stdout().lock();
        if self.rich_enabled {
            // Headings keep their hashes; other lines get inline styling only.
            for line in markdown.lines() {
                let written = if line.starts_with('#') {
                    writeln!(stdout, "\x1b[36m{line}\x1b[0m")
                } else {
                    writeln!(stdout, "{}", self.skin.inline(line))
                };
                written.context("Failed to write to stdout")?;
            }
        } else {
            write!(stdout, "{markdown}").context("Failed to write to stdout")?;
        }
        stdout.flush().context("Failed to flush stdout")
    }
}

impl Default for TerminalRenderer {
    fn default() -> Self {
        Self::new(true)
    }
}
