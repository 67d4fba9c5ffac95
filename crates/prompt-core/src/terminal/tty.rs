//! Real terminal: crossterm raw mode, console output on stderr, bytes from stdin

use super::{Attributes, DisplayDiff, Terminal, TerminalSize};
use crate::error::{Error, Result};
use console::Term;
use crossterm::terminal;
use std::io::{self, Read};

/// Terminal backed by the process tty
///
/// Prompts are drawn on stderr so stdout stays free for results.
pub struct TtyTerminal {
    term: Term,
    stdin: io::Stdin,
}

impl TtyTerminal {
    pub fn new() -> Self {
        Self {
            term: Term::stderr(),
            stdin: io::stdin(),
        }
    }

    /// Whether stderr is attached to an interactive terminal
    pub fn is_interactive(&self) -> bool {
        self.term.is_term()
    }

    /// Best-effort reset to cooked mode with a visible cursor, for exit
    /// paths that bypass [`RawModeGuard`](super::RawModeGuard) such as signal
    /// handlers and panic hooks. Errors are ignored.
    pub fn restore() {
        let _ = terminal::disable_raw_mode();
        let _ = Term::stderr().show_cursor();
    }
}

impl Default for TtyTerminal {
    fn default() -> Self {
        Self::new()
    }
}

impl Terminal for TtyTerminal {
    fn enter_raw_mode(&mut self) -> Result<Attributes> {
        let was_raw = terminal::is_raw_mode_enabled().map_err(Error::RawMode)?;
        if !was_raw {
            terminal::enable_raw_mode().map_err(Error::RawMode)?;
        }
        Ok(Attributes { raw: was_raw })
    }

    fn restore_attributes(&mut self, previous: Attributes) -> Result<()> {
        if !previous.raw {
            terminal::disable_raw_mode()?;
        }
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        if visible {
            self.term.show_cursor()?;
        } else {
            self.term.hide_cursor()?;
        }
        Ok(())
    }

    fn size(&self) -> TerminalSize {
        let (rows, columns) = self.term.size();
        TerminalSize::new(rows, columns)
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        let mut buf = [0u8; 1];
        loop {
            match self.stdin.lock().read(&mut buf) {
                Ok(0) => return Ok(None),
                Ok(_) => return Ok(Some(buf[0])),
                Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }
    }

    fn write_diff(&mut self, diff: &DisplayDiff) -> Result<()> {
        if diff.rewind > 0 {
            self.term.move_cursor_up(diff.rewind)?;
        }
        // raw mode disables output post-processing, so lines end in \r\n
        self.term.write_str("\r")?;
        self.term.clear_to_end_of_screen()?;
        for line in &diff.lines {
            self.term.write_str(line)?;
            self.term.write_str("\r\n")?;
        }
        self.term.flush()?;
        Ok(())
    }

    fn print_line(&mut self, line: &str) -> Result<()> {
        self.term.write_line(line)?;
        Ok(())
    }
}
