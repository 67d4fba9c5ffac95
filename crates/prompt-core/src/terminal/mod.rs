//! Terminal capability consumed by every component
//!
//! A component never talks to stdin/stderr directly. It goes through the
//! [`Terminal`] trait so the same loop drives a real tty ([`TtyTerminal`])
//! or an in-memory script ([`ScriptedTerminal`]).
//!
//! Raw mode is acquired through [`RawModeGuard`], which restores the
//! previous input mode, shows the cursor again and clears the component's
//! display area on every exit path, including errors and panics.

pub mod display;
pub mod scripted;

#[cfg(feature = "console-terminal")]
mod tty;

pub use display::{Display, DisplayDiff};
pub use scripted::ScriptedTerminal;

#[cfg(feature = "console-terminal")]
pub use tty::TtyTerminal;

use crate::error::Result;
use crate::style::StyledLine;

/// Terminal dimensions in character cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalSize {
    pub rows: u16,
    pub columns: u16,
}

impl TerminalSize {
    pub fn new(rows: u16, columns: u16) -> Self {
        Self { rows, columns }
    }
}

impl Default for TerminalSize {
    fn default() -> Self {
        Self::new(24, 80)
    }
}

/// Input mode in effect before raw mode was entered
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Attributes {
    /// Whether the terminal was already in raw mode
    pub raw: bool,
}

/// Low-level terminal operations needed by the prompt loop
pub trait Terminal {
    /// Switch input to raw mode, returning the attributes to restore later
    fn enter_raw_mode(&mut self) -> Result<Attributes>;

    /// Put back the attributes returned by [`Terminal::enter_raw_mode`]
    fn restore_attributes(&mut self, previous: Attributes) -> Result<()>;

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()>;

    fn size(&self) -> TerminalSize;

    /// Block until the next input byte is available. `None` means the input
    /// stream has ended.
    fn read_byte(&mut self) -> Result<Option<u8>>;

    /// Apply a display diff relative to the component's first row
    fn write_diff(&mut self, diff: &DisplayDiff) -> Result<()>;

    /// Print a finished line below the prompt area (outside raw mode)
    fn print_line(&mut self, line: &str) -> Result<()>;
}

impl<T: Terminal + ?Sized> Terminal for &mut T {
    fn enter_raw_mode(&mut self) -> Result<Attributes> {
        (**self).enter_raw_mode()
    }

    fn restore_attributes(&mut self, previous: Attributes) -> Result<()> {
        (**self).restore_attributes(previous)
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        (**self).set_cursor_visible(visible)
    }

    fn size(&self) -> TerminalSize {
        (**self).size()
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        (**self).read_byte()
    }

    fn write_diff(&mut self, diff: &DisplayDiff) -> Result<()> {
        (**self).write_diff(diff)
    }

    fn print_line(&mut self, line: &str) -> Result<()> {
        (**self).print_line(line)
    }
}

/// Scoped raw-mode acquisition
///
/// Holds the terminal for the lifetime of one component run. Dropping the
/// guard (or calling [`RawModeGuard::release`]) restores the previous
/// attributes, re-shows the cursor and flushes an empty display update.
pub struct RawModeGuard<'a, T: Terminal + ?Sized> {
    terminal: &'a mut T,
    previous: Option<Attributes>,
    display: Display,
}

impl<'a, T: Terminal + ?Sized> RawModeGuard<'a, T> {
    /// Enter raw mode and hide the cursor
    pub fn enter(terminal: &'a mut T) -> Result<Self> {
        let previous = terminal.enter_raw_mode()?;
        let mut guard = Self {
            terminal,
            previous: Some(previous),
            display: Display::new(),
        };
        guard.terminal.set_cursor_visible(false)?;
        Ok(guard)
    }

    /// Resize the display to the current terminal size and draw `lines`
    pub fn draw(&mut self, lines: &[StyledLine]) -> Result<()> {
        self.display.resize(self.terminal.size());
        if let Some(diff) = self.display.update(lines) {
            self.terminal.write_diff(&diff)?;
        }
        Ok(())
    }

    pub fn size(&self) -> TerminalSize {
        self.terminal.size()
    }

    pub fn read_byte(&mut self) -> Result<Option<u8>> {
        self.terminal.read_byte()
    }

    /// Release the terminal, surfacing the first cleanup error
    pub fn release(mut self) -> Result<()> {
        self.cleanup()
    }

    fn cleanup(&mut self) -> Result<()> {
        let Some(previous) = self.previous.take() else {
            return Ok(());
        };
        // every step runs even if an earlier one failed
        let restored = self.terminal.restore_attributes(previous);
        let shown = self.terminal.set_cursor_visible(true);
        let cleared = match self.display.update(&[]) {
            Some(diff) => self.terminal.write_diff(&diff),
            None => Ok(()),
        };
        restored.and(shown).and(cleared)
    }
}

impl<T: Terminal + ?Sized> Drop for RawModeGuard<'_, T> {
    fn drop(&mut self) {
        let _ = self.cleanup();
    }
}
