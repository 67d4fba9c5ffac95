//! In-memory terminal driven by a byte script
//!
//! Used by the test suites and by callers that want to exercise a wizard
//! without a tty. Every raw-mode transition, frame and printed line is
//! recorded so it can be asserted on afterwards.

use super::{Attributes, DisplayDiff, Terminal, TerminalSize};
use crate::error::{Error, Result};
use std::collections::VecDeque;
use std::io;

#[derive(Debug)]
pub struct ScriptedTerminal {
    input: VecDeque<u8>,
    size: TerminalSize,
    raw: bool,
    fail_raw_mode: bool,
    raw_mode_entries: usize,
    cursor_visible: bool,
    screen: Vec<String>,
    frames: Vec<Vec<String>>,
    printed: Vec<String>,
}

impl ScriptedTerminal {
    /// Create a terminal whose input is the given bytes
    pub fn new(input: impl AsRef<[u8]>) -> Self {
        Self {
            input: input.as_ref().iter().copied().collect(),
            size: TerminalSize::default(),
            raw: false,
            fail_raw_mode: false,
            raw_mode_entries: 0,
            cursor_visible: true,
            screen: Vec::new(),
            frames: Vec::new(),
            printed: Vec::new(),
        }
    }

    pub fn with_size(mut self, rows: u16, columns: u16) -> Self {
        self.size = TerminalSize::new(rows, columns);
        self
    }

    /// Start out in raw mode, as if a caller had already enabled it
    pub fn already_raw(mut self) -> Self {
        self.raw = true;
        self
    }

    /// Make every raw-mode request fail
    pub fn failing_raw_mode(mut self) -> Self {
        self.fail_raw_mode = true;
        self
    }

    /// Queue more input bytes
    pub fn push_input(&mut self, bytes: impl AsRef<[u8]>) {
        self.input.extend(bytes.as_ref().iter().copied());
    }

    /// Number of input bytes not yet consumed
    pub fn remaining_input(&self) -> usize {
        self.input.len()
    }

    pub fn is_raw(&self) -> bool {
        self.raw
    }

    pub fn raw_mode_entries(&self) -> usize {
        self.raw_mode_entries
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Current content of the component area, without styling
    pub fn screen(&self) -> &[String] {
        &self.screen
    }

    /// Every state of the component area after each write, without styling
    pub fn frames(&self) -> &[Vec<String>] {
        &self.frames
    }

    /// Last non-empty frame, i.e. what the user saw before the final clear
    pub fn last_visible_frame(&self) -> Option<&[String]> {
        self.frames
            .iter()
            .rev()
            .find(|f| !f.is_empty())
            .map(Vec::as_slice)
    }

    /// Lines printed outside raw mode, without styling
    pub fn printed(&self) -> &[String] {
        &self.printed
    }
}

impl Terminal for ScriptedTerminal {
    fn enter_raw_mode(&mut self) -> Result<Attributes> {
        if self.fail_raw_mode {
            return Err(Error::RawMode(io::Error::new(
                io::ErrorKind::Unsupported,
                "not a terminal",
            )));
        }
        let previous = Attributes { raw: self.raw };
        self.raw = true;
        self.raw_mode_entries += 1;
        Ok(previous)
    }

    fn restore_attributes(&mut self, previous: Attributes) -> Result<()> {
        self.raw = previous.raw;
        Ok(())
    }

    fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        self.cursor_visible = visible;
        Ok(())
    }

    fn size(&self) -> TerminalSize {
        self.size
    }

    fn read_byte(&mut self) -> Result<Option<u8>> {
        Ok(self.input.pop_front())
    }

    fn write_diff(&mut self, diff: &DisplayDiff) -> Result<()> {
        let keep = self.screen.len().saturating_sub(diff.rewind);
        self.screen.truncate(keep);
        self.screen.extend(
            diff.lines
                .iter()
                .map(|l| console::strip_ansi_codes(l).into_owned()),
        );
        self.frames.push(self.screen.clone());
        Ok(())
    }

    fn print_line(&mut self, line: &str) -> Result<()> {
        self.printed
            .push(console::strip_ansi_codes(line).into_owned());
        Ok(())
    }
}
