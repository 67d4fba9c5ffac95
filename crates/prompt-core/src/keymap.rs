//! Key decoding: raw input bytes to abstract operations
//!
//! A [`KeyMap`] binds byte sequences to [`Operation`]s. The
//! [`BindingReader`] pulls bytes from the terminal one at a time until the
//! accumulated sequence is bound, so it never reads past the operation it
//! returns. Unbound sequences are dropped silently.
//!
//! Up and Down are bound both to their arrow-key escape sequences and to a
//! control character (Ctrl-Y / Ctrl-E), so terminals that do not send escape
//! sequences can still navigate.

use crate::error::{Error, Result};
use crate::terminal::Terminal;
use std::collections::HashMap;
use tracing::trace;

/// Byte sequences for the bound keys, handy for scripting input
pub mod keys {
    pub const ENTER: &[u8] = b"\r";
    pub const SPACE: &[u8] = b" ";
    pub const DELETE: &[u8] = b"\x7f";
    pub const BACKSPACE: &[u8] = b"\x08";
    pub const UP: &[u8] = b"\x1b[A";
    pub const DOWN: &[u8] = b"\x1b[B";
    pub const UP_SS3: &[u8] = b"\x1bOA";
    pub const DOWN_SS3: &[u8] = b"\x1bOB";
    /// Ctrl-Y
    pub const CTRL_UP: &[u8] = b"\x19";
    /// Ctrl-E
    pub const CTRL_DOWN: &[u8] = b"\x05";
}

/// Abstract input event consumed by components
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    Select,
    Up,
    Down,
    Exit,
    Backspace,
    /// A printable character, carrying the literal text read
    Char(String),
}

/// Result of looking up a partial byte sequence
#[derive(Debug, PartialEq, Eq)]
enum Lookup<'a> {
    Bound(&'a Operation),
    Prefix,
    Unbound,
}

/// Table of byte sequences to operations
#[derive(Debug, Clone, Default)]
pub struct KeyMap {
    bindings: HashMap<Vec<u8>, Operation>,
    decode_utf8: bool,
}

impl KeyMap {
    /// Empty key map
    pub fn new() -> Self {
        Self::default()
    }

    /// Bindings used by list selectors: space selects
    pub fn selector() -> Self {
        let mut map = Self::base();
        map.bind(Operation::Select, keys::SPACE);
        map
    }

    /// Bindings used by text fields: space is typed like any other character
    pub fn text() -> Self {
        let mut map = Self::base();
        map.bind(Operation::Char(" ".to_string()), keys::SPACE);
        map
    }

    fn base() -> Self {
        let mut map = Self::new();
        map.bind(Operation::Exit, keys::ENTER);
        map.bind(Operation::Backspace, keys::DELETE);
        map.bind(Operation::Backspace, keys::BACKSPACE);
        // text fields ignore Up and Down, but the sequences are still consumed whole
        map.bind(Operation::Up, keys::UP);
        map.bind(Operation::Up, keys::UP_SS3);
        map.bind(Operation::Up, keys::CTRL_UP);
        map.bind(Operation::Down, keys::DOWN);
        map.bind(Operation::Down, keys::DOWN_SS3);
        map.bind(Operation::Down, keys::CTRL_DOWN);
        // skip 32 (space) and 127 (delete)
        for byte in 33u8..127 {
            map.bind(Operation::Char(char::from(byte).to_string()), &[byte]);
        }
        map.decode_utf8 = true;
        map
    }

    pub fn bind(&mut self, operation: Operation, sequence: &[u8]) {
        self.bindings.insert(sequence.to_vec(), operation);
    }

    /// Whether multi-byte UTF-8 characters decode to [`Operation::Char`]
    pub fn set_decode_utf8(&mut self, decode: bool) {
        self.decode_utf8 = decode;
    }

    fn lookup(&self, sequence: &[u8]) -> Lookup<'_> {
        if let Some(operation) = self.bindings.get(sequence) {
            return Lookup::Bound(operation);
        }
        if self
            .bindings
            .keys()
            .any(|k| k.len() > sequence.len() && k.starts_with(sequence))
        {
            Lookup::Prefix
        } else {
            Lookup::Unbound
        }
    }
}

/// Expected byte length of a UTF-8 sequence starting with `lead`
fn utf8_len(lead: u8) -> Option<usize> {
    match lead {
        0xC2..=0xDF => Some(2),
        0xE0..=0xEF => Some(3),
        0xF0..=0xF4 => Some(4),
        _ => None,
    }
}

fn is_continuation(byte: u8) -> bool {
    (0x80..=0xBF).contains(&byte)
}

/// Reads one bound operation at a time from a terminal
#[derive(Debug, Default)]
pub struct BindingReader {
    last_binding: Vec<u8>,
}

impl BindingReader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes of the most recently matched binding
    pub fn last_binding(&self) -> &[u8] {
        &self.last_binding
    }

    /// Block until a bound sequence is read.
    ///
    /// Fails with [`Error::InputClosed`] if the input ends first.
    pub fn read_binding<T: Terminal + ?Sized>(
        &mut self,
        terminal: &mut T,
        keymap: &KeyMap,
    ) -> Result<Operation> {
        self.read_with(keymap, || terminal.read_byte())
    }

    pub(crate) fn read_with<F>(&mut self, keymap: &KeyMap, mut next_byte: F) -> Result<Operation>
    where
        F: FnMut() -> Result<Option<u8>>,
    {
        let mut pending: Vec<u8> = Vec::new();
        let mut carried: Option<u8> = None;
        loop {
            let byte = match carried.take() {
                Some(byte) => byte,
                None => next_byte()?.ok_or(Error::InputClosed)?,
            };
            pending.push(byte);

            if keymap.decode_utf8 && pending.len() == 1 {
                if let Some(len) = utf8_len(byte) {
                    while pending.len() < len {
                        let next = next_byte()?.ok_or(Error::InputClosed)?;
                        if !is_continuation(next) {
                            // truncated character: the new byte starts over
                            carried = Some(next);
                            break;
                        }
                        pending.push(next);
                    }
                    match std::str::from_utf8(&pending) {
                        Ok(text) if carried.is_none() => {
                            let operation = Operation::Char(text.to_string());
                            self.last_binding = std::mem::take(&mut pending);
                            trace!(?operation, "decoded utf-8 character");
                            return Ok(operation);
                        }
                        _ => {
                            trace!(sequence = ?pending, "dropping invalid utf-8 sequence");
                            pending.clear();
                            continue;
                        }
                    }
                }
            }

            match keymap.lookup(&pending) {
                Lookup::Bound(operation) => {
                    let operation = operation.clone();
                    self.last_binding = std::mem::take(&mut pending);
                    trace!(?operation, "decoded binding");
                    return Ok(operation);
                }
                Lookup::Prefix => continue,
                Lookup::Unbound => {
                    trace!(sequence = ?pending, "dropping unbound sequence");
                    pending.clear();
                }
            }
        }
    }
}
