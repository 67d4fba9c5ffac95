//! Free-text and path fields
//!
//! Both are single line buffers: Char appends, Backspace removes the last
//! character, Exit finishes. [`StringInput`] falls back to its default on an
//! empty buffer. [`PathInput`] re-checks the buffer against the filesystem
//! after every edit and shows an advisory message; the message never blocks
//! Exit.

use crate::component::{self, Component, RunOptions};
use crate::error::Result;
use crate::keymap::{KeyMap, Operation};
use crate::render;
use crate::style::StyledLine;
use crate::terminal::Terminal;
use std::fmt;
use std::path::{Path, PathBuf};
use std::rc::Rc;

/// Severity of an advisory message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageLevel {
    Info,
    Warn,
    Error,
}

impl MessageLevel {
    pub fn marker(&self) -> &'static str {
        match self {
            MessageLevel::Info => ">",
            MessageLevel::Warn => ">>",
            MessageLevel::Error => ">>>",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub level: MessageLevel,
    pub text: String,
}

impl Message {
    pub fn new(level: MessageLevel, text: impl Into<String>) -> Self {
        Self {
            level,
            text: text.into(),
        }
    }
}

impl fmt::Display for Message {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.level.marker(), self.text)
    }
}

/// Everything a text or path renderer can draw from
#[derive(Debug, Clone)]
pub struct TextContext<'a> {
    pub name: &'a str,
    /// Buffer typed so far
    pub input: &'a str,
    pub default_value: Option<&'a str>,
    pub message: Option<&'a Message>,
    /// Final value, meaningful once `done` is set
    pub value: Option<String>,
    pub done: bool,
}

impl<'a> TextContext<'a> {
    pub fn new(name: &'a str, input: &'a str, default_value: Option<&'a str>) -> Self {
        Self {
            name,
            input,
            default_value,
            message: None,
            value: None,
            done: false,
        }
    }

    /// Context describing a finished field
    pub fn result(name: &'a str, value: Option<String>) -> Self {
        Self {
            name,
            input: "",
            default_value: None,
            message: None,
            value,
            done: true,
        }
    }

    pub fn is_result(&self) -> bool {
        self.done
    }
}

/// Renders a text context to display lines
pub type TextRenderer = Rc<dyn Fn(&TextContext<'_>) -> Vec<StyledLine>>;

fn edit(buffer: &mut String, operation: Operation) -> bool {
    match operation {
        Operation::Char(text) => {
            buffer.push_str(&text);
            true
        }
        Operation::Backspace => buffer.pop().is_some(),
        _ => false,
    }
}

/// Single-line text field with a default value
pub struct StringInput {
    name: String,
    default_value: Option<String>,
    buffer: String,
    renderer: TextRenderer,
    options: RunOptions<StringInput>,
}

impl StringInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default_value: None,
            buffer: String::new(),
            renderer: Rc::new(render::text_field),
            options: RunOptions::default(),
        }
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_renderer(mut self, renderer: TextRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn input(&self) -> &str {
        &self.buffer
    }

    /// The typed buffer, or the default when nothing was typed
    pub fn value(&self) -> Option<String> {
        if self.buffer.is_empty() {
            self.default_value.clone()
        } else {
            Some(self.buffer.clone())
        }
    }

    pub fn run<T: Terminal + ?Sized>(&mut self, terminal: &mut T) -> Result<Option<String>> {
        component::run(terminal, self)
    }
}

impl Component for StringInput {
    type Output = Option<String>;

    fn name(&self) -> &str {
        &self.name
    }

    fn keymap(&self) -> KeyMap {
        KeyMap::text()
    }

    fn prepare(&mut self) {
        self.buffer.clear();
    }

    fn render(&self) -> Vec<StyledLine> {
        let context = TextContext::new(&self.name, &self.buffer, self.default_value.as_deref());
        (self.renderer)(&context)
    }

    fn apply(&mut self, operation: Operation) -> bool {
        if operation == Operation::Exit {
            return true;
        }
        edit(&mut self.buffer, operation);
        false
    }

    fn render_result(&self) -> Vec<StyledLine> {
        (self.renderer)(&TextContext::result(&self.name, self.value()))
    }

    fn output(&self) -> Option<String> {
        self.value()
    }

    fn options(&mut self) -> &mut RunOptions<Self> {
        &mut self.options
    }
}

/// Advisory message for a candidate output path
pub fn check_path(path: &Path) -> Message {
    if path.is_dir() {
        Message::new(MessageLevel::Error, "Directory exists")
    } else if path.exists() {
        Message::new(MessageLevel::Warn, "File exists")
    } else if path
        .parent()
        .is_some_and(|p| !p.as_os_str().is_empty() && !p.exists())
    {
        Message::new(MessageLevel::Warn, "Parent directory does not exist")
    } else {
        Message::new(MessageLevel::Info, "Path ok")
    }
}

/// Text field whose buffer is validated as a filesystem path
pub struct PathInput {
    name: String,
    base_dir: PathBuf,
    buffer: String,
    message: Option<Message>,
    renderer: TextRenderer,
    options: RunOptions<PathInput>,
}

impl PathInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            base_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
            buffer: String::new(),
            message: None,
            renderer: Rc::new(render::path_field),
            options: RunOptions::default(),
        }
    }

    /// Directory relative input is resolved against
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = base_dir.into();
        self
    }

    pub fn with_renderer(mut self, renderer: TextRenderer) -> Self {
        self.renderer = renderer;
        self
    }

    pub fn message(&self) -> Option<&Message> {
        self.message.as_ref()
    }

    /// Buffer resolved against the base directory, `None` when empty
    pub fn resolved(&self) -> Option<PathBuf> {
        if self.buffer.is_empty() {
            None
        } else {
            Some(self.base_dir.join(&self.buffer))
        }
    }

    pub fn run<T: Terminal + ?Sized>(&mut self, terminal: &mut T) -> Result<Option<PathBuf>> {
        component::run(terminal, self)
    }

    fn revalidate(&mut self) {
        self.message = self.resolved().map(|path| check_path(&path));
    }
}

impl Component for PathInput {
    type Output = Option<PathBuf>;

    fn name(&self) -> &str {
        &self.name
    }

    fn keymap(&self) -> KeyMap {
        KeyMap::text()
    }

    fn prepare(&mut self) {
        self.buffer.clear();
        self.message = None;
    }

    fn render(&self) -> Vec<StyledLine> {
        let mut context = TextContext::new(&self.name, &self.buffer, None);
        context.message = self.message.as_ref();
        (self.renderer)(&context)
    }

    fn apply(&mut self, operation: Operation) -> bool {
        if operation == Operation::Exit {
            return true;
        }
        if edit(&mut self.buffer, operation) {
            self.revalidate();
        }
        false
    }

    fn render_result(&self) -> Vec<StyledLine> {
        let value = self.resolved().map(|p| p.display().to_string());
        (self.renderer)(&TextContext::result(&self.name, value))
    }

    fn output(&self) -> Option<PathBuf> {
        self.resolved()
    }

    fn options(&mut self) -> &mut RunOptions<Self> {
        &mut self.options
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::keys;
    use crate::terminal::ScriptedTerminal;
    use tempfile::TempDir;

    #[test]
    fn test_empty_buffer_falls_back_to_default() {
        let mut terminal = ScriptedTerminal::new(keys::ENTER);
        let mut input = StringInput::new("Artifact").with_default("D");
        assert_eq!(input.run(&mut terminal).unwrap(), Some("D".to_string()));
        assert_eq!(terminal.printed(), ["? Artifact D"]);
    }

    #[test]
    fn test_typed_buffer_wins_over_default() {
        let mut terminal = ScriptedTerminal::new(b"my app\r");
        let mut input = StringInput::new("Artifact").with_default("D");
        assert_eq!(input.run(&mut terminal).unwrap(), Some("my app".to_string()));
    }

    #[test]
    fn test_backspace_edits_buffer() {
        let mut terminal = ScriptedTerminal::new(b"abc\x7f\x7fd\r");
        let mut input = StringInput::new("Name");
        assert_eq!(input.run(&mut terminal).unwrap(), Some("ad".to_string()));
    }

    #[test]
    fn test_erasing_everything_falls_back_to_default() {
        let mut terminal = ScriptedTerminal::new(b"x\x7f\x7f\r");
        let mut input = StringInput::new("Name").with_default("D");
        assert_eq!(input.run(&mut terminal).unwrap(), Some("D".to_string()));
    }

    #[test]
    fn test_no_entry_and_no_default_is_none() {
        let mut terminal = ScriptedTerminal::new(keys::ENTER);
        let mut input = StringInput::new("Name");
        assert_eq!(input.run(&mut terminal).unwrap(), None);
        assert_eq!(terminal.printed(), ["? Name <none>"]);
    }

    #[test]
    fn test_text_field_ignores_navigation() {
        let mut terminal = ScriptedTerminal::new(b"a\x1b[A\x19b\r");
        let mut input = StringInput::new("Name");
        assert_eq!(input.run(&mut terminal).unwrap(), Some("ab".to_string()));
    }

    #[test]
    fn test_truncated_character_does_not_swallow_enter() {
        let mut terminal = ScriptedTerminal::new(b"ab\xc3\rx");
        let mut input = StringInput::new("Name");
        assert_eq!(input.run(&mut terminal).unwrap(), Some("ab".to_string()));
        assert_eq!(terminal.remaining_input(), 1);
    }

    #[test]
    fn test_check_path_levels() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("file.txt");
        std::fs::write(&file, "x").unwrap();

        assert_eq!(check_path(dir.path()).level, MessageLevel::Error);
        assert_eq!(check_path(&file), Message::new(MessageLevel::Warn, "File exists"));
        assert_eq!(
            check_path(&dir.path().join("missing/out.zip")),
            Message::new(MessageLevel::Warn, "Parent directory does not exist")
        );
        assert_eq!(
            check_path(&dir.path().join("out.zip")),
            Message::new(MessageLevel::Info, "Path ok")
        );
    }

    #[test]
    fn test_path_input_revalidates_after_every_edit() {
        let dir = TempDir::new().unwrap();
        std::fs::create_dir(dir.path().join("demo")).unwrap();

        let mut terminal = ScriptedTerminal::new(b"demo\r");
        let mut input = PathInput::new("Path").with_base_dir(dir.path());
        let path = input.run(&mut terminal).unwrap();

        assert_eq!(path, Some(dir.path().join("demo")));
        assert_eq!(
            input.message(),
            Some(&Message::new(MessageLevel::Error, "Directory exists"))
        );
        let frame = terminal.last_visible_frame().unwrap();
        assert_eq!(frame, ["? Path demo", ">>> Directory exists"]);
    }

    #[test]
    fn test_path_message_does_not_block_exit() {
        let dir = TempDir::new().unwrap();
        let mut terminal = ScriptedTerminal::new(b"a/b/c\r");
        let mut input = PathInput::new("Path").with_base_dir(dir.path());
        assert_eq!(
            input.run(&mut terminal).unwrap(),
            Some(dir.path().join("a/b/c"))
        );
    }

    #[test]
    fn test_empty_path_yields_none() {
        let mut terminal = ScriptedTerminal::new(keys::ENTER);
        let mut input = PathInput::new("Path");
        assert_eq!(input.run(&mut terminal).unwrap(), None);
        assert!(input.message().is_none());
    }
}
