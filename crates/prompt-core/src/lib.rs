//! Prompt Core - Interactive terminal prompts and input wizards
//!
//! This library provides reusable prompt components that run in a raw
//! terminal: single-select and multi-select lists with filtering and
//! wraparound scrolling, free-text fields and path fields. An
//! [`InputWizard`] runs several of them in order and collects a keyed
//! [`WizardResult`].
//!
//! # Architecture
//!
//! The library is organized into layers:
//!
//! - **Layer 1: Terminal and input** - the [`Terminal`] capability, the
//!   raw-mode guard, and the key decoder turning bytes into [`Operation`]s
//! - **Layer 2: Components** - [`Selector`], [`StringInput`] and
//!   [`PathInput`], all driven by the shared loop in [`component::run`]
//! - **Layer 3: Wizards** - the [`InputWizard`] builder and YAML
//!   [`WizardManifest`]s made of several stages
//!
//! # Feature Flags
//!
//! - `console-terminal` (default): Enables [`TtyTerminal`], the real
//!   terminal backed by crossterm and console
//!
//! # Example Usage
//!
//! ```ignore
//! use prompt_core::{Selector, SelectorItem, TtyTerminal};
//!
//! let items = vec![
//!     SelectorItem::new("Java", "java"),
//!     SelectorItem::new("Kotlin", "kotlin"),
//! ];
//! let mut selector = Selector::single("Language", items);
//! let choice = selector.run_single(&mut TtyTerminal::new())?;
//! ```

pub mod component;
pub mod error;
pub mod item;
pub mod keymap;
pub mod render;
pub mod selector;
pub mod style;
pub mod terminal;
pub mod text;
pub mod version;
pub mod viewport;
pub mod wizard;

// Re-export main types for convenience
pub use component::{Component, RunOptions};
pub use error::{Error, Result};
pub use item::{Enableable, Itemable, Matchable, Named, SelectorItem};
pub use keymap::{BindingReader, KeyMap, Operation};
pub use selector::{SelectionPolicy, Selector, SelectorContext};
pub use style::StyledLine;
pub use terminal::{ScriptedTerminal, Terminal};
pub use text::{MessageLevel, PathInput, StringInput, TextContext};
pub use wizard::manifest::WizardManifest;
pub use wizard::{InputKind, InputWizard, SelectItem, WizardResult};

#[cfg(feature = "console-terminal")]
pub use terminal::TtyTerminal;
