//! List selector state machine
//!
//! One engine serves both single and multi selection. The difference is a
//! [`SelectionPolicy`]:
//!
//! - `exit_selects = true` (single select): Select is ignored, Exit toggles
//!   the row under the cursor and returns it.
//! - `exit_selects = false` (multi select): Select toggles the row under the
//!   cursor if it is enabled, Exit returns every selected item.
//!
//! Items live in an immutable arena, ordered once by the optional
//! comparator. Selection and enabled flags are a parallel overlay indexed
//! by arena position, so filtering never loses a selection.

use crate::component::{self, Component, RunOptions};
use crate::error::{Error, Result};
use crate::item::{Enableable, Matchable, Named};
use crate::keymap::{KeyMap, Operation};
use crate::render;
use crate::style::StyledLine;
use crate::terminal::{Terminal, TerminalSize};
use crate::viewport::{self, Viewport, MAX_WINDOW, MIN_WINDOW};
use std::cmp::Ordering;
use std::rc::Rc;

/// Default number of rows shown at once
pub const DEFAULT_MAX_ITEMS: usize = 5;

/// Rows taken by the title line and the display's reserved last row
const RESERVED_ROWS: usize = 2;

/// How a selector interprets Select and Exit
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SelectionPolicy {
    /// Exit toggles the row under the cursor (single select)
    pub exit_selects: bool,
    /// Visible rows, 1..=32
    pub max_items: usize,
    /// Whether the exit toggle also applies to a disabled row
    pub toggle_disabled_on_exit: bool,
}

impl SelectionPolicy {
    pub fn single() -> Self {
        Self {
            exit_selects: true,
            max_items: DEFAULT_MAX_ITEMS,
            toggle_disabled_on_exit: true,
        }
    }

    pub fn multi() -> Self {
        Self {
            exit_selects: false,
            max_items: DEFAULT_MAX_ITEMS,
            toggle_disabled_on_exit: false,
        }
    }

    pub fn with_max_items(mut self, max_items: usize) -> Result<Self> {
        if !(MIN_WINDOW..=MAX_WINDOW).contains(&max_items) {
            return Err(Error::InvalidWindowSize(max_items));
        }
        self.max_items = max_items;
        Ok(self)
    }

    pub fn with_toggle_disabled_on_exit(mut self, toggle: bool) -> Self {
        self.toggle_disabled_on_exit = toggle;
        self
    }
}

#[derive(Debug, Clone, Copy)]
struct ItemFlags {
    original_index: usize,
    selected: bool,
    enabled: bool,
}

/// Per-run view of one visible item, handed to renderers
#[derive(Debug)]
pub struct ItemState<'a, I> {
    pub item: &'a I,
    pub name: &'a str,
    /// Position in the list the selector was built from
    pub original_index: usize,
    /// Position in the filtered list
    pub filtered_index: usize,
    pub selected: bool,
    pub enabled: bool,
}

/// Everything a selector renderer can draw from
#[derive(Debug)]
pub struct SelectorContext<'a, I> {
    pub name: &'a str,
    pub filter: &'a str,
    /// Visible slice of the filtered list
    pub items: Vec<ItemState<'a, I>>,
    /// Absolute cursor row in the filtered list
    pub cursor_row: usize,
    /// Size of the filtered list
    pub total: usize,
    /// Final values, set once the selection is done
    pub values: Option<Vec<String>>,
}

impl<'a, I> SelectorContext<'a, I> {
    /// Context describing a finished selection
    pub fn result(name: &'a str, values: Vec<String>) -> Self {
        Self {
            name,
            filter: "",
            items: Vec::new(),
            cursor_row: 0,
            total: 0,
            values: Some(values),
        }
    }

    pub fn is_result(&self) -> bool {
        self.values.is_some()
    }

    pub fn is_cursor(&self, state: &ItemState<'_, I>) -> bool {
        state.filtered_index == self.cursor_row
    }
}

/// Renders a selector context to display lines
pub type SelectorRenderer<I> = Rc<dyn Fn(&SelectorContext<'_, I>) -> Vec<StyledLine>>;

/// Filterable, scrollable list selector
pub struct Selector<I> {
    name: String,
    items: Vec<I>,
    flags: Vec<ItemFlags>,
    filter: String,
    filtered: Vec<usize>,
    viewport: Viewport,
    policy: SelectionPolicy,
    renderer: SelectorRenderer<I>,
    result_mapper: Rc<dyn Fn(&I) -> String>,
    options: RunOptions<Selector<I>>,
}

impl<I> Selector<I>
where
    I: Named + Matchable + Enableable + Clone + 'static,
{
    pub fn new(name: impl Into<String>, items: Vec<I>, policy: SelectionPolicy) -> Self {
        let flags = items
            .iter()
            .enumerate()
            .map(|(original_index, item)| ItemFlags {
                original_index,
                selected: false,
                enabled: item.is_enabled(),
            })
            .collect();
        let renderer: SelectorRenderer<I> = if policy.exit_selects {
            Rc::new(render::single_selector::<I>)
        } else {
            Rc::new(render::multi_selector::<I>)
        };
        let mut selector = Self {
            name: name.into(),
            items,
            flags,
            filter: String::new(),
            filtered: Vec::new(),
            viewport: Viewport::new(policy.max_items),
            policy,
            renderer,
            result_mapper: Rc::new(|item: &I| item.name().to_string()),
            options: RunOptions::default(),
        };
        selector.refilter();
        selector
    }

    /// Single select: the row under the cursor on Exit is the answer
    pub fn single(name: impl Into<String>, items: Vec<I>) -> Self {
        Self::new(name, items, SelectionPolicy::single())
    }

    /// Multi select: Select toggles rows, Exit returns the toggled ones
    pub fn multi(name: impl Into<String>, items: Vec<I>) -> Self {
        Self::new(name, items, SelectionPolicy::multi())
    }

    /// Order the unfiltered list once. Stable for equal items.
    pub fn with_comparator<F>(mut self, comparator: F) -> Self
    where
        F: Fn(&I, &I) -> Ordering,
    {
        let mut entries: Vec<(I, ItemFlags)> = std::mem::take(&mut self.items)
            .into_iter()
            .zip(std::mem::take(&mut self.flags))
            .collect();
        entries.sort_by(|a, b| comparator(&a.0, &b.0));
        let (items, flags): (Vec<I>, Vec<ItemFlags>) = entries.into_iter().unzip();
        self.items = items;
        self.flags = flags;
        self.refilter();
        self
    }

    pub fn with_max_items(mut self, max_items: usize) -> Result<Self> {
        self.policy = self.policy.with_max_items(max_items)?;
        self.viewport = Viewport::new(self.policy.max_items);
        Ok(self)
    }

    pub fn with_renderer(mut self, renderer: SelectorRenderer<I>) -> Self {
        self.renderer = renderer;
        self
    }

    /// How selected items are shown in the result summary
    pub fn with_result_mapper(mut self, mapper: impl Fn(&I) -> String + 'static) -> Self {
        self.result_mapper = Rc::new(mapper);
        self
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn filter(&self) -> &str {
        &self.filter
    }

    pub fn cursor_row(&self) -> usize {
        self.viewport.row()
    }

    /// Items currently selected, in arena order
    pub fn selected(&self) -> Vec<&I> {
        self.items
            .iter()
            .zip(&self.flags)
            .filter(|(_, flags)| flags.selected)
            .map(|(item, _)| item)
            .collect()
    }

    /// Snapshot of the current state for renderers
    pub fn context(&self) -> SelectorContext<'_, I> {
        let total = self.filtered.len();
        let items = self
            .viewport
            .visible(total)
            .map(|filtered_index| {
                let position = self.filtered[filtered_index];
                let item = &self.items[position];
                let flags = self.flags[position];
                ItemState {
                    item,
                    name: item.name(),
                    original_index: flags.original_index,
                    filtered_index,
                    selected: flags.selected,
                    enabled: flags.enabled,
                }
            })
            .collect();
        SelectorContext {
            name: &self.name,
            filter: &self.filter,
            items,
            cursor_row: self.viewport.row(),
            total,
            values: None,
        }
    }

    pub fn render_context(&self, context: &SelectorContext<'_, I>) -> Vec<StyledLine> {
        (self.renderer)(context)
    }

    /// Run the selector and return every selected item
    pub fn run<T: Terminal + ?Sized>(&mut self, terminal: &mut T) -> Result<Vec<I>> {
        component::run(terminal, self)
    }

    /// Run the selector and return the single chosen item, if any
    pub fn run_single<T: Terminal + ?Sized>(&mut self, terminal: &mut T) -> Result<Option<I>> {
        Ok(self.run(terminal)?.into_iter().next())
    }

    fn refilter(&mut self) {
        self.filtered = viewport::filter_indices(&self.items, |item| item.matches(&self.filter));
    }

    fn toggle_at_cursor(&mut self, allow_disabled: bool) {
        if let Some(&position) = self.filtered.get(self.viewport.row()) {
            let flags = &mut self.flags[position];
            if flags.enabled || allow_disabled {
                flags.selected = !flags.selected;
            }
        }
    }

    fn filter_changed(&mut self) {
        self.refilter();
        self.viewport.reset();
    }
}

impl<I> Component for Selector<I>
where
    I: Named + Matchable + Enableable + Clone + 'static,
{
    type Output = Vec<I>;

    fn name(&self) -> &str {
        &self.name
    }

    fn keymap(&self) -> KeyMap {
        KeyMap::selector()
    }

    fn prepare(&mut self) {
        for flags in self.flags.iter_mut() {
            flags.selected = false;
        }
        self.filter.clear();
        self.filter_changed();
    }

    fn resize(&mut self, size: TerminalSize) {
        let rows = usize::from(size.rows).saturating_sub(RESERVED_ROWS);
        self.viewport
            .resize(self.policy.max_items.min(rows), self.filtered.len());
    }

    fn render(&self) -> Vec<StyledLine> {
        self.render_context(&self.context())
    }

    fn apply(&mut self, operation: Operation) -> bool {
        match operation {
            Operation::Select => {
                if !self.policy.exit_selects {
                    self.toggle_at_cursor(false);
                }
            }
            Operation::Down => self.viewport.move_down(self.filtered.len()),
            Operation::Up => self.viewport.move_up(self.filtered.len()),
            Operation::Char(text) => {
                self.filter.push_str(&text);
                self.filter_changed();
            }
            Operation::Backspace => {
                if self.filter.pop().is_some() {
                    self.filter_changed();
                }
            }
            Operation::Exit => {
                if self.policy.exit_selects {
                    self.toggle_at_cursor(self.policy.toggle_disabled_on_exit);
                }
                return true;
            }
        }
        false
    }

    fn render_result(&self) -> Vec<StyledLine> {
        let values = self
            .selected()
            .into_iter()
            .map(|item| (self.result_mapper)(item))
            .collect();
        self.render_context(&SelectorContext::result(&self.name, values))
    }

    fn output(&self) -> Vec<I> {
        self.selected().into_iter().cloned().collect()
    }

    fn options(&mut self) -> &mut RunOptions<Self> {
        &mut self.options
    }
}
