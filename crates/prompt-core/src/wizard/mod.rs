//! Wizard orchestrator
//!
//! An [`InputWizard`] holds an ordered list of declared inputs. Running it
//! visits them in declaration order: inputs that already carry a value are
//! recorded without touching the terminal, the rest run their component.
//! Either way a one-line summary is printed. Results land in a
//! [`WizardResult`] keyed by input id.
//!
//! ```ignore
//! let wizard = InputWizard::builder()
//!     .with_single_input("language")
//!     .name("Language")
//!     .select_items([SelectItem::new("Java", "java"), SelectItem::new("Kotlin", "kotlin")])
//!     .and()
//!     .with_text_input("artifact")
//!     .name("Artifact")
//!     .default_value("demo")
//!     .and()
//!     .build()?;
//! let result = wizard.run(&mut TtyTerminal::new())?;
//! ```

pub mod manifest;

use crate::component::Component;
use crate::error::{Error, Result};
use crate::item::{Comparator, Enableable, Itemable, Matchable, Named, name_matches};
use crate::selector::{SelectionPolicy, Selector, SelectorContext, SelectorRenderer};
use crate::style::StyledLine;
use crate::terminal::Terminal;
use crate::text::{PathInput, StringInput, TextContext, TextRenderer};
use crate::{render, viewport};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::rc::Rc;
use tracing::debug;

/// A choice offered by a single or multi input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectItem {
    name: String,
    value: String,
    enabled: bool,
}

impl SelectItem {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
            enabled: true,
        }
    }

    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl Named for SelectItem {
    fn name(&self) -> &str {
        &self.name
    }
}

impl Matchable for SelectItem {
    fn matches(&self, filter: &str) -> bool {
        name_matches(&self.name, filter)
    }
}

impl Enableable for SelectItem {
    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl Itemable<String> for SelectItem {
    fn item(&self) -> &String {
        &self.value
    }
}

/// Kind of a declared input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    Text,
    Path,
    Single,
    Multi,
}

/// One declared wizard input
pub struct InputSpec {
    id: String,
    kind: InputKind,
    name: Option<String>,
    current_values: Vec<String>,
    default_value: Option<String>,
    items: Vec<SelectItem>,
    comparator: Option<Comparator<SelectItem>>,
    selector_renderer: Option<SelectorRenderer<SelectItem>>,
    text_renderer: Option<TextRenderer>,
    max_items: Option<usize>,
    base_dir: Option<PathBuf>,
}

impl InputSpec {
    fn new(id: String, kind: InputKind) -> Self {
        Self {
            id,
            kind,
            name: None,
            current_values: Vec::new(),
            default_value: None,
            items: Vec::new(),
            comparator: None,
            selector_renderer: None,
            text_renderer: None,
            max_items: None,
            base_dir: None,
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn kind(&self) -> InputKind {
        self.kind
    }

    /// Display name, falling back to the id
    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(&self.id)
    }

    /// Value supplied before the run, if any
    fn preset(&self) -> Option<&[String]> {
        match self.kind {
            InputKind::Multi if !self.current_values.is_empty() => Some(self.current_values.as_slice()),
            InputKind::Multi => None,
            _ => self
                .current_values
                .first()
                .filter(|v| !v.is_empty())
                .map(|_| &self.current_values[..1]),
        }
    }

    /// Display names for `values`, keeping unknown values as they are
    fn display_names(&self, values: &[String]) -> Vec<String> {
        values
            .iter()
            .map(|value| {
                self.items
                    .iter()
                    .find(|item| item.value() == value)
                    .map_or_else(|| value.clone(), |item| item.name().to_string())
            })
            .collect()
    }

    fn text_renderer(&self) -> TextRenderer {
        match (&self.text_renderer, self.kind) {
            (Some(renderer), _) => Rc::clone(renderer),
            (None, InputKind::Path) => Rc::new(render::path_field),
            (None, _) => Rc::new(render::text_field),
        }
    }

    fn selector_renderer(&self) -> SelectorRenderer<SelectItem> {
        match (&self.selector_renderer, self.kind) {
            (Some(renderer), _) => Rc::clone(renderer),
            (None, InputKind::Multi) => Rc::new(render::multi_selector::<SelectItem>),
            (None, _) => Rc::new(render::single_selector::<SelectItem>),
        }
    }

    fn selector(&self) -> Result<Selector<SelectItem>> {
        let policy = match self.kind {
            InputKind::Multi => SelectionPolicy::multi(),
            _ => SelectionPolicy::single(),
        };
        let mut selector = Selector::new(self.name(), self.items.clone(), policy)
            .with_renderer(self.selector_renderer());
        if let Some(comparator) = &self.comparator {
            let comparator = Rc::clone(comparator);
            selector = selector.with_comparator(move |a, b| comparator(a, b));
        }
        if let Some(max_items) = self.max_items {
            selector = selector.with_max_items(max_items)?;
        }
        selector.options().set_print_results(false);
        Ok(selector)
    }

    fn summary(&self, values: &[String]) -> Vec<StyledLine> {
        match self.kind {
            InputKind::Text | InputKind::Path => {
                let context = TextContext::result(self.name(), values.first().cloned());
                (self.text_renderer())(&context)
            }
            InputKind::Single | InputKind::Multi => {
                let context = SelectorContext::result(self.name(), self.display_names(values));
                (self.selector_renderer())(&context)
            }
        }
    }

    /// Run the component for this input and return the chosen values
    fn prompt<T: Terminal + ?Sized>(&self, terminal: &mut T) -> Result<Vec<String>> {
        let values: Vec<String> = match self.kind {
            InputKind::Text => {
                let mut input = StringInput::new(self.name()).with_renderer(self.text_renderer());
                if let Some(default) = &self.default_value {
                    input = input.with_default(default.clone());
                }
                input.options().set_print_results(false);
                input.run(terminal)?.into_iter().collect()
            }
            InputKind::Path => {
                let mut input = PathInput::new(self.name()).with_renderer(self.text_renderer());
                if let Some(base_dir) = &self.base_dir {
                    input = input.with_base_dir(base_dir.clone());
                }
                input.options().set_print_results(false);
                input
                    .run(terminal)?
                    .map(|path| path.display().to_string())
                    .into_iter()
                    .collect()
            }
            InputKind::Single => self
                .selector()?
                .run_single(terminal)?
                .map(|item| item.value)
                .into_iter()
                .collect(),
            InputKind::Multi => self
                .selector()?
                .run(terminal)?
                .into_iter()
                .map(|item| item.value)
                .collect(),
        };
        Ok(values)
    }
}

/// Setter chain for one input, returned by the `with_*_input` methods
pub struct InputSpecBuilder {
    wizard: InputWizardBuilder,
    spec: InputSpec,
}

impl InputSpecBuilder {
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.spec.name = Some(name.into());
        self
    }

    /// Pre-supplied value. A non-empty value skips the prompt.
    pub fn current_value(self, value: impl Into<String>) -> Self {
        self.current_values(vec![value.into()])
    }

    pub fn maybe_current_value(self, value: Option<String>) -> Self {
        match value {
            Some(value) => self.current_value(value),
            None => self,
        }
    }

    /// Pre-supplied values for a multi input
    pub fn current_values(mut self, values: Vec<String>) -> Self {
        self.spec.current_values = values;
        self
    }

    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.spec.default_value = Some(value.into());
        self
    }

    pub fn select_item(mut self, item: SelectItem) -> Self {
        self.spec.items.push(item);
        self
    }

    pub fn select_items(mut self, items: impl IntoIterator<Item = SelectItem>) -> Self {
        self.spec.items.extend(items);
        self
    }

    /// Order items once before the prompt starts
    pub fn sort(mut self, comparator: impl Fn(&SelectItem, &SelectItem) -> Ordering + 'static) -> Self {
        self.spec.comparator = Some(Rc::new(comparator));
        self
    }

    pub fn max_items(mut self, max_items: usize) -> Self {
        self.spec.max_items = Some(max_items);
        self
    }

    /// Directory a path input resolves relative input against
    pub fn base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.spec.base_dir = Some(base_dir.into());
        self
    }

    pub fn selector_renderer(mut self, renderer: SelectorRenderer<SelectItem>) -> Self {
        self.spec.selector_renderer = Some(renderer);
        self
    }

    pub fn text_renderer(mut self, renderer: TextRenderer) -> Self {
        self.spec.text_renderer = Some(renderer);
        self
    }

    /// Finish this input and go back to the wizard builder
    pub fn and(mut self) -> InputWizardBuilder {
        self.wizard.inputs.push(self.spec);
        self.wizard
    }

    pub fn build(self) -> Result<InputWizard> {
        self.and().build()
    }
}

#[derive(Default)]
pub struct InputWizardBuilder {
    inputs: Vec<InputSpec>,
}

impl InputWizardBuilder {
    pub fn with_input(self, id: impl Into<String>, kind: InputKind) -> InputSpecBuilder {
        InputSpecBuilder {
            wizard: self,
            spec: InputSpec::new(id.into(), kind),
        }
    }

    pub fn with_text_input(self, id: impl Into<String>) -> InputSpecBuilder {
        self.with_input(id, InputKind::Text)
    }

    pub fn with_path_input(self, id: impl Into<String>) -> InputSpecBuilder {
        self.with_input(id, InputKind::Path)
    }

    pub fn with_single_input(self, id: impl Into<String>) -> InputSpecBuilder {
        self.with_input(id, InputKind::Single)
    }

    pub fn with_multi_input(self, id: impl Into<String>) -> InputSpecBuilder {
        self.with_input(id, InputKind::Multi)
    }

    pub fn build(self) -> Result<InputWizard> {
        let mut seen = HashSet::new();
        for spec in &self.inputs {
            if !seen.insert(spec.id.as_str()) {
                return Err(Error::DuplicateInput(spec.id.clone()));
            }
            if let Some(max_items) = spec.max_items {
                if !(viewport::MIN_WINDOW..=viewport::MAX_WINDOW).contains(&max_items) {
                    return Err(Error::InvalidWindowSize(max_items));
                }
            }
        }
        Ok(InputWizard {
            inputs: self.inputs,
        })
    }
}

/// Ordered set of inputs run one after another
pub struct InputWizard {
    inputs: Vec<InputSpec>,
}

impl InputWizard {
    pub fn builder() -> InputWizardBuilder {
        InputWizardBuilder::default()
    }

    pub fn inputs(&self) -> &[InputSpec] {
        &self.inputs
    }

    /// Resolve every input in declaration order
    pub fn run<T: Terminal + ?Sized>(&self, terminal: &mut T) -> Result<WizardResult> {
        let mut result = WizardResult::default();
        for spec in &self.inputs {
            let values = match spec.preset() {
                Some(values) => {
                    debug!(input = %spec.id, "using pre-supplied value");
                    values.to_vec()
                }
                None => spec.prompt(terminal)?,
            };
            for line in spec.summary(&values) {
                if !line.is_empty() {
                    terminal.print_line(&line.to_ansi())?;
                }
            }
            result.record(spec.kind, &spec.id, values);
        }
        Ok(result)
    }
}

/// Answers keyed by input id
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WizardResult {
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    text_inputs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    single_inputs: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    multi_inputs: BTreeMap<String, Vec<String>>,
}

impl WizardResult {
    pub fn text(&self, id: &str) -> Option<&str> {
        self.text_inputs.get(id).map(String::as_str)
    }

    pub fn single(&self, id: &str) -> Option<&str> {
        self.single_inputs.get(id).map(String::as_str)
    }

    pub fn multi(&self, id: &str) -> Option<&[String]> {
        self.multi_inputs.get(id).map(Vec::as_slice)
    }

    /// Values recorded for `id`, whatever its kind
    pub fn values(&self, id: &str) -> Option<Vec<String>> {
        self.text(id)
            .or_else(|| self.single(id))
            .map(|v| vec![v.to_string()])
            .or_else(|| self.multi(id).map(<[String]>::to_vec))
    }

    pub fn text_inputs(&self) -> &BTreeMap<String, String> {
        &self.text_inputs
    }

    pub fn single_inputs(&self) -> &BTreeMap<String, String> {
        &self.single_inputs
    }

    pub fn multi_inputs(&self) -> &BTreeMap<String, Vec<String>> {
        &self.multi_inputs
    }

    pub fn is_empty(&self) -> bool {
        self.text_inputs.is_empty() && self.single_inputs.is_empty() && self.multi_inputs.is_empty()
    }

    pub fn insert_text(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.text_inputs.insert(id.into(), value.into());
    }

    pub fn insert_single(&mut self, id: impl Into<String>, value: impl Into<String>) {
        self.single_inputs.insert(id.into(), value.into());
    }

    pub fn insert_multi(&mut self, id: impl Into<String>, values: Vec<String>) {
        self.multi_inputs.insert(id.into(), values);
    }

    fn record(&mut self, kind: InputKind, id: &str, values: Vec<String>) {
        match kind {
            InputKind::Multi => self.insert_multi(id, values),
            InputKind::Text | InputKind::Path => {
                if let Some(value) = values.into_iter().next() {
                    self.insert_text(id, value);
                }
            }
            InputKind::Single => {
                if let Some(value) = values.into_iter().next() {
                    self.insert_single(id, value);
                }
            }
        }
    }

    /// Combine with `other`; its values win on key collision
    pub fn merge(mut self, other: WizardResult) -> WizardResult {
        self.merge_from(other);
        self
    }

    pub fn merge_from(&mut self, other: WizardResult) {
        self.text_inputs.extend(other.text_inputs);
        self.single_inputs.extend(other.single_inputs);
        self.multi_inputs.extend(other.multi_inputs);
    }
}
