//! Declarative wizard manifests
//!
//! A manifest is a YAML document describing one or more stages of inputs.
//! Each stage becomes its own [`InputWizard`]; stage results are merged in
//! order, later stages winning on collision. Items may be enabled only when
//! an input of an earlier stage has one of a set of values.

use super::{InputKind, InputWizard, SelectItem, WizardResult};
use crate::error::{Error, Result};
use crate::item::{by_name, by_name_desc, by_numeric_name};
use crate::terminal::Terminal;
use crate::viewport::{MAX_WINDOW, MIN_WINDOW};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Root of a wizard manifest file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WizardManifest {
    /// Title shown when the wizard starts
    pub name: String,

    /// Minimum tool version this manifest was written for
    #[serde(default)]
    pub version: Option<String>,

    pub stages: Vec<StageManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StageManifest {
    pub inputs: Vec<InputManifest>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputManifest {
    pub id: String,
    pub kind: InputKind,

    /// Display name, defaults to the id
    #[serde(default)]
    pub name: Option<String>,

    /// Fallback for an empty text input
    #[serde(default)]
    pub default: Option<String>,

    #[serde(default)]
    pub sort: Option<SortOrder>,

    #[serde(default)]
    pub max_items: Option<usize>,

    #[serde(default)]
    pub items: Vec<ItemManifest>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SortOrder {
    Name,
    NameDesc,
    Numeric,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ItemManifest {
    pub name: String,

    /// Recorded value, defaults to the name
    #[serde(default)]
    pub value: Option<String>,

    #[serde(default = "default_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub enabled_when: Option<Condition>,
}

fn default_enabled() -> bool {
    true
}

/// Enables an item only when an earlier input has one of `one_of`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Condition {
    pub input: String,
    pub one_of: Vec<String>,
}

impl Condition {
    pub fn holds(&self, previous: &WizardResult) -> bool {
        previous
            .values(&self.input)
            .is_some_and(|values| values.iter().any(|v| self.one_of.contains(v)))
    }
}

impl ItemManifest {
    pub fn value(&self) -> &str {
        self.value.as_deref().unwrap_or(&self.name)
    }

    pub fn is_enabled(&self, previous: &WizardResult) -> bool {
        self.enabled && self.enabled_when.as_ref().map_or(true, |c| c.holds(previous))
    }

    fn to_item(&self, previous: &WizardResult) -> SelectItem {
        SelectItem::new(self.name.as_str(), self.value()).enabled(self.is_enabled(previous))
    }
}

fn invalid(message: String) -> Error {
    Error::Manifest(message)
}

impl WizardManifest {
    /// Parse and validate a manifest
    pub fn from_yaml(content: &str) -> Result<Self> {
        let manifest: WizardManifest = serde_yaml::from_str(content)?;
        manifest.validate()?;
        Ok(manifest)
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_yaml(&content)
    }

    pub fn validate(&self) -> Result<()> {
        if self.stages.is_empty() {
            return Err(invalid("at least one stage is required".to_string()));
        }

        let mut earlier: HashSet<&str> = HashSet::new();
        for (index, stage) in self.stages.iter().enumerate() {
            let mut current: HashSet<&str> = HashSet::new();
            for input in &stage.inputs {
                if earlier.contains(input.id.as_str()) || !current.insert(input.id.as_str()) {
                    return Err(Error::DuplicateInput(input.id.clone()));
                }
                match input.kind {
                    InputKind::Single | InputKind::Multi if input.items.is_empty() => {
                        return Err(invalid(format!("input '{}' needs at least one item", input.id)));
                    }
                    InputKind::Text | InputKind::Path if !input.items.is_empty() => {
                        return Err(invalid(format!(
                            "input '{}' is a {:?} input and cannot have items",
                            input.id, input.kind
                        )));
                    }
                    _ => {}
                }
                if let Some(max_items) = input.max_items {
                    if !(MIN_WINDOW..=MAX_WINDOW).contains(&max_items) {
                        return Err(Error::InvalidWindowSize(max_items));
                    }
                }
                for item in &input.items {
                    if let Some(condition) = &item.enabled_when {
                        if !earlier.contains(condition.input.as_str()) {
                            return Err(invalid(format!(
                                "item '{}' of input '{}' depends on '{}', which is not declared before stage {}",
                                item.name,
                                input.id,
                                condition.input,
                                index + 1
                            )));
                        }
                    }
                }
            }
            earlier.extend(current);
        }
        Ok(())
    }

    pub fn find_input(&self, id: &str) -> Option<&InputManifest> {
        self.stages
            .iter()
            .flat_map(|stage| &stage.inputs)
            .find(|input| input.id == id)
    }

    /// Ids of the inputs that `presets` does not answer, i.e. the ones that
    /// will need an interactive prompt
    pub fn prompted_inputs(&self, presets: &BTreeMap<String, String>) -> Vec<&str> {
        self.stages
            .iter()
            .flat_map(|stage| &stage.inputs)
            .filter(|input| {
                presets.get(&input.id).map_or(true, |preset| match input.kind {
                    InputKind::Multi => split_values(preset).is_empty(),
                    _ => preset.is_empty(),
                })
            })
            .map(|input| input.id.as_str())
            .collect()
    }

    /// Build the wizard for one stage. `previous` holds the merged results of
    /// the stages before it; `presets` maps input ids to pre-supplied values.
    pub fn wizard_for_stage(
        &self,
        index: usize,
        previous: &WizardResult,
        presets: &BTreeMap<String, String>,
    ) -> Result<InputWizard> {
        let stage = self
            .stages
            .get(index)
            .ok_or_else(|| invalid(format!("stage {} does not exist", index + 1)))?;

        let mut builder = InputWizard::builder();
        for input in &stage.inputs {
            let mut spec = builder
                .with_input(input.id.as_str(), input.kind)
                .name(input.name.clone().unwrap_or_else(|| input.id.clone()))
                .select_items(input.items.iter().map(|item| item.to_item(previous)));
            if let Some(default) = &input.default {
                spec = spec.default_value(default.as_str());
            }
            if let Some(max_items) = input.max_items {
                spec = spec.max_items(max_items);
            }
            spec = match input.sort {
                Some(SortOrder::Name) => spec.sort(by_name),
                Some(SortOrder::NameDesc) => spec.sort(by_name_desc),
                Some(SortOrder::Numeric) => spec.sort(by_numeric_name),
                None => spec,
            };
            if let Some(preset) = presets.get(&input.id) {
                spec = match input.kind {
                    InputKind::Multi => spec.current_values(split_values(preset)),
                    _ => spec.current_value(preset.as_str()),
                };
            }
            builder = spec.and();
        }
        builder.build()
    }

    /// Run every stage in order and merge their results
    pub fn run<T: Terminal + ?Sized>(
        &self,
        terminal: &mut T,
        presets: &BTreeMap<String, String>,
    ) -> Result<WizardResult> {
        let mut result = WizardResult::default();
        for index in 0..self.stages.len() {
            debug!(manifest = %self.name, stage = index + 1, "running stage");
            let wizard = self.wizard_for_stage(index, &result, presets)?;
            let stage_result = wizard.run(terminal)?;
            result.merge_from(stage_result);
        }
        Ok(result)
    }
}

/// Comma-separated multi values, trimmed, empty entries dropped
pub fn split_values(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::keys;
    use crate::terminal::ScriptedTerminal;

    const SPRING: &str = r#"
name: Spring project
version: 0.1.0
stages:
  - inputs:
      - id: language
        kind: single
        name: Language
        sort: name
        max_items: 5
        items:
          - { name: Kotlin, value: kotlin }
          - { name: Java, value: java }
      - id: artifact
        kind: text
        default: demo
  - inputs:
      - id: dependencies
        kind: multi
        name: Dependencies
        items:
          - name: Web
            value: web
            enabled_when: { input: language, one_of: [java] }
          - name: Coroutines
            enabled_when: { input: language, one_of: [kotlin] }
"#;

    fn presets(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_parse_manifest() {
        let manifest = WizardManifest::from_yaml(SPRING).unwrap();
        assert_eq!(manifest.name, "Spring project");
        assert_eq!(manifest.version.as_deref(), Some("0.1.0"));
        assert_eq!(manifest.stages.len(), 2);

        let language = manifest.find_input("language").unwrap();
        assert_eq!(language.kind, InputKind::Single);
        assert_eq!(language.sort, Some(SortOrder::Name));
        let coroutines = &manifest.find_input("dependencies").unwrap().items[1];
        assert_eq!(coroutines.value(), "Coroutines");
        assert!(coroutines.enabled);
    }

    #[test]
    fn test_later_stage_items_follow_earlier_answers() {
        let manifest = WizardManifest::from_yaml(SPRING).unwrap();
        let mut previous = WizardResult::default();
        previous.insert_single("language", "java");

        let web = &manifest.find_input("dependencies").unwrap().items[0];
        let coroutines = &manifest.find_input("dependencies").unwrap().items[1];
        assert!(web.is_enabled(&previous));
        assert!(!coroutines.is_enabled(&previous));
        assert!(!web.is_enabled(&WizardResult::default()));
    }

    #[test]
    fn test_run_all_stages() {
        let manifest = WizardManifest::from_yaml(SPRING).unwrap();
        let mut input = Vec::new();
        // Java is first once sorted by name
        input.extend_from_slice(keys::ENTER);
        input.extend_from_slice(b"app\r");
        // Coroutines is disabled for Java, Web is selectable
        input.extend_from_slice(keys::SPACE);
        input.extend_from_slice(keys::DOWN);
        input.extend_from_slice(keys::SPACE);
        input.extend_from_slice(keys::ENTER);

        let mut terminal = ScriptedTerminal::new(input);
        let result = manifest.run(&mut terminal, &BTreeMap::new()).unwrap();

        assert_eq!(result.single("language"), Some("java"));
        assert_eq!(result.text("artifact"), Some("app"));
        assert_eq!(result.multi("dependencies").unwrap(), ["web"]);
        assert_eq!(terminal.raw_mode_entries(), 3);
    }

    #[test]
    fn test_presets_bypass_prompts() {
        let manifest = WizardManifest::from_yaml(SPRING).unwrap();
        let presets = presets(&[
            ("language", "kotlin"),
            ("artifact", "demo-app"),
            ("dependencies", "Coroutines, web,"),
        ]);
        let mut terminal = ScriptedTerminal::new("");
        let result = manifest.run(&mut terminal, &presets).unwrap();

        assert_eq!(result.single("language"), Some("kotlin"));
        assert_eq!(result.text("artifact"), Some("demo-app"));
        assert_eq!(result.multi("dependencies").unwrap(), ["Coroutines", "web"]);
        assert_eq!(terminal.raw_mode_entries(), 0);
        assert_eq!(
            terminal.printed(),
            [
                "? Language Kotlin",
                "? artifact demo-app",
                "? Dependencies Coroutines, Web"
            ]
        );
    }

    #[test]
    fn test_prompted_inputs_skip_answered_ones() {
        let manifest = WizardManifest::from_yaml(SPRING).unwrap();
        assert_eq!(
            manifest.prompted_inputs(&BTreeMap::new()),
            vec!["language", "artifact", "dependencies"]
        );
        let partial = presets(&[("language", "java"), ("artifact", ""), ("dependencies", " ,")]);
        assert_eq!(manifest.prompted_inputs(&partial), vec!["artifact", "dependencies"]);
        let full = presets(&[("language", "java"), ("artifact", "app"), ("dependencies", "web")]);
        assert!(manifest.prompted_inputs(&full).is_empty());
    }

    #[test]
    fn test_rejects_empty_stages() {
        let err = WizardManifest::from_yaml("name: x\nstages: []\n").unwrap_err();
        assert!(matches!(err, Error::Manifest(_)));
    }

    #[test]
    fn test_rejects_duplicate_ids_across_stages() {
        let yaml = r#"
name: x
stages:
  - inputs: [{ id: a, kind: text }]
  - inputs: [{ id: a, kind: text }]
"#;
        assert!(matches!(
            WizardManifest::from_yaml(yaml),
            Err(Error::DuplicateInput(id)) if id == "a"
        ));
    }

    #[test]
    fn test_rejects_item_shape_mismatches() {
        let no_items = "name: x\nstages:\n  - inputs: [{ id: a, kind: multi }]\n";
        assert!(matches!(
            WizardManifest::from_yaml(no_items),
            Err(Error::Manifest(_))
        ));

        let text_items =
            "name: x\nstages:\n  - inputs: [{ id: a, kind: text, items: [{ name: b }] }]\n";
        assert!(matches!(
            WizardManifest::from_yaml(text_items),
            Err(Error::Manifest(_))
        ));
    }

    #[test]
    fn test_rejects_condition_on_same_stage() {
        let yaml = r#"
name: x
stages:
  - inputs:
      - { id: a, kind: single, items: [{ name: one }] }
      - id: b
        kind: multi
        items:
          - { name: two, enabled_when: { input: a, one_of: [one] } }
"#;
        assert!(matches!(
            WizardManifest::from_yaml(yaml),
            Err(Error::Manifest(_))
        ));
    }

    #[test]
    fn test_rejects_window_size_out_of_range() {
        let yaml = "name: x\nstages:\n  - inputs: [{ id: a, kind: single, max_items: 0, items: [{ name: b }] }]\n";
        assert!(matches!(
            WizardManifest::from_yaml(yaml),
            Err(Error::InvalidWindowSize(0))
        ));
    }

    #[test]
    fn test_unknown_kind_is_a_yaml_error() {
        let yaml = "name: x\nstages:\n  - inputs: [{ id: a, kind: radio }]\n";
        assert!(matches!(
            WizardManifest::from_yaml(yaml),
            Err(Error::Yaml(_))
        ));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("wizard.yaml");
        std::fs::write(&path, SPRING).unwrap();
        assert_eq!(WizardManifest::load(&path).unwrap().stages.len(), 2);
        assert!(matches!(
            WizardManifest::load(&dir.path().join("missing.yaml")),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_split_values() {
        assert_eq!(split_values(" web, jpa ,,"), vec!["web", "jpa"]);
        assert!(split_values("").is_empty());
    }
}
