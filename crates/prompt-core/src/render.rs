//! Default renderers for every component kind
//!
//! A renderer is a pure function from a component context to display lines.
//! These are what components use unless the caller injects its own.

use crate::item::Named;
use crate::selector::{ItemState, SelectorContext};
use crate::style::StyledLine;
use crate::text::{MessageLevel, TextContext};
use console::Style;

const PROMPT_MARKER: &str = "? ";
const CURSOR_MARKER: &str = "> ";
const NO_CURSOR: &str = "  ";
const NO_VALUE: &str = "<none>";
const NAVIGATION_HINT: &str = "[Use arrows to move, type to filter]";

fn prompt_style() -> Style {
    Style::new().green().bold()
}

fn name_style() -> Style {
    Style::new().bold()
}

fn hint_style() -> Style {
    Style::new().dim()
}

fn value_style() -> Style {
    Style::new().cyan()
}

fn header(name: &str) -> StyledLine {
    StyledLine::new()
        .styled(PROMPT_MARKER, prompt_style())
        .styled(name, name_style())
        .raw(" ")
}

/// `? Name value`, or `? Name <none>` when nothing was chosen
fn result_line(name: &str, values: &[String]) -> StyledLine {
    let line = header(name);
    if values.is_empty() {
        line.styled(NO_VALUE, hint_style())
    } else {
        line.styled(values.join(", "), value_style())
    }
}

fn selector_title<I>(context: &SelectorContext<'_, I>) -> StyledLine {
    let hint = if context.filter.is_empty() {
        NAVIGATION_HINT.to_string()
    } else {
        format!("filtering '{}'", context.filter)
    };
    header(context.name).styled(hint, hint_style())
}

fn row_style<I>(state: &ItemState<'_, I>, is_cursor: bool) -> Style {
    match (state.enabled, is_cursor) {
        (false, _) => Style::new().dim(),
        (true, true) => value_style(),
        (true, false) => Style::new(),
    }
}

fn cursor<I>(context: &SelectorContext<'_, I>, state: &ItemState<'_, I>) -> StyledLine {
    if context.is_cursor(state) {
        StyledLine::new().styled(CURSOR_MARKER, value_style())
    } else {
        StyledLine::new().raw(NO_CURSOR)
    }
}

/// Title line plus one row per visible item, cursor row marked with `>`
pub fn single_selector<I: Named>(context: &SelectorContext<'_, I>) -> Vec<StyledLine> {
    if let Some(values) = &context.values {
        return vec![result_line(context.name, values)];
    }
    let mut lines = vec![selector_title(context)];
    for state in &context.items {
        let style = row_style(state, context.is_cursor(state));
        lines.push(cursor(context, state).styled(state.name, style));
    }
    lines
}

/// Like [`single_selector`] with a `[x]` / `[ ]` checkbox per row
pub fn multi_selector<I: Named>(context: &SelectorContext<'_, I>) -> Vec<StyledLine> {
    if let Some(values) = &context.values {
        return vec![result_line(context.name, values)];
    }
    let mut lines = vec![selector_title(context)];
    for state in &context.items {
        let style = row_style(state, context.is_cursor(state));
        let checkbox = if state.selected { "[x] " } else { "[ ] " };
        lines.push(
            cursor(context, state)
                .styled(checkbox, style.clone())
                .styled(state.name, style),
        );
    }
    lines
}

/// `? Name [Default x]` until something is typed, then `? Name typed`
pub fn text_field(context: &TextContext<'_>) -> Vec<StyledLine> {
    if context.is_result() {
        let values: Vec<String> = context.value.iter().cloned().collect();
        return vec![result_line(context.name, &values)];
    }
    let line = header(context.name);
    let line = if !context.input.is_empty() {
        line.raw(context.input)
    } else if let Some(default) = context.default_value {
        line.styled(format!("[Default {}]", default), hint_style())
    } else {
        line
    };
    vec![line]
}

/// [`text_field`] plus the advisory message for the current path
pub fn path_field(context: &TextContext<'_>) -> Vec<StyledLine> {
    let mut lines = text_field(context);
    if context.is_result() {
        return lines;
    }
    if let Some(message) = context.message {
        let style = match message.level {
            MessageLevel::Info => Style::new().green(),
            MessageLevel::Warn => Style::new().yellow(),
            MessageLevel::Error => Style::new().red(),
        };
        lines.push(
            StyledLine::new()
                .styled(message.level.marker(), style.clone())
                .raw(" ")
                .styled(message.text.as_str(), style),
        );
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::item::{Enableable, SelectorItem};
    use crate::text::Message;

    fn plain(lines: &[StyledLine]) -> Vec<String> {
        lines.iter().map(StyledLine::plain).collect()
    }

    fn state<'a>(
        item: &'a SelectorItem<()>,
        filtered_index: usize,
        selected: bool,
    ) -> ItemState<'a, SelectorItem<()>> {
        ItemState {
            item,
            name: item.name(),
            original_index: filtered_index,
            filtered_index,
            selected,
            enabled: item.is_enabled(),
        }
    }

    #[test]
    fn test_multi_selector_rows() {
        let web = SelectorItem::new("Web", ());
        let jpa = SelectorItem::with_enabled("JPA", (), false);
        let context = SelectorContext {
            name: "Dependencies",
            filter: "",
            items: vec![state(&web, 0, true), state(&jpa, 1, false)],
            cursor_row: 1,
            total: 2,
            values: None,
        };
        assert_eq!(
            plain(&multi_selector(&context)),
            [
                "? Dependencies [Use arrows to move, type to filter]",
                "  [x] Web",
                "> [ ] JPA"
            ]
        );
    }

    #[test]
    fn test_selector_title_shows_filter() {
        let context: SelectorContext<'_, SelectorItem<()>> = SelectorContext {
            name: "Language",
            filter: "ja",
            items: Vec::new(),
            cursor_row: 0,
            total: 0,
            values: None,
        };
        assert_eq!(plain(&single_selector(&context)), ["? Language filtering 'ja'"]);
    }

    #[test]
    fn test_selector_result_line() {
        let context: SelectorContext<'_, SelectorItem<()>> =
            SelectorContext::result("Language", vec!["Java".to_string()]);
        assert_eq!(plain(&single_selector(&context)), ["? Language Java"]);
        let context: SelectorContext<'_, SelectorItem<()>> =
            SelectorContext::result("Language", Vec::new());
        assert_eq!(plain(&single_selector(&context)), ["? Language <none>"]);
    }

    #[test]
    fn test_text_field_default_hint() {
        let mut context = TextContext::new("Artifact", "", Some("demo"));
        assert_eq!(plain(&text_field(&context)), ["? Artifact [Default demo]"]);
        context.input = "app";
        assert_eq!(plain(&text_field(&context)), ["? Artifact app"]);
    }

    #[test]
    fn test_path_field_message_line() {
        let message = Message::new(MessageLevel::Warn, "File exists");
        let mut context = TextContext::new("Path", "out.zip", None);
        context.message = Some(&message);
        assert_eq!(
            plain(&path_field(&context)),
            ["? Path out.zip", ">> File exists"]
        );
        let result = TextContext::result("Path", Some("out.zip".to_string()));
        assert_eq!(plain(&path_field(&result)), ["? Path out.zip"]);
    }
}
