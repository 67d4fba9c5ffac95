//! Diffing display surface
//!
//! Keeps the lines drawn by the previous update and only rewrites from the
//! first line that changed.

use super::TerminalSize;
use crate::style::StyledLine;

/// Changes to apply to the component's display area
///
/// The terminal moves up `rewind` previously drawn lines, clears from there
/// to the end of the screen and writes `lines`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayDiff {
    pub rewind: usize,
    pub lines: Vec<String>,
}

#[derive(Debug, Default)]
pub struct Display {
    size: Option<TerminalSize>,
    previous: Vec<String>,
}

impl Display {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn resize(&mut self, size: TerminalSize) {
        self.size = Some(size);
    }

    /// Lines currently on screen, as last written
    pub fn lines(&self) -> &[String] {
        &self.previous
    }

    /// Compute the diff needed to show `lines`, or `None` if nothing changed
    pub fn update(&mut self, lines: &[StyledLine]) -> Option<DisplayDiff> {
        let next = self.fit(lines);
        let common = self
            .previous
            .iter()
            .zip(&next)
            .take_while(|(old, new)| old == new)
            .count();

        if common == self.previous.len() && common == next.len() {
            return None;
        }

        let diff = DisplayDiff {
            rewind: self.previous.len() - common,
            lines: next[common..].to_vec(),
        };
        self.previous = next;
        Some(diff)
    }

    /// Clip to the visible area: one row is kept free for the cursor and the
    /// last column is never written to avoid auto-wrap.
    fn fit(&self, lines: &[StyledLine]) -> Vec<String> {
        let (max_rows, width) = match self.size {
            Some(size) if size.rows > 0 && size.columns > 0 => (
                usize::from(size.rows.saturating_sub(1).max(1)),
                Some(usize::from(size.columns.saturating_sub(1).max(1))),
            ),
            _ => (usize::MAX, None),
        };

        lines
            .iter()
            .take(max_rows)
            .map(|line| {
                let ansi = line.to_ansi();
                match width {
                    Some(width) => console::truncate_str(&ansi, width, "").into_owned(),
                    None => ansi,
                }
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(texts: &[&str]) -> Vec<StyledLine> {
        texts.iter().map(|t| StyledLine::from(*t)).collect()
    }

    #[test]
    fn test_first_update_writes_everything() {
        let mut display = Display::new();
        let diff = display.update(&lines(&["a", "b"])).unwrap();
        assert_eq!(diff.rewind, 0);
        assert_eq!(diff.lines, vec!["a", "b"]);
    }

    #[test]
    fn test_unchanged_update_is_skipped() {
        let mut display = Display::new();
        display.update(&lines(&["a", "b"]));
        assert!(display.update(&lines(&["a", "b"])).is_none());
    }

    #[test]
    fn test_rewrites_from_first_change() {
        let mut display = Display::new();
        display.update(&lines(&["title", "> one", "  two"]));
        let diff = display.update(&lines(&["title", "  one", "> two"])).unwrap();
        assert_eq!(diff.rewind, 2);
        assert_eq!(diff.lines, vec!["  one", "> two"]);
    }

    #[test]
    fn test_shrinking_output_rewinds_removed_lines() {
        let mut display = Display::new();
        display.update(&lines(&["title", "one", "two"]));
        let diff = display.update(&lines(&["title"])).unwrap();
        assert_eq!(diff.rewind, 2);
        assert!(diff.lines.is_empty());
    }

    #[test]
    fn test_empty_update_clears_area() {
        let mut display = Display::new();
        display.update(&lines(&["a", "b", "c"]));
        let diff = display.update(&[]).unwrap();
        assert_eq!(diff.rewind, 3);
        assert!(display.lines().is_empty());
    }

    #[test]
    fn test_resize_clips_rows_and_columns() {
        let mut display = Display::new();
        display.resize(TerminalSize::new(3, 6));
        let diff = display
            .update(&lines(&["abcdefghij", "second", "third"]))
            .unwrap();
        assert_eq!(diff.lines, vec!["abcde", "secon"]);
    }
}
