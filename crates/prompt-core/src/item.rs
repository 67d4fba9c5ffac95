//! Selectable items and the narrow capabilities selectors depend on

use std::cmp::Ordering;
use std::rc::Rc;

/// Has a display name
pub trait Named {
    fn name(&self) -> &str;
}

/// Can be matched against free-text filter input
pub trait Matchable {
    fn matches(&self, filter: &str) -> bool;
}

/// Can be disabled, in which case it is shown but never toggled by Select
pub trait Enableable {
    fn is_enabled(&self) -> bool {
        true
    }
}

/// Wraps a payload value
pub trait Itemable<T> {
    fn item(&self) -> &T;
}

/// Case-insensitive substring match; an empty filter matches everything
pub fn name_matches(name: &str, filter: &str) -> bool {
    filter.is_empty() || name.to_lowercase().contains(&filter.to_lowercase())
}

/// A payload with a display name and an enabled flag
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectorItem<T> {
    name: String,
    item: T,
    enabled: bool,
}

impl<T> SelectorItem<T> {
    pub fn new(name: impl Into<String>, item: T) -> Self {
        Self::with_enabled(name, item, true)
    }

    pub fn with_enabled(name: impl Into<String>, item: T, enabled: bool) -> Self {
        Self {
            name: name.into(),
            item,
            enabled,
        }
    }

    pub fn into_item(self) -> T {
        self.item
    }
}

impl<T> Named for SelectorItem<T> {
    fn name(&self) -> &str {
        &self.name
    }
}

impl<T> Matchable for SelectorItem<T> {
    fn matches(&self, filter: &str) -> bool {
        name_matches(&self.name, filter)
    }
}

impl<T> Enableable for SelectorItem<T> {
    fn is_enabled(&self) -> bool {
        self.enabled
    }
}

impl<T> Itemable<T> for SelectorItem<T> {
    fn item(&self) -> &T {
        &self.item
    }
}

/// Shared ordering function applied once to the unfiltered item list
pub type Comparator<I> = Rc<dyn Fn(&I, &I) -> Ordering>;

/// Orders items by name
pub fn by_name<I: Named>(a: &I, b: &I) -> Ordering {
    a.name().cmp(b.name())
}

/// Orders items by name, last first
pub fn by_name_desc<I: Named>(a: &I, b: &I) -> Ordering {
    b.name().cmp(a.name())
}

/// Orders items whose names are integers numerically, falling back to
/// name order when either name does not parse
pub fn by_numeric_name<I: Named>(a: &I, b: &I) -> Ordering {
    match (a.name().parse::<i64>(), b.name().parse::<i64>()) {
        (Ok(x), Ok(y)) => x.cmp(&y),
        _ => by_name(a, b),
    }
}
