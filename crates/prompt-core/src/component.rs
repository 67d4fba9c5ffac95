//! The render-read-update loop shared by every component
//!
//! [`run`] acquires raw mode, then repeats: fit the component and the
//! display to the terminal size, render, draw the diff, block on the next
//! decoded operation and apply it.
//! The loop ends when [`Component::apply`] reports the component is done.
//! Every operation is rendered before the next read.

use crate::error::Result;
use crate::keymap::{BindingReader, KeyMap, Operation};
use crate::style::StyledLine;
use crate::terminal::{RawModeGuard, Terminal, TerminalSize};
use tracing::debug;

/// Observer called with the component before or after its loop
pub type Handler<C> = Box<dyn FnMut(&C)>;

/// Per-component run settings
pub struct RunOptions<C> {
    pre_run: Vec<Handler<C>>,
    post_run: Vec<Handler<C>>,
    print_results: bool,
}

impl<C> Default for RunOptions<C> {
    fn default() -> Self {
        Self {
            pre_run: Vec::new(),
            post_run: Vec::new(),
            print_results: true,
        }
    }
}

impl<C> RunOptions<C> {
    pub fn add_pre_run_handler(&mut self, handler: impl FnMut(&C) + 'static) {
        self.pre_run.push(Box::new(handler));
    }

    pub fn add_post_run_handler(&mut self, handler: impl FnMut(&C) + 'static) {
        self.post_run.push(Box::new(handler));
    }

    /// Whether the result summary is printed once the loop ends. Defaults to
    /// `true`.
    pub fn set_print_results(&mut self, print_results: bool) {
        self.print_results = print_results;
    }

    pub fn print_results(&self) -> bool {
        self.print_results
    }
}

/// An interactive widget driven by [`run`]
pub trait Component: Sized {
    type Output;

    /// Display name, used in logs
    fn name(&self) -> &str;

    fn keymap(&self) -> KeyMap;

    /// Reset per-run state before the loop starts
    fn prepare(&mut self) {}

    /// Fit the component to the terminal before each render
    fn resize(&mut self, _size: TerminalSize) {}

    /// Current state as display lines
    fn render(&self) -> Vec<StyledLine>;

    /// Apply one operation. Returns `true` when the component is finished.
    fn apply(&mut self, operation: Operation) -> bool;

    /// Summary shown after the loop has finished
    fn render_result(&self) -> Vec<StyledLine>;

    fn output(&self) -> Self::Output;

    fn options(&mut self) -> &mut RunOptions<Self>;
}

/// Run `component` to completion on `terminal`
pub fn run<T, C>(terminal: &mut T, component: &mut C) -> Result<C::Output>
where
    T: Terminal + ?Sized,
    C: Component,
{
    component.prepare();

    let mut options = std::mem::take(component.options());
    for handler in options.pre_run.iter_mut() {
        handler(&*component);
    }

    let outcome = run_loop(terminal, component);
    if outcome.is_ok() {
        for handler in options.post_run.iter_mut() {
            handler(&*component);
        }
    }
    let print_results = options.print_results();
    *component.options() = options;
    outcome?;

    if print_results {
        for line in component.render_result() {
            if !line.is_empty() {
                terminal.print_line(&line.to_ansi())?;
            }
        }
    }

    Ok(component.output())
}

fn run_loop<T, C>(terminal: &mut T, component: &mut C) -> Result<()>
where
    T: Terminal + ?Sized,
    C: Component,
{
    let keymap = component.keymap();
    let mut reader = BindingReader::new();
    let mut guard = RawModeGuard::enter(terminal)?;
    debug!(component = component.name(), "prompt loop started");

    loop {
        component.resize(guard.size());
        guard.draw(&component.render())?;
        let operation = reader.read_with(&keymap, || guard.read_byte())?;
        if component.apply(operation) {
            break;
        }
    }

    guard.release()?;
    debug!(component = component.name(), "prompt loop finished");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::terminal::ScriptedTerminal;
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Counts Char operations until Exit
    #[derive(Default)]
    struct Counter {
        count: usize,
        sizes: Vec<TerminalSize>,
        options: RunOptions<Counter>,
    }

    impl Component for Counter {
        type Output = usize;

        fn name(&self) -> &str {
            "counter"
        }

        fn keymap(&self) -> KeyMap {
            KeyMap::text()
        }

        fn prepare(&mut self) {
            self.count = 0;
        }

        fn resize(&mut self, size: TerminalSize) {
            self.sizes.push(size);
        }

        fn render(&self) -> Vec<StyledLine> {
            vec![StyledLine::from(format!("count {}", self.count))]
        }

        fn apply(&mut self, operation: Operation) -> bool {
            match operation {
                Operation::Char(_) => {
                    self.count += 1;
                    false
                }
                Operation::Exit => true,
                _ => false,
            }
        }

        fn render_result(&self) -> Vec<StyledLine> {
            vec![StyledLine::from(format!("counted {}", self.count))]
        }

        fn output(&self) -> usize {
            self.count
        }

        fn options(&mut self) -> &mut RunOptions<Self> {
            &mut self.options
        }
    }

    #[test]
    fn test_renders_before_every_read() {
        let mut terminal = ScriptedTerminal::new("ab\r");
        let mut counter = Counter::default();
        let count = run(&mut terminal, &mut counter).unwrap();
        assert_eq!(count, 2);

        let frames: Vec<String> = terminal
            .frames()
            .iter()
            .filter(|f| !f.is_empty())
            .map(|f| f.join("\n"))
            .collect();
        assert_eq!(frames, vec!["count 0", "count 1", "count 2"]);
    }

    #[test]
    fn test_cleanup_after_normal_exit() {
        let mut terminal = ScriptedTerminal::new("\r");
        run(&mut terminal, &mut Counter::default()).unwrap();
        assert!(!terminal.is_raw());
        assert!(terminal.cursor_visible());
        assert!(terminal.screen().is_empty());
        assert_eq!(terminal.printed(), ["counted 0"]);
    }

    #[test]
    fn test_cleanup_when_input_closes() {
        let mut terminal = ScriptedTerminal::new("abc");
        let result = run(&mut terminal, &mut Counter::default());
        assert!(matches!(result, Err(Error::InputClosed)));
        assert!(!terminal.is_raw());
        assert!(terminal.cursor_visible());
        assert!(terminal.screen().is_empty());
        assert!(terminal.printed().is_empty());
    }

    #[test]
    fn test_handlers_and_print_toggle() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut counter = Counter::default();
        let pre = Rc::clone(&seen);
        counter
            .options()
            .add_pre_run_handler(move |c: &Counter| pre.borrow_mut().push(("pre", c.count)));
        let post = Rc::clone(&seen);
        counter
            .options()
            .add_post_run_handler(move |c: &Counter| post.borrow_mut().push(("post", c.count)));
        assert!(counter.options().print_results());
        counter.options().set_print_results(false);
        assert!(!counter.options().print_results());

        let mut terminal = ScriptedTerminal::new("xyz\r");
        run(&mut terminal, &mut counter).unwrap();

        assert_eq!(*seen.borrow(), vec![("pre", 0), ("post", 3)]);
        assert!(terminal.printed().is_empty());
        // handlers survive for the next run
        let mut terminal = ScriptedTerminal::new("\r");
        run(&mut terminal, &mut counter).unwrap();
        assert_eq!(seen.borrow().len(), 4);
    }

    #[test]
    fn test_resized_before_every_render() {
        let mut terminal = ScriptedTerminal::new("ab\r").with_size(6, 40);
        let mut counter = Counter::default();
        run(&mut terminal, &mut counter).unwrap();
        assert_eq!(counter.sizes, vec![TerminalSize::new(6, 40); 3]);
    }
}
