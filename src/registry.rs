use std::collections::HashMap;
use std::rc::Rc;

use anyhow::Result;

use crate::console::Console;
use crate::events::EventBus;

/// Shared services handed to every action invocation.
///
/// Replaces ambient globals with an explicit argument: actions receive the
/// console and the event bus here rather than finding them injected into
/// their namespace.
#[derive(Clone)]
pub struct Context {
    pub console: Rc<dyn Console>,
    pub events: EventBus,
}

impl Context {
    pub fn new(console: Rc<dyn Console>, events: EventBus) -> Self {
        Self { console, events }
    }
}

/// One loadable unit of action code.
///
/// `run` returns the next navigation token, or `None`/empty to fall back to
/// the containing menu. `init_once` is called exactly once per discovered
/// action, during the tree build, before any navigation happens.
pub trait Runnable {
    fn run(&self, ctx: &Context) -> Result<Option<String>>;

    fn init_once(&self, _ctx: &Context) -> Result<()> {
        Ok(())
    }

    /// Shown as the menu entry's description text.
    fn description(&self) -> &str {
        ""
    }
}

/// Startup-time registration table mapping module ids to action
/// implementations.
///
/// The tree build resolves every discovered executable file against this
/// table by its module id (file name minus extension, ordering digits kept);
/// an unknown id aborts the build.
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<String, Rc<dyn Runnable>>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, key: impl Into<String>, action: impl Runnable + 'static) {
        self.actions.insert(key.into(), Rc::new(action));
    }

    pub fn get(&self, key: &str) -> Option<Rc<dyn Runnable>> {
        self.actions.get(key).cloned()
    }

    pub fn contains(&self, key: &str) -> bool {
        self.actions.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}
