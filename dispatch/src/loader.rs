//! Command registration collaborator.
//!
//! A [`CommandLoader`] resolves a command name to a factory; the tree
//! builder instantiates the action and immediately runs its `register`
//! phase, so a freshly loaded command declares its own options and
//! children before it becomes resolvable.

use std::collections::HashMap;

use crate::action::CommandAction;

/// Factory producing a fresh action instance.
pub type CommandFactory = Box<dyn Fn() -> Box<dyn CommandAction>>;

/// Resolves command names to factories during tree construction.
///
/// A failed resolve surfaces as
/// [`CommandClassNotFound`](crate::DispatchError::CommandClassNotFound).
pub trait CommandLoader {
    fn resolve(&self, name: &str) -> Option<&CommandFactory>;
}

/// In-memory name → factory table, the default loader.
///
/// # Examples
///
/// ```
/// use command_kit_dispatch::{CommandAction, CommandLoader, CommandRegistry};
///
/// struct Noop;
/// impl CommandAction for Noop {
///     fn name(&self) -> &str {
///         "noop"
///     }
/// }
///
/// let mut registry = CommandRegistry::new();
/// registry.register("noop", || Box::new(Noop));
/// assert!(registry.resolve("noop").is_some());
/// assert!(registry.resolve("other").is_none());
/// ```
#[derive(Default)]
pub struct CommandRegistry {
    factories: HashMap<String, CommandFactory>,
}

impl CommandRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register<F>(&mut self, name: &str, factory: F)
    where
        F: Fn() -> Box<dyn CommandAction> + 'static,
    {
        self.factories.insert(name.to_string(), Box::new(factory));
    }
}

impl CommandLoader for CommandRegistry {
    fn resolve(&self, name: &str) -> Option<&CommandFactory> {
        self.factories.get(name)
    }
}
