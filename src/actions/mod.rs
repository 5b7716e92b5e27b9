//! Named editor actions
//!
//! Toolbar buttons refer to actions by name; the registry resolves the name
//! at click time, so registering or removing an action affects buttons that
//! already exist.

pub mod defaults;

use crate::editor::Editor;
use crate::error::EditorError;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

/// Action body; receives the editor it was invoked on
pub type ActionHandler = Rc<dyn Fn(&mut Editor) -> Result<(), EditorError>>;

/// Mapping from unique action name to handler
#[derive(Default)]
pub struct ActionRegistry {
    actions: HashMap<String, ActionHandler>,
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register or replace an action, returning the handler it replaced
    pub fn register(
        &mut self,
        name: impl Into<String>,
        handler: impl Fn(&mut Editor) -> Result<(), EditorError> + 'static,
    ) -> Option<ActionHandler> {
        self.actions.insert(name.into(), Rc::new(handler))
    }

    /// Remove an action; returns false if none was registered under `name`
    pub fn deregister(&mut self, name: &str) -> bool {
        self.actions.remove(name).is_some()
    }

    /// Handler for `name`, cloned so it can run while the editor is borrowed
    pub fn get(&self, name: &str) -> Option<ActionHandler> {
        self.actions.get(name).cloned()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.actions.contains_key(name)
    }

    /// Registered names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.actions.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.actions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionRegistry")
            .field("actions", &self.names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_replace() {
        let mut registry = ActionRegistry::new();
        assert!(registry.register("bold", |_| Ok(())).is_none());
        assert!(registry.register("bold", |_| Ok(())).is_some());
        assert_eq!(registry.len(), 1);
        assert!(registry.contains("bold"));
    }

    #[test]
    fn test_deregister() {
        let mut registry = ActionRegistry::new();
        registry.register("quote", |_| Ok(()));
        assert!(registry.deregister("quote"));
        assert!(!registry.deregister("quote"));
        assert!(registry.get("quote").is_none());
    }

    #[test]
    fn test_names_sorted() {
        let mut registry = ActionRegistry::new();
        registry.register("italic", |_| Ok(()));
        registry.register("bold", |_| Ok(()));
        assert_eq!(registry.names(), vec!["bold", "italic"]);
    }
}
