//! Action registry
//!
//! Maps action names used by the control buttons (and by the tree bootstrap)
//! to handlers. Handlers are looked up when an action is dispatched, so a
//! button rendered before the tree module has loaded starts working as soon
//! as the module registers its operations.

use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;

use thiserror::Error;

/// Handler invoked with the action's single argument
pub type ActionHandler = Rc<dyn Fn(&str)>;

/// Errors from dispatching an action
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DispatchError {
    #[error("Function {0} is not defined")]
    Unregistered(String),

    #[error("No button at position {0}")]
    NoSuchButton(usize),
}

/// Name-to-handler table for one page session
#[derive(Default)]
pub struct ActionRegistry {
    handlers: RefCell<HashMap<String, ActionHandler>>,
}

impl fmt::Debug for ActionRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut names: Vec<_> = self.handlers.borrow().keys().cloned().collect();
        names.sort();
        f.debug_struct("ActionRegistry")
            .field("actions", &names)
            .finish()
    }
}

impl ActionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the handler for `name`
    pub fn register<F>(&self, name: &str, handler: F)
    where
        F: Fn(&str) + 'static,
    {
        self.handlers
            .borrow_mut()
            .insert(name.to_string(), Rc::new(handler));
        tracing::debug!(action = name, "Registered action");
    }

    /// Whether `name` currently resolves to a handler
    pub fn contains(&self, name: &str) -> bool {
        self.handlers.borrow().contains_key(name)
    }

    /// Invoke the handler registered for `name`
    pub fn dispatch(&self, name: &str, argument: &str) -> Result<(), DispatchError> {
        // Clone out so a handler may register further actions
        let handler = self.handlers.borrow().get(name).cloned();

        match handler {
            Some(handler) => {
                handler(argument);
                Ok(())
            }
            None => Err(DispatchError::Unregistered(name.to_string())),
        }
    }

    /// Dispatch, logging a warning instead of failing when unregistered
    pub fn dispatch_or_warn(&self, name: &str, argument: &str) -> bool {
        match self.dispatch(name, argument) {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(action = name, "{}", e);
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_dispatch_registered() {
        let registry = ActionRegistry::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let sink = Rc::clone(&seen);
        registry.register("loadNewNode", move |id| sink.borrow_mut().push(id.to_string()));

        registry.dispatch("loadNewNode", "3").unwrap();
        registry.dispatch("loadNewNode", "5").unwrap();
        assert_eq!(*seen.borrow(), vec!["3", "5"]);
    }

    #[test]
    fn test_dispatch_unregistered() {
        let registry = ActionRegistry::new();
        assert_eq!(
            registry.dispatch("resetViewAndRoot", "1"),
            Err(DispatchError::Unregistered("resetViewAndRoot".to_string()))
        );
        assert!(!registry.dispatch_or_warn("resetViewAndRoot", "1"));
    }

    #[test]
    fn test_late_registration_resolves() {
        let registry = ActionRegistry::new();
        assert!(!registry.contains("loadNewNode"));

        let calls = Rc::new(Cell::new(0));
        let counter = Rc::clone(&calls);
        registry.register("loadNewNode", move |_| counter.set(counter.get() + 1));

        assert!(registry.contains("loadNewNode"));
        assert!(registry.dispatch_or_warn("loadNewNode", "2"));
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_handler_may_register() {
        let registry = Rc::new(ActionRegistry::new());
        let inner = Rc::clone(&registry);
        registry.register("install", move |_| inner.register("installed", |_| {}));

        registry.dispatch("install", "").unwrap();
        assert!(registry.contains("installed"));
    }

    #[test]
    fn test_error_display() {
        let err = DispatchError::Unregistered("loadNewNode".to_string());
        assert_eq!(err.to_string(), "Function loadNewNode is not defined");
    }
}
