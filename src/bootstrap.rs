//! Tree Bootstrap Coordinator
//!
//! Starts the external tree view exactly once, after both the dataset has
//! loaded and the tree module's start operation can be resolved. Either side
//! may become ready first; whichever arrives second triggers the start.

use std::cell::Cell;

use crate::actions::ActionRegistry;
use crate::content::LOAD_NEW_NODE;

/// Progress of the tree start-up rendezvous
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BootstrapState {
    WaitingBoth,
    /// Dataset loaded, tree module not ready yet
    WaitingTreeModule,
    /// Tree module ready, dataset not loaded yet
    WaitingData,
    /// Tree started; terminal
    Started,
}

/// Fire-once coordinator for starting the tree view
#[derive(Debug)]
pub struct TreeBootstrap {
    root: String,
    state: Cell<BootstrapState>,
    data_ready: Cell<bool>,
    module_signalled: Cell<bool>,
}

impl TreeBootstrap {
    /// Coordinator that starts the tree on `root`
    pub fn new(root: impl Into<String>) -> Self {
        Self {
            root: root.into(),
            state: Cell::new(BootstrapState::WaitingBoth),
            data_ready: Cell::new(false),
            module_signalled: Cell::new(false),
        }
    }

    pub fn state(&self) -> BootstrapState {
        self.state.get()
    }

    pub fn is_started(&self) -> bool {
        self.state.get() == BootstrapState::Started
    }

    /// The dataset has been published
    pub fn dataset_ready(&self, registry: &ActionRegistry) -> BootstrapState {
        self.data_ready.set(true);
        self.attempt(registry)
    }

    /// The tree module announced it has loaded
    pub fn tree_module_ready(&self, registry: &ActionRegistry) -> BootstrapState {
        self.module_signalled.set(true);
        self.attempt(registry)
    }

    fn attempt(&self, registry: &ActionRegistry) -> BootstrapState {
        if self.is_started() {
            return BootstrapState::Started;
        }

        let resolvable = registry.contains(LOAD_NEW_NODE);
        let next = match (self.data_ready.get(), resolvable) {
            (true, true) => {
                // Mark first so a re-entrant signal from the handler is a no-op
                self.state.set(BootstrapState::Started);
                registry.dispatch_or_warn(LOAD_NEW_NODE, &self.root);
                tracing::info!(root = %self.root, "Family tree initialized");
                BootstrapState::Started
            }
            (true, false) => BootstrapState::WaitingTreeModule,
            (false, _) if resolvable || self.module_signalled.get() => BootstrapState::WaitingData,
            (false, _) => BootstrapState::WaitingBoth,
        };

        self.state.set(next);
        next
    }
}
