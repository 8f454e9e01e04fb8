//! Action catalogue: descriptors registered at boot plus swappable handlers.
//!
//! The catalogue is an explicit object owned by whoever composes the system
//! and shared by `Arc` with the decision loop and the executor boundary.
//! Descriptors are only written during boot (`&mut self`); handlers sit
//! behind a lock so hardware bindings can be attached or swapped later
//! through a shared reference.

use std::collections::BTreeMap;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};

use parking_lot::RwLock;

use super::action_id::ActionId;
use super::descriptor::{ActionDescriptor, ActionHandler, DispatchContext, DispatchOutcome};

struct CatalogueEntry {
    descriptor: ActionDescriptor,
    handler: RwLock<Option<ActionHandler>>,
}

/// Registry of every action the brain may select.
#[derive(Default)]
pub struct ActionCatalogue {
    entries: BTreeMap<ActionId, CatalogueEntry>,
}

impl fmt::Debug for ActionCatalogue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bound: Vec<&str> = self
            .entries
            .iter()
            .filter(|(_, e)| e.handler.read().is_some())
            .map(|(id, _)| id.as_str())
            .collect();
        f.debug_struct("ActionCatalogue")
            .field("actions", &self.entries.len())
            .field("bound", &bound)
            .finish()
    }
}

impl ActionCatalogue {
    /// Create an empty catalogue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalogue holding the built-in action table.
    pub fn with_defaults() -> Self {
        let mut catalogue = Self::new();
        for descriptor in super::defaults::default_descriptors() {
            catalogue.register(descriptor);
        }
        catalogue
    }

    /// Insert or replace the descriptor for its identifier.
    ///
    /// A handler already bound to the identifier stays bound.
    pub fn register(&mut self, descriptor: ActionDescriptor) {
        match self.entries.get_mut(&descriptor.id) {
            Some(entry) => entry.descriptor = descriptor,
            None => {
                self.entries.insert(
                    descriptor.id,
                    CatalogueEntry {
                        descriptor,
                        handler: RwLock::new(None),
                    },
                );
            }
        }
    }

    pub fn get(&self, id: ActionId) -> Option<&ActionDescriptor> {
        self.entries.get(&id).map(|e| &e.descriptor)
    }

    /// All descriptors in declaration order.
    pub fn all(&self) -> impl Iterator<Item = &ActionDescriptor> {
        self.entries.values().map(|e| &e.descriptor)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn has_handler(&self, id: ActionId) -> bool {
        self.entries
            .get(&id)
            .map(|e| e.handler.read().is_some())
            .unwrap_or(false)
    }

    /// Bind or rebind the handler for a registered action.
    ///
    /// Returns `false` (with a warning) when the action is not registered.
    pub fn attach_handler(&self, id: ActionId, handler: ActionHandler) -> bool {
        match self.entries.get(&id) {
            Some(entry) => {
                *entry.handler.write() = Some(handler);
                true
            }
            None => {
                log::warn!("Cannot attach handler to unknown action '{}'", id);
                false
            }
        }
    }

    /// Remove the handler of an action, returning the previous one.
    pub fn detach_handler(&self, id: ActionId) -> Option<ActionHandler> {
        self.entries.get(&id).and_then(|e| e.handler.write().take())
    }

    /// Invoke the handler bound to `id` with the decision context.
    ///
    /// Never fails: a missing action, a missing handler, a handler error and
    /// a handler panic are all logged and reported through the outcome.
    pub fn dispatch(&self, id: ActionId, context: &DispatchContext) -> DispatchOutcome {
        let Some(entry) = self.entries.get(&id) else {
            log::warn!("Dispatch of unknown action '{}' ignored", id);
            return DispatchOutcome::UnknownAction;
        };

        // Clone out of the lock so a handler may rebind handlers itself.
        let handler = entry.handler.read().clone();
        let Some(handler) = handler else {
            log::debug!("'{}' dispatched (no handler wired)", id);
            return DispatchOutcome::Unbound;
        };

        match panic::catch_unwind(AssertUnwindSafe(|| handler(id, context))) {
            Ok(Ok(())) => DispatchOutcome::Executed,
            Ok(Err(e)) => {
                log::error!("Handler for '{}' failed: {}", id, e);
                DispatchOutcome::Failed(e.to_string())
            }
            Err(payload) => {
                let message = panic_message(payload.as_ref());
                log::error!("Handler for '{}' panicked: {}", id, message);
                DispatchOutcome::Failed(message)
            }
        }
    }

    /// Render the catalogue as a bullet list for the reasoning prompt.
    pub fn to_prompt_list(&self) -> String {
        self.all()
            .map(|d| format!("- {}: {} ({})", d.id, d.description, d.intent))
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "handler panicked".to_string()
    }
}
