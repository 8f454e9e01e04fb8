//! Static action metadata and the dispatch contract.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::action_id::ActionId;
use crate::error::HandlerError;
use crate::perception::{FaceTarget, Gesture};

/// Identity and priority metadata of one action, fixed at boot.
///
/// `priority` (0-100, higher wins safety ties) and `tags` are informational;
/// live arbitration orders actions procedurally in the decision engine.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionDescriptor {
    pub id: ActionId,
    pub description: String,
    pub intent: String,
    /// Energy spent per execution; negative means recuperative.
    pub energy_cost: f64,
    pub priority: u8,
    pub tags: Vec<String>,
}

impl ActionDescriptor {
    pub fn new(id: ActionId, description: impl Into<String>, intent: impl Into<String>) -> Self {
        Self {
            id,
            description: description.into(),
            intent: intent.into(),
            energy_cost: 0.0,
            priority: 50,
            tags: Vec::new(),
        }
    }

    pub fn with_energy_cost(mut self, energy_cost: f64) -> Self {
        self.energy_cost = energy_cost;
        self
    }

    pub fn with_priority(mut self, priority: u8) -> Self {
        self.priority = priority.min(100);
        self
    }

    pub fn with_tags(mut self, tags: &[&str]) -> Self {
        self.tags = tags.iter().map(|t| t.to_string()).collect();
        self
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Perception context forwarded to the executor so motors know where to aim.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchContext {
    pub face: Option<FaceTarget>,
    pub gesture: Option<Gesture>,
}

impl DispatchContext {
    pub fn new(face: Option<FaceTarget>, gesture: Option<Gesture>) -> Self {
        Self { face, gesture }
    }
}

/// Execution handler bound to an action.
///
/// One fixed signature for every handler; handlers ignore the context
/// fields they do not need.
pub type ActionHandler =
    Arc<dyn Fn(ActionId, &DispatchContext) -> Result<(), HandlerError> + Send + Sync>;

/// Wrap a closure as an [`ActionHandler`].
pub fn action_handler<F>(f: F) -> ActionHandler
where
    F: Fn(ActionId, &DispatchContext) -> Result<(), HandlerError> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// What happened when an action was dispatched.
#[derive(Debug, Clone, PartialEq)]
pub enum DispatchOutcome {
    /// The bound handler ran to completion.
    Executed,
    /// No handler is bound; the dispatch was a logged no-op.
    Unbound,
    /// The action is not registered in the catalogue.
    UnknownAction,
    /// The handler returned an error or panicked.
    Failed(String),
}

impl DispatchOutcome {
    pub fn is_executed(&self) -> bool {
        matches!(self, Self::Executed)
    }
}
