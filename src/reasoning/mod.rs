//! Reasoning delegate for the voice path.
//!
//! Only the voice interrupt consults a delegate: it hands over the
//! transcribed utterance, the telemetry snapshot and the catalogue listing,
//! and gets back one [`ActionId`]. Failures never leave this module; callers
//! go through [`resolve_or_fallback`].

pub mod client;
pub mod normalize;
pub mod prompt;

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::actions::{ActionCatalogue, ActionId};
use crate::error::ReasoningError;
use crate::state::TelemetrySnapshot;

pub use client::{ChatCompletionDelegate, Provider, ProviderSettings};
pub use normalize::{normalize_action, parse_action_reply, ParsedReply};
pub use prompt::{build_event_prompt, build_prompt};

/// Input handed to a delegate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReasoningRequest {
    pub utterance: String,
    pub state: TelemetrySnapshot,
    /// Rendered catalogue listing.
    pub catalogue: String,
}

impl ReasoningRequest {
    pub fn new(
        utterance: impl Into<String>,
        state: TelemetrySnapshot,
        catalogue: &ActionCatalogue,
    ) -> Self {
        Self {
            utterance: utterance.into(),
            state,
            catalogue: catalogue.to_prompt_list(),
        }
    }
}

/// Maps free text to an action.
#[async_trait]
pub trait ReasoningDelegate: Send + Sync {
    async fn resolve(&self, request: &ReasoningRequest) -> Result<ActionId, ReasoningError>;
}

/// Resolve with a deadline. Errors and timeouts yield `fallback`.
pub async fn resolve_or_fallback(
    delegate: &dyn ReasoningDelegate,
    request: &ReasoningRequest,
    timeout: Duration,
    fallback: ActionId,
) -> ActionId {
    match tokio::time::timeout(timeout, delegate.resolve(request)).await {
        Ok(Ok(action)) => {
            log::info!("Delegate resolved '{}' -> {}", request.utterance, action);
            action
        }
        Ok(Err(e)) => {
            log::warn!("Reasoning failed ({}), falling back to {}", e, fallback);
            fallback
        }
        Err(_) => {
            let e = ReasoningError::Timeout(timeout.as_millis() as u64);
            log::warn!("{}, falling back to {}", e, fallback);
            fallback
        }
    }
}
