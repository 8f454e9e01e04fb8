//! # Pixi
//!
//! Decision and drive-state engine for the Pixi companion robot.
//!
//! Each cycle the life loop ages the robot's internal drives, reads the
//! latest perception, runs an override cascade (battery, listening,
//! gestures, touch, personal space) and, when nothing overrides, scores a
//! pool of idle and social behaviours by utility. The winning action is
//! dispatched through the action catalogue and fed back into the drives.
//! Spoken hotwords interrupt the loop and hand the utterance to a hosted
//! reasoning delegate that picks a non-verbal response.

pub mod actions;
pub mod clock;
pub mod config;
pub mod engine;
pub mod error;
pub mod perception;
pub mod reasoning;
pub mod runtime;
pub mod server;
pub mod state;

pub use actions::{ActionCatalogue, ActionId};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::BrainConfig;
pub use engine::{Decision, DecisionEngine, DecisionTier};
pub use error::{PixiError, Result};
pub use perception::{PerceptionBus, PerceptionFrame, StopSignal};
pub use reasoning::{ChatCompletionDelegate, ReasoningDelegate};
pub use runtime::{LifeLoop, LoopReport, TelemetryFrame};
pub use state::{Mood, StateManager};

/// Crate version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
