//! Drive state and its homeostatic dynamics.

pub mod drive_state;
pub mod effects;
pub mod manager;
pub mod mood;
pub mod snapshot;

pub use drive_state::{Drive, DriveState};
pub use effects::{effect_for, ActionEffect, Adjust};
pub use manager::StateManager;
pub use mood::Mood;
pub use snapshot::{DriveSnapshot, TelemetrySnapshot};
