//! Perception inputs: payload types, the bus workers publish onto, worker
//! lifecycle, scripted replay and speech capture.

pub mod bus;
pub mod script;
pub mod speech;
pub mod types;
pub mod worker;

pub use bus::{HotwordEvent, LatestSlot, PerceptionBus, PerceptionPublisher};
pub use script::{PerceptionScript, ScriptStep, ScriptedPerception};
pub use speech::{capture_utterance, frame_rms, AudioFrameSource, ReplaySource, Transcriber};
pub use types::{CycleFlags, FaceTarget, Gesture, PerceptionFrame};
pub use worker::{StopSignal, WorkerHandle};
