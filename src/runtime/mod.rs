//! Runtime: the life loop, the voice pipeline and what they report.

pub mod life_loop;
pub mod report;
pub mod voice;

pub use life_loop::{LifeLoop, VOICE_PERSON_ID};
pub use report::{LoopReport, TelemetryFrame};
pub use voice::VoicePipeline;
