//! Scripted perception for simulation runs.
//!
//! A script is a JSON document of timed steps:
//!
//! ```json
//! {
//!   "repeat": false,
//!   "steps": [
//!     { "at_ms": 0,    "face": { "center_x": 0.5, "center_y": 0.5, "area": 0.12, "confidence": 0.9 } },
//!     { "at_ms": 1500, "gesture": "Thumb_Up" },
//!     { "at_ms": 3000, "hotword": "pixi" },
//!     { "at_ms": 4000, "clear_face": true, "touching": true }
//!   ]
//! }
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use super::bus::PerceptionPublisher;
use super::types::{FaceTarget, Gesture};
use super::worker::{StopSignal, WorkerHandle};
use crate::error::PerceptionError;

/// One timed perception event. Every field besides `at_ms` is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptStep {
    /// Offset from the start of the pass.
    pub at_ms: u64,
    pub face: Option<FaceTarget>,
    pub clear_face: bool,
    pub gesture: Option<Gesture>,
    pub hotword: Option<String>,
    pub touching: Option<bool>,
    pub listening: Option<bool>,
}

impl ScriptStep {
    fn apply(&self, publisher: &PerceptionPublisher) {
        if self.clear_face {
            publisher.clear_face();
        }
        if let Some(face) = self.face {
            publisher.publish_face(face);
        }
        if let Some(gesture) = &self.gesture {
            publisher.publish_gesture(gesture.clone());
        }
        if let Some(keyword) = &self.hotword {
            publisher.hotword(keyword.clone());
        }
        if let Some(touching) = self.touching {
            publisher.set_touching(touching);
        }
        if let Some(listening) = self.listening {
            publisher.set_listening(listening);
        }
    }
}

/// A perception script.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PerceptionScript {
    /// Restart from the first step after the last one.
    pub repeat: bool,
    pub steps: Vec<ScriptStep>,
}

impl PerceptionScript {
    pub fn from_json_str(json: &str) -> Result<Self, PerceptionError> {
        let mut script: PerceptionScript =
            serde_json::from_str(json).map_err(|e| PerceptionError::Script(e.to_string()))?;
        script.steps.sort_by_key(|s| s.at_ms);
        Ok(script)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, PerceptionError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| PerceptionError::Script(format!("{}: {}", path.display(), e)))?;
        Self::from_json_str(&content)
    }

    /// Length of one pass.
    pub fn duration(&self) -> Duration {
        Duration::from_millis(self.steps.last().map(|s| s.at_ms).unwrap_or(0))
    }
}

/// Default period at which a held face is re-published.
pub const DEFAULT_FACE_REFRESH: Duration = Duration::from_millis(100);

/// Worker that replays a [`PerceptionScript`] onto the bus.
///
/// A scripted face is held until a later `clear_face` step: the worker keeps
/// re-publishing it so it never ages out of the bus's freshness window.
#[derive(Debug, Clone)]
pub struct ScriptedPerception {
    script: PerceptionScript,
    publisher: PerceptionPublisher,
    face_refresh: Duration,
}

impl ScriptedPerception {
    pub fn new(script: PerceptionScript, publisher: PerceptionPublisher) -> Self {
        Self {
            script,
            publisher,
            face_refresh: DEFAULT_FACE_REFRESH,
        }
    }

    /// Re-publish period for a held face; keep it below the bus face age.
    pub fn with_face_refresh(mut self, period: Duration) -> Self {
        self.face_refresh = period.max(Duration::from_millis(1));
        self
    }

    pub fn spawn(self) -> WorkerHandle {
        WorkerHandle::spawn("scripted-perception", move |stop| self.run(stop))
    }

    /// Replay until the script ends (or forever when repeating) or `stop` fires.
    ///
    /// A face still held when a non-repeating script ends stays visible
    /// until `stop` fires.
    pub async fn run(self, stop: StopSignal) {
        if self.script.steps.is_empty() {
            log::warn!("Perception script has no steps");
            return;
        }
        let mut held: Option<FaceTarget> = None;
        let mut refresh = tokio::time::interval(self.face_refresh);
        refresh.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

        let mut pass = 0u64;
        loop {
            pass += 1;
            log::debug!("Perception script pass {}", pass);
            let start = tokio::time::Instant::now();
            for step in &self.script.steps {
                let due = start + Duration::from_millis(step.at_ms);
                if !self.wait_holding(&stop, due, held, &mut refresh).await {
                    return;
                }
                step.apply(&self.publisher);
                if step.clear_face {
                    held = None;
                }
                if step.face.is_some() {
                    held = step.face;
                }
            }
            if !self.script.repeat {
                log::info!("Perception script finished");
                if held.is_some() {
                    let forever = tokio::time::Instant::now() + Duration::from_secs(86_400 * 365);
                    while self.wait_holding(&stop, forever, held, &mut refresh).await {}
                }
                return;
            }
            // Keep passes of zero duration from spinning.
            if self.script.duration().is_zero() {
                let pause = tokio::time::Instant::now() + Duration::from_millis(100);
                if !self.wait_holding(&stop, pause, held, &mut refresh).await {
                    return;
                }
            }
        }
    }

    /// Sleep until `due`, re-publishing `held` on every refresh tick.
    /// Returns `false` when `stop` fired first.
    async fn wait_holding(
        &self,
        stop: &StopSignal,
        due: tokio::time::Instant,
        held: Option<FaceTarget>,
        refresh: &mut tokio::time::Interval,
    ) -> bool {
        let sleep = tokio::time::sleep_until(due);
        tokio::pin!(sleep);
        loop {
            tokio::select! {
                _ = stop.stopped() => return false,
                _ = &mut sleep => return true,
                _ = refresh.tick(), if held.is_some() => {
                    if let Some(face) = held {
                        self.publisher.publish_face(face);
                    }
                }
            }
        }
    }
}
