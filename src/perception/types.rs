//! Perception payloads shared by the engine, the catalogue and the workers.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Primary face seen in the current frame.
///
/// `center_x`/`center_y` are normalized to `[0, 1]` of the frame and `area`
/// to `[0, 1]` of the frame area.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FaceTarget {
    pub center_x: f64,
    pub center_y: f64,
    pub area: f64,
    pub confidence: f64,
}

impl FaceTarget {
    pub fn new(center_x: f64, center_y: f64, area: f64, confidence: f64) -> Self {
        Self {
            center_x,
            center_y,
            area,
            confidence,
        }
    }
}

/// Hand gesture label from the gesture recognizer.
///
/// The vocabulary is open: labels the brain does not react to are kept
/// verbatim in [`Gesture::Other`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Gesture {
    OpenPalm,
    Stop,
    ThumbUp,
    Other(String),
}

impl Gesture {
    pub fn label(&self) -> &str {
        match self {
            Self::OpenPalm => "Open_Palm",
            Self::Stop => "Stop",
            Self::ThumbUp => "Thumb_Up",
            Self::Other(label) => label,
        }
    }

    /// Gestures that mean "stop what you are doing".
    pub fn is_stop(&self) -> bool {
        matches!(self, Self::OpenPalm | Self::Stop)
    }
}

impl From<&str> for Gesture {
    fn from(label: &str) -> Self {
        match label {
            "Open_Palm" => Self::OpenPalm,
            "Stop" => Self::Stop,
            "Thumb_Up" => Self::ThumbUp,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<String> for Gesture {
    fn from(label: String) -> Self {
        Gesture::from(label.as_str())
    }
}

impl From<Gesture> for String {
    fn from(gesture: Gesture) -> Self {
        gesture.label().to_string()
    }
}

impl fmt::Display for Gesture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Boolean override inputs for one cycle.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CycleFlags {
    /// A hotword/voice session is in progress.
    pub is_listening: bool,
    /// The touch sensor is active.
    pub is_touching: bool,
}

/// Everything perceived for one decision cycle. All parts are optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PerceptionFrame {
    pub face: Option<FaceTarget>,
    pub gesture: Option<Gesture>,
    pub flags: CycleFlags,
}

impl PerceptionFrame {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn with_face(mut self, face: FaceTarget) -> Self {
        self.face = Some(face);
        self
    }

    pub fn with_gesture(mut self, gesture: impl Into<Gesture>) -> Self {
        self.gesture = Some(gesture.into());
        self
    }

    pub fn listening(mut self) -> Self {
        self.flags.is_listening = true;
        self
    }

    pub fn touching(mut self) -> Self {
        self.flags.is_touching = true;
        self
    }
}
