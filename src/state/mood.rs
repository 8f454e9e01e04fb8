//! Categorical mood label.

use std::fmt;

use serde::{Deserialize, Serialize};

/// High-level emotional state shown to the outside world.
///
/// Mood is derived: it only changes as a side effect of performing an
/// action, never independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    #[default]
    Curious,
    Happy,
    Playful,
    Alert,
    Sleepy,
    Scared,
    Excited,
    Lonely,
    Neutral,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Curious => "curious",
            Self::Happy => "happy",
            Self::Playful => "playful",
            Self::Alert => "alert",
            Self::Sleepy => "sleepy",
            Self::Scared => "scared",
            Self::Excited => "excited",
            Self::Lonely => "lonely",
            Self::Neutral => "neutral",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
