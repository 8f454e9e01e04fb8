//! The per-cycle decision record.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::actions::{ActionId, DispatchContext};
use crate::perception::{FaceTarget, Gesture};

/// Which stage of arbitration produced the winner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionTier {
    Survival,
    Listening,
    Gesture,
    Touch,
    PersonalSpace,
    Utility,
}

impl DecisionTier {
    pub fn is_override(&self) -> bool {
        !matches!(self, Self::Utility)
    }
}

impl fmt::Display for DecisionTier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Survival => "survival",
            Self::Listening => "listening",
            Self::Gesture => "gesture",
            Self::Touch => "touch",
            Self::PersonalSpace => "personal_space",
            Self::Utility => "utility",
        };
        f.write_str(s)
    }
}

/// Winning action for one cycle plus the perception context for aiming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Decision {
    pub action: ActionId,
    pub reason: String,
    pub tier: DecisionTier,
    /// Winning utility score; `None` for override decisions.
    pub score: Option<f64>,
    pub face: Option<FaceTarget>,
    pub gesture: Option<Gesture>,
}

impl Decision {
    pub fn dispatch_context(&self) -> DispatchContext {
        DispatchContext::new(self.face, self.gesture.clone())
    }
}

impl fmt::Display for Decision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}: {})", self.action, self.tier, self.reason)
    }
}
