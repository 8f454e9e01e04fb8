//! Hard override cascade, checked in order before any scoring.

use super::decision::DecisionTier;
use crate::actions::ActionId;
use crate::config::ArbitrationConfig;
use crate::perception::{Gesture, PerceptionFrame};
use crate::state::DriveSnapshot;

/// An override that fired.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Override {
    pub action: ActionId,
    pub tier: DecisionTier,
    pub reason: &'static str,
}

impl Override {
    fn new(action: ActionId, tier: DecisionTier, reason: &'static str) -> Self {
        Self {
            action,
            tier,
            reason,
        }
    }
}

/// First matching override, or `None` to fall through to scoring.
pub fn check_overrides(
    snapshot: &DriveSnapshot,
    frame: &PerceptionFrame,
    config: &ArbitrationConfig,
) -> Option<Override> {
    if snapshot.energy < config.low_energy_threshold {
        return Some(Override::new(
            ActionId::GoToSleep,
            DecisionTier::Survival,
            "low battery",
        ));
    }
    if frame.flags.is_listening {
        return Some(Override::new(
            ActionId::Ignore,
            DecisionTier::Listening,
            "listening to user",
        ));
    }
    match &frame.gesture {
        Some(gesture) if gesture.is_stop() => {
            return Some(Override::new(
                ActionId::AvoidObstacle,
                DecisionTier::Gesture,
                "user signalled stop",
            ));
        }
        Some(Gesture::ThumbUp) => {
            return Some(Override::new(
                ActionId::DoAHappyDance,
                DecisionTier::Gesture,
                "user gave a thumbs up",
            ));
        }
        _ => {}
    }
    if frame.flags.is_touching {
        return Some(Override::new(
            ActionId::WiggleExcitedly,
            DecisionTier::Touch,
            "being touched",
        ));
    }
    match frame.face {
        Some(face) if face.area > config.personal_space_area => Some(Override::new(
            ActionId::BackAwayScared,
            DecisionTier::PersonalSpace,
            "too close",
        )),
        _ => None,
    }
}
