//! Post-action feedback table.
//!
//! Per-action costs are tiny because the table is applied every cycle at
//! roughly 30 Hz.

use super::drive_state::Drive;
use super::mood::Mood;
use crate::actions::ActionId;

/// How an action changes one drive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Adjust {
    /// Add a (possibly negative) delta.
    By(f64),
    /// Overwrite the value.
    To(f64),
}

/// Drive adjustments and mood assignment for one action.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionEffect {
    pub adjustments: &'static [(Drive, Adjust)],
    pub mood: Option<Mood>,
}

const NONE: ActionEffect = ActionEffect {
    adjustments: &[],
    mood: None,
};

/// Feedback for `action`.
pub fn effect_for(action: ActionId) -> ActionEffect {
    use Adjust::{By, To};
    use Drive::*;

    match action {
        ActionId::EmergencyShutdown => ActionEffect {
            adjustments: &[(Energy, To(0.0))],
            mood: Some(Mood::Sleepy),
        },
        ActionId::EnjoyTouch => ActionEffect {
            adjustments: &[
                (AttentionHunger, To(0.0)),
                (Caution, To(0.0)),
                (Excitement, By(-0.05)),
            ],
            mood: Some(Mood::Happy),
        },
        ActionId::GreetHappily => ActionEffect {
            adjustments: &[(Confidence, By(0.01)), (Excitement, By(0.02))],
            mood: Some(Mood::Happy),
        },
        ActionId::ListenToUser => ActionEffect {
            adjustments: &[(Excitement, By(-0.01))],
            mood: Some(Mood::Alert),
        },
        ActionId::FollowPerson => ActionEffect {
            adjustments: &[(Energy, By(-0.0002)), (AttentionHunger, By(-0.005))],
            mood: Some(Mood::Curious),
        },
        ActionId::SearchForHuman => ActionEffect {
            adjustments: &[(Energy, By(-0.0003)), (Curiosity, By(0.001))],
            mood: Some(Mood::Lonely),
        },
        ActionId::ComeCloser => ActionEffect {
            adjustments: &[(Energy, By(-0.0002)), (AttentionHunger, By(-0.008))],
            mood: Some(Mood::Curious),
        },
        // Dancing and wiggling discharge excitement so play cannot loop forever.
        ActionId::DoAHappyDance => ActionEffect {
            adjustments: &[(Energy, By(-0.0008)), (Excitement, By(-0.005))],
            mood: Some(Mood::Playful),
        },
        ActionId::WiggleExcitedly => ActionEffect {
            adjustments: &[(Energy, By(-0.0004)), (Excitement, By(-0.002))],
            mood: Some(Mood::Excited),
        },
        // ~1.5% charge per second at 30 Hz.
        ActionId::GoToSleep => ActionEffect {
            adjustments: &[(Energy, By(0.0005)), (Excitement, To(0.0))],
            mood: Some(Mood::Sleepy),
        },
        ActionId::Stretch => ActionEffect {
            adjustments: &[(Energy, By(-0.0001)), (Curiosity, By(0.001))],
            mood: Some(Mood::Neutral),
        },
        ActionId::BackAwayScared => ActionEffect {
            adjustments: &[
                (Energy, By(-0.0005)),
                (Caution, By(0.01)),
                (Confidence, By(-0.01)),
            ],
            mood: Some(Mood::Scared),
        },
        ActionId::AvoidObstacle => ActionEffect {
            adjustments: &[(Caution, By(0.005))],
            mood: Some(Mood::Alert),
        },
        ActionId::Ignore | ActionId::TiltHeadCuriously | ActionId::LookAround => NONE,
    }
}
