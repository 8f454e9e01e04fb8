//! The closed set of behaviours Pixi can perform.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Identifier of one catalogued action.
///
/// Serialized in `SCREAMING_SNAKE_CASE`, the same spelling used in
/// telemetry and in replies from the reasoning delegate.
///
/// Adding a variant forces a decision in [`ActionId::is_social`]: every
/// social action implicitly counts as an interaction when performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionId {
    // Survival
    EmergencyShutdown,

    // Reflexes / safety
    AvoidObstacle,
    BackAwayScared,

    // Overrides
    ListenToUser,
    Ignore,

    // Interaction
    EnjoyTouch,
    GreetHappily,

    // Social tracking
    FollowPerson,
    ComeCloser,
    SearchForHuman,

    // Play
    DoAHappyDance,
    WiggleExcitedly,

    // Idle / biological
    TiltHeadCuriously,
    Stretch,
    LookAround,
    GoToSleep,
}

impl ActionId {
    /// Every action, in declaration order.
    pub const ALL: [ActionId; 16] = [
        ActionId::EmergencyShutdown,
        ActionId::AvoidObstacle,
        ActionId::BackAwayScared,
        ActionId::ListenToUser,
        ActionId::Ignore,
        ActionId::EnjoyTouch,
        ActionId::GreetHappily,
        ActionId::FollowPerson,
        ActionId::ComeCloser,
        ActionId::SearchForHuman,
        ActionId::DoAHappyDance,
        ActionId::WiggleExcitedly,
        ActionId::TiltHeadCuriously,
        ActionId::Stretch,
        ActionId::LookAround,
        ActionId::GoToSleep,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::EmergencyShutdown => "EMERGENCY_SHUTDOWN",
            Self::AvoidObstacle => "AVOID_OBSTACLE",
            Self::BackAwayScared => "BACK_AWAY_SCARED",
            Self::ListenToUser => "LISTEN_TO_USER",
            Self::Ignore => "IGNORE",
            Self::EnjoyTouch => "ENJOY_TOUCH",
            Self::GreetHappily => "GREET_HAPPILY",
            Self::FollowPerson => "FOLLOW_PERSON",
            Self::ComeCloser => "COME_CLOSER",
            Self::SearchForHuman => "SEARCH_FOR_HUMAN",
            Self::DoAHappyDance => "DO_A_HAPPY_DANCE",
            Self::WiggleExcitedly => "WIGGLE_EXCITEDLY",
            Self::TiltHeadCuriously => "TILT_HEAD_CURIOUSLY",
            Self::Stretch => "STRETCH",
            Self::LookAround => "LOOK_AROUND",
            Self::GoToSleep => "GO_TO_SLEEP",
        }
    }

    /// Whether performing this action also counts as engaging with someone.
    ///
    /// The non-social set is exactly `IGNORE`, `BACK_AWAY_SCARED`,
    /// `AVOID_OBSTACLE` and `GO_TO_SLEEP`.
    pub fn is_social(&self) -> bool {
        match self {
            Self::Ignore | Self::BackAwayScared | Self::AvoidObstacle | Self::GoToSleep => false,
            Self::EmergencyShutdown
            | Self::ListenToUser
            | Self::EnjoyTouch
            | Self::GreetHappily
            | Self::FollowPerson
            | Self::ComeCloser
            | Self::SearchForHuman
            | Self::DoAHappyDance
            | Self::WiggleExcitedly
            | Self::TiltHeadCuriously
            | Self::Stretch
            | Self::LookAround => true,
        }
    }
}

impl fmt::Display for ActionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when a string names no known action.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown action identifier: {0}")]
pub struct UnknownAction(pub String);

impl FromStr for ActionId {
    type Err = UnknownAction;

    /// Exact, case-insensitive match on the serialized name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_uppercase();
        ActionId::ALL
            .iter()
            .copied()
            .find(|a| a.as_str() == wanted)
            .ok_or_else(|| UnknownAction(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_round_trip_through_from_str() {
        for action in ActionId::ALL {
            assert_eq!(action.as_str().parse::<ActionId>().unwrap(), action);
        }
    }

    #[test]
    fn test_from_str_is_case_insensitive() {
        assert_eq!(" go_to_sleep ".parse::<ActionId>().unwrap(), ActionId::GoToSleep);
        assert!("NAP".parse::<ActionId>().is_err());
    }

    #[test]
    fn test_serde_matches_as_str() {
        let json = serde_json::to_string(&ActionId::DoAHappyDance).unwrap();
        assert_eq!(json, "\"DO_A_HAPPY_DANCE\"");
        let back: ActionId = serde_json::from_str("\"TILT_HEAD_CURIOUSLY\"").unwrap();
        assert_eq!(back, ActionId::TiltHeadCuriously);
    }

    #[test]
    fn test_non_social_set() {
        let non_social: Vec<ActionId> = ActionId::ALL
            .iter()
            .copied()
            .filter(|a| !a.is_social())
            .collect();
        assert_eq!(
            non_social,
            vec![
                ActionId::AvoidObstacle,
                ActionId::BackAwayScared,
                ActionId::Ignore,
                ActionId::GoToSleep,
            ]
        );
    }
}
