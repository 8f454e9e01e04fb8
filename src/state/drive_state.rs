//! The mutable drive vector owned by the state manager.

use std::collections::VecDeque;

use serde::{Deserialize, Serialize};

use super::mood::Mood;
use crate::actions::ActionId;
use crate::config::InitialDrives;

/// One continuous drive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Drive {
    Energy,
    Curiosity,
    Confidence,
    AttentionHunger,
    Excitement,
    Caution,
}

impl Drive {
    pub const ALL: [Drive; 6] = [
        Drive::Energy,
        Drive::Curiosity,
        Drive::Confidence,
        Drive::AttentionHunger,
        Drive::Excitement,
        Drive::Caution,
    ];
}

/// Clamp into `[min, max]`, mapping NaN to `min`.
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        min
    } else {
        value.max(min).min(max)
    }
}

/// Drive values plus the bookkeeping the manager keeps alongside them.
///
/// Every continuous drive lies in `[0, 1]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveState {
    pub mood: Mood,
    pub energy: f64,
    pub curiosity: f64,
    pub confidence: f64,
    pub attention_hunger: f64,
    pub excitement: f64,
    pub caution: f64,
    pub recognized_person: Option<String>,
    pub last_action: Option<ActionId>,
    pub recent_actions: VecDeque<ActionId>,
}

impl Default for DriveState {
    fn default() -> Self {
        Self::from_initial(&InitialDrives::default())
    }
}

impl DriveState {
    pub fn from_initial(initial: &InitialDrives) -> Self {
        let mut state = Self {
            mood: Mood::Curious,
            energy: initial.energy,
            curiosity: initial.curiosity,
            confidence: initial.confidence,
            attention_hunger: initial.attention_hunger,
            excitement: initial.excitement,
            caution: initial.caution,
            recognized_person: None,
            last_action: None,
            recent_actions: VecDeque::new(),
        };
        state.clamp_all();
        state
    }

    pub fn get(&self, drive: Drive) -> f64 {
        match drive {
            Drive::Energy => self.energy,
            Drive::Curiosity => self.curiosity,
            Drive::Confidence => self.confidence,
            Drive::AttentionHunger => self.attention_hunger,
            Drive::Excitement => self.excitement,
            Drive::Caution => self.caution,
        }
    }

    pub fn get_mut(&mut self, drive: Drive) -> &mut f64 {
        match drive {
            Drive::Energy => &mut self.energy,
            Drive::Curiosity => &mut self.curiosity,
            Drive::Confidence => &mut self.confidence,
            Drive::AttentionHunger => &mut self.attention_hunger,
            Drive::Excitement => &mut self.excitement,
            Drive::Caution => &mut self.caution,
        }
    }

    /// Set `drive` to `value` clamped into `[floor, 1]`.
    pub fn set_clamped(&mut self, drive: Drive, value: f64, floor: f64) {
        *self.get_mut(drive) = clamp(value, floor, 1.0);
    }

    /// Clamp every continuous drive into `[0, 1]`.
    pub fn clamp_all(&mut self) {
        for drive in Drive::ALL {
            let slot = self.get_mut(drive);
            *slot = clamp(*slot, 0.0, 1.0);
        }
    }

    pub fn in_bounds(&self) -> bool {
        Drive::ALL
            .iter()
            .all(|d| (0.0..=1.0).contains(&self.get(*d)))
    }

    /// Append to the bounded history, evicting the oldest entry.
    pub fn record_action(&mut self, action: ActionId, capacity: usize) {
        self.recent_actions.push_back(action);
        while self.recent_actions.len() > capacity {
            self.recent_actions.pop_front();
        }
        self.last_action = Some(action);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_handles_nan() {
        assert_eq!(clamp(f64::NAN, 0.1, 1.0), 0.1);
        assert_eq!(clamp(1.7, 0.0, 1.0), 1.0);
        assert_eq!(clamp(-0.3, 0.0, 1.0), 0.0);
    }

    #[test]
    fn test_from_initial_clamps() {
        let initial = InitialDrives {
            energy: 1.4,
            caution: -0.2,
            ..InitialDrives::default()
        };
        let state = DriveState::from_initial(&initial);
        assert_eq!(state.energy, 1.0);
        assert_eq!(state.caution, 0.0);
        assert!(state.in_bounds());
    }

    #[test]
    fn test_record_action_evicts_oldest() {
        let mut state = DriveState::default();
        for action in [
            ActionId::LookAround,
            ActionId::Stretch,
            ActionId::GreetHappily,
        ] {
            state.record_action(action, 2);
        }
        assert_eq!(
            state.recent_actions.iter().copied().collect::<Vec<_>>(),
            vec![ActionId::Stretch, ActionId::GreetHappily]
        );
        assert_eq!(state.last_action, Some(ActionId::GreetHappily));
    }
}
