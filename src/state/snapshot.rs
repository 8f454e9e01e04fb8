//! Read-only views of the drive state.

use serde::{Deserialize, Serialize};

use super::mood::Mood;
use crate::actions::ActionId;

/// Unrounded copy of the drives taken once per cycle for scoring.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DriveSnapshot {
    pub mood: Mood,
    pub energy: f64,
    pub curiosity: f64,
    pub confidence: f64,
    pub attention_hunger: f64,
    pub excitement: f64,
    pub caution: f64,
    /// Derived from idle time, in `[0, 1]`.
    pub boredom: f64,
    /// Seconds since the last interaction.
    pub idle_secs: f64,
    pub recognized_person: Option<String>,
    pub last_action: Option<ActionId>,
    pub recent_actions: Vec<ActionId>,
}

impl DriveSnapshot {
    /// Rounded view for logs and the telemetry surface.
    pub fn telemetry(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            mood: self.mood,
            energy: round_to(self.energy, 2),
            curiosity: round_to(self.curiosity, 2),
            confidence: round_to(self.confidence, 2),
            attention_hunger: round_to(self.attention_hunger, 2),
            excitement: round_to(self.excitement, 2),
            caution: round_to(self.caution, 2),
            boredom: round_to(self.boredom, 2),
            time_since_last_interaction: round_to(self.idle_secs, 1),
            recognized_person: self
                .recognized_person
                .clone()
                .unwrap_or_else(|| "unknown".to_string()),
            last_action: self
                .last_action
                .map(|a| a.as_str().to_string())
                .unwrap_or_else(|| "NONE".to_string()),
            recent_actions: self.recent_actions.clone(),
        }
    }
}

/// Drive values rounded to 2 decimals, idle time to 1 decimal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetrySnapshot {
    pub mood: Mood,
    pub energy: f64,
    pub curiosity: f64,
    pub confidence: f64,
    pub attention_hunger: f64,
    pub excitement: f64,
    pub caution: f64,
    pub boredom: f64,
    pub time_since_last_interaction: f64,
    pub recognized_person: String,
    pub last_action: String,
    pub recent_actions: Vec<ActionId>,
}

fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> DriveSnapshot {
        DriveSnapshot {
            mood: Mood::Curious,
            energy: 0.8567,
            curiosity: 0.6,
            confidence: 0.5,
            attention_hunger: 0.333,
            excitement: 0.45,
            caution: 0.3,
            boredom: 0.0,
            idle_secs: 12.345,
            recognized_person: None,
            last_action: None,
            recent_actions: vec![],
        }
    }

    #[test]
    fn test_telemetry_rounds_values() {
        let t = raw().telemetry();
        assert_eq!(t.energy, 0.86);
        assert_eq!(t.attention_hunger, 0.33);
        assert_eq!(t.time_since_last_interaction, 12.3);
    }

    #[test]
    fn test_telemetry_placeholders() {
        let t = raw().telemetry();
        assert_eq!(t.recognized_person, "unknown");
        assert_eq!(t.last_action, "NONE");

        let mut snap = raw();
        snap.recognized_person = Some("user".into());
        snap.last_action = Some(ActionId::Stretch);
        let t = snap.telemetry();
        assert_eq!(t.recognized_person, "user");
        assert_eq!(t.last_action, "STRETCH");
    }

    #[test]
    fn test_telemetry_json_shape() {
        let value = serde_json::to_value(raw().telemetry()).unwrap();
        assert_eq!(value["mood"], "curious");
        assert!(value.get("time_since_last_interaction").is_some());
        assert!(value["recent_actions"].is_array());
    }
}
