//! Per-cycle telemetry frames and the end-of-run report.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::actions::{ActionId, DispatchOutcome};
use crate::engine::Decision;
use crate::state::TelemetrySnapshot;

/// What the loop publishes after every cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TelemetryFrame {
    pub cycle: u64,
    pub timestamp: DateTime<Utc>,
    pub decision: Decision,
    pub state: TelemetrySnapshot,
}

/// Counters accumulated over a run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LoopReport {
    pub cycles: u64,
    pub voice_interrupts: u64,
    pub dispatch_failures: u64,
    /// Dispatch count per action, voice responses included.
    pub actions: BTreeMap<ActionId, u64>,
}

impl LoopReport {
    pub(crate) fn record_dispatch(&mut self, action: ActionId, outcome: &DispatchOutcome) {
        *self.actions.entry(action).or_insert(0) += 1;
        if matches!(outcome, DispatchOutcome::Failed(_)) {
            self.dispatch_failures += 1;
        }
    }

    /// Most frequently dispatched action.
    pub fn dominant_action(&self) -> Option<ActionId> {
        self.actions
            .iter()
            .max_by_key(|(_, count)| **count)
            .map(|(action, _)| *action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_dispatch_counts() {
        let mut report = LoopReport::default();
        report.record_dispatch(ActionId::LookAround, &DispatchOutcome::Executed);
        report.record_dispatch(ActionId::LookAround, &DispatchOutcome::Unbound);
        report.record_dispatch(ActionId::Stretch, &DispatchOutcome::Failed("jam".into()));
        assert_eq!(report.actions[&ActionId::LookAround], 2);
        assert_eq!(report.dispatch_failures, 1);
        assert_eq!(report.dominant_action(), Some(ActionId::LookAround));
    }

    #[test]
    fn test_report_serializes_action_names() {
        let mut report = LoopReport::default();
        report.record_dispatch(ActionId::GoToSleep, &DispatchOutcome::Executed);
        let value = serde_json::to_value(&report).unwrap();
        assert_eq!(value["actions"]["GO_TO_SLEEP"], 1);
    }
}
