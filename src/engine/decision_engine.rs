//! DecisionEngine: one arbitration pass per cycle.

use serde::{Deserialize, Serialize};

use super::cascade::check_overrides;
use super::decision::{Decision, DecisionTier};
use super::scoring::{score_candidates, select_winner, Candidate};
use crate::actions::ActionId;
use crate::config::ArbitrationConfig;
use crate::perception::PerceptionFrame;
use crate::state::{DriveSnapshot, StateManager};

/// Person id recorded for a face seen by the camera.
pub const FACE_PERSON_ID: &str = "user";

/// Scored pool kept for diagnostics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub decision: Decision,
    /// Empty when an override fired.
    pub candidates: Vec<Candidate>,
}

/// Override cascade followed by utility scoring.
#[derive(Debug, Clone, Default)]
pub struct DecisionEngine {
    config: ArbitrationConfig,
}

impl DecisionEngine {
    pub fn new(config: ArbitrationConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ArbitrationConfig {
        &self.config
    }

    /// Run a full cycle against `state`.
    ///
    /// Feeds a visible face, ticks, arbitrates, then applies the winner's
    /// feedback to the drives. Always resolves to exactly one action.
    pub fn decide(&self, state: &mut StateManager, frame: &PerceptionFrame) -> Decision {
        if let Some(face) = &frame.face {
            state.update_face_target(FACE_PERSON_ID, face);
        }
        state.tick();

        let snapshot = state.snapshot();
        let decision = self.evaluate(&snapshot, frame).decision;

        state.apply_action_effects(decision.action);
        log::debug!("Decision: {}", decision);
        decision
    }

    /// Arbitrate over a snapshot without touching any state.
    pub fn evaluate(&self, snapshot: &DriveSnapshot, frame: &PerceptionFrame) -> Evaluation {
        if let Some(fired) = check_overrides(snapshot, frame, &self.config) {
            return Evaluation {
                decision: Decision {
                    action: fired.action,
                    reason: fired.reason.to_string(),
                    tier: fired.tier,
                    score: None,
                    face: frame.face,
                    gesture: frame.gesture.clone(),
                },
                candidates: Vec::new(),
            };
        }

        let candidates = score_candidates(snapshot, frame.face.is_some(), &self.config.weights);
        let winner = select_winner(&candidates).unwrap_or(Candidate {
            action: ActionId::LookAround,
            score: self.config.weights.look_around_baseline,
        });
        Evaluation {
            decision: Decision {
                action: winner.action,
                reason: format!("utility score: {:.2}", winner.score),
                tier: DecisionTier::Utility,
                score: Some(winner.score),
                face: frame.face,
                gesture: frame.gesture.clone(),
            },
            candidates,
        }
    }
}
