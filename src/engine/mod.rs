//! Arbitration: override cascade, utility scoring and the engine that
//! combines them into one [`Decision`] per cycle.

pub mod cascade;
pub mod decision;
pub mod decision_engine;
pub mod scoring;

pub use cascade::{check_overrides, Override};
pub use decision::{Decision, DecisionTier};
pub use decision_engine::{DecisionEngine, Evaluation, FACE_PERSON_ID};
pub use scoring::{nap_score, score_candidates, select_winner, Candidate};
