//! Utility scoring pool.
//!
//! Candidates are entered in a fixed order and the first maximum wins, so
//! exact ties resolve to the earlier entry:
//!
//! `FOLLOW_PERSON`, `GREET_HAPPILY`, `SEARCH_FOR_HUMAN`, `DO_A_HAPPY_DANCE`,
//! `LOOK_AROUND`, `GO_TO_SLEEP` (only when the nap score passes its
//! threshold), `TILT_HEAD_CURIOUSLY`, `COME_CLOSER`, `STRETCH`.

use serde::{Deserialize, Serialize};

use crate::actions::ActionId;
use crate::config::ScoringWeights;
use crate::state::DriveSnapshot;

/// One scored entry of the pool.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub action: ActionId,
    pub score: f64,
}

impl Candidate {
    fn new(action: ActionId, score: f64) -> Self {
        Self { action, score }
    }
}

/// Nap drive: idle boredom plus fatigue.
pub fn nap_score(snapshot: &DriveSnapshot, w: &ScoringWeights) -> f64 {
    snapshot.boredom * w.nap_boredom_weight + (1.0 - snapshot.energy) * w.nap_fatigue_weight
}

/// Score every candidate, in pool order.
pub fn score_candidates(
    snapshot: &DriveSnapshot,
    face_present: bool,
    w: &ScoringWeights,
) -> Vec<Candidate> {
    let hunger = snapshot.attention_hunger;
    let curiosity = snapshot.curiosity;
    let boredom = snapshot.boredom;

    let mut pool = Vec::with_capacity(9);
    pool.push(Candidate::new(
        ActionId::FollowPerson,
        if face_present {
            hunger * w.follow_hunger_weight + w.follow_bias
        } else {
            0.0
        },
    ));
    pool.push(Candidate::new(
        ActionId::GreetHappily,
        if face_present && curiosity > w.greet_curiosity_threshold {
            w.greet_score
        } else {
            0.0
        },
    ));
    pool.push(Candidate::new(
        ActionId::SearchForHuman,
        if !face_present && hunger > w.search_hunger_threshold {
            hunger * w.search_hunger_weight
        } else {
            0.0
        },
    ));
    pool.push(Candidate::new(
        ActionId::DoAHappyDance,
        snapshot.excitement * snapshot.energy * w.dance_weight,
    ));
    pool.push(Candidate::new(ActionId::LookAround, w.look_around_baseline));

    let nap = nap_score(snapshot, w);
    if nap > w.nap_threshold {
        pool.push(Candidate::new(ActionId::GoToSleep, nap));
    }

    pool.push(Candidate::new(
        ActionId::TiltHeadCuriously,
        if face_present && curiosity > w.tilt_curiosity_threshold {
            curiosity * w.tilt_curiosity_weight
        } else {
            0.0
        },
    ));
    pool.push(Candidate::new(
        ActionId::ComeCloser,
        if face_present && hunger > w.come_closer_threshold {
            hunger * w.come_closer_weight
        } else {
            0.0
        },
    ));
    pool.push(Candidate::new(
        ActionId::Stretch,
        if boredom > w.stretch_boredom_min && boredom < w.stretch_boredom_max {
            boredom * w.stretch_weight
        } else {
            0.0
        },
    ));
    pool
}

/// First candidate holding the maximum score.
pub fn select_winner(pool: &[Candidate]) -> Option<Candidate> {
    let mut best: Option<Candidate> = None;
    for candidate in pool {
        match best {
            Some(b) if candidate.score <= b.score => {}
            _ => best = Some(*candidate),
        }
    }
    best
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Mood;

    fn snapshot() -> DriveSnapshot {
        DriveSnapshot {
            mood: Mood::Curious,
            energy: 0.85,
            curiosity: 0.65,
            confidence: 0.55,
            attention_hunger: 0.35,
            excitement: 0.45,
            caution: 0.3,
            boredom: 0.0,
            idle_secs: 0.0,
            recognized_person: None,
            last_action: None,
            recent_actions: vec![],
        }
    }

    fn score_of(pool: &[Candidate], action: ActionId) -> Option<f64> {
        pool.iter().find(|c| c.action == action).map(|c| c.score)
    }

    #[test]
    fn test_pool_order_without_nap() {
        let pool = score_candidates(&snapshot(), true, &ScoringWeights::default());
        let order: Vec<ActionId> = pool.iter().map(|c| c.action).collect();
        assert_eq!(
            order,
            vec![
                ActionId::FollowPerson,
                ActionId::GreetHappily,
                ActionId::SearchForHuman,
                ActionId::DoAHappyDance,
                ActionId::LookAround,
                ActionId::TiltHeadCuriously,
                ActionId::ComeCloser,
                ActionId::Stretch,
            ]
        );
    }

    #[test]
    fn test_face_gated_candidates() {
        let w = ScoringWeights::default();
        let without = score_candidates(&snapshot(), false, &w);
        assert_eq!(score_of(&without, ActionId::FollowPerson), Some(0.0));
        assert_eq!(score_of(&without, ActionId::GreetHappily), Some(0.0));
        assert_eq!(score_of(&without, ActionId::TiltHeadCuriously), Some(0.0));

        let with = score_candidates(&snapshot(), true, &w);
        assert!((score_of(&with, ActionId::FollowPerson).unwrap() - 1.2).abs() < 1e-9);
        assert_eq!(score_of(&with, ActionId::GreetHappily), Some(1.2));
        assert!((score_of(&with, ActionId::TiltHeadCuriously).unwrap() - 0.78).abs() < 1e-9);
    }

    #[test]
    fn test_nap_included_above_threshold() {
        let mut snap = snapshot();
        snap.boredom = 0.85;
        snap.energy = 0.5;
        let w = ScoringWeights::default();
        assert!((nap_score(&snap, &w) - 1.1).abs() < 1e-9);
        let pool = score_candidates(&snap, false, &w);
        assert_eq!(pool[5].action, ActionId::GoToSleep);
        // Boredom past the stretch band.
        assert_eq!(score_of(&pool, ActionId::Stretch), Some(0.0));
        assert_eq!(select_winner(&pool).map(|c| c.action), Some(ActionId::GoToSleep));
    }

    #[test]
    fn test_nap_excluded_below_threshold() {
        let mut snap = snapshot();
        snap.boredom = 0.5;
        snap.energy = 0.5;
        let w = ScoringWeights::default();
        let pool = score_candidates(&snap, false, &w);
        assert_eq!(score_of(&pool, ActionId::GoToSleep), None);
        assert!((score_of(&pool, ActionId::Stretch).unwrap() - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_select_winner_prefers_first_on_tie() {
        let pool = [
            Candidate::new(ActionId::DoAHappyDance, 0.2),
            Candidate::new(ActionId::LookAround, 0.2),
            Candidate::new(ActionId::Stretch, 0.1),
        ];
        assert_eq!(select_winner(&pool).map(|c| c.action), Some(ActionId::DoAHappyDance));
        assert_eq!(select_winner(&[]), None);
    }
}
