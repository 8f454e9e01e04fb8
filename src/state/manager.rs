//! StateManager: homeostatic drive dynamics.
//!
//! The manager owns the only [`DriveState`]. Callers read it through
//! [`StateManager::snapshot`] and mutate it through the four operations
//! below, all driven from the decision loop:
//!
//! - [`tick`](StateManager::tick) advances time-dependent dynamics
//! - [`register_interaction`](StateManager::register_interaction) marks social contact
//! - [`update_face_target`](StateManager::update_face_target) feeds a visible face
//! - [`apply_action_effects`](StateManager::apply_action_effects) applies post-action feedback

use std::sync::Arc;

use super::drive_state::{clamp, Drive, DriveState};
use super::effects::{effect_for, Adjust};
use super::mood::Mood;
use super::snapshot::{DriveSnapshot, TelemetrySnapshot};
use crate::actions::ActionId;
use crate::clock::{Clock, SystemClock};
use crate::config::DriveConfig;
use crate::perception::FaceTarget;

// ---------------------------------------------------------------------------
// Interaction constants
// ---------------------------------------------------------------------------

const INTERACTION_CURIOSITY_DROP: f64 = 0.1;
const INTERACTION_CURIOSITY_FLOOR: f64 = 0.2;
const INTERACTION_CONFIDENCE_GAIN: f64 = 0.05;
const INTERACTION_HUNGER_DROP: f64 = 0.25;
const INTERACTION_EXCITEMENT_GAIN: f64 = 0.04;
const INTERACTION_EXCITEMENT_FLOOR: f64 = 0.1;
const INTERACTION_CAUTION_DROP: f64 = 0.05;
const CAUTION_FLOOR: f64 = 0.1;
const CURIOSITY_TICK_FLOOR: f64 = 0.1;
/// Caution relief per unit of confidence gained from a face.
const FACE_CAUTION_RELIEF: f64 = 0.6;
/// Hunger relief per frame while company is close.
const CLOSE_FACE_HUNGER_RELIEF: f64 = 0.01;

/// Owner of the drive state.
#[derive(Debug)]
pub struct StateManager {
    state: DriveState,
    config: DriveConfig,
    clock: Arc<dyn Clock>,
    last_interaction: f64,
    last_tick: f64,
}

impl StateManager {
    /// Manager on the system clock with the configured initial drives.
    pub fn new(config: DriveConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    pub fn with_clock(config: DriveConfig, clock: Arc<dyn Clock>) -> Self {
        let state = DriveState::from_initial(&config.initial);
        Self::with_state(config, clock, state)
    }

    /// Start from an explicit drive vector (clamped on entry).
    pub fn with_state(config: DriveConfig, clock: Arc<dyn Clock>, mut state: DriveState) -> Self {
        state.clamp_all();
        let now = clock.now_secs();
        Self {
            state,
            config,
            clock,
            last_interaction: now,
            last_tick: now,
        }
    }

    pub fn config(&self) -> &DriveConfig {
        &self.config
    }

    pub fn mood(&self) -> Mood {
        self.state.mood
    }

    /// Seconds since the last interaction, never negative.
    pub fn time_since_last_interaction(&self) -> f64 {
        (self.clock.now_secs() - self.last_interaction).max(0.0)
    }

    /// Boredom in `[0, 1]`, saturating at three boredom timeouts of idleness.
    pub fn boredom(&self) -> f64 {
        let span = self.config.boredom_timeout_secs * 3.0;
        clamp(self.time_since_last_interaction() / span, 0.0, 1.0)
    }

    // -----------------------------------------------------------------------
    // Dynamics
    // -----------------------------------------------------------------------

    /// Advance the dynamics by the wall time elapsed since the previous tick.
    ///
    /// A clock that moved backwards yields zero elapsed time.
    pub fn tick(&mut self) {
        let now = self.clock.now_secs();
        let delta = (now - self.last_tick).max(0.0);
        self.last_tick = now;
        self.advance(delta);
    }

    /// Apply `delta` seconds of dynamics. Non-positive deltas are a no-op.
    pub fn advance(&mut self, delta: f64) {
        if !(delta > 0.0) {
            return;
        }
        let c = &self.config;
        let multiplier = if self.time_since_last_interaction() > c.boredom_timeout_secs {
            c.boredom_multiplier
        } else {
            1.0
        };

        let s = &mut self.state;
        s.set_clamped(Drive::Energy, s.energy - c.energy_decay_per_sec * delta, 0.0);
        s.set_clamped(
            Drive::Curiosity,
            s.curiosity + c.curiosity_rise_per_sec * delta * multiplier,
            CURIOSITY_TICK_FLOOR,
        );
        s.set_clamped(
            Drive::AttentionHunger,
            s.attention_hunger + c.attention_rise_per_sec * delta * multiplier,
            0.0,
        );
        s.set_clamped(
            Drive::Excitement,
            s.excitement + (c.excitement_rest - s.excitement) * c.excitement_decay_coeff * delta,
            0.0,
        );
        s.set_clamped(Drive::Caution, s.caution - c.caution_decay_per_sec * delta, 0.0);
    }

    /// Record social contact, optionally naming who it was with.
    pub fn register_interaction(&mut self, person: Option<&str>) {
        self.last_interaction = self.clock.now_secs();
        let s = &mut self.state;
        s.set_clamped(
            Drive::Curiosity,
            s.curiosity - INTERACTION_CURIOSITY_DROP,
            INTERACTION_CURIOSITY_FLOOR,
        );
        s.set_clamped(Drive::Confidence, s.confidence + INTERACTION_CONFIDENCE_GAIN, 0.0);
        s.set_clamped(
            Drive::AttentionHunger,
            s.attention_hunger - INTERACTION_HUNGER_DROP,
            0.0,
        );
        s.set_clamped(
            Drive::Excitement,
            s.excitement + INTERACTION_EXCITEMENT_GAIN,
            INTERACTION_EXCITEMENT_FLOOR,
        );
        s.set_clamped(Drive::Caution, s.caution - INTERACTION_CAUTION_DROP, CAUTION_FLOOR);
        if let Some(person) = person {
            s.recognized_person = Some(person.to_string());
        }
    }

    /// Feed the primary visible face. Refreshes the idle timer.
    pub fn update_face_target(&mut self, person_id: &str, face: &FaceTarget) {
        self.last_interaction = self.clock.now_secs();
        let gain = self.config.face_confidence_gain * clamp(face.confidence, 0.0, 1.0);
        let close = face.area > self.config.close_face_area;

        let s = &mut self.state;
        s.recognized_person = Some(person_id.to_string());
        s.set_clamped(Drive::Confidence, s.confidence + gain, 0.0);
        s.set_clamped(
            Drive::Caution,
            s.caution - gain * FACE_CAUTION_RELIEF,
            CAUTION_FLOOR,
        );
        if close {
            s.set_clamped(
                Drive::AttentionHunger,
                s.attention_hunger - CLOSE_FACE_HUNGER_RELIEF,
                0.0,
            );
        }
    }

    /// Post-action feedback: history, drive adjustments, mood.
    ///
    /// Social actions also count as an interaction with the recognized
    /// person.
    pub fn apply_action_effects(&mut self, action: ActionId) {
        self.state
            .record_action(action, self.config.max_recent_actions.max(1));

        let effect = effect_for(action);
        for (drive, adjust) in effect.adjustments {
            let slot = self.state.get_mut(*drive);
            match adjust {
                Adjust::By(delta) => *slot += delta,
                Adjust::To(value) => *slot = *value,
            }
        }
        self.state.clamp_all();
        if let Some(mood) = effect.mood {
            self.set_mood(mood);
        }

        if action.is_social() {
            let person = self.state.recognized_person.clone();
            self.register_interaction(person.as_deref());
        }
    }

    fn set_mood(&mut self, mood: Mood) {
        if self.state.mood != mood {
            log::debug!("Mood {} -> {}", self.state.mood, mood);
            self.state.mood = mood;
        }
    }

    // -----------------------------------------------------------------------
    // Views
    // -----------------------------------------------------------------------

    /// Unrounded copy used for arbitration.
    pub fn snapshot(&self) -> DriveSnapshot {
        let s = &self.state;
        DriveSnapshot {
            mood: s.mood,
            energy: s.energy,
            curiosity: s.curiosity,
            confidence: s.confidence,
            attention_hunger: s.attention_hunger,
            excitement: s.excitement,
            caution: s.caution,
            boredom: self.boredom(),
            idle_secs: self.time_since_last_interaction(),
            recognized_person: s.recognized_person.clone(),
            last_action: s.last_action,
            recent_actions: s.recent_actions.iter().copied().collect(),
        }
    }

    /// Rounded snapshot for telemetry.
    pub fn telemetry(&self) -> TelemetrySnapshot {
        self.snapshot().telemetry()
    }
}
