//! Brain configuration.
//!
//! Every rate, threshold and scoring weight used by the state manager and
//! the decision engine lives here so it can be tuned in the field without a
//! rebuild. All sections deserialize with defaults, so a YAML file only needs
//! the keys it overrides:
//!
//! ```yaml
//! drives:
//!   boredom_timeout_secs: 20.0
//! arbitration:
//!   personal_space_area: 0.3
//!   weights:
//!     come_closer_weight: 2.5
//! ```

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::actions::ActionId;
use crate::error::ConfigError;

/// Environment variable naming an optional YAML config file.
pub const CONFIG_ENV_VAR: &str = "PIXI_CONFIG";

/// Highest accepted loop rate; keeps the cycle period well above zero.
pub const MAX_TARGET_HZ: f64 = 1000.0;

// ---------------------------------------------------------------------------
// Drives
// ---------------------------------------------------------------------------

/// Drive values at boot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InitialDrives {
    pub energy: f64,
    pub curiosity: f64,
    pub confidence: f64,
    pub attention_hunger: f64,
    pub excitement: f64,
    pub caution: f64,
}

impl Default for InitialDrives {
    fn default() -> Self {
        Self {
            energy: 0.85,
            curiosity: 0.65,
            confidence: 0.55,
            attention_hunger: 0.35,
            excitement: 0.45,
            caution: 0.3,
        }
    }
}

/// Homeostatic dynamics of the state manager.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DriveConfig {
    /// Idle seconds after which drive growth is accelerated.
    pub boredom_timeout_secs: f64,
    /// Linear energy drain per second.
    pub energy_decay_per_sec: f64,
    /// Curiosity growth per second.
    pub curiosity_rise_per_sec: f64,
    /// Attention-hunger growth per second.
    pub attention_rise_per_sec: f64,
    /// Growth multiplier applied once idle time passes the boredom timeout.
    pub boredom_multiplier: f64,
    /// Resting level excitement relaxes towards.
    pub excitement_rest: f64,
    /// Exponential relaxation coefficient for excitement (per second).
    pub excitement_decay_coeff: f64,
    /// Linear caution drain per second.
    pub caution_decay_per_sec: f64,
    /// Face area above which a visible face counts as close company.
    pub close_face_area: f64,
    /// Confidence gained per frame at full detection confidence.
    pub face_confidence_gain: f64,
    /// Capacity of the recent-action history.
    pub max_recent_actions: usize,
    /// Drive values at boot.
    pub initial: InitialDrives,
}

impl Default for DriveConfig {
    fn default() -> Self {
        Self {
            boredom_timeout_secs: 15.0,
            energy_decay_per_sec: 0.0015,
            curiosity_rise_per_sec: 0.004,
            attention_rise_per_sec: 0.015,
            boredom_multiplier: 1.5,
            excitement_rest: 0.2,
            excitement_decay_coeff: 0.1,
            caution_decay_per_sec: 0.025,
            close_face_area: 0.2,
            face_confidence_gain: 0.02,
            max_recent_actions: 8,
            initial: InitialDrives::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Arbitration
// ---------------------------------------------------------------------------

/// Weights and gates of the utility-scoring pool.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    pub follow_hunger_weight: f64,
    pub follow_bias: f64,
    pub greet_score: f64,
    pub greet_curiosity_threshold: f64,
    pub search_hunger_threshold: f64,
    pub search_hunger_weight: f64,
    pub dance_weight: f64,
    pub look_around_baseline: f64,
    pub nap_boredom_weight: f64,
    pub nap_fatigue_weight: f64,
    pub nap_threshold: f64,
    pub tilt_curiosity_threshold: f64,
    pub tilt_curiosity_weight: f64,
    pub come_closer_threshold: f64,
    pub come_closer_weight: f64,
    pub stretch_boredom_min: f64,
    pub stretch_boredom_max: f64,
    pub stretch_weight: f64,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            follow_hunger_weight: 2.0,
            follow_bias: 0.5,
            greet_score: 1.2,
            greet_curiosity_threshold: 0.6,
            search_hunger_threshold: 0.7,
            search_hunger_weight: 1.5,
            dance_weight: 0.7,
            look_around_baseline: 0.2,
            nap_boredom_weight: 1.0,
            nap_fatigue_weight: 0.5,
            nap_threshold: 0.8,
            tilt_curiosity_threshold: 0.5,
            tilt_curiosity_weight: 1.2,
            come_closer_threshold: 0.85,
            come_closer_weight: 3.0,
            stretch_boredom_min: 0.4,
            stretch_boredom_max: 0.8,
            stretch_weight: 0.8,
        }
    }
}

/// Override thresholds plus the scoring weights.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArbitrationConfig {
    /// Energy below which the survival override forces sleep.
    pub low_energy_threshold: f64,
    /// Face area above which the personal-space override backs away.
    pub personal_space_area: f64,
    pub weights: ScoringWeights,
}

impl Default for ArbitrationConfig {
    fn default() -> Self {
        Self {
            low_energy_threshold: 0.15,
            personal_space_area: 0.28,
            weights: ScoringWeights::default(),
        }
    }
}

// ---------------------------------------------------------------------------
// Runtime
// ---------------------------------------------------------------------------

/// Cycle loop and worker settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RuntimeConfig {
    /// Decision cycles per second.
    pub target_hz: f64,
    /// Capacity of the bounded hotword event queue.
    pub hotword_queue_capacity: usize,
    /// A published face older than this is treated as absent.
    pub face_max_age_ms: u64,
    /// Pause after a voice response so the gesture can play out.
    pub post_voice_pause_ms: u64,
    /// Bounded join timeout for background workers.
    pub worker_join_timeout_ms: u64,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            target_hz: 30.0,
            hotword_queue_capacity: 16,
            face_max_age_ms: 250,
            post_voice_pause_ms: 2000,
            worker_join_timeout_ms: 1000,
        }
    }
}

impl RuntimeConfig {
    /// Duration of one cycle at the target rate.
    pub fn cycle_period(&self) -> Duration {
        Duration::from_secs_f64(1.0 / self.target_hz)
    }

    pub fn face_max_age(&self) -> Duration {
        Duration::from_millis(self.face_max_age_ms)
    }

    pub fn post_voice_pause(&self) -> Duration {
        Duration::from_millis(self.post_voice_pause_ms)
    }

    pub fn worker_join_timeout(&self) -> Duration {
        Duration::from_millis(self.worker_join_timeout_ms)
    }
}

// ---------------------------------------------------------------------------
// Speech
// ---------------------------------------------------------------------------

/// Recording parameters for the post-hotword utterance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpeechCaptureConfig {
    pub sample_rate: u32,
    /// Samples per frame delivered by the recorder.
    pub frame_length: usize,
    pub max_duration_secs: f64,
    pub min_duration_secs: f64,
    pub silence_timeout_secs: f64,
    /// RMS level below which a frame counts as silence.
    pub silence_threshold: f64,
    /// Deadline for the speech-to-text backend.
    pub transcribe_timeout_ms: u64,
}

impl SpeechCaptureConfig {
    pub fn transcribe_timeout(&self) -> Duration {
        Duration::from_millis(self.transcribe_timeout_ms)
    }
}

impl Default for SpeechCaptureConfig {
    fn default() -> Self {
        Self {
            sample_rate: 16_000,
            frame_length: 512,
            max_duration_secs: 4.5,
            min_duration_secs: 0.35,
            silence_timeout_secs: 0.8,
            silence_threshold: 550.0,
            transcribe_timeout_ms: 8_000,
        }
    }
}

// ---------------------------------------------------------------------------
// Reasoning
// ---------------------------------------------------------------------------

/// Reasoning delegate settings. Credentials come from the environment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReasoningConfig {
    /// Model override; provider default when `None`.
    pub model: Option<String>,
    pub temperature: f64,
    pub timeout_ms: u64,
    /// Action used when the delegate fails or answers nonsense.
    pub fallback_action: ActionId,
}

impl Default for ReasoningConfig {
    fn default() -> Self {
        Self {
            model: None,
            temperature: 0.4,
            timeout_ms: 8000,
            fallback_action: ActionId::TiltHeadCuriously,
        }
    }
}

impl ReasoningConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

// ---------------------------------------------------------------------------
// Telemetry
// ---------------------------------------------------------------------------

/// Telemetry HTTP surface.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Bind address such as `0.0.0.0:8080`; the server is off when `None`.
    pub bind_addr: Option<String>,
}

// ---------------------------------------------------------------------------
// BrainConfig
// ---------------------------------------------------------------------------

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrainConfig {
    pub drives: DriveConfig,
    pub arbitration: ArbitrationConfig,
    pub runtime: RuntimeConfig,
    pub speech: SpeechCaptureConfig,
    pub reasoning: ReasoningConfig,
    pub telemetry: TelemetryConfig,
}

impl BrainConfig {
    /// Parse and validate a YAML document.
    pub fn from_yaml_str(yaml: &str) -> Result<Self, ConfigError> {
        let config: BrainConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_yaml_str(&content)
    }

    /// Load from the file named by `PIXI_CONFIG`, or defaults when unset.
    pub fn load() -> Result<Self, ConfigError> {
        match std::env::var(CONFIG_ENV_VAR) {
            Ok(path) if !path.trim().is_empty() => {
                log::info!("Loading brain config from {}", path);
                Self::from_file(path)
            }
            _ => {
                log::debug!("{} not set, using default brain config", CONFIG_ENV_VAR);
                Ok(Self::default())
            }
        }
    }

    /// Reject values that would make the dynamics or the loop meaningless.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let d = &self.drives;
        positive("drives.boredom_timeout_secs", d.boredom_timeout_secs)?;
        non_negative("drives.energy_decay_per_sec", d.energy_decay_per_sec)?;
        non_negative("drives.curiosity_rise_per_sec", d.curiosity_rise_per_sec)?;
        non_negative("drives.attention_rise_per_sec", d.attention_rise_per_sec)?;
        non_negative("drives.excitement_decay_coeff", d.excitement_decay_coeff)?;
        non_negative("drives.caution_decay_per_sec", d.caution_decay_per_sec)?;
        if !d.boredom_multiplier.is_finite() || d.boredom_multiplier < 1.0 {
            return Err(ConfigError::invalid(
                "drives.boredom_multiplier",
                "must be at least 1.0",
            ));
        }
        unit("drives.excitement_rest", d.excitement_rest)?;
        unit("drives.close_face_area", d.close_face_area)?;
        if d.max_recent_actions == 0 {
            return Err(ConfigError::invalid(
                "drives.max_recent_actions",
                "must be at least 1",
            ));
        }
        let i = &d.initial;
        unit("drives.initial.energy", i.energy)?;
        unit("drives.initial.curiosity", i.curiosity)?;
        unit("drives.initial.confidence", i.confidence)?;
        unit("drives.initial.attention_hunger", i.attention_hunger)?;
        unit("drives.initial.excitement", i.excitement)?;
        unit("drives.initial.caution", i.caution)?;

        let a = &self.arbitration;
        unit("arbitration.low_energy_threshold", a.low_energy_threshold)?;
        unit("arbitration.personal_space_area", a.personal_space_area)?;
        let w = &a.weights;
        for (field, value) in [
            ("follow_hunger_weight", w.follow_hunger_weight),
            ("follow_bias", w.follow_bias),
            ("greet_score", w.greet_score),
            ("search_hunger_weight", w.search_hunger_weight),
            ("dance_weight", w.dance_weight),
            ("look_around_baseline", w.look_around_baseline),
            ("nap_boredom_weight", w.nap_boredom_weight),
            ("nap_fatigue_weight", w.nap_fatigue_weight),
            ("nap_threshold", w.nap_threshold),
            ("tilt_curiosity_weight", w.tilt_curiosity_weight),
            ("come_closer_weight", w.come_closer_weight),
            ("stretch_weight", w.stretch_weight),
        ] {
            non_negative(&format!("arbitration.weights.{}", field), value)?;
        }
        for (field, value) in [
            ("greet_curiosity_threshold", w.greet_curiosity_threshold),
            ("search_hunger_threshold", w.search_hunger_threshold),
            ("tilt_curiosity_threshold", w.tilt_curiosity_threshold),
            ("come_closer_threshold", w.come_closer_threshold),
            ("stretch_boredom_min", w.stretch_boredom_min),
            ("stretch_boredom_max", w.stretch_boredom_max),
        ] {
            unit(&format!("arbitration.weights.{}", field), value)?;
        }
        if w.stretch_boredom_min >= w.stretch_boredom_max {
            return Err(ConfigError::invalid(
                "arbitration.weights.stretch_boredom_min",
                "must be below stretch_boredom_max",
            ));
        }

        positive("runtime.target_hz", self.runtime.target_hz)?;
        if self.runtime.target_hz > MAX_TARGET_HZ {
            return Err(ConfigError::invalid(
                "runtime.target_hz",
                format!("must not exceed {} Hz", MAX_TARGET_HZ),
            ));
        }
        if self.runtime.hotword_queue_capacity == 0 {
            return Err(ConfigError::invalid(
                "runtime.hotword_queue_capacity",
                "must be at least 1",
            ));
        }

        let s = &self.speech;
        if s.sample_rate == 0 || s.frame_length == 0 {
            return Err(ConfigError::invalid(
                "speech",
                "sample_rate and frame_length must be non-zero",
            ));
        }
        positive("speech.max_duration_secs", s.max_duration_secs)?;
        non_negative("speech.min_duration_secs", s.min_duration_secs)?;
        non_negative("speech.silence_timeout_secs", s.silence_timeout_secs)?;
        non_negative("speech.silence_threshold", s.silence_threshold)?;
        if s.transcribe_timeout_ms == 0 {
            return Err(ConfigError::invalid(
                "speech.transcribe_timeout_ms",
                "must be at least 1",
            ));
        }

        non_negative("reasoning.temperature", self.reasoning.temperature)?;
        Ok(())
    }
}

fn positive(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(field, format!("must be positive, got {}", value)))
    }
}

fn non_negative(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be non-negative, got {}", value),
        ))
    }
}

fn unit(field: &str, value: f64) -> Result<(), ConfigError> {
    if value.is_finite() && (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must lie in [0, 1], got {}", value),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults_are_valid() {
        let config = BrainConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.arbitration.low_energy_threshold, 0.15);
        assert_eq!(config.arbitration.personal_space_area, 0.28);
        assert_eq!(config.drives.boredom_timeout_secs, 15.0);
        assert_eq!(config.reasoning.fallback_action, ActionId::TiltHeadCuriously);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
drives:
  boredom_timeout_secs: 20.0
arbitration:
  weights:
    come_closer_weight: 2.5
reasoning:
  fallback_action: LOOK_AROUND
"#;
        let config = BrainConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.drives.boredom_timeout_secs, 20.0);
        assert_eq!(config.drives.energy_decay_per_sec, 0.0015);
        assert_eq!(config.arbitration.weights.come_closer_weight, 2.5);
        assert_eq!(config.arbitration.weights.follow_bias, 0.5);
        assert_eq!(config.reasoning.fallback_action, ActionId::LookAround);
        assert_eq!(config.runtime.target_hz, 30.0);
    }

    #[test]
    fn test_rejects_out_of_range_threshold() {
        let yaml = "arbitration:\n  personal_space_area: 1.5\n";
        let err = BrainConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "arbitration.personal_space_area"));
    }

    #[test]
    fn test_rejects_inverted_stretch_band() {
        let yaml = "arbitration:\n  weights:\n    stretch_boredom_min: 0.9\n";
        assert!(BrainConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_rejects_zero_rate() {
        let yaml = "runtime:\n  target_hz: 0.0\n";
        assert!(BrainConfig::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn test_rejects_rate_too_fast_for_interval() {
        let yaml = "runtime:\n  target_hz: 1.0e12\n";
        let err = BrainConfig::from_yaml_str(yaml).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { ref field, .. } if field == "runtime.target_hz"));

        let yaml = "runtime:\n  target_hz: 1000.0\n";
        let config = BrainConfig::from_yaml_str(yaml).unwrap();
        assert!(!config.runtime.cycle_period().is_zero());
    }

    #[test]
    fn test_rejects_zero_transcribe_timeout() {
        let yaml = "speech:\n  transcribe_timeout_ms: 0\n";
        assert!(BrainConfig::from_yaml_str(yaml).is_err());
        assert_eq!(
            SpeechCaptureConfig::default().transcribe_timeout(),
            Duration::from_secs(8)
        );
    }

    #[test]
    fn test_malformed_yaml_is_parse_error() {
        let err = BrainConfig::from_yaml_str("drives: [not, a, map]").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "runtime:\n  target_hz: 10.0").unwrap();
        let config = BrainConfig::from_file(file.path()).unwrap();
        assert_eq!(config.runtime.target_hz, 10.0);
        assert_eq!(config.runtime.cycle_period().as_millis(), 100);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = BrainConfig::from_file("/definitely/not/here.yaml").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }
}
