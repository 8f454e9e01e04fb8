//! Post-hotword speech capture and transcription seams.
//!
//! Audio hardware and the speech-to-text model live behind
//! [`AudioFrameSource`] and [`Transcriber`]; this module only owns the
//! end-of-utterance logic.

use std::collections::VecDeque;

use async_trait::async_trait;

use crate::config::SpeechCaptureConfig;
use crate::error::PerceptionError;

/// Blocking source of mono PCM16 frames.
pub trait AudioFrameSource: Send {
    /// Read the next frame. An empty frame means the source is exhausted.
    fn read_frame(&mut self) -> Result<Vec<i16>, PerceptionError>;
}

/// Speech-to-text backend.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, pcm: &[i16], sample_rate: u32) -> Result<String, PerceptionError>;
}

/// Root-mean-square level of a frame.
pub fn frame_rms(frame: &[i16]) -> f64 {
    if frame.is_empty() {
        return 0.0;
    }
    let sum: f64 = frame.iter().map(|s| f64::from(*s).powi(2)).sum();
    (sum / frame.len() as f64).sqrt()
}

/// Record one utterance.
///
/// Stops at `max_duration_secs`, or once `min_duration_secs` has passed and
/// the level has stayed under `silence_threshold` for
/// `silence_timeout_secs`. Time is measured in samples, not wall clock.
pub fn capture_utterance(
    source: &mut dyn AudioFrameSource,
    config: &SpeechCaptureConfig,
) -> Result<Vec<i16>, PerceptionError> {
    let rate = f64::from(config.sample_rate.max(1));
    let mut samples: Vec<i16> = Vec::new();
    let mut silent_samples: usize = 0;

    loop {
        let frame = source.read_frame()?;
        if frame.is_empty() {
            log::debug!("Audio source exhausted after {} samples", samples.len());
            break;
        }
        if frame_rms(&frame) < config.silence_threshold {
            silent_samples += frame.len();
        } else {
            silent_samples = 0;
        }
        samples.extend_from_slice(&frame);

        let elapsed = samples.len() as f64 / rate;
        let silent = silent_samples as f64 / rate;
        if elapsed >= config.max_duration_secs {
            break;
        }
        if elapsed >= config.min_duration_secs && silent >= config.silence_timeout_secs {
            break;
        }
    }

    log::debug!("Captured {:.2}s of audio", samples.len() as f64 / rate);
    Ok(samples)
}

/// Frame source replaying pre-recorded frames.
#[derive(Debug, Clone, Default)]
pub struct ReplaySource {
    frames: VecDeque<Vec<i16>>,
}

impl ReplaySource {
    pub fn new(frames: impl IntoIterator<Item = Vec<i16>>) -> Self {
        Self {
            frames: frames.into_iter().collect(),
        }
    }

    /// `count` frames of constant `level`.
    pub fn constant(level: i16, frame_length: usize, count: usize) -> Self {
        Self::new(std::iter::repeat(vec![level; frame_length]).take(count))
    }

    pub fn remaining(&self) -> usize {
        self.frames.len()
    }
}

impl AudioFrameSource for ReplaySource {
    fn read_frame(&mut self) -> Result<Vec<i16>, PerceptionError> {
        Ok(self.frames.pop_front().unwrap_or_default())
    }
}
