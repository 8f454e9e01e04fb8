//! Voice pipeline: recorder, transcriber and reasoning delegate.

use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::SpeechCaptureConfig;
use crate::error::PerceptionError;
use crate::perception::{capture_utterance, AudioFrameSource, Transcriber};
use crate::reasoning::ReasoningDelegate;

/// Collaborators of the voice interrupt. Cheap to clone.
#[derive(Clone)]
pub struct VoicePipeline {
    source: Arc<Mutex<Box<dyn AudioFrameSource>>>,
    transcriber: Arc<dyn Transcriber>,
    delegate: Arc<dyn ReasoningDelegate>,
}

impl std::fmt::Debug for VoicePipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VoicePipeline").finish_non_exhaustive()
    }
}

impl VoicePipeline {
    pub fn new(
        source: impl AudioFrameSource + 'static,
        transcriber: Arc<dyn Transcriber>,
        delegate: Arc<dyn ReasoningDelegate>,
    ) -> Self {
        Self {
            source: Arc::new(Mutex::new(Box::new(source))),
            transcriber,
            delegate,
        }
    }

    pub fn delegate(&self) -> &dyn ReasoningDelegate {
        self.delegate.as_ref()
    }

    /// Record one utterance on a blocking thread.
    pub async fn capture(&self, config: &SpeechCaptureConfig) -> Result<Vec<i16>, PerceptionError> {
        let source = Arc::clone(&self.source);
        let config = config.clone();
        tokio::task::spawn_blocking(move || {
            let mut source = source.lock();
            capture_utterance(&mut **source, &config)
        })
        .await
        .map_err(|e| PerceptionError::WorkerLost(format!("speech capture: {}", e)))?
    }

    /// Capture and transcribe within the configured deadline. Returns the
    /// trimmed text, possibly empty.
    pub async fn listen(&self, config: &SpeechCaptureConfig) -> Result<String, PerceptionError> {
        let pcm = self.capture(config).await?;
        if pcm.is_empty() {
            return Ok(String::new());
        }
        let deadline = config.transcribe_timeout();
        let text = tokio::time::timeout(
            deadline,
            self.transcriber.transcribe(&pcm, config.sample_rate),
        )
        .await
        .map_err(|_| PerceptionError::TranscriptionTimeout(deadline.as_millis() as u64))??;
        Ok(text.trim().to_string())
    }
}
