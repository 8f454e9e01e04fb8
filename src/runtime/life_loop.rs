//! The fixed-rate decision loop.
//!
//! One task owns the [`StateManager`] and runs every cycle to completion:
//! drain hotwords (running the voice interrupt if one arrived), assemble the
//! perception frame, decide, dispatch, publish telemetry. Workers only ever
//! touch the [`PerceptionBus`].

use std::sync::Arc;

use chrono::Utc;
use tokio::sync::watch;
use tokio::time::MissedTickBehavior;

use super::report::{LoopReport, TelemetryFrame};
use super::voice::VoicePipeline;
use crate::actions::{ActionCatalogue, ActionId, DispatchContext};
use crate::config::BrainConfig;
use crate::engine::{Decision, DecisionEngine};
use crate::perception::{HotwordEvent, PerceptionBus, PerceptionPublisher, StopSignal};
use crate::reasoning::{resolve_or_fallback, ReasoningRequest};
use crate::state::StateManager;

/// Person id recorded for a voice interaction.
pub const VOICE_PERSON_ID: &str = "voice_user";

/// The robot's main loop.
#[derive(Debug)]
pub struct LifeLoop {
    config: BrainConfig,
    state: StateManager,
    engine: DecisionEngine,
    catalogue: Arc<ActionCatalogue>,
    bus: PerceptionBus,
    voice: Option<VoicePipeline>,
    telemetry: watch::Sender<Option<TelemetryFrame>>,
    report: LoopReport,
}

impl LifeLoop {
    /// Loop on the system clock.
    pub fn new(config: BrainConfig, catalogue: Arc<ActionCatalogue>) -> Self {
        let state = StateManager::new(config.drives.clone());
        Self::with_state(config, catalogue, state)
    }

    pub fn with_state(
        config: BrainConfig,
        catalogue: Arc<ActionCatalogue>,
        state: StateManager,
    ) -> Self {
        let bus = PerceptionBus::new(
            config.runtime.hotword_queue_capacity,
            config.runtime.face_max_age(),
        );
        let (telemetry, _) = watch::channel(None);
        Self {
            engine: DecisionEngine::new(config.arbitration.clone()),
            config,
            state,
            catalogue,
            bus,
            voice: None,
            telemetry,
            report: LoopReport::default(),
        }
    }

    pub fn with_voice(mut self, voice: VoicePipeline) -> Self {
        self.voice = Some(voice);
        self
    }

    /// Handle for perception workers.
    pub fn publisher(&self) -> PerceptionPublisher {
        self.bus.publisher()
    }

    /// Telemetry feed, `None` until the first cycle completes.
    pub fn subscribe(&self) -> watch::Receiver<Option<TelemetryFrame>> {
        self.telemetry.subscribe()
    }

    pub fn state(&self) -> &StateManager {
        &self.state
    }

    pub fn report(&self) -> &LoopReport {
        &self.report
    }

    // -----------------------------------------------------------------------
    // Cycle
    // -----------------------------------------------------------------------

    /// Run one complete cycle and return its decision.
    pub async fn run_cycle(&mut self) -> Decision {
        let hotwords = self.bus.drain_hotwords();
        if let Some(event) = hotwords.first() {
            if hotwords.len() > 1 {
                log::debug!("Coalescing {} hotword events", hotwords.len());
            }
            self.voice_interrupt(event).await;
        }

        let frame = self.bus.frame();
        let decision = self.engine.decide(&mut self.state, &frame);
        self.dispatch(decision.action, &decision.dispatch_context());

        self.report.cycles += 1;
        let frame = TelemetryFrame {
            cycle: self.report.cycles,
            timestamp: Utc::now(),
            decision: decision.clone(),
            state: self.state.telemetry(),
        };
        self.telemetry.send_replace(Some(frame));
        decision
    }

    /// Run at the configured rate until `shutdown` fires.
    pub async fn run(mut self, shutdown: StopSignal) -> LoopReport {
        let period = self.config.runtime.cycle_period();
        let mut interval = tokio::time::interval(period);
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        log::info!(
            "Life loop started at {:.0} Hz (voice {})",
            self.config.runtime.target_hz,
            if self.voice.is_some() { "on" } else { "off" }
        );

        loop {
            tokio::select! {
                _ = shutdown.stopped() => break,
                _ = interval.tick() => {
                    self.run_cycle().await;
                }
            }
        }

        log::info!(
            "Life loop stopped after {} cycles ({} voice interrupts)",
            self.report.cycles,
            self.report.voice_interrupts
        );
        self.report
    }

    fn dispatch(&mut self, action: ActionId, context: &DispatchContext) {
        let outcome = self.catalogue.dispatch(action, context);
        self.report.record_dispatch(action, &outcome);
    }

    // -----------------------------------------------------------------------
    // Voice interrupt
    // -----------------------------------------------------------------------

    /// Blocking voice sub-sequence: listen, transcribe, resolve, react.
    async fn voice_interrupt(&mut self, event: &HotwordEvent) {
        let Some(voice) = self.voice.clone() else {
            log::debug!("Hotword '{}' ignored, no voice pipeline", event.keyword);
            return;
        };
        log::info!("Heard wake word '{}'", event.keyword);
        self.report.voice_interrupts += 1;

        self.dispatch(ActionId::ListenToUser, &DispatchContext::default());
        self.state.apply_action_effects(ActionId::ListenToUser);

        let text = match voice.listen(&self.config.speech).await {
            Ok(text) => text,
            Err(e) => {
                log::warn!("Voice capture failed: {}", e);
                return;
            }
        };
        if text.is_empty() {
            log::info!("Heard silence");
            return;
        }
        log::info!("User said '{}'", text);

        self.state.tick();
        self.state.register_interaction(Some(VOICE_PERSON_ID));
        let request = ReasoningRequest::new(text, self.state.telemetry(), &self.catalogue);
        let reasoning = &self.config.reasoning;
        let action = resolve_or_fallback(
            voice.delegate(),
            &request,
            reasoning.timeout(),
            reasoning.fallback_action,
        )
        .await;

        self.dispatch(action, &DispatchContext::default());
        self.state.apply_action_effects(action);

        let pause = self.config.runtime.post_voice_pause();
        if !pause.is_zero() {
            tokio::time::sleep(pause).await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actions::action_handler;
    use crate::clock::ManualClock;
    use crate::error::{HandlerError, PerceptionError, ReasoningError};
    use crate::perception::{FaceTarget, ReplaySource, Transcriber};
    use crate::reasoning::ReasoningDelegate;
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct Echo(&'static str);

    #[async_trait]
    impl Transcriber for Echo {
        async fn transcribe(&self, _pcm: &[i16], _rate: u32) -> Result<String, PerceptionError> {
            Ok(self.0.to_string())
        }
    }

    #[derive(Default)]
    struct Counting {
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ReasoningDelegate for Counting {
        async fn resolve(&self, request: &ReasoningRequest) -> Result<ActionId, ReasoningError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if request.utterance.contains("hello") {
                Ok(ActionId::GreetHappily)
            } else {
                Err(ReasoningError::Malformed("no idea".into()))
            }
        }
    }

    fn config() -> BrainConfig {
        let mut config = BrainConfig::default();
        config.runtime.post_voice_pause_ms = 0;
        config
    }

    fn recording_catalogue() -> (Arc<ActionCatalogue>, Arc<Mutex<Vec<ActionId>>>) {
        let catalogue = ActionCatalogue::with_defaults();
        let log = Arc::new(Mutex::new(Vec::new()));
        for id in ActionId::ALL {
            let log = Arc::clone(&log);
            catalogue.attach_handler(
                id,
                action_handler(move |id, _| {
                    log.lock().push(id);
                    Ok(())
                }),
            );
        }
        (Arc::new(catalogue), log)
    }

    fn life_loop(catalogue: Arc<ActionCatalogue>) -> LifeLoop {
        let config = config();
        let state = StateManager::with_clock(config.drives.clone(), Arc::new(ManualClock::new()));
        LifeLoop::with_state(config, catalogue, state)
    }

    fn voice(transcript: &'static str, delegate: Arc<Counting>) -> VoicePipeline {
        let speech = std::iter::repeat(vec![3000i16; 512]).take(20);
        let silence = std::iter::repeat(vec![0i16; 512]).take(40);
        VoicePipeline::new(
            ReplaySource::new(speech.chain(silence)),
            Arc::new(Echo(transcript)),
            delegate,
        )
    }

    #[tokio::test]
    async fn test_cycle_dispatches_decision() {
        let (catalogue, log) = recording_catalogue();
        let mut life = life_loop(catalogue);
        life.publisher()
            .publish_face(FaceTarget::new(0.5, 0.5, 0.5, 0.9));
        let decision = life.run_cycle().await;
        assert_eq!(decision.action, ActionId::BackAwayScared);
        assert_eq!(*log.lock(), vec![ActionId::BackAwayScared]);
        assert_eq!(life.report().cycles, 1);
    }

    #[tokio::test]
    async fn test_telemetry_published_each_cycle() {
        let (catalogue, _) = recording_catalogue();
        let mut life = life_loop(catalogue);
        let rx = life.subscribe();
        assert!(rx.borrow().is_none());
        life.run_cycle().await;
        life.run_cycle().await;
        let frame = rx.borrow().clone().unwrap();
        assert_eq!(frame.cycle, 2);
        assert_eq!(frame.state.last_action, frame.decision.action.as_str());
    }

    #[tokio::test]
    async fn test_gesture_consumed_once() {
        let (catalogue, _) = recording_catalogue();
        let mut life = life_loop(catalogue);
        life.publisher().publish_gesture("Thumb_Up".into());
        assert_eq!(life.run_cycle().await.action, ActionId::DoAHappyDance);
        assert!(!life.run_cycle().await.tier.is_override());
    }

    #[tokio::test]
    async fn test_voice_interrupt_sequence() {
        let (catalogue, log) = recording_catalogue();
        let delegate = Arc::new(Counting::default());
        let mut life = life_loop(catalogue).with_voice(voice("hello pixi", Arc::clone(&delegate)));
        assert!(life.publisher().hotword("pixi"));

        life.run_cycle().await;

        let dispatched = log.lock().clone();
        assert_eq!(dispatched[0], ActionId::ListenToUser);
        assert_eq!(dispatched[1], ActionId::GreetHappily);
        assert_eq!(dispatched.len(), 3);
        assert_eq!(delegate.calls.load(Ordering::SeqCst), 1);
        assert_eq!(life.report().voice_interrupts, 1);
        assert_eq!(
            life.state().snapshot().recognized_person.as_deref(),
            Some(VOICE_PERSON_ID)
        );
    }

    #[tokio::test]
    async fn test_delegate_failure_falls_back_to_confusion() {
        let (catalogue, log) = recording_catalogue();
        let delegate = Arc::new(Counting::default());
        let mut life = life_loop(catalogue).with_voice(voice("what is entropy", delegate));
        life.publisher().hotword("pixi");
        life.run_cycle().await;
        assert_eq!(log.lock()[1], ActionId::TiltHeadCuriously);
    }

    #[tokio::test]
    async fn test_silence_skips_delegate() {
        let (catalogue, log) = recording_catalogue();
        let delegate = Arc::new(Counting::default());
        let mut life = life_loop(catalogue).with_voice(voice("   ", Arc::clone(&delegate)));
        life.publisher().hotword("pixi");
        life.run_cycle().await;
        assert_eq!(delegate.calls.load(Ordering::SeqCst), 0);
        assert_eq!(log.lock().len(), 2);
        assert_eq!(log.lock()[0], ActionId::ListenToUser);
    }

    #[tokio::test]
    async fn test_hotword_without_voice_is_ignored() {
        let (catalogue, log) = recording_catalogue();
        let mut life = life_loop(catalogue);
        life.publisher().hotword("pixi");
        life.run_cycle().await;
        assert_eq!(life.report().voice_interrupts, 0);
        assert_eq!(log.lock().len(), 1);
    }

    #[tokio::test]
    async fn test_failing_handler_does_not_stop_loop() {
        let catalogue = ActionCatalogue::with_defaults();
        for id in ActionId::ALL {
            catalogue.attach_handler(
                id,
                action_handler(|_, _| Err(HandlerError::Driver("servo jammed".into()))),
            );
        }
        let mut life = life_loop(Arc::new(catalogue));
        life.run_cycle().await;
        life.run_cycle().await;
        assert_eq!(life.report().cycles, 2);
        assert_eq!(life.report().dispatch_failures, 2);
    }

    #[tokio::test]
    async fn test_run_until_shutdown() {
        let (catalogue, _) = recording_catalogue();
        let mut config = config();
        config.runtime.target_hz = 200.0;
        let life = LifeLoop::new(config, catalogue);
        let shutdown = StopSignal::new();
        let task = tokio::spawn(life.run(shutdown.clone()));
        tokio::time::sleep(Duration::from_millis(60)).await;
        shutdown.stop();
        let report = tokio::time::timeout(Duration::from_secs(2), task)
            .await
            .unwrap()
            .unwrap();
        assert!(report.cycles > 0);
        assert_eq!(report.actions.values().sum::<u64>(), report.cycles);
    }
}
