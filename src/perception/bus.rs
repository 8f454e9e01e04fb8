//! Perception bus between worker tasks and the decision loop.
//!
//! Workers publish through a cloned [`PerceptionPublisher`]; the loop owns
//! the single [`PerceptionBus`] and assembles one [`PerceptionFrame`] per
//! cycle from it. Faces and gestures are latest-value slots, hotwords go
//! through a bounded queue so none are silently coalesced.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use super::types::{CycleFlags, FaceTarget, Gesture, PerceptionFrame};

// ---------------------------------------------------------------------------
// LatestSlot
// ---------------------------------------------------------------------------

/// Single-value cache that keeps only the most recent publication.
#[derive(Debug)]
pub struct LatestSlot<T> {
    inner: Mutex<Option<(T, Instant)>>,
}

impl<T> Default for LatestSlot<T> {
    fn default() -> Self {
        Self {
            inner: Mutex::new(None),
        }
    }
}

impl<T: Clone> LatestSlot<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the held value.
    pub fn publish(&self, value: T) {
        *self.inner.lock() = Some((value, Instant::now()));
    }

    pub fn clear(&self) {
        *self.inner.lock() = None;
    }

    /// Remove and return the held value.
    pub fn take(&self) -> Option<T> {
        self.inner.lock().take().map(|(value, _)| value)
    }

    /// Copy of the held value if it was published within `max_age`.
    pub fn peek_fresh(&self, max_age: Duration) -> Option<T> {
        self.inner
            .lock()
            .as_ref()
            .filter(|(_, at)| at.elapsed() <= max_age)
            .map(|(value, _)| value.clone())
    }
}

// ---------------------------------------------------------------------------
// Bus
// ---------------------------------------------------------------------------

/// A wake-word detection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HotwordEvent {
    pub keyword: String,
}

#[derive(Debug, Default)]
struct Shared {
    face: LatestSlot<FaceTarget>,
    gesture: LatestSlot<Gesture>,
    listening: AtomicBool,
    touching: AtomicBool,
}

/// Consumer side, owned by the decision loop.
#[derive(Debug)]
pub struct PerceptionBus {
    shared: Arc<Shared>,
    hotword_tx: mpsc::Sender<HotwordEvent>,
    hotword_rx: mpsc::Receiver<HotwordEvent>,
    face_max_age: Duration,
}

impl PerceptionBus {
    pub fn new(hotword_capacity: usize, face_max_age: Duration) -> Self {
        let (hotword_tx, hotword_rx) = mpsc::channel(hotword_capacity.max(1));
        Self {
            shared: Arc::new(Shared::default()),
            hotword_tx,
            hotword_rx,
            face_max_age,
        }
    }

    /// Handle for a worker task.
    pub fn publisher(&self) -> PerceptionPublisher {
        PerceptionPublisher {
            shared: Arc::clone(&self.shared),
            hotword_tx: self.hotword_tx.clone(),
        }
    }

    /// Pending hotword events, oldest first.
    pub fn drain_hotwords(&mut self) -> Vec<HotwordEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.hotword_rx.try_recv() {
            events.push(event);
        }
        events
    }

    /// Freshest face, or `None` when the last one is stale.
    pub fn latest_face(&self) -> Option<FaceTarget> {
        self.shared.face.peek_fresh(self.face_max_age)
    }

    /// Consume the pending gesture.
    pub fn take_gesture(&self) -> Option<Gesture> {
        self.shared.gesture.take()
    }

    pub fn flags(&self) -> CycleFlags {
        CycleFlags {
            is_listening: self.shared.listening.load(Ordering::SeqCst),
            is_touching: self.shared.touching.load(Ordering::SeqCst),
        }
    }

    /// Assemble this cycle's frame. Consumes the gesture.
    pub fn frame(&self) -> PerceptionFrame {
        PerceptionFrame {
            face: self.latest_face(),
            gesture: self.take_gesture(),
            flags: self.flags(),
        }
    }
}

/// Producer side, cloned into every worker.
#[derive(Debug, Clone)]
pub struct PerceptionPublisher {
    shared: Arc<Shared>,
    hotword_tx: mpsc::Sender<HotwordEvent>,
}

impl PerceptionPublisher {
    pub fn publish_face(&self, face: FaceTarget) {
        self.shared.face.publish(face);
    }

    pub fn clear_face(&self) {
        self.shared.face.clear();
    }

    pub fn publish_gesture(&self, gesture: Gesture) {
        self.shared.gesture.publish(gesture);
    }

    /// Queue a hotword without blocking. Returns `false` when it was dropped.
    pub fn hotword(&self, keyword: impl Into<String>) -> bool {
        let event = HotwordEvent {
            keyword: keyword.into(),
        };
        match self.hotword_tx.try_send(event) {
            Ok(()) => true,
            Err(mpsc::error::TrySendError::Full(event)) => {
                log::warn!("Hotword queue full, dropping '{}'", event.keyword);
                false
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                log::debug!("Hotword queue closed");
                false
            }
        }
    }

    pub fn set_listening(&self, listening: bool) {
        self.shared.listening.store(listening, Ordering::SeqCst);
    }

    pub fn set_touching(&self, touching: bool) {
        self.shared.touching.store(touching, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bus() -> PerceptionBus {
        PerceptionBus::new(2, Duration::from_millis(250))
    }

    #[test]
    fn test_latest_slot_keeps_newest() {
        let slot = LatestSlot::new();
        slot.publish(1);
        slot.publish(2);
        assert_eq!(slot.peek_fresh(Duration::from_secs(1)), Some(2));
        assert_eq!(slot.take(), Some(2));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn test_latest_slot_staleness() {
        let slot = LatestSlot::new();
        slot.publish("face");
        std::thread::sleep(Duration::from_millis(10));
        assert_eq!(slot.peek_fresh(Duration::from_millis(1)), None);
        assert_eq!(slot.peek_fresh(Duration::from_secs(5)), Some("face"));
    }

    #[test]
    fn test_frame_consumes_gesture_once() {
        let bus = bus();
        let publisher = bus.publisher();
        publisher.publish_face(FaceTarget::new(0.5, 0.5, 0.1, 0.9));
        publisher.publish_gesture(Gesture::ThumbUp);
        publisher.set_touching(true);

        let frame = bus.frame();
        assert!(frame.face.is_some());
        assert_eq!(frame.gesture, Some(Gesture::ThumbUp));
        assert!(frame.flags.is_touching);

        let next = bus.frame();
        assert!(next.face.is_some());
        assert_eq!(next.gesture, None);
    }

    #[test]
    fn test_clear_face() {
        let bus = bus();
        let publisher = bus.publisher();
        publisher.publish_face(FaceTarget::new(0.5, 0.5, 0.1, 0.9));
        publisher.clear_face();
        assert_eq!(bus.latest_face(), None);
    }

    #[test]
    fn test_hotword_queue_is_bounded() {
        let mut bus = bus();
        let publisher = bus.publisher();
        assert!(publisher.hotword("pixi"));
        assert!(publisher.hotword("pixi"));
        assert!(!publisher.hotword("pixi"));
        assert_eq!(bus.drain_hotwords().len(), 2);
        assert!(bus.drain_hotwords().is_empty());
        assert!(publisher.hotword("pixi"));
    }

    #[test]
    fn test_flags_default_off() {
        let bus = bus();
        assert_eq!(bus.flags(), CycleFlags::default());
        bus.publisher().set_listening(true);
        assert!(bus.flags().is_listening);
    }
}
