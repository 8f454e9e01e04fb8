//! Cooperative stop signal and bounded-join worker handles.

use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Shared stop flag. Clones observe the same signal.
#[derive(Debug, Clone)]
pub struct StopSignal {
    tx: std::sync::Arc<watch::Sender<bool>>,
    rx: watch::Receiver<bool>,
}

impl Default for StopSignal {
    fn default() -> Self {
        Self::new()
    }
}

impl StopSignal {
    pub fn new() -> Self {
        let (tx, rx) = watch::channel(false);
        Self {
            tx: std::sync::Arc::new(tx),
            rx,
        }
    }

    /// Request a stop. Idempotent and callable from any thread.
    pub fn stop(&self) {
        self.tx.send_replace(true);
    }

    pub fn is_stopped(&self) -> bool {
        *self.rx.borrow()
    }

    /// Resolve once [`stop`](Self::stop) has been called.
    pub async fn stopped(&self) {
        let mut rx = self.rx.clone();
        while !*rx.borrow_and_update() {
            if rx.changed().await.is_err() {
                return;
            }
        }
    }
}

/// A spawned background task plus its stop signal.
#[derive(Debug)]
pub struct WorkerHandle {
    name: String,
    stop: StopSignal,
    join: JoinHandle<()>,
}

impl WorkerHandle {
    /// Spawn `task` on the tokio runtime, handing it a fresh stop signal.
    pub fn spawn<F, Fut>(name: impl Into<String>, task: F) -> Self
    where
        F: FnOnce(StopSignal) -> Fut,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let name = name.into();
        let stop = StopSignal::new();
        let join = tokio::spawn(task(stop.clone()));
        log::debug!("Worker '{}' started", name);
        Self { name, stop, join }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn is_finished(&self) -> bool {
        self.join.is_finished()
    }

    /// Signal the worker and wait up to `timeout` for it to finish.
    ///
    /// A worker that overruns is aborted. Returns `true` on a clean exit.
    pub async fn shutdown(mut self, timeout: Duration) -> bool {
        self.stop.stop();
        match tokio::time::timeout(timeout, &mut self.join).await {
            Ok(Ok(())) => {
                log::debug!("Worker '{}' stopped", self.name);
                true
            }
            Ok(Err(e)) => {
                log::error!("Worker '{}' failed: {}", self.name, e);
                false
            }
            Err(_) => {
                log::warn!(
                    "Worker '{}' did not stop within {:?}, aborting",
                    self.name,
                    timeout
                );
                self.join.abort();
                false
            }
        }
    }
}
