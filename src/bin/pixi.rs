//! Pixi brain binary.
//!
//! Runs the life loop with logging-only action handlers, so it can be
//! exercised on a workstation without any robot hardware attached.
//!
//! # Environment Variables
//!
//! - `PIXI_CONFIG`: YAML brain configuration (defaults when unset)
//! - `PIXI_SCRIPT`: JSON perception script replayed into the loop
//! - `OPENROUTER_API_KEY` / `GROQ_API_KEY`: reasoning delegate credentials
//! - `RUST_LOG`: Tracing filter (default: "info,pixi=debug")
//!
//! # Usage
//!
//! ```bash
//! PIXI_SCRIPT=demos/greeting.json cargo run --bin pixi
//! ```

use std::sync::Arc;

use anyhow::Context;
use pixi::actions::{attach_logging_handlers, ActionCatalogue};
use pixi::config::BrainConfig;
use pixi::perception::{PerceptionScript, ScriptedPerception, StopSignal, WorkerHandle};
use pixi::reasoning::ChatCompletionDelegate;
use pixi::runtime::LifeLoop;
use pixi::server::{self, AppState};

const SCRIPT_ENV_VAR: &str = "PIXI_SCRIPT";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,pixi=debug".into()),
        )
        .init();

    let config = BrainConfig::load().context("failed to load brain configuration")?;

    let catalogue = ActionCatalogue::with_defaults();
    let bound = attach_logging_handlers(&catalogue);
    tracing::info!("Catalogue ready: {} actions, {} logging handlers", catalogue.len(), bound);

    let life = LifeLoop::new(config.clone(), Arc::new(catalogue));
    let mut workers: Vec<WorkerHandle> = Vec::new();

    // Perception
    match std::env::var(SCRIPT_ENV_VAR) {
        Ok(path) if !path.trim().is_empty() => {
            let script = PerceptionScript::from_file(&path)
                .with_context(|| format!("failed to load perception script {}", path))?;
            tracing::info!(
                "Replaying perception script {} ({} steps, {:?} per pass)",
                path,
                script.steps.len(),
                script.duration()
            );
            workers.push(
                ScriptedPerception::new(script, life.publisher())
                    .with_face_refresh(config.runtime.face_max_age() / 2)
                    .spawn(),
            );
        }
        _ => tracing::info!("{} not set, running without perception input", SCRIPT_ENV_VAR),
    }

    // Reasoning
    match ChatCompletionDelegate::from_env(&config.reasoning) {
        Ok(delegate) => tracing::info!(
            "Reasoning delegate available ({:?}), voice disabled: no audio backend attached",
            delegate.settings().provider
        ),
        Err(e) => tracing::warn!("Voice disabled: {}", e),
    }

    // Telemetry
    if let Some(addr) = config.telemetry.bind_addr.clone() {
        let state = AppState::new(life.subscribe());
        workers.push(WorkerHandle::spawn("telemetry-server", move |stop| async move {
            tokio::select! {
                _ = stop.stopped() => {}
                result = server::serve(&addr, state) => {
                    if let Err(e) = result {
                        tracing::error!("Telemetry server on {} failed: {}", addr, e);
                    }
                }
            }
        }));
    }

    let shutdown = StopSignal::new();
    let on_signal = shutdown.clone();
    ctrlc::set_handler(move || {
        tracing::info!("Shutdown requested");
        on_signal.stop();
    })
    .context("failed to install Ctrl-C handler")?;

    let report = life.run(shutdown).await;

    let join_timeout = config.runtime.worker_join_timeout();
    for worker in workers {
        let name = worker.name().to_string();
        if !worker.shutdown(join_timeout).await {
            tracing::warn!("Worker '{}' did not shut down cleanly", name);
        }
    }

    tracing::info!(
        "Ran {} cycles, {} voice interrupts, {} dispatch failures",
        report.cycles,
        report.voice_interrupts,
        report.dispatch_failures
    );
    if let Some(action) = report.dominant_action() {
        tracing::info!("Most frequent action: {}", action);
    }

    Ok(())
}
