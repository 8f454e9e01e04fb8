//! Prompt construction for the voice path and the event digest path.

use super::ReasoningRequest;
use crate::state::TelemetrySnapshot;

/// Build the non-verbal prompt: the robot cannot speak and must answer
/// with exactly one action as JSON.
pub fn build_prompt(request: &ReasoningRequest) -> String {
    let state = serde_json::to_string(&request.state).unwrap_or_else(|_| "{}".to_string());
    format!(
        "You are Pixi, a robot that CANNOT SPEAK. You communicate only through \
         sounds and body language. A user just said: \"{utterance}\"\n\n\
         Your current state: {state}\n\
         Available actions:\n{catalogue}\n\n\
         INSTRUCTIONS:\n\
         1. Choose ONE action that best conveys your emotional response.\n   \
            - If 'Hello' -> GREET_HAPPILY.\n   \
            - If 'Dance' -> DO_A_HAPPY_DANCE.\n   \
            - If confusing question -> TILT_HEAD_CURIOUSLY.\n   \
            - If mean -> BACK_AWAY_SCARED.\n\
         2. Return ONLY a valid JSON object: {{\"action\": \"<ACTION_NAME>\"}}\n\
         3. Do NOT include any spoken text.",
        utterance = request.utterance.replace('"', "'"),
        state = state,
        catalogue = request.catalogue,
    )
}

/// Build the event digest prompt: state, recent event summaries and the
/// catalogue, answered with an action plus a short rationale.
pub fn build_event_prompt(state: &TelemetrySnapshot, events: &[String], catalogue: &str) -> String {
    let state_block = [
        format!("- mood: {}", state.mood),
        format!("- energy: {}", state.energy),
        format!("- attention_hunger: {}", state.attention_hunger),
        format!("- excitement: {}", state.excitement),
        format!("- caution: {}", state.caution),
        format!("- recognized_person: {}", state.recognized_person),
    ]
    .join("\n");
    let event_block = if events.is_empty() {
        "- none".to_string()
    } else {
        events
            .iter()
            .map(|e| format!("- {}", e))
            .collect::<Vec<_>>()
            .join("\n")
    };
    format!(
        "You are Pixi's cognition module.\n\
         Current internal state:\n{state_block}\n\n\
         Recent events:\n{event_block}\n\n\
         Action catalogue:\n{catalogue}\n\n\
         Respond with valid JSON: {{\"action\": \"<ACTION_NAME>\", \"reason\": \"<brief rationale>\"}}."
    )
}
