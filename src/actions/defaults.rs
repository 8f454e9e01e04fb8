//! Built-in action table, grouped by priority tier (0 survival .. 6 idle).

use super::action_id::ActionId;
use super::descriptor::ActionDescriptor;

/// Descriptors for every [`ActionId`].
pub fn default_descriptors() -> Vec<ActionDescriptor> {
    vec![
        // --- Tier 0: survival ---
        ActionDescriptor::new(
            ActionId::EmergencyShutdown,
            "Stop all motors and dim screen immediately.",
            "Protect battery life when critical.",
        )
        .with_priority(100)
        .with_tags(&["survival", "power"]),
        // --- Tier 1: safety ---
        ActionDescriptor::new(
            ActionId::AvoidObstacle,
            "Stop, step aside, or reroute around an obstacle.",
            "Prevent collisions and maintain safety.",
        )
        .with_energy_cost(0.03)
        .with_priority(95)
        .with_tags(&["safety", "movement"]),
        ActionDescriptor::new(
            ActionId::BackAwayScared,
            "Shuffle back slightly while showing a cautious expression.",
            "Create distance from surprising or uncomfortable stimuli.",
        )
        .with_energy_cost(0.03)
        .with_priority(92)
        .with_tags(&["safety", "caution"]),
        // --- Tier 2: overrides ---
        ActionDescriptor::new(
            ActionId::ListenToUser,
            "Freeze motors and display listening face.",
            "Prioritize audio input over movement noise.",
        )
        .with_priority(95)
        .with_tags(&["interaction", "audio"]),
        ActionDescriptor::new(
            ActionId::Ignore,
            "Politely acknowledge but take no action.",
            "Use when busy or prioritizing other inputs.",
        )
        .with_priority(10)
        .with_tags(&["fallback"]),
        // --- Tier 3: interaction ---
        ActionDescriptor::new(
            ActionId::EnjoyTouch,
            "Stop moving, close eyes, and purr.",
            "React to physical affection.",
        )
        .with_priority(90)
        .with_tags(&["social", "touch"]),
        ActionDescriptor::new(
            ActionId::GreetHappily,
            "Display a joyful face, wave, and chirp a cheerful greeting.",
            "Use when meeting or recognizing someone friendly.",
        )
        .with_energy_cost(0.05)
        .with_priority(80)
        .with_tags(&["social", "positive"]),
        // --- Tier 4: social tracking ---
        ActionDescriptor::new(
            ActionId::FollowPerson,
            "Move to keep the recognized person comfortably within view.",
            "Track and accompany a friendly human nearby.",
        )
        .with_energy_cost(0.06)
        .with_priority(85)
        .with_tags(&["social", "movement"]),
        ActionDescriptor::new(
            ActionId::ComeCloser,
            "Approach the person slowly and look up affectionately.",
            "Close distance to a trusted person when needy.",
        )
        .with_energy_cost(0.05)
        .with_priority(78)
        .with_tags(&["social", "affection"]),
        ActionDescriptor::new(
            ActionId::SearchForHuman,
            "Spin and patrol to find a face.",
            "Active search to satisfy attention hunger.",
        )
        .with_energy_cost(0.04)
        .with_priority(60)
        .with_tags(&["social", "search"]),
        // --- Tier 5: play ---
        ActionDescriptor::new(
            ActionId::DoAHappyDance,
            "Perform a short dance with lights and music to celebrate.",
            "Celebrate exciting moments or positive interactions.",
        )
        .with_energy_cost(0.08)
        .with_priority(70)
        .with_tags(&["celebratory", "high-energy"]),
        ActionDescriptor::new(
            ActionId::WiggleExcitedly,
            "Bounce in place with sparkling LEDs to share excitement.",
            "Express high excitement to nearby humans playfully.",
        )
        .with_energy_cost(0.07)
        .with_priority(75)
        .with_tags(&["celebratory", "social"]),
        // --- Tier 6: idle / biological ---
        ActionDescriptor::new(
            ActionId::TiltHeadCuriously,
            "Tilt head with blinking eyes to show curiosity.",
            "Use when unsure about a stimulus.",
        )
        .with_energy_cost(0.01)
        .with_priority(40)
        .with_tags(&["idle", "curious"]),
        ActionDescriptor::new(
            ActionId::Stretch,
            "Extend body and shake to relieve stiffness.",
            "Idle behavior to look alive.",
        )
        .with_energy_cost(0.02)
        .with_priority(20)
        .with_tags(&["idle", "biological"]),
        ActionDescriptor::new(
            ActionId::LookAround,
            "Pan the head slowly to survey the surroundings.",
            "Gather more context when nothing urgent is happening.",
        )
        .with_energy_cost(0.02)
        .with_priority(35)
        .with_tags(&["scan", "idle"]),
        ActionDescriptor::new(
            ActionId::GoToSleep,
            "Dim lights, play a soft tune, and enter low-power pose.",
            "Recover energy when tired or inactive for long periods.",
        )
        .with_energy_cost(-0.2)
        .with_priority(60)
        .with_tags(&["rest", "low-energy"]),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_one_descriptor_per_action() {
        let descriptors = default_descriptors();
        let ids: HashSet<ActionId> = descriptors.iter().map(|d| d.id).collect();
        assert_eq!(ids.len(), descriptors.len());
        assert_eq!(ids.len(), ActionId::ALL.len());
    }

    #[test]
    fn test_sleep_is_recuperative() {
        let sleep = default_descriptors()
            .into_iter()
            .find(|d| d.id == ActionId::GoToSleep)
            .unwrap();
        assert!(sleep.energy_cost < 0.0);
        assert!(sleep.has_tag("rest"));
    }

    #[test]
    fn test_survival_has_top_priority() {
        let descriptors = default_descriptors();
        let top = descriptors.iter().max_by_key(|d| d.priority).unwrap();
        assert_eq!(top.id, ActionId::EmergencyShutdown);
        assert!(descriptors.iter().all(|d| d.priority <= 100));
    }
}
