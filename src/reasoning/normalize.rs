//! Turning a free-form model reply into one action.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;

use crate::actions::ActionId;

static CODE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?:json|JSON)?").unwrap());
static JSON_OBJECT: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Substring synonyms tried in order after an exact match fails.
const SYNONYMS: &[(&str, ActionId)] = &[
    ("HAPPY", ActionId::DoAHappyDance),
    ("DANCE", ActionId::DoAHappyDance),
    ("WIGGLE", ActionId::WiggleExcitedly),
    ("GREET", ActionId::GreetHappily),
    ("HELLO", ActionId::GreetHappily),
    ("SCARED", ActionId::BackAwayScared),
    ("STOP", ActionId::AvoidObstacle),
];

/// Action and optional rationale extracted from a reply.
#[derive(Debug, Clone, PartialEq)]
pub struct ParsedReply {
    pub action: ActionId,
    pub reason: Option<String>,
}

/// Map a raw action name to an identifier.
///
/// Exact (case-insensitive) names win, then the synonym table; anything
/// else becomes `LOOK_AROUND`.
pub fn normalize_action(raw: &str) -> ActionId {
    let wanted = raw.trim().to_ascii_uppercase();
    if let Ok(action) = wanted.parse::<ActionId>() {
        return action;
    }
    SYNONYMS
        .iter()
        .find(|(key, _)| wanted.contains(key))
        .map(|(_, action)| *action)
        .unwrap_or(ActionId::LookAround)
}

/// Parse a reply of the form `{"action": "...", "reason": "..."}`, possibly
/// wrapped in markdown fences or surrounded by chatter.
pub fn parse_action_reply(raw: &str) -> ParsedReply {
    let cleaned = CODE_FENCE.replace_all(raw, "");
    let cleaned = cleaned.trim();

    let payload = serde_json::from_str::<Value>(cleaned).ok().or_else(|| {
        JSON_OBJECT
            .find(cleaned)
            .and_then(|m| serde_json::from_str::<Value>(m.as_str()).ok())
    });

    let field = |name: &str| {
        payload
            .as_ref()
            .and_then(|p| p.get(name))
            .and_then(Value::as_str)
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    };

    let action = match field("action") {
        Some(name) => normalize_action(&name),
        None => {
            log::debug!("Reply carried no action field: {}", cleaned);
            ActionId::LookAround
        }
    };
    ParsedReply {
        action,
        reason: field("reason"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_is_case_insensitive() {
        assert_eq!(normalize_action("greet_happily"), ActionId::GreetHappily);
        assert_eq!(normalize_action(" STRETCH "), ActionId::Stretch);
    }

    #[test]
    fn test_synonyms() {
        assert_eq!(normalize_action("happy"), ActionId::DoAHappyDance);
        assert_eq!(normalize_action("DANCE_PARTY"), ActionId::DoAHappyDance);
        assert_eq!(normalize_action("wiggle"), ActionId::WiggleExcitedly);
        assert_eq!(normalize_action("SAY_HELLO"), ActionId::GreetHappily);
        assert_eq!(normalize_action("GET_SCARED"), ActionId::BackAwayScared);
        assert_eq!(normalize_action("STOP_MOVING"), ActionId::AvoidObstacle);
    }

    #[test]
    fn test_unknown_becomes_look_around() {
        assert_eq!(normalize_action("RECITE_POETRY"), ActionId::LookAround);
        assert_eq!(normalize_action(""), ActionId::LookAround);
    }

    #[test]
    fn test_parse_plain_json() {
        let reply = parse_action_reply(r#"{"action": "GREET_HAPPILY", "reason": "they said hi"}"#);
        assert_eq!(reply.action, ActionId::GreetHappily);
        assert_eq!(reply.reason.as_deref(), Some("they said hi"));
    }

    #[test]
    fn test_parse_fenced_json() {
        let raw = "```json\n{\"action\": \"do_a_happy_dance\"}\n```";
        let reply = parse_action_reply(raw);
        assert_eq!(reply.action, ActionId::DoAHappyDance);
        assert_eq!(reply.reason, None);
    }

    #[test]
    fn test_parse_json_inside_chatter() {
        let raw = "Sure! Here you go: {\"action\": \"BACK_AWAY_SCARED\"} Hope that helps.";
        assert_eq!(parse_action_reply(raw).action, ActionId::BackAwayScared);
    }

    #[test]
    fn test_parse_garbage() {
        assert_eq!(parse_action_reply("I would wave.").action, ActionId::LookAround);
        assert_eq!(parse_action_reply("{\"action\": 3}").action, ActionId::LookAround);
    }
}
