//! OpenAI-compatible chat-completions delegate (OpenRouter or Groq).

use std::time::Duration;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::normalize::parse_action_reply;
use super::normalize::ParsedReply;
use super::prompt::{build_event_prompt, build_prompt};
use super::{ReasoningDelegate, ReasoningRequest};
use crate::actions::{ActionCatalogue, ActionId};
use crate::config::ReasoningConfig;
use crate::error::ReasoningError;
use crate::state::StateManager;

const OPENROUTER_DEFAULT_BASE_URL: &str = "https://openrouter.ai/api/v1";
const OPENROUTER_DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
const GROQ_BASE_URL: &str = "https://api.groq.com/openai/v1";
const GROQ_DEFAULT_MODEL: &str = "llama-3.1-8b-instant";

/// Hosted completion provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Provider {
    OpenRouter,
    Groq,
}

/// Endpoint, key and model for one provider.
#[derive(Clone, PartialEq)]
pub struct ProviderSettings {
    pub provider: Provider,
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

impl std::fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl ProviderSettings {
    /// Resolve from the process environment. OpenRouter wins when both
    /// keys are present.
    pub fn from_env(model_override: Option<&str>) -> Result<Self, ReasoningError> {
        Self::from_lookup(|key| std::env::var(key).ok(), model_override)
    }

    /// Resolve using an arbitrary variable lookup.
    pub fn from_lookup(
        lookup: impl Fn(&str) -> Option<String>,
        model_override: Option<&str>,
    ) -> Result<Self, ReasoningError> {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let model = |env_key: &str, default: &str| {
            model_override
                .map(str::to_string)
                .or_else(|| get(env_key))
                .unwrap_or_else(|| default.to_string())
        };

        if let Some(api_key) = get("OPENROUTER_API_KEY") {
            return Ok(Self {
                provider: Provider::OpenRouter,
                api_key,
                base_url: get("OPENROUTER_BASE_URL")
                    .unwrap_or_else(|| OPENROUTER_DEFAULT_BASE_URL.to_string()),
                model: model("OPENROUTER_MODEL_NAME", OPENROUTER_DEFAULT_MODEL),
            });
        }
        if let Some(api_key) = get("GROQ_API_KEY") {
            return Ok(Self {
                provider: Provider::Groq,
                api_key,
                base_url: GROQ_BASE_URL.to_string(),
                model: model("GROQ_MODEL_NAME", GROQ_DEFAULT_MODEL),
            });
        }
        Err(ReasoningError::MissingCredentials)
    }

    pub fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url.trim_end_matches('/'))
    }
}

/// Delegate that asks a hosted chat model to pick the action.
#[derive(Debug, Clone)]
pub struct ChatCompletionDelegate {
    http: reqwest::Client,
    settings: ProviderSettings,
    temperature: f64,
}

impl ChatCompletionDelegate {
    pub fn new(settings: ProviderSettings, config: &ReasoningConfig) -> Result<Self, ReasoningError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout() + Duration::from_secs(1))
            .build()?;
        log::info!(
            "Reasoning delegate: {:?} model={}",
            settings.provider,
            settings.model
        );
        Ok(Self {
            http,
            settings,
            temperature: config.temperature,
        })
    }

    /// Build from environment credentials.
    pub fn from_env(config: &ReasoningConfig) -> Result<Self, ReasoningError> {
        let settings = ProviderSettings::from_env(config.model.as_deref())?;
        Self::new(settings, config)
    }

    pub fn settings(&self) -> &ProviderSettings {
        &self.settings
    }

    pub(crate) fn build_request_body(&self, prompt: &str) -> Value {
        json!({
            "model": self.settings.model,
            "temperature": self.temperature,
            "messages": [
                { "role": "user", "content": prompt }
            ],
        })
    }

    /// Send one prompt and return the assistant text.
    pub async fn complete(&self, prompt: &str) -> Result<String, ReasoningError> {
        let body = self.build_request_body(prompt);
        let response = self
            .http
            .post(self.settings.endpoint())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.settings.api_key))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;
        if !status.is_success() {
            return Err(ReasoningError::Status {
                status: status.as_u16(),
                body: text.chars().take(500).collect(),
            });
        }

        let json: Value = serde_json::from_str(&text)
            .map_err(|e| ReasoningError::Malformed(format!("invalid JSON body: {}", e)))?;
        extract_content(&json)
    }

    /// Pick an action from a digest of recent events.
    ///
    /// Ticks `state` first, and applies the chosen action's effects on
    /// success. The reply's reason defaults to "No reason provided.".
    pub async fn decide_from_events(
        &self,
        state: &mut StateManager,
        events: &[String],
        catalogue: &ActionCatalogue,
    ) -> Result<ParsedReply, ReasoningError> {
        state.tick();
        let prompt = build_event_prompt(&state.telemetry(), events, &catalogue.to_prompt_list());
        let reply = self.complete(&prompt).await?;
        let mut parsed = parse_action_reply(&reply);
        if parsed.reason.is_none() {
            parsed.reason = Some("No reason provided.".to_string());
        }
        state.apply_action_effects(parsed.action);
        Ok(parsed)
    }
}

/// Assistant message text of a chat-completions response.
pub(crate) fn extract_content(json: &Value) -> Result<String, ReasoningError> {
    json.pointer("/choices/0/message/content")
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| ReasoningError::Malformed("response has no message content".to_string()))
}

#[async_trait]
impl ReasoningDelegate for ChatCompletionDelegate {
    async fn resolve(&self, request: &ReasoningRequest) -> Result<ActionId, ReasoningError> {
        let prompt = build_prompt(request);
        let reply = self.complete(&prompt).await?;
        let parsed = parse_action_reply(&reply);
        if let Some(reason) = &parsed.reason {
            log::debug!("Delegate chose {} because: {}", parsed.action, reason);
        }
        // An unresolvable reply is confusion, not idle wandering.
        if parsed.action == ActionId::LookAround {
            return Ok(ActionId::TiltHeadCuriously);
        }
        Ok(parsed.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_openrouter_preferred() {
        let settings = ProviderSettings::from_lookup(
            lookup(&[("OPENROUTER_API_KEY", "or-key"), ("GROQ_API_KEY", "gq-key")]),
            None,
        )
        .unwrap();
        assert_eq!(settings.provider, Provider::OpenRouter);
        assert_eq!(settings.model, "openai/gpt-4o-mini");
        assert_eq!(
            settings.endpoint(),
            "https://openrouter.ai/api/v1/chat/completions"
        );
    }

    #[test]
    fn test_groq_fallback_with_model_env() {
        let settings = ProviderSettings::from_lookup(
            lookup(&[("GROQ_API_KEY", "gq-key"), ("GROQ_MODEL_NAME", "mixtral")]),
            None,
        )
        .unwrap();
        assert_eq!(settings.provider, Provider::Groq);
        assert_eq!(settings.model, "mixtral");
        assert_eq!(
            settings.endpoint(),
            "https://api.groq.com/openai/v1/chat/completions"
        );
    }

    #[test]
    fn test_model_override_and_base_url() {
        let settings = ProviderSettings::from_lookup(
            lookup(&[
                ("OPENROUTER_API_KEY", "or-key"),
                ("OPENROUTER_BASE_URL", "http://localhost:9000/v1/"),
            ]),
            Some("local/tiny"),
        )
        .unwrap();
        assert_eq!(settings.model, "local/tiny");
        assert_eq!(settings.endpoint(), "http://localhost:9000/v1/chat/completions");
    }

    #[test]
    fn test_missing_credentials() {
        let err = ProviderSettings::from_lookup(lookup(&[("GROQ_API_KEY", "  ")]), None).unwrap_err();
        assert!(matches!(err, ReasoningError::MissingCredentials));
    }

    #[test]
    fn test_debug_hides_api_key() {
        let settings =
            ProviderSettings::from_lookup(lookup(&[("GROQ_API_KEY", "secret-key")]), None).unwrap();
        assert!(!format!("{:?}", settings).contains("secret-key"));
    }

    #[test]
    fn test_request_body() {
        let settings =
            ProviderSettings::from_lookup(lookup(&[("GROQ_API_KEY", "k")]), None).unwrap();
        let delegate = ChatCompletionDelegate::new(settings, &ReasoningConfig::default()).unwrap();
        let body = delegate.build_request_body("hello");
        assert_eq!(body["model"], "llama-3.1-8b-instant");
        assert_eq!(body["temperature"], 0.4);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "hello");
    }

    #[test]
    fn test_extract_content() {
        let ok = json!({"choices": [{"message": {"role": "assistant", "content": "{\"action\":\"STRETCH\"}"}}]});
        assert_eq!(extract_content(&ok).unwrap(), "{\"action\":\"STRETCH\"}");
        let bad = json!({"choices": []});
        assert!(matches!(extract_content(&bad), Err(ReasoningError::Malformed(_))));
    }

    #[tokio::test]
    async fn test_decide_from_events_against_local_endpoint() {
        use crate::clock::ManualClock;
        use crate::config::DriveConfig;
        use axum::{routing::post, Json, Router};
        use std::sync::Arc;

        let app = Router::new().route(
            "/v1/chat/completions",
            post(|Json(body): Json<Value>| async move {
                let prompt = body["messages"][0]["content"].as_str().unwrap_or_default();
                let content = if prompt.contains("Recent events:\n- user waved") {
                    "```json\n{\"action\": \"greet_happily\"}\n```"
                } else {
                    "{\"action\": \"IGNORE\"}"
                };
                Json(json!({"choices": [{"message": {"role": "assistant", "content": content}}]}))
            }),
        );
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        let settings = ProviderSettings {
            provider: Provider::OpenRouter,
            api_key: "local-key".to_string(),
            base_url: format!("http://{}/v1", addr),
            model: "local/test".to_string(),
        };
        let delegate = ChatCompletionDelegate::new(settings, &ReasoningConfig::default()).unwrap();
        let mut state = StateManager::with_clock(DriveConfig::default(), Arc::new(ManualClock::new()));
        let reply = delegate
            .decide_from_events(
                &mut state,
                &["user waved".to_string()],
                &ActionCatalogue::with_defaults(),
            )
            .await
            .unwrap();

        assert_eq!(reply.action, ActionId::GreetHappily);
        assert_eq!(reply.reason.as_deref(), Some("No reason provided."));
        assert_eq!(state.snapshot().last_action, Some(ActionId::GreetHappily));
    }
}
