//! Anthropic-compatible messages wire format.

use serde_json::{Value, json};

use super::ProviderAdapter;
use crate::config::ProviderConfig;
use crate::error::DispatchError;
use crate::types::ChatRequest;

/// `POST {base}/v1/messages`, text at `content[0].text`.
///
/// Unlike the OpenAI shape, `max_tokens` is mandatory here, so the config
/// default always materializes in the body.
pub struct AnthropicMessagesAdapter;

impl ProviderAdapter for AnthropicMessagesAdapter {
    fn endpoint_url(&self, config: &ProviderConfig, _request: &ChatRequest) -> String {
        format!("{}/v1/messages", config.base_url.trim_end_matches('/'))
    }

    fn build_body(&self, config: &ProviderConfig, request: &ChatRequest) -> Value {
        json!({
            "model": request.options.model.as_deref().unwrap_or(&config.default_model),
            "max_tokens": request.options.max_tokens.unwrap_or(config.default_max_tokens),
            "messages": [{ "role": "user", "content": request.prompt }],
            "temperature": request.options.temperature.unwrap_or(config.default_temperature),
        })
    }

    fn extract_text(&self, provider: &str, body: &Value) -> Result<String, DispatchError> {
        body.pointer("/content/0/text")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| DispatchError::MalformedResponse {
                provider: provider.to_string(),
                detail: "missing content[0].text".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_documented_path() {
        let body = json!({"content": [{"text": "hi"}]});
        assert_eq!(
            AnthropicMessagesAdapter
                .extract_text("anthropic", &body)
                .unwrap(),
            "hi"
        );
    }

    #[test]
    fn empty_body_is_malformed() {
        let err = AnthropicMessagesAdapter
            .extract_text("anthropic", &json!({}))
            .unwrap_err();
        assert!(matches!(err, DispatchError::MalformedResponse { .. }));
    }

    #[test]
    fn tolerates_full_messages_envelope() {
        let body = json!({
            "id": "msg_01",
            "type": "message",
            "role": "assistant",
            "content": [{"type": "text", "text": "answer"}],
            "stop_reason": "end_turn",
            "usage": {"input_tokens": 4, "output_tokens": 2}
        });
        assert_eq!(
            AnthropicMessagesAdapter
                .extract_text("anthropic", &body)
                .unwrap(),
            "answer"
        );
    }

    #[test]
    fn body_always_carries_max_tokens() {
        let config = ProviderConfig::anthropic("k");
        let request = ChatRequest::new("anthropic", "q");
        let body = AnthropicMessagesAdapter.build_body(&config, &request);

        assert_eq!(body["model"], "claude-3-5-sonnet-20241022");
        assert_eq!(body["max_tokens"], 1000);
        assert_eq!(body["messages"][0]["content"], "q");
    }
}
