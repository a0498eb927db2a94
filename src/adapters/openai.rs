//! OpenAI-compatible chat completions wire format.

use serde_json::{Value, json};

use super::ProviderAdapter;
use crate::config::ProviderConfig;
use crate::error::DispatchError;
use crate::types::ChatRequest;

/// `POST {base}/v1/chat/completions`, text at `choices[0].message.content`.
pub struct OpenAiChatAdapter;

impl ProviderAdapter for OpenAiChatAdapter {
    fn endpoint_url(&self, config: &ProviderConfig, _request: &ChatRequest) -> String {
        format!(
            "{}/v1/chat/completions",
            config.base_url.trim_end_matches('/')
        )
    }

    fn build_body(&self, config: &ProviderConfig, request: &ChatRequest) -> Value {
        json!({
            "model": request.options.model.as_deref().unwrap_or(&config.default_model),
            "messages": [{ "role": "user", "content": request.prompt }],
            "max_tokens": request.options.max_tokens.unwrap_or(config.default_max_tokens),
            "temperature": request.options.temperature.unwrap_or(config.default_temperature),
        })
    }

    fn extract_text(&self, provider: &str, body: &Value) -> Result<String, DispatchError> {
        body.pointer("/choices/0/message/content")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| DispatchError::MalformedResponse {
                provider: provider.to_string(),
                detail: "missing choices[0].message.content".to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_documented_path() {
        let body = json!({"choices": [{"message": {"content": "hello"}}]});
        assert_eq!(
            OpenAiChatAdapter.extract_text("openai", &body).unwrap(),
            "hello"
        );
    }

    #[test]
    fn empty_body_is_malformed() {
        let err = OpenAiChatAdapter
            .extract_text("openai", &json!({}))
            .unwrap_err();
        assert!(matches!(err, DispatchError::MalformedResponse { .. }));
    }

    #[test]
    fn tolerates_extra_fields() {
        let body = json!({
            "id": "chatcmpl-1",
            "usage": {"total_tokens": 9},
            "choices": [{"index": 0, "message": {"role": "assistant", "content": "ok"}, "finish_reason": "stop"}]
        });
        assert_eq!(
            OpenAiChatAdapter.extract_text("openai", &body).unwrap(),
            "ok"
        );
    }

    #[test]
    fn body_merges_defaults_and_overrides() {
        let config = ProviderConfig::openai("k");
        let request = ChatRequest::new("openai", "question").with_max_tokens(64);
        let body = OpenAiChatAdapter.build_body(&config, &request);

        assert_eq!(body["model"], "gpt-4o");
        assert_eq!(body["max_tokens"], 64);
        assert_eq!(body["messages"][0]["role"], "user");
        assert_eq!(body["messages"][0]["content"], "question");
    }

    #[test]
    fn endpoint_appends_chat_completions_path() {
        let config = ProviderConfig::openai("k").with_base_url("https://proxy.example/");
        let request = ChatRequest::new("openai", "hi");
        assert_eq!(
            OpenAiChatAdapter.endpoint_url(&config, &request),
            "https://proxy.example/v1/chat/completions"
        );
    }
}
