//! Gemini-compatible generateContent wire format.

use serde_json::{Value, json};

use super::ProviderAdapter;
use crate::config::ProviderConfig;
use crate::error::DispatchError;
use crate::types::ChatRequest;

/// `POST {base}/v1beta/models/{model}:generateContent`, text at
/// `candidates[0].content.parts[0].text`.
///
/// The model is part of the URL path rather than the body, so the endpoint
/// depends on the request's model override.
pub struct GeminiGenerateContentAdapter;

impl ProviderAdapter for GeminiGenerateContentAdapter {
    fn endpoint_url(&self, config: &ProviderConfig, request: &ChatRequest) -> String {
        let model = request
            .options
            .model
            .as_deref()
            .unwrap_or(&config.default_model);
        format!(
            "{}/v1beta/models/{}:generateContent",
            config.base_url.trim_end_matches('/'),
            model
        )
    }

    fn build_body(&self, config: &ProviderConfig, request: &ChatRequest) -> Value {
        json!({
            "contents": [{ "parts": [{ "text": request.prompt }] }],
            "generationConfig": {
                "temperature": request.options.temperature.unwrap_or(config.default_temperature),
                "maxOutputTokens": request.options.max_tokens.unwrap_or(config.default_max_tokens),
            },
        })
    }

    fn extract_text(&self, provider: &str, body: &Value) -> Result<String, DispatchError> {
        body.pointer("/candidates/0/content/parts/0/text")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .ok_or_else(|| DispatchError::MalformedResponse {
                provider: provider.to_string(),
                detail: "missing candidates[0].content.parts[0].text".to_string(),
            })
    }
}
