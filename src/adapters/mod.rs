//! Provider Adapter System
//!
//! One adapter per wire format, each responsible for exactly two things:
//! shaping the outbound JSON body (with URL path construction) and pulling
//! the generated text back out of the provider's response shape.
//! Authentication and header assembly are shared and driven by
//! [`AuthScheme`] data, so a provider speaking an existing format needs a
//! config entry, not an adapter.

use reqwest::header::HeaderMap;
use secrecy::ExposeSecret;
use serde_json::Value;

use crate::config::{AuthScheme, ProviderConfig, WireFormat};
use crate::error::DispatchError;
use crate::types::ChatRequest;
use crate::utils::headers::HttpHeaderBuilder;

mod anthropic;
mod gemini;
mod openai;

pub use anthropic::AnthropicMessagesAdapter;
pub use gemini::GeminiGenerateContentAdapter;
pub use openai::OpenAiChatAdapter;

/// A fully prepared outbound request.
#[derive(Debug, Clone)]
pub struct ProviderRequest {
    /// Final URL, credential attached if the scheme is query-based.
    pub url: String,
    /// Headers including content type, auth, and static extras.
    pub headers: HeaderMap,
    /// Provider-shaped JSON body.
    pub body: Value,
}

/// Wire-format strategy for one provider class.
pub trait ProviderAdapter: Send + Sync {
    /// Endpoint for this request, rooted at the provider's base URL.
    fn endpoint_url(&self, config: &ProviderConfig, request: &ChatRequest) -> String;

    /// Provider-shaped JSON body with config defaults merged in.
    fn build_body(&self, config: &ProviderConfig, request: &ChatRequest) -> Value;

    /// Pull the generated text out of a provider response body.
    ///
    /// Fails with [`DispatchError::MalformedResponse`] only when the
    /// format's required text path is absent; any other unexpected or
    /// missing field is ignored.
    fn extract_text(&self, provider: &str, body: &Value) -> Result<String, DispatchError>;
}

/// Select the adapter implementation for a wire format tag.
pub fn adapter_for(format: WireFormat) -> &'static dyn ProviderAdapter {
    match format {
        WireFormat::OpenAiChat => &OpenAiChatAdapter,
        WireFormat::AnthropicMessages => &AnthropicMessagesAdapter,
        WireFormat::GeminiGenerateContent => &GeminiGenerateContentAdapter,
    }
}

/// Assemble URL, headers, and body for a request, attaching the credential
/// according to the provider's auth scheme.
pub fn build_request(
    config: &ProviderConfig,
    request: &ChatRequest,
) -> Result<ProviderRequest, DispatchError> {
    let adapter = adapter_for(config.wire_format);
    let mut url = adapter.endpoint_url(config, request);

    let mut headers = HttpHeaderBuilder::new().with_json_content_type();
    match &config.auth {
        AuthScheme::BearerHeader => {
            headers = headers.with_bearer_auth(config.credential().expose_secret())?;
        }
        AuthScheme::CustomHeader { header } => {
            headers = headers.with_custom_auth(header, config.credential().expose_secret())?;
        }
        AuthScheme::QueryParam { name } => {
            let separator = if url.contains('?') { '&' } else { '?' };
            url.push(separator);
            url.push_str(name);
            url.push('=');
            url.push_str(&urlencoding::encode(config.credential().expose_secret()));
        }
    }
    for (name, value) in &config.extra_headers {
        headers = headers.with_header(name, value)?;
    }

    Ok(ProviderRequest {
        url,
        headers: headers.build(),
        body: adapter.build_body(config, request),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::header::AUTHORIZATION;

    #[test]
    fn bearer_scheme_sets_authorization_header() {
        let config = ProviderConfig::openai("sk-test");
        let request = ChatRequest::new("openai", "hi");
        let prepared = build_request(&config, &request).unwrap();

        assert_eq!(
            prepared.headers.get(AUTHORIZATION).unwrap(),
            "Bearer sk-test"
        );
        assert!(!prepared.url.contains("sk-test"));
    }

    #[test]
    fn custom_header_scheme_sets_named_header_and_extras() {
        let config = ProviderConfig::anthropic("ak-test");
        let request = ChatRequest::new("anthropic", "hi");
        let prepared = build_request(&config, &request).unwrap();

        assert_eq!(
            prepared.headers.get("x-api-key").and_then(|v| v.to_str().ok()),
            Some("ak-test")
        );
        assert_eq!(
            prepared
                .headers
                .get("anthropic-version")
                .and_then(|v| v.to_str().ok()),
            Some("2023-06-01")
        );
        assert!(prepared.headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn query_scheme_embeds_encoded_credential_in_url() {
        let config = ProviderConfig::gemini("g/key+1");
        let request = ChatRequest::new("gemini", "hi");
        let prepared = build_request(&config, &request).unwrap();

        assert!(prepared.url.ends_with("?key=g%2Fkey%2B1"));
        assert!(prepared.headers.get("x-goog-api-key").is_none());
    }

    #[test]
    fn gemini_accepts_header_auth_as_configuration() {
        let config = ProviderConfig::gemini("g-key").with_auth(AuthScheme::CustomHeader {
            header: "x-goog-api-key".to_string(),
        });
        let request = ChatRequest::new("gemini", "hi");
        let prepared = build_request(&config, &request).unwrap();

        assert!(!prepared.url.contains("g-key"));
        assert_eq!(
            prepared
                .headers
                .get("x-goog-api-key")
                .and_then(|v| v.to_str().ok()),
            Some("g-key")
        );
    }
}
