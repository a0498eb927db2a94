//! Provider Configuration
//!
//! A [`ProviderConfig`] describes one upstream: where it lives, how its
//! credential is attached, which wire format it speaks, and its generation
//! defaults. Authentication differences between providers are data here,
//! not code paths; adding another OpenAI-compatible endpoint is a new
//! config value, never a new adapter.

use secrecy::{ExposeSecret, SecretString};
use std::collections::HashMap;

use crate::error::DispatchError;

/// Default maximum output tokens when neither config nor call overrides it.
pub const DEFAULT_MAX_TOKENS: u32 = 1000;
/// Default sampling temperature.
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

/// How a provider expects its credential to be attached.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthScheme {
    /// `Authorization: Bearer <key>`.
    BearerHeader,
    /// Credential sent in a provider-named header, e.g. `x-api-key`.
    CustomHeader {
        /// Name of the header carrying the credential.
        header: String,
    },
    /// Credential appended to the request URL's query string.
    QueryParam {
        /// Name of the query parameter carrying the credential.
        name: String,
    },
}

/// Which request/response wire shape a provider speaks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WireFormat {
    /// `POST .../v1/chat/completions`, text at `choices[0].message.content`.
    OpenAiChat,
    /// `POST .../v1/messages`, text at `content[0].text`.
    AnthropicMessages,
    /// `POST .../models/{model}:generateContent`, text at
    /// `candidates[0].content.parts[0].text`.
    GeminiGenerateContent,
}

/// Immutable configuration for one upstream provider.
///
/// The credential is held as a [`SecretString`] and never appears in
/// `Debug` output or log lines.
#[derive(Debug, Clone)]
pub struct ProviderConfig {
    /// Unique provider identifier used by callers.
    pub id: String,
    /// Scheme-and-host root; adapters append their endpoint path.
    pub base_url: String,
    /// Wire format this provider speaks.
    pub wire_format: WireFormat,
    /// How the credential is attached to requests.
    pub auth: AuthScheme,
    /// Static headers sent with every request, e.g. a version header.
    pub extra_headers: HashMap<String, String>,
    /// Model used when the call doesn't override it.
    pub default_model: String,
    /// Max output tokens used when the call doesn't override it.
    pub default_max_tokens: u32,
    /// Temperature used when the call doesn't override it.
    pub default_temperature: f32,
    credential: SecretString,
}

impl ProviderConfig {
    /// Create a config from scratch. Prefer the provider presets below for
    /// the documented provider classes.
    pub fn new(
        id: impl Into<String>,
        base_url: impl Into<String>,
        wire_format: WireFormat,
        auth: AuthScheme,
        default_model: impl Into<String>,
        credential: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            base_url: base_url.into(),
            wire_format,
            auth,
            extra_headers: HashMap::new(),
            default_model: default_model.into(),
            default_max_tokens: DEFAULT_MAX_TOKENS,
            default_temperature: DEFAULT_TEMPERATURE,
            credential: SecretString::from(credential.into()),
        }
    }

    /// Preset for the OpenAI chat completions API.
    pub fn openai(credential: impl Into<String>) -> Self {
        Self::new(
            "openai",
            "https://api.openai.com",
            WireFormat::OpenAiChat,
            AuthScheme::BearerHeader,
            "gpt-4o",
            credential,
        )
    }

    /// Preset for the Anthropic messages API.
    pub fn anthropic(credential: impl Into<String>) -> Self {
        Self::new(
            "anthropic",
            "https://api.anthropic.com",
            WireFormat::AnthropicMessages,
            AuthScheme::CustomHeader {
                header: "x-api-key".to_string(),
            },
            "claude-3-5-sonnet-20241022",
            credential,
        )
        .with_extra_header("anthropic-version", "2023-06-01")
    }

    /// Preset for the Google Gemini generateContent API.
    ///
    /// The credential travels in the URL query string, matching the
    /// documented default. Current Gemini endpoints also accept a header;
    /// switch with `.with_auth(AuthScheme::CustomHeader { .. })` if URL
    /// hygiene matters more than compatibility.
    pub fn gemini(credential: impl Into<String>) -> Self {
        Self::new(
            "gemini",
            "https://generativelanguage.googleapis.com",
            WireFormat::GeminiGenerateContent,
            AuthScheme::QueryParam {
                name: "key".to_string(),
            },
            "gemini-1.5-pro",
            credential,
        )
    }

    /// OpenAI preset with the credential read from `OPENAI_API_KEY`.
    pub fn openai_from_env() -> Result<Self, DispatchError> {
        Ok(Self::openai(env_credential("OPENAI_API_KEY", "openai")?))
    }

    /// Anthropic preset with the credential read from `ANTHROPIC_API_KEY`.
    pub fn anthropic_from_env() -> Result<Self, DispatchError> {
        Ok(Self::anthropic(env_credential(
            "ANTHROPIC_API_KEY",
            "anthropic",
        )?))
    }

    /// Gemini preset with the credential read from `GOOGLE_API_KEY`.
    pub fn gemini_from_env() -> Result<Self, DispatchError> {
        Ok(Self::gemini(env_credential("GOOGLE_API_KEY", "gemini")?))
    }

    /// Replace the provider identifier.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Replace the base URL (e.g. to point at a mock server or a gateway).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    /// Replace the authentication scheme.
    pub fn with_auth(mut self, auth: AuthScheme) -> Self {
        self.auth = auth;
        self
    }

    /// Replace the default model.
    pub fn with_default_model(mut self, model: impl Into<String>) -> Self {
        self.default_model = model.into();
        self
    }

    /// Replace the default max output tokens.
    pub fn with_default_max_tokens(mut self, max_tokens: u32) -> Self {
        self.default_max_tokens = max_tokens;
        self
    }

    /// Replace the default temperature.
    pub fn with_default_temperature(mut self, temperature: f32) -> Self {
        self.default_temperature = temperature;
        self
    }

    /// Add a static header sent with every request to this provider.
    pub fn with_extra_header(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.extra_headers.insert(name.into(), value.into());
        self
    }

    /// The provider credential.
    pub fn credential(&self) -> &SecretString {
        &self.credential
    }

    /// Whether a non-empty credential is configured.
    pub fn has_credential(&self) -> bool {
        !self.credential.expose_secret().is_empty()
    }
}

fn env_credential(var: &str, provider: &str) -> Result<String, DispatchError> {
    std::env::var(var)
        .ok()
        .filter(|value| !value.is_empty())
        .ok_or_else(|| DispatchError::MissingCredential(provider.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_carry_documented_defaults() {
        let openai = ProviderConfig::openai("k");
        assert_eq!(openai.default_model, "gpt-4o");
        assert_eq!(openai.auth, AuthScheme::BearerHeader);
        assert_eq!(openai.default_max_tokens, DEFAULT_MAX_TOKENS);

        let anthropic = ProviderConfig::anthropic("k");
        assert_eq!(anthropic.default_model, "claude-3-5-sonnet-20241022");
        assert_eq!(
            anthropic.extra_headers.get("anthropic-version").map(String::as_str),
            Some("2023-06-01")
        );

        let gemini = ProviderConfig::gemini("k");
        assert_eq!(gemini.default_model, "gemini-1.5-pro");
        assert_eq!(
            gemini.auth,
            AuthScheme::QueryParam {
                name: "key".to_string()
            }
        );
    }

    #[test]
    fn credential_is_not_debug_printed() {
        let config = ProviderConfig::openai("sk-super-secret");
        let debugged = format!("{config:?}");
        assert!(!debugged.contains("sk-super-secret"));
    }

    #[test]
    fn has_credential_reflects_emptiness() {
        assert!(ProviderConfig::openai("k").has_credential());
        assert!(!ProviderConfig::openai("").has_credential());
    }

    #[test]
    fn missing_env_var_is_missing_credential() {
        let err = env_credential("LLMGATE_TEST_UNSET_VAR", "openai").unwrap_err();
        assert_eq!(err, DispatchError::MissingCredential("openai".to_string()));
    }
}
