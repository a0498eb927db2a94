//! Request and Response Types
//!
//! The single-call surface: a [`ChatRequest`] goes in, a [`ChatResponse`]
//! comes out. Neither is persisted; both are cheap to clone.

use serde::Serialize;

/// Per-call generation parameter overrides.
///
/// Unset fields fall back to the provider's configured defaults.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct GenerationOptions {
    /// Model override.
    pub model: Option<String>,
    /// Maximum output tokens override.
    pub max_tokens: Option<u32>,
    /// Sampling temperature override.
    pub temperature: Option<f32>,
}

/// A single-shot chat request addressed to a registered provider.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Identifier of the provider to dispatch to.
    pub provider: String,
    /// The user prompt.
    pub prompt: String,
    /// Optional generation overrides.
    pub options: GenerationOptions,
}

impl ChatRequest {
    /// Create a request for `provider` with default generation parameters.
    pub fn new(provider: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            provider: provider.into(),
            prompt: prompt.into(),
            options: GenerationOptions::default(),
        }
    }

    /// Override the model for this call.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.options.model = Some(model.into());
        self
    }

    /// Override the maximum output tokens for this call.
    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.options.max_tokens = Some(max_tokens);
        self
    }

    /// Override the sampling temperature for this call.
    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.options.temperature = Some(temperature);
        self
    }
}

/// Extracted, sanitized provider output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatResponse {
    /// Response text, already passed through the configured sanitizer.
    pub text: String,
    /// Identifier of the provider that produced the response.
    pub provider: String,
    /// HTTP status returned by the upstream.
    pub status: u16,
}
