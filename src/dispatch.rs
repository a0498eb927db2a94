//! Request Dispatcher
//!
//! The single entry point callers use. Every send runs the same pipeline:
//! validate the prompt, take the caller's throttle slot, resolve the
//! provider, POST the adapter-built request with a bounded timeout, map
//! failures into the [`DispatchError`] taxonomy, extract the response text,
//! and sanitize it before handing it back.
//!
//! Dropping the returned future cancels the in-flight HTTP call. The
//! throttle slot taken before the network call stands either way; the
//! limiter meters attempts, not completions.

use std::sync::Arc;
use std::time::Duration;

use tracing::{debug, warn};

use crate::adapters::{ProviderRequest, build_request};
use crate::config::ProviderConfig;
use crate::error::DispatchError;
use crate::rate_limit::FixedWindowLimiter;
use crate::registry::ProviderRegistry;
use crate::retry::{RetryPolicy, retry};
use crate::sanitize::{SanitizeMode, clean};
use crate::transport::{HttpTransport, ReqwestTransport, TransportRequest};
use crate::types::{ChatRequest, ChatResponse};
use crate::utils::redact;

/// Default outbound request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
/// Default maximum prompt length, in characters.
pub const DEFAULT_MAX_PROMPT_CHARS: usize = 4000;
/// Default throttle window.
pub const DEFAULT_THROTTLE_WINDOW: Duration = Duration::from_secs(60);

/// Longest upstream body snippet that may reach a debug log line.
const LOG_SNIPPET_CHARS: usize = 2048;

/// Orchestrates validation, throttling, provider dispatch, and sanitization.
///
/// Shareable across tasks; each `send` is independent. The limiter map is
/// the only mutable state.
pub struct Dispatcher {
    registry: ProviderRegistry,
    limiter: FixedWindowLimiter,
    transport: Arc<dyn HttpTransport>,
    max_prompt_chars: usize,
    sanitize_mode: SanitizeMode,
}

impl Dispatcher {
    /// Start building a dispatcher.
    pub fn builder() -> DispatcherBuilder {
        DispatcherBuilder::new()
    }

    /// Dispatch a single chat request on behalf of `caller_id`.
    pub async fn send(
        &self,
        request: &ChatRequest,
        caller_id: &str,
    ) -> Result<ChatResponse, DispatchError> {
        self.preflight(request, caller_id)?;
        self.attempt(request).await
    }

    /// Like [`Dispatcher::send`], retrying transient upstream failures.
    ///
    /// The prompt is validated and the throttle slot taken once; only the
    /// upstream leg is retried, and only for transport failures and 5xx.
    pub async fn send_with_retry(
        &self,
        request: &ChatRequest,
        caller_id: &str,
        policy: &RetryPolicy,
    ) -> Result<ChatResponse, DispatchError> {
        self.preflight(request, caller_id)?;
        retry(policy, || self.attempt(request)).await
    }

    /// The registered providers backing this dispatcher.
    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    fn preflight(&self, request: &ChatRequest, caller_id: &str) -> Result<(), DispatchError> {
        if request.prompt.trim().is_empty() {
            return Err(DispatchError::InvalidInput("prompt is empty".to_string()));
        }
        let prompt_chars = request.prompt.chars().count();
        if prompt_chars > self.max_prompt_chars {
            return Err(DispatchError::InvalidInput(format!(
                "prompt is {} characters, maximum is {}",
                prompt_chars, self.max_prompt_chars
            )));
        }
        if !self.limiter.try_acquire(caller_id) {
            debug!(provider = %request.provider, "caller throttled");
            return Err(DispatchError::RateLimited(format!(
                "one request per caller per {}s",
                self.limiter.window().as_secs()
            )));
        }
        Ok(())
    }

    async fn attempt(&self, request: &ChatRequest) -> Result<ChatResponse, DispatchError> {
        let resolved = self.registry.resolve(&request.provider)?;
        let ProviderRequest { url, headers, body } = build_request(resolved.config, request)?;

        debug!(
            provider = %request.provider,
            model = %request.options.model.as_deref().unwrap_or(&resolved.config.default_model),
            "dispatching chat request"
        );

        let response = self
            .transport
            .execute_json(TransportRequest { url, headers, body })
            .await
            .map_err(|e| match e {
                // Transport errors can echo the URL, which may carry a
                // query-embedded credential.
                DispatchError::TransportFailure(message) => {
                    DispatchError::TransportFailure(self.registry.redact(&message))
                }
                other => other,
            })?;

        let status = response.status;
        if !response.is_success() {
            let body_text = String::from_utf8_lossy(&response.body);
            debug!(
                provider = %request.provider,
                status,
                body = %self.registry.redact(&redact::truncate(&body_text, LOG_SNIPPET_CHARS)),
                "upstream error body"
            );
            warn!(provider = %request.provider, status, "upstream returned error status");
            return Err(DispatchError::UpstreamHttp {
                provider: request.provider.clone(),
                status,
            });
        }

        let body_json: serde_json::Value = serde_json::from_slice(&response.body).map_err(|_| {
            DispatchError::MalformedResponse {
                provider: request.provider.clone(),
                detail: "response body is not JSON".to_string(),
            }
        })?;
        let text = resolved.adapter.extract_text(&request.provider, &body_json)?;

        debug!(
            provider = %request.provider,
            status,
            chars = text.chars().count(),
            "chat request completed"
        );

        Ok(ChatResponse {
            text: clean(&text, self.sanitize_mode),
            provider: request.provider.clone(),
            status,
        })
    }
}

/// Builder for [`Dispatcher`].
///
/// `build` registers every provider, runs the registry's credential check,
/// and constructs the transport, so a dispatcher that exists is ready to
/// serve.
pub struct DispatcherBuilder {
    configs: Vec<ProviderConfig>,
    timeout: Duration,
    throttle_window: Duration,
    max_prompt_chars: usize,
    sanitize_mode: SanitizeMode,
    transport: Option<Arc<dyn HttpTransport>>,
}

impl DispatcherBuilder {
    /// Create a builder with the documented defaults.
    pub fn new() -> Self {
        Self {
            configs: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            throttle_window: DEFAULT_THROTTLE_WINDOW,
            max_prompt_chars: DEFAULT_MAX_PROMPT_CHARS,
            sanitize_mode: SanitizeMode::Strict,
            transport: None,
        }
    }

    /// Add a provider.
    pub fn provider(mut self, config: ProviderConfig) -> Self {
        self.configs.push(config);
        self
    }

    /// Set the outbound request timeout. Ignored when a custom transport
    /// is supplied; the transport owns its own bound then.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set the per-caller throttle window.
    pub fn throttle_window(mut self, window: Duration) -> Self {
        self.throttle_window = window;
        self
    }

    /// Set the maximum accepted prompt length, in characters.
    pub fn max_prompt_chars(mut self, max: usize) -> Self {
        self.max_prompt_chars = max;
        self
    }

    /// Set the output sanitization mode.
    pub fn sanitize_mode(mut self, mode: SanitizeMode) -> Self {
        self.sanitize_mode = mode;
        self
    }

    /// Supply a custom transport instead of the default `reqwest` one.
    pub fn transport(mut self, transport: Arc<dyn HttpTransport>) -> Self {
        self.transport = Some(transport);
        self
    }

    /// Build the dispatcher, failing closed on any misconfiguration.
    pub fn build(self) -> Result<Dispatcher, DispatchError> {
        let mut registry = ProviderRegistry::new();
        for config in self.configs {
            registry.register(config)?;
        }
        registry.validate_all()?;

        let transport = match self.transport {
            Some(transport) => transport,
            None => {
                let client = reqwest::Client::builder()
                    .timeout(self.timeout)
                    .build()
                    .map_err(|e| {
                        DispatchError::InvalidInput(format!("failed to build HTTP client: {e}"))
                    })?;
                Arc::new(ReqwestTransport::new(client))
            }
        };

        Ok(Dispatcher {
            registry,
            limiter: FixedWindowLimiter::new(self.throttle_window),
            transport,
            max_prompt_chars: self.max_prompt_chars,
            sanitize_mode: self.sanitize_mode,
        })
    }
}

impl Default for DispatcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}
