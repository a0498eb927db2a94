//! # llmgate - Safety-Railed Multi-Provider LLM Dispatch
//!
//! llmgate is a single-call request/response dispatcher for large-language-
//! model HTTP APIs. One entry point fans out to any registered provider:
//! the prompt is validated, the caller is throttled, the provider-specific
//! payload and authentication are built from configuration, the response
//! text is extracted from the provider's JSON shape, and the result is
//! sanitized before it reaches rendering code.
//!
#![deny(unsafe_code)]
//!
//! ## Design
//!
//! - **Adapters as data**: the three wire formats (OpenAI chat completions,
//!   Anthropic messages, Gemini generateContent) are the only code paths;
//!   authentication differences are [`config::AuthScheme`] values. Another
//!   OpenAI-compatible endpoint is one more [`config::ProviderConfig`].
//! - **Typed failures**: every way a call can fail is a
//!   [`DispatchError`] variant, so callers branch on kind instead of
//!   parsing messages.
//! - **Fail-closed startup**: the dispatcher builder validates every
//!   registered credential before it will construct.
//! - **No ambient state**: the caller identifier and the limiter are
//!   explicit, so the pipeline is testable without a framework runtime.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llmgate::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let dispatcher = Dispatcher::builder()
//!         .provider(ProviderConfig::openai_from_env()?)
//!         .provider(ProviderConfig::anthropic_from_env()?)
//!         .build()?;
//!
//!     let request = ChatRequest::new("openai", "Explain AI security in one sentence")
//!         .with_max_tokens(200);
//!     let response = dispatcher.send(&request, "user-42").await?;
//!     println!("{}", response.text);
//!
//!     Ok(())
//! }
//! ```
//!
//! Streaming, tool calling, and conversation state are out of scope; this
//! crate is the safety rail between one prompt and one sanitized answer.

pub mod adapters;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod rate_limit;
pub mod registry;
pub mod retry;
pub mod sanitize;
pub mod transport;
pub mod types;
pub mod utils;

pub use config::{AuthScheme, ProviderConfig, WireFormat};
pub use dispatch::{Dispatcher, DispatcherBuilder};
pub use error::DispatchError;
pub use rate_limit::FixedWindowLimiter;
pub use registry::ProviderRegistry;
pub use retry::RetryPolicy;
pub use sanitize::SanitizeMode;
pub use transport::{HttpTransport, ReqwestTransport};
pub use types::{ChatRequest, ChatResponse, GenerationOptions};

/// Common imports for typical usage.
pub mod prelude {
    pub use crate::config::{AuthScheme, ProviderConfig, WireFormat};
    pub use crate::dispatch::{Dispatcher, DispatcherBuilder};
    pub use crate::error::DispatchError;
    pub use crate::retry::RetryPolicy;
    pub use crate::sanitize::SanitizeMode;
    pub use crate::types::{ChatRequest, ChatResponse, GenerationOptions};
}
