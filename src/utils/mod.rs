//! Utility modules for llmgate
//!
//! Shared helpers used across the dispatch pipeline.

pub mod headers;
pub mod redact;

pub use headers::HttpHeaderBuilder;
