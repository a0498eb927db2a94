//! HTTP transport abstraction.
//!
//! The dispatcher talks to upstreams through an injectable transport that
//! observes the final URL/headers/body and returns status plus raw body.
//! Production uses [`ReqwestTransport`]; tests can substitute a synthetic
//! transport to exercise the pipeline without a socket.

use async_trait::async_trait;
use reqwest::header::HeaderMap;

use crate::error::DispatchError;

/// Transport-level request data for a JSON POST.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    /// Final URL, credential already attached for query-based schemes.
    pub url: String,
    /// Complete header set.
    pub headers: HeaderMap,
    /// JSON body.
    pub body: serde_json::Value,
}

/// Transport-level response data.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status code.
    pub status: u16,
    /// Raw response body.
    pub body: Vec<u8>,
}

impl TransportResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Custom HTTP transport for JSON requests.
///
/// Implementations must bound the call (connection + read) so a hung
/// upstream surfaces as [`DispatchError::TransportFailure`] rather than a
/// stuck future. Dropping the returned future must abort the request.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Execute a JSON POST and return the raw response.
    async fn execute_json(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, DispatchError>;
}

/// Default transport backed by `reqwest`.
///
/// The timeout lives on the wrapped client; the dispatcher builder
/// configures it there.
pub struct ReqwestTransport {
    client: reqwest::Client,
}

impl ReqwestTransport {
    /// Wrap a configured `reqwest` client.
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute_json(
        &self,
        request: TransportRequest,
    ) -> Result<TransportResponse, DispatchError> {
        let response = self
            .client
            .post(&request.url)
            .headers(request.headers)
            .json(&request.body)
            .send()
            .await
            .map_err(|e| DispatchError::TransportFailure(e.to_string()))?;

        let status = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| DispatchError::TransportFailure(e.to_string()))?
            .to_vec();

        Ok(TransportResponse { status, body })
    }
}
