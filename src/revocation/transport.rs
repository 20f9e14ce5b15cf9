//! Network transport behind the evaluator, kept behind a trait so tests
//! run without touching the network.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use thiserror::Error;
use tokio::time::timeout;
use tracing::debug;

use super::types::VerificationRequest;

#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("request timed out")]
    Timeout,

    #[error("backend returned HTTP {0}")]
    Status(u16),
}

/// What a GET probe of a candidate OCSP/CRL URL produced. Any HTTP
/// response counts as reachable; the body is kept only for successful
/// statuses so CRL payloads can be cross-referenced.
#[derive(Debug, Clone)]
pub struct ProbeResponse {
    pub status: u16,
    pub body: Vec<u8>,
}

#[async_trait]
pub trait RevocationTransport: Send + Sync {
    /// GET a candidate URL within `timeout`. `Err` means the endpoint was
    /// unreachable (transport failure or timeout), not an HTTP error.
    async fn probe(&self, url: &str, timeout: Duration) -> Result<ProbeResponse, NetworkError>;

    /// POST the verification request to a backend endpoint and decode its
    /// JSON reply.
    async fn verify(
        &self,
        endpoint: &str,
        request: &VerificationRequest,
        timeout: Duration,
    ) -> Result<serde_json::Value, NetworkError>;
}

/// reqwest-backed transport used by the binary.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self, NetworkError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl RevocationTransport for HttpTransport {
    async fn probe(&self, url: &str, limit: Duration) -> Result<ProbeResponse, NetworkError> {
        let response = match timeout(limit, self.client.get(url).send()).await {
            Ok(result) => result?,
            Err(_) => return Err(NetworkError::Timeout),
        };

        let status = response.status();
        let body = if status.is_success() {
            match timeout(limit, response.bytes()).await {
                Ok(bytes) => bytes?.to_vec(),
                Err(_) => return Err(NetworkError::Timeout),
            }
        } else {
            Vec::new()
        };
        debug!("probe of {url} answered HTTP {status} ({} body bytes)", body.len());

        Ok(ProbeResponse {
            status: status.as_u16(),
            body,
        })
    }

    async fn verify(
        &self,
        endpoint: &str,
        request: &VerificationRequest,
        limit: Duration,
    ) -> Result<serde_json::Value, NetworkError> {
        let response = match timeout(limit, self.client.post(endpoint).json(request).send()).await
        {
            Ok(result) => result?,
            Err(_) => return Err(NetworkError::Timeout),
        };

        if !response.status().is_success() {
            return Err(NetworkError::Status(response.status().as_u16()));
        }
        match timeout(limit, response.json()).await {
            Ok(result) => Ok(result?),
            Err(_) => Err(NetworkError::Timeout),
        }
    }
}
