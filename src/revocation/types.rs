use std::time::Duration;

use serde::Serialize;
use serde_json::Value;

/// Endpoint used when no real backend is configured.
pub const DEFAULT_EMULATOR_ENDPOINT: &str = "mock://revocation-local";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Good,
    Revoked,
    Unknown,
}

impl Status {
    /// Map a backend-reported status string onto the taxonomy. Anything
    /// unrecognized stays `unknown`.
    pub fn parse(value: &str) -> Self {
        match value.to_ascii_lowercase().as_str() {
            "good" => Status::Good,
            "revoked" => Status::Revoked,
            _ => Status::Unknown,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    Emulator,
    Backend,
}

/// One revocation check's inputs.
#[derive(Debug, Clone, Default)]
pub struct RevocationRequest {
    pub der_base64: String,
    pub serial_number_hex: String,
    pub ocsp_urls: Vec<String>,
    pub crl_urls: Vec<String>,
    /// Empty or `mock://`/`emulator://` selects the emulator.
    pub endpoint: String,
    pub timeout: Duration,
}

/// Wire body POSTed to a backend verification service.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRequest {
    pub der_base64: String,
    pub serial_number_hex: String,
    pub ocsp_urls: Vec<String>,
    pub crl_urls: Vec<String>,
}

/// Diagnostic record of a single URL probe.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UrlProbe {
    pub url: String,
    pub reachable: bool,
    pub skipped: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// Outcome of a revocation check.
///
/// Invariant: emulator results are never `definitive` — reachability and a
/// local mock list are not cryptographic proof either way.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RevocationStatus {
    pub status: Status,
    pub source: Source,
    pub endpoint: String,
    pub definitive: bool,
    pub verification_level: String,
    pub message: String,
    pub details: Value,
}
