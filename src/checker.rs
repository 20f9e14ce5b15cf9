//! End-to-end pipeline: sniff the input format, extract the certificate,
//! evaluate revocation. Parse failures and unconfirmed-revocation outcomes
//! stay distinct in the report so callers never conflate the two.

use std::sync::Arc;
use std::time::Duration;

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::CheckerConfig;
use crate::input::{FormatError, SourceFormat, normalize_input};
use crate::pki::{CertificateRecord, ExtractionError, extract_certificate};
use crate::revocation::store::LocalStore;
use crate::revocation::{RevocationRequest, RevocationStatus, RevocationTransport, check_revocation_status};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParseReport {
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_format: Option<SourceFormat>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub certificate: Option<CertificateRecord>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckReport {
    pub parse: ParseReport,
    /// Absent when the input never parsed; the parse error already says
    /// the file could not be read as a certificate.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revocation: Option<RevocationStatus>,
}

pub struct CertificateChecker {
    config: CheckerConfig,
    transport: Arc<dyn RevocationTransport>,
    store: Arc<dyn LocalStore>,
}

impl CertificateChecker {
    pub fn new(
        config: CheckerConfig,
        transport: Arc<dyn RevocationTransport>,
        store: Arc<dyn LocalStore>,
    ) -> Self {
        Self {
            config,
            transport,
            store,
        }
    }

    /// Run the whole check against raw file bytes.
    pub async fn analyze(&self, bytes: &[u8]) -> CheckReport {
        let normalized = match normalize_input(bytes) {
            Ok(normalized) => normalized,
            Err(e) => {
                warn!("input not recognized as a certificate: {e}");
                return CheckReport {
                    parse: parse_failure(&e),
                    revocation: None,
                };
            }
        };

        let record = match extract_certificate(&normalized.der) {
            Ok(record) => record,
            Err(e) => {
                warn!("certificate extraction failed: {e}");
                return CheckReport {
                    parse: extraction_failure(normalized.source_format, &e),
                    revocation: None,
                };
            }
        };
        info!(
            serial = %record.serial_number_hex,
            issuer = %record.issuer,
            "certificate parsed"
        );

        // Certificates without their own distribution points fall back to
        // the configured CRL sources.
        let crl_urls = if record.crl_urls.is_empty() {
            self.config.crl_urls.clone()
        } else {
            record.crl_urls.clone()
        };

        let request = RevocationRequest {
            der_base64: STANDARD.encode(&normalized.der),
            serial_number_hex: record.serial_number_hex.clone(),
            ocsp_urls: record.ocsp_urls.clone(),
            crl_urls,
            endpoint: self.config.endpoint.clone(),
            timeout: Duration::from_millis(self.config.timeout_ms),
        };
        let revocation =
            check_revocation_status(&request, self.transport.as_ref(), self.store.as_ref()).await;

        CheckReport {
            parse: ParseReport {
                ok: true,
                source_format: Some(normalized.source_format),
                code: None,
                error: None,
                certificate: Some(record),
            },
            revocation: Some(revocation),
        }
    }
}

fn parse_failure(error: &FormatError) -> ParseReport {
    ParseReport {
        ok: false,
        source_format: None,
        code: Some(error.code().to_string()),
        error: Some(error.to_string()),
        certificate: None,
    }
}

fn extraction_failure(source_format: SourceFormat, error: &ExtractionError) -> ParseReport {
    ParseReport {
        ok: false,
        source_format: Some(source_format),
        code: Some("EXTRACTION_FAILED".to_string()),
        error: Some(error.to_string()),
        certificate: None,
    }
}
