//! The revocation status evaluator.
//!
//! Candidate URLs are probed sequentially with a capped per-probe timeout;
//! one failed probe never aborts the rest. Emulator mode deliberately
//! reports reachable-but-unverified sources as `unknown`, never `good`:
//! reachability alone proves nothing about revocation.

use std::time::Duration;

use serde_json::json;
use tracing::{debug, info, warn};

use crate::pki::{extract_crl, normalize_serial};

use super::classify::classify_url;
use super::store::{LocalStore, MOCK_REVOKED_SERIALS_KEY, read_mock_revoked_serials};
use super::transport::RevocationTransport;
use super::types::{
    DEFAULT_EMULATOR_ENDPOINT, RevocationRequest, RevocationStatus, Source, Status, UrlProbe,
    VerificationRequest,
};

/// Upper bound on any single emulator probe.
const PROBE_TIMEOUT_CAP: Duration = Duration::from_millis(4500);

/// Run one revocation check. Backend mode when `endpoint` is a real URL,
/// emulator mode otherwise.
pub async fn check_revocation_status(
    request: &RevocationRequest,
    transport: &dyn RevocationTransport,
    store: &dyn LocalStore,
) -> RevocationStatus {
    let endpoint = request.endpoint.trim();
    if is_emulated_endpoint(endpoint) {
        emulate(request, transport, store).await
    } else {
        delegate_to_backend(request, endpoint, transport).await
    }
}

fn is_emulated_endpoint(endpoint: &str) -> bool {
    let normalized = endpoint.to_ascii_lowercase();
    normalized.is_empty()
        || normalized.starts_with("mock://")
        || normalized.starts_with("emulator://")
}

/// Emulator mode: mock-list lookup plus best-effort probing of candidate
/// sources, with CRL bodies cross-referenced against the serial.
async fn emulate(
    request: &RevocationRequest,
    transport: &dyn RevocationTransport,
    store: &dyn LocalStore,
) -> RevocationStatus {
    let serial = normalize_serial(&request.serial_number_hex);
    let have_serial = !request.serial_number_hex.trim().is_empty();
    let revoked_serials = read_mock_revoked_serials(store);
    let probe_timeout = request.timeout.min(PROBE_TIMEOUT_CAP);

    let mut checks: Vec<UrlProbe> = Vec::new();
    let mut crl_match: Option<(String, String)> = None;

    // Sequential on purpose: this is a diagnostic feature, not worth
    // bursting parallel outbound requests for.
    for url in request.ocsp_urls.iter().chain(request.crl_urls.iter()) {
        let (probe, body) = probe_url(transport, url, probe_timeout).await;
        if crl_match.is_none()
            && let Some(body) = body
            && let Ok(crl) = extract_crl(&body)
            && let Some(date) = crl.revoked.get(&serial)
        {
            info!("serial {serial} found in CRL fetched from {url}");
            crl_match = Some((url.clone(), date.clone()));
        }
        checks.push(probe);
    }

    if have_serial && revoked_serials.contains(&serial) {
        return emulator_status(
            Status::Revoked,
            "serial number found in the local mock revoked-serial list",
            json!({
                "storageKey": MOCK_REVOKED_SERIALS_KEY,
                "checkedUrls": checks,
            }),
        );
    }

    if let Some((url, date)) = crl_match {
        return emulator_status(
            Status::Revoked,
            format!("serial number is listed in the CRL fetched from {url}"),
            json!({
                "matchedUrl": url,
                "revocationDate": date,
                "checkedUrls": checks,
            }),
        );
    }

    let any_reachable = checks.iter().any(|check| check.reachable);
    if any_reachable {
        // Stricter reading: a reachable endpoint is not a clean bill of
        // health, so this stays `unknown` rather than `good`.
        return emulator_status(
            Status::Unknown,
            "external OCSP/CRL sources are reachable, but without cryptographic \
             verification of their responses the status cannot be considered trustworthy",
            json!({
                "checkedUrls": checks,
                "confidence": "low",
                "suggestedStatus": "likely_good",
                "warning": "use a real verification backend for a definitive status",
            }),
        );
    }

    emulator_status(
        Status::Unknown,
        "no external OCSP/CRL source could be reached; revocation status is unconfirmed",
        json!({
            "checkedUrls": checks,
            "confidence": "low",
            "warning": "best-effort result without cryptographic verification",
        }),
    )
}

fn emulator_status(
    status: Status,
    message: impl Into<String>,
    details: serde_json::Value,
) -> RevocationStatus {
    RevocationStatus {
        status,
        source: Source::Emulator,
        endpoint: DEFAULT_EMULATOR_ENDPOINT.to_string(),
        // Emulator verdicts are a local simulation, never proof.
        definitive: false,
        verification_level: "emulator-best-effort".to_string(),
        message: message.into(),
        details,
    }
}

/// Probe one URL, skipping internal hosts without any network call.
/// Returns the diagnostic record plus the body, if one was fetched.
async fn probe_url(
    transport: &dyn RevocationTransport,
    url: &str,
    limit: Duration,
) -> (UrlProbe, Option<Vec<u8>>) {
    let class = classify_url(url);
    if class.likely_internal {
        debug!("skipping likely-internal URL {url}");
        return (
            UrlProbe {
                url: url.to_string(),
                reachable: false,
                skipped: true,
                status: None,
                reason: Some("likely_internal".to_string()),
            },
            None,
        );
    }

    match transport.probe(url, limit).await {
        Ok(response) => {
            let body = (!response.body.is_empty()).then_some(response.body);
            (
                UrlProbe {
                    url: url.to_string(),
                    reachable: true,
                    skipped: false,
                    status: Some(response.status),
                    reason: None,
                },
                body,
            )
        }
        Err(e) => {
            warn!("probe of {url} failed: {e}");
            (
                UrlProbe {
                    url: url.to_string(),
                    reachable: false,
                    skipped: false,
                    status: None,
                    reason: Some(e.to_string()),
                },
                None,
            )
        }
    }
}

/// Backend mode: one POST to the verification service; every failure path
/// degrades to `unknown`, never to a silent `good`.
async fn delegate_to_backend(
    request: &RevocationRequest,
    endpoint: &str,
    transport: &dyn RevocationTransport,
) -> RevocationStatus {
    let body = VerificationRequest {
        der_base64: request.der_base64.clone(),
        serial_number_hex: request.serial_number_hex.clone(),
        ocsp_urls: request.ocsp_urls.clone(),
        crl_urls: request.crl_urls.clone(),
    };

    match transport.verify(endpoint, &body, request.timeout).await {
        Ok(reply) => {
            let status = reply
                .get("revocation")
                .or_else(|| reply.get("status"))
                .and_then(|v| v.as_str())
                .map(Status::parse)
                .unwrap_or(Status::Unknown);
            let definitive = reply
                .get("definitive")
                .and_then(|v| v.as_bool())
                .unwrap_or(true);
            let verification_level = reply
                .get("verificationLevel")
                .and_then(|v| v.as_str())
                .unwrap_or("backend-verified")
                .to_string();
            let message = reply
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("status reported by verification backend")
                .to_string();

            RevocationStatus {
                status,
                source: Source::Backend,
                endpoint: endpoint.to_string(),
                definitive,
                verification_level,
                message,
                details: reply,
            }
        }
        Err(e) => {
            warn!("backend verification via {endpoint} failed: {e}");
            RevocationStatus {
                status: Status::Unknown,
                source: Source::Backend,
                endpoint: endpoint.to_string(),
                definitive: false,
                verification_level: "backend-unreachable".to_string(),
                message: format!("verification was not performed: {e}"),
                details: serde_json::Value::Null,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;

    use super::*;
    use crate::revocation::store::MemoryStore;
    use crate::revocation::transport::{NetworkError, ProbeResponse};

    /// Canned transport: answers every probe the same way and counts calls.
    struct StubTransport {
        probe_result: Option<ProbeResponse>,
        calls: AtomicUsize,
    }

    impl StubTransport {
        fn unreachable() -> Self {
            Self {
                probe_result: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn reachable_with(body: Vec<u8>) -> Self {
            Self {
                probe_result: Some(ProbeResponse { status: 200, body }),
                calls: AtomicUsize::new(0),
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl RevocationTransport for StubTransport {
        async fn probe(&self, _url: &str, _t: Duration) -> Result<ProbeResponse, NetworkError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.probe_result {
                Some(response) => Ok(response.clone()),
                None => Err(NetworkError::Timeout),
            }
        }

        async fn verify(
            &self,
            _endpoint: &str,
            _request: &VerificationRequest,
            _t: Duration,
        ) -> Result<serde_json::Value, NetworkError> {
            Err(NetworkError::Status(503))
        }
    }

    fn request(serial: &str, urls: Vec<String>) -> RevocationRequest {
        RevocationRequest {
            der_base64: String::new(),
            serial_number_hex: serial.to_string(),
            ocsp_urls: Vec::new(),
            crl_urls: urls,
            endpoint: String::new(),
            timeout: Duration::from_millis(100),
        }
    }

    #[tokio::test]
    async fn mock_list_hit_reports_revoked_but_not_definitive() {
        let store = MemoryStore::with_entry(MOCK_REVOKED_SERIALS_KEY, "00ab,ff");
        let transport = StubTransport::unreachable();

        let result = check_revocation_status(&request("AB", vec![]), &transport, &store).await;
        assert_eq!(result.status, Status::Revoked);
        assert_eq!(result.source, Source::Emulator);
        assert!(!result.definitive);
    }

    #[tokio::test]
    async fn reachable_source_without_match_stays_unknown() {
        let store = MemoryStore::new();
        let transport = StubTransport::reachable_with(Vec::new());

        let result = check_revocation_status(
            &request("1A2B", vec!["http://crl.example.com/ca.crl".into()]),
            &transport,
            &store,
        )
        .await;
        assert_eq!(result.status, Status::Unknown);
        assert!(!result.definitive);
        assert_eq!(transport.calls(), 1);
    }

    #[tokio::test]
    async fn internal_urls_are_skipped_without_network_calls() {
        let store = MemoryStore::new();
        let transport = StubTransport::reachable_with(Vec::new());

        let result = check_revocation_status(
            &request(
                "AB",
                vec![
                    "http://192.168.1.5/crl".into(),
                    "http://localhost/crl".into(),
                ],
            ),
            &transport,
            &store,
        )
        .await;

        assert_eq!(transport.calls(), 0);
        let checks = result.details.get("checkedUrls").unwrap().as_array().unwrap();
        assert_eq!(checks.len(), 2);
        for check in checks {
            assert_eq!(check.get("skipped"), Some(&serde_json::json!(true)));
            assert_eq!(
                check.get("reason").and_then(|r| r.as_str()),
                Some("likely_internal")
            );
        }
        assert_eq!(result.status, Status::Unknown);
    }

    #[tokio::test]
    async fn nothing_reachable_reports_low_confidence_unknown() {
        let store = MemoryStore::new();
        let transport = StubTransport::unreachable();

        let result = check_revocation_status(
            &request("AB", vec!["http://crl.example.com/ca.crl".into()]),
            &transport,
            &store,
        )
        .await;
        assert_eq!(result.status, Status::Unknown);
        assert_eq!(result.verification_level, "emulator-best-effort");
        assert_eq!(
            result.details.get("confidence").and_then(|v| v.as_str()),
            Some("low")
        );
    }

    #[tokio::test]
    async fn backend_http_error_degrades_to_unknown() {
        let store = MemoryStore::new();
        let transport = StubTransport::unreachable();

        let mut req = request("AB", vec![]);
        req.endpoint = "https://verifier.example.com/check".to_string();
        let result = check_revocation_status(&req, &transport, &store).await;

        assert_eq!(result.status, Status::Unknown);
        assert_eq!(result.source, Source::Backend);
        assert!(!result.definitive);
        assert!(result.message.contains("503"));
    }

    #[tokio::test]
    async fn mock_scheme_endpoint_selects_emulator() {
        let store = MemoryStore::new();
        let transport = StubTransport::unreachable();

        let mut req = request("AB", vec![]);
        req.endpoint = "mock://revocation-local".to_string();
        let result = check_revocation_status(&req, &transport, &store).await;
        assert_eq!(result.source, Source::Emulator);
    }
}
