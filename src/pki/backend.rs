//! Alternative extractor backed by the `x509-parser` crate.
//!
//! The built-in walker stays the source of truth; this backend exists for
//! callers that prefer a full X.509 library when one is available. Note
//! one representational difference: the library strips DER's leading 0x00
//! pad byte from serial numbers, the walker keeps it. Normalized
//! comparison is unaffected.

use x509_parser::prelude::*;

use crate::asn1::oid;

use super::certificate::{CertificateRecord, scan_urls};
use super::errors::ExtractionError;

pub fn extract_certificate(der: &[u8]) -> Result<CertificateRecord, ExtractionError> {
    let (_, cert) =
        X509Certificate::from_der(der).map_err(|e| ExtractionError::Backend(e.to_string()))?;

    let tbs = &cert.tbs_certificate;
    let serial_number_hex = hex::encode_upper(tbs.serial.to_bytes_be());
    let signature_algorithm_oid = cert.signature_algorithm.algorithm.to_id_string();
    let signature_algorithm_name =
        oid::signature_algorithm_name(&signature_algorithm_oid).map(str::to_string);

    let mut ocsp_urls = Vec::new();
    let mut crl_urls = Vec::new();
    let mut ca_issuer_urls = Vec::new();
    for ext in tbs.extensions() {
        let ext_oid = ext.oid.to_id_string();
        if ext_oid == oid::CRL_DISTRIBUTION_POINTS {
            crl_urls.extend(scan_urls(ext.value));
        } else if ext_oid == oid::AUTHORITY_INFO_ACCESS {
            for url in scan_urls(ext.value) {
                if url.to_ascii_lowercase().contains("ocsp") {
                    ocsp_urls.push(url);
                } else {
                    ca_issuer_urls.push(url);
                }
            }
        }
    }

    Ok(CertificateRecord {
        serial_number_hex,
        issuer: tbs.issuer.to_string(),
        subject: tbs.subject.to_string(),
        not_before: tbs.validity.not_before.to_string(),
        not_after: tbs.validity.not_after.to_string(),
        signature_algorithm_oid,
        signature_algorithm_name,
        ocsp_urls,
        crl_urls,
        ca_issuer_urls,
    })
}
