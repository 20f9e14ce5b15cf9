//! Positional TBSCertificate walker.
//!
//! X.509 fields are located by position, not by a schema library, so every
//! optional field that may shift later indices (the explicit `[0]` version
//! tag in particular) is detected by inspecting the concrete tag at the
//! candidate position and fails loudly when the expectation breaks.

use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, warn};

use crate::asn1::der::{
    DerElement, TAG_CONTEXT_0, TAG_CONTEXT_3, TAG_CONTEXT_URI, TAG_INTEGER, TAG_OCTET_STRING,
    TAG_OID, TAG_SEQUENCE,
};
use crate::asn1::name::EMPTY_NAME;
use crate::asn1::{decode_oid, decode_time, oid, parse_distinguished_name, parse_element};

use super::errors::ExtractionError;

/// Structured view of one certificate, immutable once produced.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CertificateRecord {
    /// Uppercase hex of the raw INTEGER content, leading 0x00 pad byte
    /// included. Normalization happens only at revocation comparison time.
    pub serial_number_hex: String,
    pub issuer: String,
    pub subject: String,
    pub not_before: String,
    pub not_after: String,
    pub signature_algorithm_oid: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature_algorithm_name: Option<String>,
    pub ocsp_urls: Vec<String>,
    pub crl_urls: Vec<String>,
    pub ca_issuer_urls: Vec<String>,
}

/// Extract the fields this crate cares about from a DER certificate.
pub fn extract_certificate(der: &[u8]) -> Result<CertificateRecord, ExtractionError> {
    let root = parse_element(der, 0)?;
    if root.tag != TAG_SEQUENCE {
        return Err(ExtractionError::NotASequence { tag: root.tag });
    }
    let tbs = root
        .children
        .first()
        .filter(|el| el.tag == TAG_SEQUENCE)
        .ok_or(ExtractionError::MissingTbsCertificate)?;

    let fields = &tbs.children;
    // Explicit [0] version shifts every following field index by one.
    let base = usize::from(matches!(fields.first(), Some(el) if el.tag == TAG_CONTEXT_0));

    let serial = require(fields, base, "serialNumber")?;
    if serial.tag != TAG_INTEGER {
        return Err(ExtractionError::UnexpectedTag {
            field: "serialNumber",
            expected: TAG_INTEGER,
            found: serial.tag,
        });
    }
    let serial_number_hex = hex::encode_upper(serial.content(der));

    let signature = require(fields, base + 1, "signature")?;
    let signature_algorithm_oid = signature
        .children
        .first()
        .filter(|el| el.tag == TAG_OID)
        .map(|el| decode_oid(el.content(der)))
        .unwrap_or_default();
    let signature_algorithm_name =
        oid::signature_algorithm_name(&signature_algorithm_oid).map(str::to_string);

    let issuer = parse_distinguished_name(require(fields, base + 2, "issuer")?, der);

    let validity = require(fields, base + 3, "validity")?;
    let not_before = validity
        .children
        .first()
        .map(|el| decode_time(el, der))
        .unwrap_or_else(|| EMPTY_NAME.to_string());
    let not_after = validity
        .children
        .get(1)
        .map(|el| decode_time(el, der))
        .unwrap_or_else(|| EMPTY_NAME.to_string());

    let subject = parse_distinguished_name(require(fields, base + 4, "subject")?, der);

    let mut urls = ExtensionUrls::default();
    if let Some(wrapper) = fields[base + 5..]
        .iter()
        .find(|el| el.tag == TAG_CONTEXT_3)
    {
        collect_extension_urls(wrapper, der, &mut urls);
    }

    Ok(CertificateRecord {
        serial_number_hex,
        issuer,
        subject,
        not_before,
        not_after,
        signature_algorithm_oid,
        signature_algorithm_name,
        ocsp_urls: unique_urls(urls.ocsp),
        crl_urls: unique_urls(urls.crl),
        ca_issuer_urls: unique_urls(urls.ca_issuer),
    })
}

fn require<'a>(
    fields: &'a [DerElement],
    index: usize,
    field: &'static str,
) -> Result<&'a DerElement, ExtractionError> {
    fields
        .get(index)
        .ok_or(ExtractionError::ShortTbs { field, index })
}

#[derive(Default)]
struct ExtensionUrls {
    ocsp: Vec<String>,
    crl: Vec<String>,
    ca_issuer: Vec<String>,
}

/// Walk the `[3]` extensions wrapper looking for CRL Distribution Points
/// and Authority Information Access, collecting their URIs.
fn collect_extension_urls(wrapper: &DerElement, der: &[u8], urls: &mut ExtensionUrls) {
    let Some(extensions) = wrapper.children.first().filter(|el| el.tag == TAG_SEQUENCE) else {
        return;
    };

    for extension in &extensions.children {
        if extension.tag != TAG_SEQUENCE || extension.children.len() < 2 {
            continue;
        }
        let Some(ext_oid) = extension.children.first().filter(|el| el.tag == TAG_OID) else {
            continue;
        };
        let ext_oid = decode_oid(ext_oid.content(der));
        // The value is the last child; a critical BOOLEAN may sit between it
        // and the OID.
        let Some(value) = extension
            .children
            .iter()
            .rev()
            .find(|el| el.tag == TAG_OCTET_STRING)
        else {
            continue;
        };
        let payload = value.content(der);

        match ext_oid.as_str() {
            oid::CRL_DISTRIBUTION_POINTS => {
                let mut found = Vec::new();
                if let Ok(root) = parse_element(payload, 0) {
                    collect_uris(&root, payload, &mut found);
                }
                if found.is_empty() {
                    debug!("structured CRLDP walk found no URIs, scanning raw bytes");
                    found = scan_urls(payload);
                }
                urls.crl.extend(found);
            }
            oid::AUTHORITY_INFO_ACCESS => collect_access_descriptions(payload, urls),
            _ => {}
        }
    }
}

/// AIA payload: SEQUENCE of AccessDescription { accessMethod OID,
/// accessLocation GeneralName }. URIs are partitioned by access method.
fn collect_access_descriptions(payload: &[u8], urls: &mut ExtensionUrls) {
    let Ok(root) = parse_element(payload, 0) else {
        warn!("AIA payload is not valid DER, scanning raw bytes");
        partition_scanned_aia(payload, urls);
        return;
    };

    let mut matched = false;
    for access in &root.children {
        if access.children.len() < 2 {
            continue;
        }
        let method = decode_oid(access.children[0].content(payload));
        let Some(location) = access
            .children
            .iter()
            .find(|el| el.tag == TAG_CONTEXT_URI)
        else {
            continue;
        };
        let uri = String::from_utf8_lossy(location.content(payload)).into_owned();
        matched = true;
        match method.as_str() {
            oid::ACCESS_METHOD_OCSP => urls.ocsp.push(uri),
            oid::ACCESS_METHOD_CA_ISSUERS => urls.ca_issuer.push(uri),
            _ => debug!("ignoring AIA access method {method}"),
        }
    }

    if !matched {
        partition_scanned_aia(payload, urls);
    }
}

/// Fallback bucketing when the AIA structure could not be walked: the
/// access-method OIDs are gone, so lean on the conventional `ocsp` host
/// naming to separate responder URLs from CA-issuer ones.
fn partition_scanned_aia(payload: &[u8], urls: &mut ExtensionUrls) {
    for url in scan_urls(payload) {
        if url.to_ascii_lowercase().contains("ocsp") {
            urls.ocsp.push(url);
        } else {
            urls.ca_issuer.push(url);
        }
    }
}

/// Collect every `[6]` uniformResourceIdentifier GeneralName in a subtree.
fn collect_uris(element: &DerElement, bytes: &[u8], out: &mut Vec<String>) {
    if element.tag == TAG_CONTEXT_URI {
        out.push(String::from_utf8_lossy(element.content(bytes)).into_owned());
        return;
    }
    for child in &element.children {
        collect_uris(child, bytes, out);
    }
}

/// Robustness fallback: scan raw bytes for `http(s)://` runs of printable
/// characters. Handles payloads whose inner DER deviates from the schema.
pub(crate) fn scan_urls(data: &[u8]) -> Vec<String> {
    let mut urls = Vec::new();
    for pattern in [b"http://".as_slice(), b"https://".as_slice()] {
        for (i, window) in data.windows(pattern.len()).enumerate() {
            if window == pattern
                && let Some(url) = url_at(data, i)
            {
                urls.push(url);
            }
        }
    }
    unique_urls(urls)
}

fn url_at(data: &[u8], start: usize) -> Option<String> {
    let mut end = start;
    for &byte in &data[start..] {
        if !(0x21..=0x7e).contains(&byte) {
            break;
        }
        end += 1;
    }

    if end <= start {
        return None;
    }
    let url = std::str::from_utf8(&data[start..end]).ok()?;
    let last = url.chars().last()?;
    if url.len() > 10 && (last.is_ascii_alphanumeric() || last == '/') {
        Some(url.to_string())
    } else {
        None
    }
}

/// Deduplicate preserving first-seen order.
fn unique_urls(mut urls: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::new();
    urls.retain(|url| seen.insert(url.clone()));
    urls
}
