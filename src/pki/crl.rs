//! Positional TBSCertList walker.

use std::collections::HashMap;

use serde::Serialize;
use tracing::debug;

use crate::asn1::der::{
    TAG_GENERALIZED_TIME, TAG_INTEGER, TAG_SEQUENCE, TAG_UTC_TIME,
};
use crate::asn1::{decode_time, parse_distinguished_name, parse_element};

use super::errors::ExtractionError;

/// Sentinel for an absent optional nextUpdate field.
pub const UNKNOWN_UPDATE: &str = "unknown";

/// Structured view of one CRL.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrlRecord {
    pub issuer: String,
    pub this_update: String,
    pub next_update: String,
    /// Normalized-hex serial → revocation date.
    pub revoked: HashMap<String, String>,
}

impl CrlRecord {
    /// Look up a serial under the same normalization used when the map was
    /// built.
    pub fn revocation_date(&self, serial_hex: &str) -> Option<&str> {
        self.revoked
            .get(&normalize_serial(serial_hex))
            .map(String::as_str)
    }
}

/// Normalize a hex serial for comparison: strip leading zero digits (but
/// keep at least one) and uppercase.
pub fn normalize_serial(hex: &str) -> String {
    let digits = hex.trim().trim_start_matches('0');
    let kept = if digits.is_empty() { "0" } else { digits };
    kept.to_ascii_uppercase()
}

/// Extract issuer, update timestamps and the revoked-serial map from a DER
/// CRL.
pub fn extract_crl(der: &[u8]) -> Result<CrlRecord, ExtractionError> {
    let root = parse_element(der, 0)?;
    if root.tag != TAG_SEQUENCE {
        return Err(ExtractionError::NotASequence { tag: root.tag });
    }
    let tbs = root
        .children
        .first()
        .filter(|el| el.tag == TAG_SEQUENCE)
        .ok_or(ExtractionError::MissingTbsCertList)?;

    let fields = &tbs.children;
    // The optional version INTEGER is detected positionally: both the
    // version and a signature AlgorithmIdentifier can occupy slot 0, so the
    // version is only assumed present when slot 0 is an INTEGER *and* slot 1
    // is the algorithm SEQUENCE.
    let base = usize::from(
        matches!(fields.first(), Some(el) if el.tag == TAG_INTEGER)
            && matches!(fields.get(1), Some(el) if el.tag == TAG_SEQUENCE),
    );

    let issuer = fields
        .get(base + 1)
        .map(|el| parse_distinguished_name(el, der))
        .ok_or(ExtractionError::ShortTbs {
            field: "issuer",
            index: base + 1,
        })?;
    let this_update = fields
        .get(base + 2)
        .map(|el| decode_time(el, der))
        .ok_or(ExtractionError::ShortTbs {
            field: "thisUpdate",
            index: base + 2,
        })?;

    // nextUpdate is optional; detect it by tag instead of assuming a slot.
    let (next_update, revoked_slot) = match fields.get(base + 3) {
        Some(el) if el.tag == TAG_UTC_TIME || el.tag == TAG_GENERALIZED_TIME => {
            (decode_time(el, der), base + 4)
        }
        _ => (UNKNOWN_UPDATE.to_string(), base + 3),
    };

    let mut revoked = HashMap::new();
    if let Some(list) = fields.get(revoked_slot).filter(|el| el.tag == TAG_SEQUENCE) {
        for entry in &list.children {
            if entry.children.len() < 2 {
                continue;
            }
            let serial = &entry.children[0];
            if serial.tag != TAG_INTEGER {
                continue;
            }
            let key = normalize_serial(&hex::encode(serial.content(der)));
            let date = decode_time(&entry.children[1], der);
            revoked.insert(key, date);
        }
        debug!("CRL carries {} revoked entries", revoked.len());
    }

    Ok(CrlRecord {
        issuer,
        this_update,
        next_update,
        revoked,
    })
}
