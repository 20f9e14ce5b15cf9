//! Input format sniffing: raw DER, PEM-armored, or bare base64.

use base64::{Engine as _, engine::general_purpose::STANDARD};
use serde::Serialize;
use thiserror::Error;

/// Hex encoding of the PKCS#7 signed-data OID (1.2.840.113549.1.7.2).
/// Containers carrying it are rejected instead of being misread as a bare
/// certificate.
const PKCS7_SIGNED_DATA_OID_HEX: &str = "2a864886f70d010702";

const PEM_MARKERS: &[&str] = &[
    "-----BEGIN CERTIFICATE-----",
    "-----BEGIN X509 CERTIFICATE-----",
    "-----BEGIN X509 CRL-----",
];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum FormatError {
    #[error("input is empty")]
    EmptyInput,

    #[error("input looks like a PKCS#7 container (.p7b), not a single X.509 structure")]
    Pkcs7NotSupported,

    #[error("decoded base64 is not DER-encoded X.509 data")]
    NotX509Der,

    #[error("failed to decode the base64 body")]
    Base64DecodeFailed,

    #[error("could not recognize the input as DER, PEM or base64")]
    UnsupportedEncoding,
}

impl FormatError {
    /// Stable machine-readable code for diagnostics.
    pub fn code(&self) -> &'static str {
        match self {
            FormatError::EmptyInput => "EMPTY_INPUT",
            FormatError::Pkcs7NotSupported => "PKCS7_NOT_SUPPORTED",
            FormatError::NotX509Der => "NOT_X509_DER",
            FormatError::Base64DecodeFailed => "BASE64_DECODE_FAILED",
            FormatError::UnsupportedEncoding => "UNSUPPORTED_ENCODING",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceFormat {
    Der,
    Pem,
    Base64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedInput {
    pub der: Vec<u8>,
    pub source_format: SourceFormat,
}

/// Sniff `bytes` and return the contained DER buffer.
///
/// Order matters: a buffer that already looks like a DER SEQUENCE wins;
/// otherwise the input is treated as text and checked for PEM markers or a
/// bare base64 body, whose decode must itself look like DER.
pub fn normalize_input(bytes: &[u8]) -> Result<NormalizedInput, FormatError> {
    if bytes.is_empty() {
        return Err(FormatError::EmptyInput);
    }

    if looks_like_der_sequence(bytes) {
        reject_pkcs7(bytes)?;
        return Ok(NormalizedInput {
            der: bytes.to_vec(),
            source_format: SourceFormat::Der,
        });
    }

    let text = String::from_utf8_lossy(bytes);
    let trimmed = text.trim();
    let is_pem = PEM_MARKERS.iter().any(|marker| trimmed.contains(marker));
    if !is_pem && !is_possible_base64(trimmed) {
        return Err(FormatError::UnsupportedEncoding);
    }

    let body = strip_pem_armor(trimmed);
    let decoded = STANDARD
        .decode(body)
        .map_err(|_| FormatError::Base64DecodeFailed)?;
    if !looks_like_der_sequence(&decoded) {
        return Err(FormatError::NotX509Der);
    }
    reject_pkcs7(&decoded)?;

    Ok(NormalizedInput {
        der: decoded,
        source_format: if is_pem {
            SourceFormat::Pem
        } else {
            SourceFormat::Base64
        },
    })
}

/// Cheap DER-SEQUENCE likeness test: tag 0x30 and a length byte that is
/// plausible against the buffer size. Full validation happens in the
/// element parser.
pub fn looks_like_der_sequence(bytes: &[u8]) -> bool {
    if bytes.len() < 4 || bytes[0] != 0x30 {
        return false;
    }
    let length_byte = bytes[1];
    if length_byte & 0x80 == 0 {
        return true;
    }
    let count = (length_byte & 0x7f) as usize;
    count > 0 && count <= 4 && bytes.len() > 2 + count
}

fn reject_pkcs7(der: &[u8]) -> Result<(), FormatError> {
    if hex::encode(der).contains(PKCS7_SIGNED_DATA_OID_HEX) {
        Err(FormatError::Pkcs7NotSupported)
    } else {
        Ok(())
    }
}

fn is_possible_base64(text: &str) -> bool {
    text.bytes().all(|b| {
        b.is_ascii_alphanumeric() || matches!(b, b'+' | b'/' | b'=' | b'\r' | b'\n' | b'\t' | b' ')
    })
}

fn strip_pem_armor(text: &str) -> String {
    text.lines()
        .filter(|line| !line.trim_start().starts_with("-----"))
        .flat_map(|line| line.chars())
        .filter(|c| !c.is_whitespace())
        .collect()
}
