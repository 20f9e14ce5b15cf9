use thiserror::Error;

use crate::asn1::Asn1Error;

/// Extraction failures: the DER parsed, but the element tree does not
/// match the expected X.509/CRL schema at a required position.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ExtractionError {
    #[error(transparent)]
    Asn1(#[from] Asn1Error),

    #[error("top-level element is not a SEQUENCE (tag 0x{tag:02x})")]
    NotASequence { tag: u8 },

    #[error("TBSCertificate SEQUENCE is missing")]
    MissingTbsCertificate,

    #[error("TBSCertList SEQUENCE is missing")]
    MissingTbsCertList,

    #[error("TBSCertificate is short: no {field} at position {index}")]
    ShortTbs { field: &'static str, index: usize },

    #[error("expected {field} to be tagged 0x{expected:02x}, found 0x{found:02x}")]
    UnexpectedTag {
        field: &'static str,
        expected: u8,
        found: u8,
    },

    #[error("external X.509 backend failed: {0}")]
    Backend(String),
}
