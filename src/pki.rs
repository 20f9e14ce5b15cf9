//! X.509 certificate and CRL field extraction on top of the DER walker.

pub mod certificate;
pub mod crl;
pub mod errors;

#[cfg(feature = "x509-backend")]
pub mod backend;

pub use certificate::{CertificateRecord, extract_certificate};
pub use crl::{CrlRecord, extract_crl, normalize_serial};
pub use errors::ExtractionError;
