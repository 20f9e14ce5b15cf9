//! Minimal DER (Distinguished Encoding Rules) decoding.
//!
//! This module provides just enough ASN.1 to walk X.509 certificates and
//! CRLs: a recursive element reader plus decoders for the primitive value
//! types those structures carry (OIDs, strings, timestamps, names).
//! BER indefinite lengths and non-DER deviations are rejected.

pub mod der;
pub mod name;
pub mod oid;
pub mod values;

pub use der::{Asn1Error, DerElement, parse_element};
pub use name::parse_distinguished_name;
pub use values::{decode_oid, decode_string, decode_time};
