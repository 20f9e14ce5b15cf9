//! Well-known object identifiers in dotted notation, as produced by
//! [`super::values::decode_oid`].

/// CRL Distribution Points extension
pub const CRL_DISTRIBUTION_POINTS: &str = "2.5.29.31";
/// Authority Information Access extension
pub const AUTHORITY_INFO_ACCESS: &str = "1.3.6.1.5.5.7.1.1";
/// AIA access method: OCSP responder
pub const ACCESS_METHOD_OCSP: &str = "1.3.6.1.5.5.7.48.1";
/// AIA access method: issuing-CA certificate
pub const ACCESS_METHOD_CA_ISSUERS: &str = "1.3.6.1.5.5.7.48.2";

/// Short labels for distinguished-name attribute types, including the
/// Russian national registration-number attributes the original data set
/// carries (OGRN/SNILS/INN).
const ATTRIBUTE_LABELS: &[(&str, &str)] = &[
    ("2.5.4.3", "CN"),
    ("2.5.4.6", "C"),
    ("2.5.4.7", "L"),
    ("2.5.4.8", "ST"),
    ("2.5.4.10", "O"),
    ("2.5.4.11", "OU"),
    ("1.2.643.100.1", "OGRN"),
    ("1.2.643.100.3", "SNILS"),
    ("1.2.643.3.131.1.1", "INN"),
];

const SIGNATURE_ALGORITHM_NAMES: &[(&str, &str)] = &[
    ("1.2.840.113549.1.1.5", "sha1WithRSAEncryption"),
    ("1.2.840.113549.1.1.11", "sha256WithRSAEncryption"),
    ("1.2.840.113549.1.1.12", "sha384WithRSAEncryption"),
    ("1.2.840.113549.1.1.13", "sha512WithRSAEncryption"),
    ("1.2.840.10045.4.3.2", "ecdsa-with-SHA256"),
    ("1.2.840.10045.4.3.3", "ecdsa-with-SHA384"),
    ("1.2.840.10045.4.3.4", "ecdsa-with-SHA512"),
    (
        "1.2.643.7.1.1.3.2",
        "GOST R 34.10-2012 with GOST R 34.11-2012 (256 bit)",
    ),
    (
        "1.2.643.7.1.1.3.3",
        "GOST R 34.10-2012 with GOST R 34.11-2012 (512 bit)",
    ),
];

pub fn attribute_label(oid: &str) -> Option<&'static str> {
    lookup(ATTRIBUTE_LABELS, oid)
}

pub fn signature_algorithm_name(oid: &str) -> Option<&'static str> {
    lookup(SIGNATURE_ALGORITHM_NAMES, oid)
}

fn lookup(table: &[(&str, &'static str)], oid: &str) -> Option<&'static str> {
    table
        .iter()
        .find(|(candidate, _)| *candidate == oid)
        .map(|(_, label)| *label)
}
