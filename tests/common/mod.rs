//! DER construction helpers for synthetic certificates and CRLs.
#![allow(dead_code)]

use base64::{Engine as _, engine::general_purpose::STANDARD};

/// Encode one DER element: tag, definite length, content.
pub fn der(tag: u8, content: &[u8]) -> Vec<u8> {
    let mut out = vec![tag];
    let len = content.len();
    if len < 0x80 {
        out.push(len as u8);
    } else {
        let mut length_bytes = len.to_be_bytes().to_vec();
        while length_bytes.len() > 1 && length_bytes[0] == 0 {
            length_bytes.remove(0);
        }
        out.push(0x80 | length_bytes.len() as u8);
        out.extend_from_slice(&length_bytes);
    }
    out.extend_from_slice(content);
    out
}

pub fn seq(parts: &[Vec<u8>]) -> Vec<u8> {
    der(0x30, &parts.concat())
}

pub fn set(parts: &[Vec<u8>]) -> Vec<u8> {
    der(0x31, &parts.concat())
}

pub fn integer(content: &[u8]) -> Vec<u8> {
    der(0x02, content)
}

pub fn utf8(text: &str) -> Vec<u8> {
    der(0x0c, text.as_bytes())
}

pub fn utc(text: &str) -> Vec<u8> {
    der(0x17, text.as_bytes())
}

pub fn uri(text: &str) -> Vec<u8> {
    der(0x86, text.as_bytes())
}

/// OBJECT IDENTIFIER from its arc values.
pub fn oid(arcs: &[u64]) -> Vec<u8> {
    let mut content = vec![(arcs[0] * 40 + arcs[1]) as u8];
    for &arc in &arcs[2..] {
        content.extend(base128(arc));
    }
    der(0x06, &content)
}

fn base128(mut value: u64) -> Vec<u8> {
    let mut out = vec![(value & 0x7f) as u8];
    value >>= 7;
    while value > 0 {
        out.insert(0, 0x80 | (value & 0x7f) as u8);
        value >>= 7;
    }
    out
}

/// Single-CN Name.
pub fn name(common_name: &str) -> Vec<u8> {
    seq(&[set(&[seq(&[oid(&[2, 5, 4, 3]), utf8(common_name)])])])
}

pub fn signature_algorithm() -> Vec<u8> {
    // sha256WithRSAEncryption
    seq(&[oid(&[1, 2, 840, 113549, 1, 1, 11])])
}

fn bit_string(content: &[u8]) -> Vec<u8> {
    let mut padded = vec![0x00];
    padded.extend_from_slice(content);
    der(0x03, &padded)
}

/// CRL Distribution Points extension carrying the given URLs.
pub fn crldp_extension(urls: &[&str]) -> Vec<u8> {
    let points: Vec<Vec<u8>> = urls
        .iter()
        .map(|url| seq(&[der(0xa0, &der(0xa0, &uri(url)))]))
        .collect();
    let payload = seq(&points);
    seq(&[oid(&[2, 5, 29, 31]), der(0x04, &payload)])
}

/// Authority Information Access extension with OCSP and CA-issuer entries.
pub fn aia_extension(ocsp_urls: &[&str], ca_issuer_urls: &[&str]) -> Vec<u8> {
    let mut descriptions = Vec::new();
    for url in ocsp_urls {
        descriptions.push(seq(&[oid(&[1, 3, 6, 1, 5, 5, 7, 48, 1]), uri(url)]));
    }
    for url in ca_issuer_urls {
        descriptions.push(seq(&[oid(&[1, 3, 6, 1, 5, 5, 7, 48, 2]), uri(url)]));
    }
    let payload = seq(&descriptions);
    seq(&[oid(&[1, 3, 6, 1, 5, 5, 7, 1, 1]), der(0x04, &payload)])
}

/// Synthetic certificate builder.
pub struct TestCertificate {
    pub with_version: bool,
    pub serial: Vec<u8>,
    pub issuer_cn: String,
    pub subject_cn: String,
    pub extensions: Vec<Vec<u8>>,
}

impl Default for TestCertificate {
    fn default() -> Self {
        Self {
            with_version: true,
            serial: vec![0x01, 0xab],
            issuer_cn: "Test CA".to_string(),
            subject_cn: "Example Leaf".to_string(),
            extensions: Vec::new(),
        }
    }
}

impl TestCertificate {
    pub fn build(&self) -> Vec<u8> {
        let mut fields = Vec::new();
        if self.with_version {
            fields.push(der(0xa0, &integer(&[0x02])));
        }
        fields.push(integer(&self.serial));
        fields.push(signature_algorithm());
        fields.push(name(&self.issuer_cn));
        fields.push(seq(&[utc("240101000000Z"), utc("260101000000Z")]));
        fields.push(name(&self.subject_cn));
        // subjectPublicKeyInfo placeholder
        fields.push(seq(&[
            seq(&[oid(&[1, 2, 840, 113549, 1, 1, 1])]),
            bit_string(&[0x00]),
        ]));
        if !self.extensions.is_empty() {
            fields.push(der(0xa3, &seq(&self.extensions)));
        }

        let tbs = seq(&fields);
        seq(&[tbs, signature_algorithm(), bit_string(&[0xde, 0xad])])
    }

    pub fn build_pem(&self) -> String {
        pem_wrap("CERTIFICATE", &self.build())
    }
}

/// Synthetic CRL builder. `revoked` pairs are (serial bytes, UTCTime text).
pub struct TestCrl {
    pub with_version: bool,
    pub issuer_cn: String,
    pub next_update: Option<String>,
    pub revoked: Vec<(Vec<u8>, String)>,
}

impl Default for TestCrl {
    fn default() -> Self {
        Self {
            with_version: true,
            issuer_cn: "Test CA".to_string(),
            next_update: Some("250601000000Z".to_string()),
            revoked: Vec::new(),
        }
    }
}

impl TestCrl {
    pub fn build(&self) -> Vec<u8> {
        let mut fields = Vec::new();
        if self.with_version {
            fields.push(integer(&[0x01]));
        }
        fields.push(signature_algorithm());
        fields.push(name(&self.issuer_cn));
        fields.push(utc("250101000000Z"));
        if let Some(next) = &self.next_update {
            fields.push(utc(next));
        }
        if !self.revoked.is_empty() {
            let entries: Vec<Vec<u8>> = self
                .revoked
                .iter()
                .map(|(serial, date)| seq(&[integer(serial), utc(date)]))
                .collect();
            fields.push(seq(&entries));
        }

        let tbs = seq(&fields);
        seq(&[tbs, signature_algorithm(), bit_string(&[0xbe, 0xef])])
    }
}

pub fn pem_wrap(label: &str, der_bytes: &[u8]) -> String {
    let body = STANDARD.encode(der_bytes);
    let mut out = format!("-----BEGIN {label}-----\n");
    for chunk in body.as_bytes().chunks(64) {
        out.push_str(std::str::from_utf8(chunk).unwrap());
        out.push('\n');
    }
    out.push_str(&format!("-----END {label}-----\n"));
    out
}
