//! Decoders for primitive DER values: object identifiers, the string
//! family, and the two time types. These are deliberately infallible —
//! unrecognized or malformed content degrades to a hex dump or the raw
//! text instead of failing the surrounding parse.

use super::der::{
    DerElement, TAG_BMP_STRING, TAG_GENERALIZED_TIME, TAG_IA5_STRING, TAG_PRINTABLE_STRING,
    TAG_UTC_TIME, TAG_UTF8_STRING, TAG_VISIBLE_STRING,
};

/// Decode OBJECT IDENTIFIER content bytes into the dotted notation.
///
/// The first byte packs the two leading arcs; the rest are base-128
/// varints with the high bit marking continuation.
pub fn decode_oid(bytes: &[u8]) -> String {
    let Some((&first, rest)) = bytes.split_first() else {
        return String::new();
    };

    let mut oid = format!("{}.{}", first / 40, first % 40);
    let mut value: u64 = 0;
    for &b in rest {
        value = (value << 7) | u64::from(b & 0x7f);
        if b & 0x80 == 0 {
            oid.push('.');
            oid.push_str(&value.to_string());
            value = 0;
        }
    }
    oid
}

/// Decode a DER string element according to its tag.
///
/// UTF8String, PrintableString, IA5String and VisibleString are treated as
/// UTF-8 (lossily); BMPString as big-endian UTF-16 code units. Any other
/// tag falls back to an uppercase hex dump of the content.
pub fn decode_string(element: &DerElement, bytes: &[u8]) -> String {
    let value = element.content(bytes);
    match element.tag {
        TAG_UTF8_STRING | TAG_PRINTABLE_STRING | TAG_IA5_STRING | TAG_VISIBLE_STRING => {
            String::from_utf8_lossy(value).into_owned()
        }
        TAG_BMP_STRING => value
            .chunks_exact(2)
            .map(|pair| u16::from_be_bytes([pair[0], pair[1]]))
            .map(|unit| char::from_u32(u32::from(unit)).unwrap_or('\u{fffd}'))
            .collect(),
        _ => hex::encode_upper(value),
    }
}

/// Decode UTCTime or GeneralizedTime into an ISO-like `YYYY-MM-DDTHH:MM:SSZ`
/// string. UTCTime years below 50 land in the 2000s, the rest in the 1900s.
/// Inputs shorter than the mandatory digit block come back unchanged.
pub fn decode_time(element: &DerElement, bytes: &[u8]) -> String {
    let raw = String::from_utf8_lossy(element.content(bytes)).into_owned();
    let text = raw.strip_suffix('Z').unwrap_or(&raw);

    let formatted = match element.tag {
        TAG_UTC_TIME if all_digits(text, 12) => {
            let year: u32 = text[..2].parse().unwrap_or(0);
            let full_year = if year < 50 { 2000 + year } else { 1900 + year };
            Some(format!(
                "{full_year}-{}-{}T{}:{}:{}Z",
                &text[2..4],
                &text[4..6],
                &text[6..8],
                &text[8..10],
                &text[10..12]
            ))
        }
        TAG_GENERALIZED_TIME if all_digits(text, 14) => Some(format!(
            "{}-{}-{}T{}:{}:{}Z",
            &text[..4],
            &text[4..6],
            &text[6..8],
            &text[8..10],
            &text[10..12],
            &text[12..14]
        )),
        _ => None,
    };

    formatted.unwrap_or(raw)
}

fn all_digits(text: &str, count: usize) -> bool {
    text.len() >= count && text.as_bytes()[..count].iter().all(u8::is_ascii_digit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::asn1::parse_element;

    fn element(tag: u8, content: &[u8]) -> (DerElement, Vec<u8>) {
        let mut bytes = vec![tag, content.len() as u8];
        bytes.extend_from_slice(content);
        let el = parse_element(&bytes, 0).unwrap();
        (el, bytes)
    }

    #[test]
    fn decodes_common_name_oid() {
        assert_eq!(decode_oid(&[0x55, 0x04, 0x03]), "2.5.4.3");
    }

    #[test]
    fn decodes_multibyte_arcs() {
        // 1.3.6.1.5.5.7.48.1 (OCSP access method)
        assert_eq!(
            decode_oid(&[0x2b, 0x06, 0x01, 0x05, 0x05, 0x07, 0x30, 0x01]),
            "1.3.6.1.5.5.7.48.1"
        );
        // 1.2.840.113549.1.1.11 (sha256WithRSAEncryption)
        assert_eq!(
            decode_oid(&[0x2a, 0x86, 0x48, 0x86, 0xf7, 0x0d, 0x01, 0x01, 0x0b]),
            "1.2.840.113549.1.1.11"
        );
    }

    #[test]
    fn empty_oid_decodes_to_empty_string() {
        assert_eq!(decode_oid(&[]), "");
    }

    #[test]
    fn decodes_utf8_and_printable_strings() {
        let (el, bytes) = element(0x0c, "Example CA".as_bytes());
        assert_eq!(decode_string(&el, &bytes), "Example CA");

        let (el, bytes) = element(0x13, b"US");
        assert_eq!(decode_string(&el, &bytes), "US");
    }

    #[test]
    fn decodes_bmp_string_as_utf16() {
        let (el, bytes) = element(0x1e, &[0x00, 0x48, 0x00, 0x69]);
        assert_eq!(decode_string(&el, &bytes), "Hi");
    }

    #[test]
    fn unknown_string_tag_falls_back_to_hex() {
        let (el, bytes) = element(0x02, &[0x01, 0xab]);
        assert_eq!(decode_string(&el, &bytes), "01AB");
    }

    #[test]
    fn decodes_utc_time_with_century_pivot() {
        let (el, bytes) = element(0x17, b"240315123000Z");
        assert_eq!(decode_time(&el, &bytes), "2024-03-15T12:30:00Z");

        let (el, bytes) = element(0x17, b"991231235959Z");
        assert_eq!(decode_time(&el, &bytes), "1999-12-31T23:59:59Z");
    }

    #[test]
    fn decodes_generalized_time() {
        let (el, bytes) = element(0x18, b"20450101000000Z");
        assert_eq!(decode_time(&el, &bytes), "2045-01-01T00:00:00Z");
    }

    #[test]
    fn short_time_returns_raw_text() {
        let (el, bytes) = element(0x17, b"2403Z");
        assert_eq!(decode_time(&el, &bytes), "2403Z");
    }

    #[test]
    fn non_digit_time_returns_raw_text() {
        let (el, bytes) = element(0x18, b"not-a-timestamp");
        assert_eq!(decode_time(&el, &bytes), "not-a-timestamp");
    }
}
