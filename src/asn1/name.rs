//! Distinguished-name rendering.

use super::der::{DerElement, TAG_SEQUENCE, TAG_SET};
use super::oid;
use super::values::{decode_oid, decode_string};

/// Sentinel for empty or malformed names.
pub const EMPTY_NAME: &str = "—";

/// Render an X.501 Name as `Label=Value` pairs joined by `, `.
///
/// A Name is a SEQUENCE of SETs of AttributeTypeAndValue SEQUENCEs; each
/// inner SEQUENCE carries an attribute OID and its value. Well-known OIDs
/// get their short label, anything else keeps the dotted form. Malformed
/// or empty names render as the [`EMPTY_NAME`] sentinel rather than
/// failing the caller's extraction.
pub fn parse_distinguished_name(element: &DerElement, bytes: &[u8]) -> String {
    if element.tag != TAG_SEQUENCE {
        return EMPTY_NAME.to_string();
    }

    let mut parts = Vec::new();
    for set in &element.children {
        if set.tag != TAG_SET {
            continue;
        }
        for attribute in &set.children {
            if attribute.tag != TAG_SEQUENCE || attribute.children.len() < 2 {
                continue;
            }
            let oid = decode_oid(attribute.children[0].content(bytes));
            let label = oid::attribute_label(&oid).unwrap_or(&oid);
            let value = decode_string(&attribute.children[1], bytes);
            parts.push(format!("{label}={value}"));
        }
    }

    if parts.is_empty() {
        EMPTY_NAME.to_string()
    } else {
        parts.join(", ")
    }
}
