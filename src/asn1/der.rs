use thiserror::Error;

// Universal tags used by the X.509/CRL walkers
pub const TAG_INTEGER: u8 = 0x02;
pub const TAG_OCTET_STRING: u8 = 0x04;
pub const TAG_OID: u8 = 0x06;
pub const TAG_UTF8_STRING: u8 = 0x0c;
pub const TAG_PRINTABLE_STRING: u8 = 0x13;
pub const TAG_IA5_STRING: u8 = 0x16;
pub const TAG_UTC_TIME: u8 = 0x17;
pub const TAG_GENERALIZED_TIME: u8 = 0x18;
pub const TAG_VISIBLE_STRING: u8 = 0x1a;
pub const TAG_BMP_STRING: u8 = 0x1e;
pub const TAG_SEQUENCE: u8 = 0x30;
pub const TAG_SET: u8 = 0x31;
/// Context-specific [0], constructed (explicit version in TBSCertificate)
pub const TAG_CONTEXT_0: u8 = 0xa0;
/// Context-specific [3], constructed (extensions in TBSCertificate)
pub const TAG_CONTEXT_3: u8 = 0xa3;
/// Context-specific [6], primitive (uniformResourceIdentifier GeneralName)
pub const TAG_CONTEXT_URI: u8 = 0x86;

/// Long-form length encodings with more than this many length bytes are
/// rejected. Certificates are KB-scale; anything larger is hostile input.
const MAX_LENGTH_BYTES: usize = 4;

/// Cap on constructed-element nesting to keep recursion bounded on
/// adversarial input.
const MAX_NESTING_DEPTH: usize = 64;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum Asn1Error {
    #[error("offset {offset} is out of bounds for a buffer of {len} bytes")]
    OutOfBounds { offset: usize, len: usize },

    #[error("truncated length encoding at offset {offset}")]
    TruncatedLength { offset: usize },

    #[error("unsupported length-of-length byte count: {count}")]
    LengthOfLength { count: usize },

    #[error("element content ends at {end}, beyond the {len}-byte buffer")]
    ContentOverrun { end: usize, len: usize },

    #[error("child element at offset {offset} overruns its parent ending at {parent_end}")]
    ChildOverrun { offset: usize, parent_end: usize },

    #[error("constructed elements nested deeper than {MAX_NESTING_DEPTH} levels")]
    NestingTooDeep,
}

/// A decoded DER element. Offsets index into the buffer the element was
/// parsed from; the struct never owns the bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DerElement {
    pub tag: u8,
    pub constructed: bool,
    pub header_len: usize,
    /// First content byte, i.e. `offset + header_len`.
    pub content_start: usize,
    /// One past the last content byte. For DER this is also the end of the
    /// whole element.
    pub content_end: usize,
    /// Populated only for constructed elements. Children partition
    /// `[content_start, content_end)` exactly.
    pub children: Vec<DerElement>,
}

impl DerElement {
    /// Content bytes of this element within `bytes`, the buffer it was
    /// parsed from.
    pub fn content<'a>(&self, bytes: &'a [u8]) -> &'a [u8] {
        &bytes[self.content_start..self.content_end]
    }
}

/// Parse a single DER element starting at `offset`.
///
/// Pure function over the immutable buffer: no streaming, the whole input
/// must be resident. Constructed elements are parsed recursively; any child
/// running past its parent fails the whole parse.
pub fn parse_element(bytes: &[u8], offset: usize) -> Result<DerElement, Asn1Error> {
    parse_at(bytes, offset, 0)
}

fn parse_at(bytes: &[u8], offset: usize, depth: usize) -> Result<DerElement, Asn1Error> {
    if depth > MAX_NESTING_DEPTH {
        return Err(Asn1Error::NestingTooDeep);
    }
    if offset >= bytes.len() {
        return Err(Asn1Error::OutOfBounds {
            offset,
            len: bytes.len(),
        });
    }

    let tag = bytes[offset];
    let (length, length_len) = read_length(bytes, offset + 1)?;

    let header_len = 1 + length_len;
    let content_start = offset + header_len;
    let content_end = content_start + length;
    if content_end > bytes.len() {
        return Err(Asn1Error::ContentOverrun {
            end: content_end,
            len: bytes.len(),
        });
    }

    let constructed = tag & 0x20 != 0;
    let mut children = Vec::new();
    if constructed {
        let mut cursor = content_start;
        while cursor < content_end {
            let child = parse_at(bytes, cursor, depth + 1)?;
            if child.content_end > content_end {
                return Err(Asn1Error::ChildOverrun {
                    offset: cursor,
                    parent_end: content_end,
                });
            }
            cursor = child.content_end;
            children.push(child);
        }
    }

    Ok(DerElement {
        tag,
        constructed,
        header_len,
        content_start,
        content_end,
        children,
    })
}

/// Decode a definite-form length at `offset`. Returns the length and the
/// number of bytes the encoding occupied.
fn read_length(bytes: &[u8], offset: usize) -> Result<(usize, usize), Asn1Error> {
    let first = *bytes
        .get(offset)
        .ok_or(Asn1Error::TruncatedLength { offset })?;

    if first & 0x80 == 0 {
        return Ok((first as usize, 1));
    }

    let count = (first & 0x7f) as usize;
    // Count 0 is the BER indefinite form, which DER forbids.
    if count == 0 || count > MAX_LENGTH_BYTES {
        return Err(Asn1Error::LengthOfLength { count });
    }
    if offset + count >= bytes.len() {
        return Err(Asn1Error::TruncatedLength { offset });
    }

    let mut length = 0usize;
    for i in 1..=count {
        length = (length << 8) | bytes[offset + i] as usize;
    }
    Ok((length, 1 + count))
}
