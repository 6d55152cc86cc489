//! Domain name wire codec.
//!
//! Names are carried in memory as dot-joined label strings with the root
//! name spelled `"."`. Encoding never compresses; decoding follows
//! compression pointers when given the whole message buffer and rejects
//! them when decoding standalone record data (RFC 4034 forbids compressed
//! names inside DNSSEC rdata).

use crate::error::DnsError;

/// The root name.
pub const ROOT: &str = ".";

/// Maximum encoded name length (RFC 1035 section 3.1).
const MAX_NAME_LEN: usize = 255;

/// Upper bound on compression pointer jumps before declaring a loop.
const MAX_POINTER_JUMPS: usize = 64;

/// Encode a name into uncompressed wire format.
pub fn encode_name(name: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(name.len() + 2);
    for label in name.split('.') {
        if label.is_empty() {
            continue;
        }
        out.push(label.len() as u8);
        out.extend_from_slice(label.as_bytes());
    }
    out.push(0);
    out
}

/// Lowercase a name for canonical comparison and serialization.
pub fn canonical(name: &str) -> String {
    name.to_ascii_lowercase()
}

/// Decode a possibly compressed name at `offset` inside a full message
/// buffer. Returns the name and the offset of the first byte after it.
pub fn decode_name(msg: &[u8], offset: usize) -> Result<(String, usize), DnsError> {
    decode(msg, offset, true)
}

/// Decode an uncompressed name, e.g. the signer field of an RRSIG rdata.
pub fn decode_name_plain(buf: &[u8], offset: usize) -> Result<(String, usize), DnsError> {
    decode(buf, offset, false)
}

fn decode(buf: &[u8], offset: usize, allow_pointers: bool) -> Result<(String, usize), DnsError> {
    let mut labels: Vec<String> = Vec::new();
    let mut pos = offset;
    let mut encoded_len = 0usize;
    let mut jumps = 0usize;
    // offset just past the name in the original stream, set at the first jump
    let mut end: Option<usize> = None;

    loop {
        let len = *buf.get(pos).ok_or(DnsError::BufferTooSmall {
            need: pos + 1,
            have: buf.len(),
        })?;

        if len & 0xC0 == 0xC0 {
            if !allow_pointers {
                return Err(DnsError::UnexpectedPointer);
            }
            let low = *buf.get(pos + 1).ok_or(DnsError::BufferTooSmall {
                need: pos + 2,
                have: buf.len(),
            })?;
            if end.is_none() {
                end = Some(pos + 2);
            }
            jumps += 1;
            if jumps > MAX_POINTER_JUMPS {
                return Err(DnsError::PointerLoop);
            }
            pos = (usize::from(len & 0x3F) << 8) | usize::from(low);
            continue;
        }

        if len & 0xC0 != 0 {
            return Err(DnsError::InvalidLabelLength(len));
        }

        pos += 1;
        if len == 0 {
            break;
        }

        let len = usize::from(len);
        encoded_len += len + 1;
        if encoded_len + 1 > MAX_NAME_LEN {
            return Err(DnsError::NameTooLong);
        }
        let bytes = buf.get(pos..pos + len).ok_or(DnsError::BufferTooSmall {
            need: pos + len,
            have: buf.len(),
        })?;
        labels.push(String::from_utf8_lossy(bytes).into_owned());
        pos += len;
    }

    let name = if labels.is_empty() {
        ROOT.to_string()
    } else {
        labels.join(".")
    };
    Ok((name, end.unwrap_or(pos)))
}
