use std::{fmt, str::FromStr};

use crate::error::{Error, Result};
use crate::utils::ObjectId;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ObjectKind {
    Blob,
    Tree,
}

impl ObjectKind {
    pub fn label(&self) -> &'static str {
        match self {
            ObjectKind::Blob => "blob",
            ObjectKind::Tree => "tree",
        }
    }
}

impl fmt::Display for ObjectKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ObjectKind {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "blob" => Ok(ObjectKind::Blob),
            "tree" => Ok(ObjectKind::Tree),
            other => Err(Error::Encoding(format!("unknown object kind {other:?}"))),
        }
    }
}

/// Canonical form `"<kind> <len>\0<payload>"`, hashed and stored as-is.
pub fn encode(kind: ObjectKind, payload: &[u8]) -> Vec<u8> {
    let header = format!("{} {}\0", kind.label(), payload.len());
    let mut full_data = header.into_bytes();
    full_data.extend_from_slice(payload);
    full_data
}

/// Parse the header only, returning kind, declared size and the offset
/// where the payload starts.
pub fn decode_header(data: &[u8]) -> Result<(ObjectKind, usize, usize)> {
    // The header is ASCII, so the first null always ends it even when the
    // payload carries nulls of its own.
    let nul = data
        .iter()
        .position(|&b| b == 0)
        .ok_or_else(|| Error::Encoding("missing header separator".to_string()))?;

    let header = std::str::from_utf8(&data[..nul])
        .map_err(|_| Error::Encoding("header is not ASCII".to_string()))?;
    let (label, size) = header
        .split_once(' ')
        .ok_or_else(|| Error::Encoding(format!("malformed header {header:?}")))?;

    let kind: ObjectKind = label.parse()?;
    if size.is_empty() || !size.bytes().all(|b| b.is_ascii_digit()) {
        return Err(Error::Encoding(format!("invalid object size {size:?}")));
    }
    let size: usize = size
        .parse()
        .map_err(|_| Error::Encoding(format!("object size {size} out of range")))?;

    Ok((kind, size, nul + 1))
}

/// Inverse of [`encode`]. The payload is sliced by the declared length.
pub fn decode(data: &[u8]) -> Result<(ObjectKind, Vec<u8>)> {
    let (kind, size, start) = decode_header(data)?;
    let payload = &data[start..];
    if payload.len() != size {
        return Err(Error::Encoding(format!(
            "declared size {size} but payload has {} bytes",
            payload.len()
        )));
    }
    Ok((kind, payload.to_vec()))
}

/// Fingerprint of `(kind, payload)` without touching the store.
pub fn hash_object(kind: ObjectKind, payload: &[u8]) -> ObjectId {
    ObjectId::digest(&encode(kind, payload))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn encodes_header_then_payload() {
        assert_eq!(encode(ObjectKind::Blob, b"hi\n"), b"blob 3\0hi\n".to_vec());
        assert_eq!(encode(ObjectKind::Tree, b""), b"tree 0\0".to_vec());
    }

    #[test]
    fn decode_keeps_embedded_nulls() {
        let payload = b"a\0b\0\0c".to_vec();
        let encoded = encode(ObjectKind::Blob, &payload);
        let (kind, decoded) = decode(&encoded).unwrap();
        assert_eq!(kind, ObjectKind::Blob);
        assert_eq!(decoded, payload);
    }

    #[test]
    fn decode_rejects_length_mismatch() {
        assert!(matches!(decode(b"blob 4\0hi\n"), Err(Error::Encoding(_))));
        assert!(matches!(decode(b"blob 2\0hi\n"), Err(Error::Encoding(_))));
    }

    #[test]
    fn decode_rejects_bad_headers() {
        for bad in [
            &b"blob 3hi\n"[..],
            b"commit 3\0hi\n",
            b"blob\0",
            b"blob -1\0",
            b"blob +3\0hi\n",
            b"blob 99999999999999999999999\0",
        ] {
            assert!(matches!(decode(bad), Err(Error::Encoding(_))), "{bad:?}");
        }
    }

    #[test]
    fn empty_tree_hash_is_well_known() {
        assert_eq!(
            hash_object(ObjectKind::Tree, b"").to_hex(),
            "4b825dc642cb6eb9a060e54bf8d69288fbee4904"
        );
        assert_eq!(
            hash_object(ObjectKind::Blob, b"").to_hex(),
            "e69de29bb2d1d6434b8b29ae775ad8c2e48c5391"
        );
    }

    #[test]
    fn hash_covers_kind() {
        assert_ne!(
            hash_object(ObjectKind::Blob, b"x"),
            hash_object(ObjectKind::Tree, b"x")
        );
    }
}
