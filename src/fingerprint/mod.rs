//! Content fingerprinting for stored records
//!
//! The version tag for a key is a pure function of that key's current
//! stored bytes. Tags are never persisted; they are recomputed on every
//! read path that needs one, so a tag can never go stale relative to
//! the content it describes.
//!
//! Uses SHA-256 over the serialized payload. The rendered tag is a
//! quoted entity-tag, safe to emit verbatim in an `ETag` header field:
//!
//! ```text
//! "<content-length-hex>-<base64(sha256(content))>"
//! ```

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine as _;
use sha2::{Digest, Sha256};
use std::fmt;

/// An opaque, content-derived version tag.
///
/// Holds the full quoted entity-tag string. Comparison is byte-exact
/// string equality; there are no weak-tag semantics.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VersionTag(String);

impl VersionTag {
    /// Wraps a tag received from a client header, verbatim apart from
    /// surrounding whitespace.
    pub fn from_header(raw: &str) -> Self {
        Self(raw.trim().to_string())
    }

    /// The tag string, including the surrounding quotes.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VersionTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Computes the version tag for a byte payload.
///
/// Deterministic: byte-identical input always yields an identical tag,
/// and any content change changes the tag.
pub fn fingerprint(bytes: &[u8]) -> VersionTag {
    let digest = Sha256::digest(bytes);
    VersionTag(format!(
        "\"{:x}-{}\"",
        bytes.len(),
        STANDARD_NO_PAD.encode(digest)
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_deterministic() {
        let data = br#"{"objectId":"p1"}"#;
        let tag1 = fingerprint(data);
        let tag2 = fingerprint(data);
        assert_eq!(tag1, tag2);
    }

    #[test]
    fn test_fingerprint_detects_change() {
        let tag1 = fingerprint(br#"{"objectId":"p1"}"#);
        let tag2 = fingerprint(br#"{"objectId":"p2"}"#);
        assert_ne!(tag1, tag2);
    }

    #[test]
    fn test_tag_is_quoted_and_header_safe() {
        let tag = fingerprint(b"payload");
        let s = tag.as_str();
        assert!(s.starts_with('"') && s.ends_with('"'));
        // RFC 9110 entity-tag characters only
        assert!(s[1..s.len() - 1]
            .bytes()
            .all(|b| b == 0x21 || (0x23..=0x7e).contains(&b)));
    }

    #[test]
    fn test_length_prefix_is_hex() {
        let tag = fingerprint(&[0u8; 16]);
        let inner = &tag.as_str()[1..];
        let prefix = inner.split('-').next().unwrap();
        assert_eq!(prefix, "10");
    }

    #[test]
    fn test_from_header_trims_whitespace() {
        let tag = fingerprint(b"payload");
        let parsed = VersionTag::from_header(&format!("  {}  ", tag.as_str()));
        assert_eq!(parsed, tag);
    }
}
