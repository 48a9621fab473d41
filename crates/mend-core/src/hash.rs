//! Content hashing for generation provenance

use sha2::{Digest, Sha256};
use std::fmt;
use std::path::Path;

/// A SHA-256 content hash recorded against generated asset files.
///
/// Stored in entry metadata as a `sha256:`-prefixed hex string so a later
/// verification pass can tell a regenerated file from the original.
#[derive(Clone, Copy, Hash, Eq, PartialEq)]
pub struct ContentHash([u8; 32]);

impl ContentHash {
    /// Hash a byte slice
    pub fn from_bytes(data: &[u8]) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(data);
        Self(hasher.finalize().into())
    }

    /// Hash a file's contents
    pub fn from_file<P: AsRef<Path>>(path: P) -> std::io::Result<Self> {
        Ok(Self::from_bytes(&std::fs::read(path)?))
    }

    /// The hash as a bare hex string
    pub fn to_hex(&self) -> String {
        self.0.iter().map(|b| format!("{:02x}", b)).collect()
    }

    /// The hash as a `sha256:`-prefixed hex string
    pub fn to_prefixed_hex(&self) -> String {
        format!("sha256:{}", self.to_hex())
    }

    /// Parse a `sha256:`-prefixed hex string
    pub fn from_prefixed_hex(s: &str) -> Option<Self> {
        let hex = s.strip_prefix("sha256:")?;
        if hex.len() != 64 {
            return None;
        }
        let mut bytes = [0u8; 32];
        for (i, chunk) in bytes.iter_mut().enumerate() {
            *chunk = u8::from_str_radix(&hex[i * 2..i * 2 + 2], 16).ok()?;
        }
        Some(Self(bytes))
    }
}

impl fmt::Debug for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ContentHash({})", &self.to_hex()[..16])
    }
}

impl fmt::Display for ContentHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", &self.to_hex()[..16])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_input_same_hash() {
        let a = ContentHash::from_bytes(b"sprite data");
        let b = ContentHash::from_bytes(b"sprite data");
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_input_different_hash() {
        let a = ContentHash::from_bytes(b"hero_idle");
        let b = ContentHash::from_bytes(b"hero_walk");
        assert_ne!(a, b);
    }

    #[test]
    fn test_prefixed_roundtrip() {
        let h = ContentHash::from_bytes(b"coin_icon");
        let prefixed = h.to_prefixed_hex();
        assert!(prefixed.starts_with("sha256:"));
        assert_eq!(ContentHash::from_prefixed_hex(&prefixed), Some(h));
    }

    #[test]
    fn test_from_prefixed_hex_rejects_malformed() {
        assert!(ContentHash::from_prefixed_hex("md5:abcdef").is_none());
        assert!(ContentHash::from_prefixed_hex("sha256:short").is_none());
    }

    #[test]
    fn test_from_file() {
        let dir = std::env::temp_dir().join(format!("mend_hash_test_{}", uuid::Uuid::new_v4()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("asset.png");
        std::fs::write(&path, b"png bytes").unwrap();

        let from_file = ContentHash::from_file(&path).unwrap();
        assert_eq!(from_file, ContentHash::from_bytes(b"png bytes"));

        std::fs::remove_dir_all(&dir).ok();
    }
}
