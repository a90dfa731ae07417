//! Content hashing for change detection.
//!
//! Output files are rewritten only when their rendered text differs from what
//! the manifest recorded. The hash covers the full file text, front matter
//! included, so a change to the page, its metadata, or the rendering rules all
//! surface the same way.

use sha2::{Digest, Sha256};

/// Compute a SHA256 hash of rendered file text.
///
/// Returns a lowercase hex string (64 characters). The same text always
/// produces the same hash, which is what makes repeat runs idempotent.
#[must_use]
pub fn content_hash(text: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(text.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Check if content has changed since the last recorded write.
///
/// Returns `true` if:
/// - There is no stored hash (never written)
/// - The current hash differs from the stored hash
///
/// Returns `false` if the hashes match (no change).
#[must_use]
pub fn has_changed(current_hash: &str, stored_hash: Option<&str>) -> bool {
    stored_hash.map_or(true, |h| h != current_hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_hash_deterministic() {
        let text = "---\ntitle: \"Hello\"\n---\n\nBody text.\n";

        let hash1 = content_hash(text);
        let hash2 = content_hash(text);

        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 64); // SHA256 produces 64 hex chars
    }

    #[test]
    fn test_content_hash_changes_with_content() {
        let hash1 = content_hash("# One\n");
        let hash2 = content_hash("# Two\n");

        assert_ne!(hash1, hash2);
    }

    #[test]
    fn test_content_hash_is_hex() {
        let hash = content_hash("anything");
        assert!(hash.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_has_changed_no_stored_hash() {
        assert!(has_changed("abc123", None));
    }

    #[test]
    fn test_has_changed_different_hash() {
        assert!(has_changed("abc123", Some("xyz789")));
    }

    #[test]
    fn test_has_changed_same_hash() {
        assert!(!has_changed("abc123", Some("abc123")));
    }
}
