//! SHA-256 hex digests used to fingerprint workflow payloads.

use sha2::{Digest, Sha256};

/// Compute a SHA-256 hex digest of the given bytes.
pub fn sha256_hex(data: &[u8]) -> String {
    let hash = Sha256::digest(data);
    format!("{hash:x}")
}

/// Fingerprint a JSON value by hashing its compact serialization.
///
/// `serde_json` keeps object keys sorted (no `preserve_order` feature), so two
/// structurally equal values always produce the same fingerprint.
pub fn json_fingerprint(value: &serde_json::Value) -> String {
    sha256_hex(value.to_string().as_bytes())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_produces_known_hash() {
        let hash = sha256_hex(b"");
        assert_eq!(
            hash,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[test]
    fn fingerprint_ignores_key_insertion_order() {
        let a: serde_json::Value = serde_json::from_str(r#"{"a":1,"b":[1,2]}"#).unwrap();
        let b: serde_json::Value = serde_json::from_str(r#"{"b":[1,2],"a":1}"#).unwrap();
        assert_eq!(json_fingerprint(&a), json_fingerprint(&b));
    }

    #[test]
    fn fingerprint_changes_with_content() {
        let a = serde_json::json!({ "workflow": { "nodes": [] } });
        let b = serde_json::json!({ "workflow": { "nodes": [{ "id": "n1" }] } });
        assert_ne!(json_fingerprint(&a), json_fingerprint(&b));
        assert_eq!(json_fingerprint(&a).len(), 64);
    }
}
