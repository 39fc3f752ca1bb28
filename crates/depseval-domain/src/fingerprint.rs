use sha2::{Digest, Sha256};

/// Stable SHA-256 fingerprint of a finding.
///
/// Identity fields, joined with `|`: check_id, code, manifest path and the path of the offending
/// value inside the scope.
pub fn fingerprint_for_value(
    check_id: &str,
    code: &str,
    manifest_path: &str,
    value_path: &str,
) -> String {
    let canonical = [check_id, code, manifest_path, value_path].join("|");

    let mut hasher = Sha256::new();
    hasher.update(canonical.as_bytes());
    hex::encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_stable_and_field_sensitive() {
        let a = fingerprint_for_value("schema.mismatch", "unknown_key", "DEPS", "bogus");
        let b = fingerprint_for_value("schema.mismatch", "unknown_key", "DEPS", "bogus");
        let c = fingerprint_for_value("schema.mismatch", "unknown_key", "sub/DEPS", "bogus");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.len(), 64);
    }
}
