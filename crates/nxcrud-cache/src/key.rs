/// Cache key of the object `identity` serialized for processor `group`.
///
/// Entries are kept per processor group. Keys are lowercase hex.
pub fn cache_identifier(group: Option<&str>, identity: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"nxcrud-cache-key-v1:");
    match group {
        Some(group) => {
            hasher.update(&[1]);
            hasher.update(&(group.len() as u64).to_le_bytes());
            hasher.update(group.as_bytes());
        }
        None => {
            hasher.update(&[0]);
        }
    }
    hasher.update(identity.as_bytes());
    hasher.finalize().to_hex().to_string()
}

/// Tag under which entries depending on `identity` are stored.
///
/// Tags contain only `[a-z0-9_]`.
pub fn identity_tag(identity: &str) -> String {
    let mut hasher = blake3::Hasher::new();
    hasher.update(b"nxcrud-cache-tag-v1:");
    hasher.update(identity.as_bytes());
    let hash = hasher.finalize();
    format!("object_{}", &hash.to_hex()[..32])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_stable_hex() {
        let key = cache_identifier(Some("g"), "item-1");
        assert_eq!(key.len(), 64);
        assert!(key.chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(key, cache_identifier(Some("g"), "item-1"));
    }

    #[test]
    fn group_is_part_of_the_key() {
        assert_ne!(
            cache_identifier(Some("a"), "item-1"),
            cache_identifier(Some("b"), "item-1")
        );
        assert_ne!(cache_identifier(None, "item-1"), cache_identifier(Some(""), "item-1"));
        assert_ne!(cache_identifier(Some("ab"), "c"), cache_identifier(Some("a"), "bc"));
    }

    #[test]
    fn identity_tags() {
        let tag = identity_tag("item-1");
        assert!(tag.starts_with("object_"));
        assert_eq!(tag.len(), "object_".len() + 32);
        assert_ne!(tag, identity_tag("item-2"));
    }
}
