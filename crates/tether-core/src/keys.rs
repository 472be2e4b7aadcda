//! Deterministic storage keys.
//!
//! Every device deriving the key for the same (group, document) pair must
//! produce the same string, so repeated inserts collide on the primary key
//! instead of growing duplicate rows.

/// Domain separation prefix for resource keys.
const RESOURCE_KEY_PREFIX: &[u8] = b"tether-resource-v1:";

/// Domain separation prefix for sync config keys.
const CONFIG_KEY_PREFIX: &[u8] = b"tether-config-v1:";

#[must_use]
pub fn resource_key(resource_group_id: &str, doc_id: &str) -> String {
    let mut input = Vec::with_capacity(
        RESOURCE_KEY_PREFIX.len() + resource_group_id.len() + doc_id.len() + 1,
    );
    input.extend_from_slice(RESOURCE_KEY_PREFIX);
    input.extend_from_slice(resource_group_id.as_bytes());
    // NUL keeps ("ab", "c") and ("a", "bc") apart.
    input.push(0);
    input.extend_from_slice(doc_id.as_bytes());
    blake3::hash(&input).to_hex().to_string()
}

#[must_use]
pub fn config_key(resource_group_id: &str) -> String {
    let mut input = Vec::with_capacity(CONFIG_KEY_PREFIX.len() + resource_group_id.len());
    input.extend_from_slice(CONFIG_KEY_PREFIX);
    input.extend_from_slice(resource_group_id.as_bytes());
    blake3::hash(&input).to_hex().to_string()
}
