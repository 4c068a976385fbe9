//! Stable capability identities.
//!
//! Capability ids must survive reloads, so they are derived from content
//! instead of generated. The input is encoded with length prefixes, which
//! keeps the encoding unambiguous for any characters in keys or values, and
//! qualifier entries are sorted by key before encoding.

use crate::qualifier::Qualifier;
use crate::types::{AppSymbolicName, Capability};

/// Number of digest bytes kept in the identifier (rendered as hex).
const ID_BYTES: usize = 6;

/// Derive the stable identifier of a capability.
#[must_use]
pub fn stable_capability_id(capability: &Capability) -> String {
    stable_id(
        &capability.capability_type,
        &capability.qualifier,
        capability.app(),
    )
}

/// Derive a stable identifier from type, qualifier and declaring application.
#[must_use]
pub fn stable_id(capability_type: &str, qualifier: &Qualifier, app: &AppSymbolicName) -> String {
    let mut hasher = blake3::Hasher::new();
    write_field(&mut hasher, capability_type);
    write_field(&mut hasher, app.as_str());

    let entries = qualifier.sorted_entries();
    write_field(&mut hasher, &entries.len().to_string());
    for (key, value) in entries {
        write_field(&mut hasher, key);
        write_field(&mut hasher, value);
    }

    let digest = hasher.finalize();
    digest.as_bytes()[..ID_BYTES]
        .iter()
        .map(|b| format!("{b:02x}"))
        .collect()
}

fn write_field(hasher: &mut blake3::Hasher, field: &str) {
    hasher.update(field.len().to_string().as_bytes());
    hasher.update(b":");
    hasher.update(field.as_bytes());
}
