//! Structural fingerprinting of artifact inputs.

use lantern_core::Result;
use serde::Serialize;
use sha2::{Digest, Sha256};

/// Compute the structural fingerprint of an artifact's dependency inputs.
///
/// Fingerprint-equal inputs share one cache slot per context, so the encoding
/// must be canonical: the input is round-tripped through [`serde_json::Value`]
/// (whose object representation keeps keys sorted) before hashing, making the
/// digest independent of map insertion order.
pub fn fingerprint<T: Serialize>(input: &T) -> Result<String> {
    let value = serde_json::to_value(input)?;
    let bytes = serde_json::to_vec(&value)?;

    let mut hasher = Sha256::new();
    hasher.update(&bytes);
    Ok(hasher
        .finalize()
        .iter()
        .map(|b| format!("{:02x}", b))
        .collect())
}
