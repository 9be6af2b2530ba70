use serde::Serialize;
use sha2::{Digest, Sha256};

use crate::errors::TallyError;
use crate::serde::to_canonical_json_bytes;

/// Hex SHA-256 of the value's canonical JSON form.
pub fn stable_hash_string<T: Serialize>(value: &T) -> Result<String, TallyError> {
    let bytes = to_canonical_json_bytes(value)?;
    Ok(format!("{:x}", Sha256::digest(bytes)))
}
