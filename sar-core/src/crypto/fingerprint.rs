use sha2::{Digest, Sha256};

/// Password fingerprint stored in locked records: hex SHA-256 of the UTF-8 password.
/// Deliberately a different digest from the cipher key derivation.
pub fn fingerprint(password: &str) -> String {
    hex::encode(Sha256::digest(password.as_bytes()))
}

pub fn verify(password: &str, stored: &str) -> bool {
    fingerprint(password) == stored
}
