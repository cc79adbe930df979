//! Password hashing and verification.
//!
//! Hashes are PBKDF2-SHA256 records stored as `salt$iterations$hash` with
//! base64-encoded salt and hash. The iteration count is part of the record
//! so it can be raised later without invalidating existing accounts.
//! Verification is constant-time and never distinguishes a malformed
//! record from a wrong password.

use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

pub const HASH_ITERATIONS: u32 = 600_000;
pub const SALT_LENGTH: usize = 16;
const HASH_LENGTH: usize = 32;

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut out = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

fn generate_salt() -> [u8; SALT_LENGTH] {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    salt
}

/// Hashes a password into a self-describing storage record.
pub fn hash_password(password: &str) -> String {
    let salt = generate_salt();
    let hash = derive(password, &salt, HASH_ITERATIONS);
    let encoder = base64::engine::general_purpose::STANDARD;
    format!(
        "{}${}${}",
        encoder.encode(salt),
        HASH_ITERATIONS,
        encoder.encode(hash)
    )
}

/// Checks a password against a stored record in constant time.
/// Returns false for malformed records, including legacy plaintext rows.
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.splitn(3, '$');
    let (Some(salt_b64), Some(iterations_str), Some(hash_b64)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };

    let decoder = base64::engine::general_purpose::STANDARD;
    let Ok(salt) = decoder.decode(salt_b64) else {
        return false;
    };
    let Ok(iterations) = iterations_str.parse::<u32>() else {
        return false;
    };
    let Ok(expected) = decoder.decode(hash_b64) else {
        return false;
    };
    if salt.is_empty() || iterations == 0 || expected.len() != HASH_LENGTH {
        return false;
    }

    let actual = derive(password, &salt, iterations);
    actual.ct_eq(expected.as_slice()).unwrap_u8() == 1
}
