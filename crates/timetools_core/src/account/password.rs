//! PBKDF2-HMAC-SHA256 password hashing.

use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

/// Salt length in bytes.
pub const SALT_LEN: usize = 16;
/// Derived key length in bytes (one SHA-256 block).
pub const HASH_LEN: usize = 32;
/// Baseline iteration count for newly stored passwords.
pub const DEFAULT_PBKDF2_ITERATIONS: u32 = 200_000;

/// Fresh salt from the operating system CSPRNG.
pub fn generate_salt() -> [u8; SALT_LEN] {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);
    salt
}

/// Derives the password hash for `salt`.
pub fn hash_password(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LEN] {
    let mut output = [0u8; HASH_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut output);
    output
}

/// Recomputes the hash and compares it with `expected_hash_hex` in constant time.
///
/// Undecodable hex in either stored field fails verification.
pub fn verify_password(
    password: &str,
    salt_hex: &str,
    expected_hash_hex: &str,
    iterations: u32,
) -> bool {
    let Ok(salt) = hex::decode(salt_hex) else {
        return false;
    };
    let computed = hash_password(password, &salt, iterations);
    let expected = hex::decode(expected_hash_hex).unwrap_or_default();
    computed.as_slice().ct_eq(expected.as_slice()).into()
}
