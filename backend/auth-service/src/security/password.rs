/// Password hashing and verification using PBKDF2-HMAC-SHA512
///
/// The derivation parameters are fixed: a fresh 64-byte salt per call, a
/// 64-byte derived key, and 10,000 iterations. Salt and hash are stored
/// hex-encoded in separate account fields, so verification recomputes the
/// derivation from the stored salt and compares in constant time.
///
/// Both functions are pure and synchronous. The KDF is deliberately
/// expensive; callers on an async path run it via `spawn_blocking`.
use pbkdf2::pbkdf2_hmac;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::Sha512;
use subtle::ConstantTimeEq;

const ITERATIONS: u32 = 10_000;
const SALT_LENGTH: usize = 64;
const KEY_LENGTH: usize = 64;

/// Derived credential: hex-encoded salt and hash, ready for storage.
#[derive(Debug, Clone)]
pub struct PasswordDigest {
    pub salt: String,
    pub hash: String,
}

/// Hash a password with a fresh random salt.
pub fn hash_password(password: &str) -> PasswordDigest {
    let mut salt = [0u8; SALT_LENGTH];
    OsRng.fill_bytes(&mut salt);

    let mut key = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha512>(password.as_bytes(), &salt, ITERATIONS, &mut key);

    PasswordDigest {
        salt: hex::encode(salt),
        hash: hex::encode(key),
    }
}

/// Verify a password against a stored salt and hash.
///
/// Returns `false` on any mismatch, including malformed stored state;
/// callers never need to distinguish the two. The comparison is
/// constant-time over the derived key.
pub fn verify_password(password: &str, salt_hex: &str, hash_hex: &str) -> bool {
    let salt = match hex::decode(salt_hex) {
        Ok(salt) => salt,
        Err(_) => return false,
    };
    let stored = match hex::decode(hash_hex) {
        Ok(stored) => stored,
        Err(_) => return false,
    };

    let mut key = [0u8; KEY_LENGTH];
    pbkdf2_hmac::<Sha512>(password.as_bytes(), &salt, ITERATIONS, &mut key);

    bool::from(key.as_slice().ct_eq(stored.as_slice()))
}
