//! Password hashing: salted, iterated SHA-256.
//!
//! Stored form is `{iterations}${salt_b64}${digest_b64}`. Verification is
//! constant-time over the digest.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use constant_time_eq::constant_time_eq;
use rand::RngCore;
use sha2::{Digest, Sha256};

const ITERATIONS: u32 = 100_000;
const SALT_LEN: usize = 16;

fn digest(salt: &[u8], password: &str, iterations: u32) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(salt);
    hasher.update(password.as_bytes());
    let mut out: [u8; 32] = hasher.finalize().into();
    for _ in 1..iterations {
        let mut hasher = Sha256::new();
        hasher.update(out);
        out = hasher.finalize().into();
    }
    out
}

/// Hash a password with a fresh random salt.
#[must_use]
pub fn hash_password(password: &str) -> String {
    let mut salt = [0u8; SALT_LEN];
    rand::thread_rng().fill_bytes(&mut salt);
    let out = digest(&salt, password, ITERATIONS);
    format!(
        "{ITERATIONS}${}${}",
        BASE64.encode(salt),
        BASE64.encode(out)
    )
}

/// Verify a password against a stored hash.
///
/// Unparseable stored values verify as false rather than erroring; they can
/// only mean a corrupt record.
#[must_use]
pub fn verify_password(password: &str, stored: &str) -> bool {
    let mut parts = stored.split('$');
    let (Some(iterations), Some(salt), Some(expected)) =
        (parts.next(), parts.next(), parts.next())
    else {
        return false;
    };
    if parts.next().is_some() {
        return false;
    }
    let Ok(iterations) = iterations.parse::<u32>() else {
        return false;
    };
    if iterations == 0 {
        return false;
    }
    let (Ok(salt), Ok(expected)) = (BASE64.decode(salt), BASE64.decode(expected)) else {
        return false;
    };
    let actual = digest(&salt, password, iterations);
    constant_time_eq(&actual, &expected)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trip() {
        let hash = hash_password("s3cret!pw");
        assert!(verify_password("s3cret!pw", &hash));
    }

    #[test]
    fn wrong_password_fails() {
        let hash = hash_password("s3cret!pw");
        assert!(!verify_password("not-the-password", &hash));
    }

    #[test]
    fn salts_differ_between_hashes() {
        let a = hash_password("s3cret!pw");
        let b = hash_password("s3cret!pw");
        assert_ne!(a, b);
        assert!(verify_password("s3cret!pw", &a));
        assert!(verify_password("s3cret!pw", &b));
    }

    #[test]
    fn corrupt_stored_values_verify_as_false() {
        assert!(!verify_password("pw", ""));
        assert!(!verify_password("pw", "not-a-hash"));
        assert!(!verify_password("pw", "100$salt$digest"));
        assert!(!verify_password("pw", "0$$"));
    }
}
