//! Cryptographic primitives for credential sealing
//!
//! A secret is never stored; it is sealed into a SHA-256 digest over
//! the secret text followed by the standard base64 rendering of a
//! random salt. Every path that produces or checks a digest goes
//! through [`seal`], so creation, matching and reconciliation can
//! never drift apart in how the salt is mixed in.

use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use rand::rngs::OsRng;
use rand::RngCore;
use sha2::{Digest, Sha256};
use std::fmt;
use subtle::ConstantTimeEq;

/// Length in bytes of every digest produced here
pub const DIGEST_LENGTH: usize = 32;

/// Salt length in bytes
pub const SALT_LENGTH: usize = 32;

/// A salt with the pair of digests sealed under it.
///
/// The two digests share the one salt, so the triple is produced and
/// replaced only as a unit.
#[derive(Clone)]
pub struct SealedSecrets {
    /// Salt both digests were sealed with
    pub salt: Vec<u8>,
    /// Salted digest of the card number
    pub number_digest: [u8; DIGEST_LENGTH],
    /// Salted digest of the CVV
    pub cvv_digest: [u8; DIGEST_LENGTH],
}

impl fmt::Debug for SealedSecrets {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SealedSecrets")
            .field("salt", &"<redacted>")
            .field("number_digest", &"<redacted>")
            .field("cvv_digest", &"<redacted>")
            .finish()
    }
}

/// SHA-256 digest of arbitrary bytes
pub fn sha256_digest(data: &[u8]) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

/// Generate a salt of [`SALT_LENGTH`] bytes
pub fn generate_salt() -> Vec<u8> {
    generate_salt_with_length(SALT_LENGTH)
}

/// Generate `length` cryptographically random bytes from the operating
/// system RNG, with every byte non-zero.
///
/// Digests already at rest were sealed with salts drawn from the
/// non-zero byte alphabet, so newly generated salts keep to it.
pub fn generate_salt_with_length(length: usize) -> Vec<u8> {
    let mut salt = vec![0u8; length];
    OsRng.fill_bytes(&mut salt);
    for byte in salt.iter_mut() {
        while *byte == 0 {
            let mut fresh = [0u8; 1];
            OsRng.fill_bytes(&mut fresh);
            *byte = fresh[0];
        }
    }
    salt
}

/// Seal a secret under a salt.
///
/// The digest is SHA-256 over the secret's UTF-8 bytes followed by the
/// salt rendered as standard base64 text, not the raw salt bytes. The
/// text rendering is part of the at-rest format and cannot change
/// without invalidating every stored digest.
pub fn seal(secret: &str, salt: &[u8]) -> [u8; DIGEST_LENGTH] {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(BASE64.encode(salt).as_bytes());
    hasher.finalize().into()
}

/// Seal a card number and CVV together under one fresh salt
pub fn seal_pair(number: &str, cvv: &str) -> SealedSecrets {
    let salt = generate_salt();
    let number_digest = seal(number, &salt);
    let cvv_digest = seal(cvv, &salt);
    SealedSecrets {
        salt,
        number_digest,
        cvv_digest,
    }
}

/// Compare two digests in constant time.
///
/// Digest equality gates secret material, so the comparison must not
/// reveal the position of the first differing byte through timing.
/// Lengths are not secret; unequal lengths simply compare unequal.
pub fn digests_match(a: &[u8], b: &[u8]) -> bool {
    a.ct_eq(b).into()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn to_hex(bytes: &[u8]) -> String {
        bytes.iter().map(|b| format!("{:02x}", b)).collect()
    }

    #[test]
    fn test_sha256_known_vector() {
        assert_eq!(
            to_hex(&sha256_digest(b"abc")),
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[test]
    fn test_sha256_deterministic() {
        assert_eq!(sha256_digest(b"card data"), sha256_digest(b"card data"));
        assert_ne!(sha256_digest(b"card data"), sha256_digest(b"card dat"));
    }

    #[test]
    fn test_generate_salt_length() {
        assert_eq!(generate_salt().len(), SALT_LENGTH);
        assert_eq!(generate_salt_with_length(16).len(), 16);
    }

    #[test]
    fn test_generate_salt_has_no_zero_bytes() {
        for _ in 0..32 {
            let salt = generate_salt();
            assert!(salt.iter().all(|&b| b != 0));
        }
    }

    #[test]
    fn test_generate_salt_is_random() {
        assert_ne!(generate_salt(), generate_salt());
    }

    #[test]
    fn test_seal_is_deterministic_under_fixed_salt() {
        let salt = generate_salt();
        assert_eq!(seal("4242424242424242", &salt), seal("4242424242424242", &salt));
    }

    #[test]
    fn test_seal_depends_on_salt() {
        let a = generate_salt();
        let b = generate_salt();
        assert_ne!(seal("4242424242424242", &a), seal("4242424242424242", &b));
    }

    #[test]
    fn test_seal_depends_on_secret() {
        let salt = generate_salt();
        assert_ne!(seal("4242424242424242", &salt), seal("4242424242424241", &salt));
    }

    #[test]
    fn test_seal_uses_base64_text_of_salt() {
        // The salt is mixed in as base64 text, not raw bytes
        let salt = generate_salt();
        let manual = sha256_digest(format!("123{}", BASE64.encode(&salt)).as_bytes());
        assert_eq!(seal("123", &salt), manual);
    }

    #[test]
    fn test_seal_pair_shares_one_salt() {
        let sealed = seal_pair("4242424242424242", "123");
        assert_eq!(sealed.number_digest, seal("4242424242424242", &sealed.salt));
        assert_eq!(sealed.cvv_digest, seal("123", &sealed.salt));
    }

    #[test]
    fn test_digests_match() {
        let salt = generate_salt();
        let a = seal("123", &salt);
        let b = seal("123", &salt);
        let c = seal("124", &salt);
        assert!(digests_match(&a, &b));
        assert!(!digests_match(&a, &c));
        assert!(!digests_match(&a, &a[..16]));
    }

    #[test]
    fn test_sealed_secrets_debug_is_redacted() {
        let sealed = seal_pair("4242424242424242", "123");
        let rendered = format!("{:?}", sealed);
        assert!(rendered.contains("<redacted>"));
        assert!(!rendered.contains('['));
    }
}
