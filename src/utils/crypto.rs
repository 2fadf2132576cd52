//! Cryptographic utilities for the PKCE verifier/challenge pair.

use base64::{engine::general_purpose, Engine as _};
use rand::RngCore;
use sha2::{Digest, Sha256};

/// Characters permitted in a PKCE code verifier (RFC 7636 unreserved set)
const VERIFIER_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789-._~";

/// Generate a high-entropy random string of `size` characters drawn from the
/// unreserved URL-safe alphabet
#[must_use]
pub fn generate_random(size: usize) -> String {
    let mut buffer = vec![0u8; size];
    rand::rng().fill_bytes(&mut buffer);
    buffer
        .iter()
        .map(|byte| VERIFIER_CHARSET[*byte as usize % VERIFIER_CHARSET.len()] as char)
        .collect()
}

/// Derive the PKCE code challenge for a verifier: SHA-256, then base64url
/// without padding
#[must_use]
pub fn generate_challenge(code_verifier: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(code_verifier.as_bytes());
    general_purpose::URL_SAFE_NO_PAD.encode(hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_strings_use_the_unreserved_alphabet() {
        let value = generate_random(128);
        assert_eq!(value.len(), 128);
        assert!(value
            .bytes()
            .all(|byte| VERIFIER_CHARSET.contains(&byte)));
    }

    #[test]
    fn random_strings_differ_between_calls() {
        // 128 characters of entropy colliding would mean a broken generator
        assert_ne!(generate_random(128), generate_random(128));
    }

    #[test]
    fn challenge_is_deterministic_and_url_safe() {
        let challenge = generate_challenge("verifier-value");
        assert_eq!(challenge, generate_challenge("verifier-value"));
        assert_ne!(challenge, generate_challenge("other-verifier"));
        // 256 hash bits in unpadded base64
        assert_eq!(challenge.len(), 43);
        assert!(!challenge.contains(['+', '/', '=']));
    }
}
