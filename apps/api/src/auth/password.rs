//! Salted, stretched password hashes (PBKDF2-HMAC-SHA256 under a random salt).

use std::fmt;
use std::sync::OnceLock;

use anyhow::{anyhow, Context, Result};
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use subtle::ConstantTimeEq;

const SALT_LEN: usize = 16;
const DIGEST_LEN: usize = 32;
const ROUNDS: u32 = 10_000;

#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash {
    salt: [u8; SALT_LEN],
    digest: Vec<u8>,
}

fn stretch(salt: &[u8], password: &str) -> [u8; DIGEST_LEN] {
    let mut digest = [0u8; DIGEST_LEN];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, ROUNDS, &mut digest);
    digest
}

static DUMMY: OnceLock<PasswordHash> = OnceLock::new();

impl PasswordHash {
    /// Hashes `password` under a fresh random salt.
    pub fn new(password: &str) -> Self {
        let mut salt = [0u8; SALT_LEN];
        rand::thread_rng().fill_bytes(&mut salt);
        Self {
            salt,
            digest: stretch(&salt, password).to_vec(),
        }
    }

    /// Process-wide hash matching no account; `verify` against it costs the
    /// same as against a real record.
    pub fn dummy() -> &'static PasswordHash {
        DUMMY.get_or_init(|| PasswordHash::new("no account has this password"))
    }

    /// Constant-time check of `password` against the stored digest.
    pub fn verify(&self, password: &str) -> bool {
        let candidate = stretch(&self.salt, password);
        self.digest.as_slice().ct_eq(&candidate).into()
    }

    /// `hex(salt)$hex(digest)`, the column format of `users.password_hash`.
    pub fn encode(&self) -> String {
        format!("{}${}", hex::encode(self.salt), hex::encode(&self.digest))
    }

    pub fn parse(encoded: &str) -> Result<Self> {
        let (salt_hex, digest_hex) = encoded
            .split_once('$')
            .ok_or_else(|| anyhow!("password hash is missing the salt separator"))?;

        let salt: [u8; SALT_LEN] = hex::decode(salt_hex)
            .context("password hash salt is not hex")?
            .try_into()
            .map_err(|_| anyhow!("password hash salt must be {SALT_LEN} bytes"))?;
        let digest = hex::decode(digest_hex).context("password hash digest is not hex")?;

        Ok(Self { salt, digest })
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("PasswordHash(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_verify_exact_password() {
        let hash = PasswordHash::new("correct horse");
        assert!(hash.verify("correct horse"));
    }

    #[test]
    fn test_single_character_difference_fails() {
        let hash = PasswordHash::new("correct horse");
        assert!(!hash.verify("correct hors"));
        assert!(!hash.verify("correct horsE"));
        assert!(!hash.verify("correct horses"));
        assert!(!hash.verify(""));
    }

    #[test]
    fn test_same_password_gets_distinct_salts() {
        let a = PasswordHash::new("hunter22");
        let b = PasswordHash::new("hunter22");
        assert_ne!(a, b);
        assert!(a.verify("hunter22") && b.verify("hunter22"));
    }

    #[test]
    fn test_encode_parse_keeps_verification() {
        let hash = PasswordHash::new("s3cret!");
        let parsed = PasswordHash::parse(&hash.encode()).unwrap();
        assert_eq!(parsed, hash);
        assert!(parsed.verify("s3cret!"));
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!(PasswordHash::parse("no-separator").is_err());
        assert!(PasswordHash::parse("zz$00").is_err());
        assert!(PasswordHash::parse("00$00").is_err());
    }

    #[test]
    fn test_digest_is_pbkdf2_sha256_output() {
        let hash = PasswordHash::new("s3cret!");
        let encoded = hash.encode();
        let (salt_hex, digest_hex) = encoded.split_once('$').unwrap();
        assert_eq!(salt_hex.len(), SALT_LEN * 2);
        assert_eq!(digest_hex.len(), DIGEST_LEN * 2);
    }

    #[test]
    fn test_truncated_digest_never_verifies() {
        let mut hash = PasswordHash::new("s3cret!");
        hash.digest.truncate(DIGEST_LEN - 1);
        assert!(!hash.verify("s3cret!"));
    }

    #[test]
    fn test_dummy_hash_is_shared_and_rejects_guesses() {
        assert!(std::ptr::eq(PasswordHash::dummy(), PasswordHash::dummy()));
        assert!(!PasswordHash::dummy().verify("engine42"));
        assert!(!PasswordHash::dummy().verify(""));
    }

    #[test]
    fn test_debug_hides_material() {
        let hash = PasswordHash::new("s3cret!");
        assert_eq!(format!("{hash:?}"), "PasswordHash(..)");
    }
}
