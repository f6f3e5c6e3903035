//! One-way password hashing and verification (Argon2id).
//!
//! Hashing is deliberately slow. The async entry points move the work onto
//! tokio's blocking pool so a burst of logins cannot starve request handling.

use crate::error::AccessError;
use argon2::password_hash::{PasswordHash, PasswordHasher, SaltString, rand_core::OsRng};
use argon2::{Algorithm, Argon2, Params, PasswordVerifier as _, Version};

/// Memory cost in KiB (19 MiB).
pub const DEFAULT_MEMORY_KIB: u32 = 19_456;
/// Number of passes.
pub const DEFAULT_ITERATIONS: u32 = 2;
/// Degree of parallelism.
pub const DEFAULT_PARALLELISM: u32 = 1;

// Fixed salt and all-zero output for the decoy digest.
const DECOY_SALT: &str = "YWljYXJ0LWRlY295LXNhbHQ";
const DECOY_OUTPUT: &str = "AAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAAA";

#[derive(Debug, Clone)]
pub struct PasswordVerifier {
    params: Params,
}

impl Default for PasswordVerifier {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordVerifier {
    /// Verifier with the fixed production work factor.
    pub fn new() -> Self {
        Self {
            params: Params::new(
                DEFAULT_MEMORY_KIB,
                DEFAULT_ITERATIONS,
                DEFAULT_PARALLELISM,
                None,
            )
            .unwrap_or_default(),
        }
    }

    /// Verifier with a custom work factor. Only new hashes use it; existing
    /// digests carry their own parameters.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, AccessError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AccessError::Internal(format!("invalid argon2 params: {e}")))?;
        Ok(Self { params })
    }

    fn argon2(&self) -> Argon2<'static> {
        Argon2::new(Algorithm::Argon2id, Version::V0x13, self.params.clone())
    }

    /// Hash on the current thread. Returns a PHC string with a random salt.
    pub fn hash_blocking(&self, plaintext: &str) -> Result<String, AccessError> {
        let salt = SaltString::generate(&mut OsRng);
        self.argon2()
            .hash_password(plaintext.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|e| AccessError::Internal(format!("failed to hash password: {e}")))
    }

    /// Verify on the current thread. A malformed digest never matches.
    pub fn verify_blocking(&self, plaintext: &str, digest: &str) -> bool {
        let parsed = match PasswordHash::new(digest) {
            Ok(parsed) => parsed,
            Err(e) => {
                tracing::warn!(error = %e, "stored password digest is malformed");
                return false;
            }
        };
        self.argon2()
            .verify_password(plaintext.as_bytes(), &parsed)
            .is_ok()
    }

    /// A well-formed digest with this verifier's cost that no password matches.
    fn decoy_digest(&self) -> String {
        format!(
            "$argon2id$v=19$m={},t={},p={}${DECOY_SALT}${DECOY_OUTPUT}",
            self.params.m_cost(),
            self.params.t_cost(),
            self.params.p_cost()
        )
    }

    /// Spend one verification's worth of work without a stored digest, so a
    /// missing account costs as much as a wrong password.
    pub async fn verify_decoy(&self, plaintext: String) -> Result<(), AccessError> {
        self.verify(plaintext, self.decoy_digest()).await.map(|_| ())
    }

    /// Hash on the blocking pool.
    pub async fn hash(&self, plaintext: String) -> Result<String, AccessError> {
        let verifier = self.clone();
        tokio::task::spawn_blocking(move || verifier.hash_blocking(&plaintext))
            .await
            .map_err(|e| AccessError::Internal(format!("hashing task failed: {e}")))?
    }

    /// Verify on the blocking pool.
    pub async fn verify(&self, plaintext: String, digest: String) -> Result<bool, AccessError> {
        let verifier = self.clone();
        tokio::task::spawn_blocking(move || verifier.verify_blocking(&plaintext, &digest))
            .await
            .map_err(|e| AccessError::Internal(format!("verification task failed: {e}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordVerifier {
        PasswordVerifier::with_params(1024, 1, 1).unwrap()
    }

    #[test]
    fn test_hash_and_verify_correct() {
        let verifier = cheap();
        let hash = verifier.hash_blocking("my-secure-password").unwrap();
        assert!(verifier.verify_blocking("my-secure-password", &hash));
    }

    #[test]
    fn test_verify_wrong() {
        let verifier = cheap();
        let hash = verifier.hash_blocking("correct-password").unwrap();
        assert!(!verifier.verify_blocking("wrong-password", &hash));
        assert!(!verifier.verify_blocking("", &hash));
    }

    #[test]
    fn test_different_salts() {
        let verifier = cheap();
        let hash1 = verifier.hash_blocking("same").unwrap();
        let hash2 = verifier.hash_blocking("same").unwrap();
        assert_ne!(hash1, hash2);
        assert!(verifier.verify_blocking("same", &hash1));
        assert!(verifier.verify_blocking("same", &hash2));
    }

    #[test]
    fn test_hash_never_contains_plaintext() {
        let hash = cheap().hash_blocking("hunter2-plaintext").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("hunter2-plaintext"));
    }

    #[test]
    fn test_malformed_digest_does_not_match() {
        assert!(!cheap().verify_blocking("pw", "not-a-phc-string"));
    }

    #[test]
    fn test_default_params_produce_fixed_cost() {
        let hash = PasswordVerifier::new().hash_blocking("pw").unwrap();
        assert!(hash.contains("m=19456,t=2,p=1"));
    }

    #[test]
    fn test_decoy_digest_is_well_formed_and_never_matches() {
        let verifier = cheap();
        let decoy = verifier.decoy_digest();
        let parsed = PasswordHash::new(&decoy).unwrap();
        assert_eq!(parsed.algorithm.as_str(), "argon2id");
        assert!(decoy.contains("m=1024,t=1,p=1"));
        assert!(!verifier.verify_blocking("", &decoy));
        assert!(!verifier.verify_blocking("admin123", &decoy));
    }

    #[tokio::test]
    async fn test_verify_decoy_succeeds() {
        cheap().verify_decoy("anything".to_string()).await.unwrap();
    }

    #[tokio::test]
    async fn test_async_roundtrip() {
        let verifier = cheap();
        let hash = verifier.hash("pw123456".to_string()).await.unwrap();
        assert!(verifier.verify("pw123456".to_string(), hash.clone()).await.unwrap());
        assert!(!verifier.verify("pw1234567".to_string(), hash).await.unwrap());
    }
}
