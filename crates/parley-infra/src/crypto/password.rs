//! Argon2id password hashing.
//!
//! Implements the `PasswordHasher` trait from `parley-core` using the
//! `argon2` crate (RustCrypto ecosystem). Hashes are PHC strings, so the
//! salt and parameters travel with the hash.
//!
//! Each hash or verify runs on tokio's blocking pool; a default-cost hash
//! holds 19 MiB for tens of milliseconds.
//!
//! SECURITY: errors never include the plaintext password.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher as _, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use secrecy::{ExposeSecret, SecretString};
use tokio::task;

use parley_core::auth::password::PasswordHasher;
use parley_types::error::AuthError;

/// Argon2id implementation of `PasswordHasher`.
///
/// Defaults to the OWASP recommended parameters: 19 MiB memory,
/// 2 iterations, 1 degree of parallelism.
pub struct Argon2PasswordHasher {
    argon2: Argon2<'static>,
}

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }

    /// Custom cost parameters (memory in KiB, iterations, parallelism).
    ///
    /// Verification always uses the parameters embedded in the stored hash.
    pub fn with_params(m_cost: u32, t_cost: u32, p_cost: u32) -> Result<Self, AuthError> {
        let params = Params::new(m_cost, t_cost, p_cost, None).map_err(|_| AuthError::Hashing)?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordHasher {
    fn default() -> Self {
        Self::new()
    }
}

impl PasswordHasher for Argon2PasswordHasher {
    async fn hash_password(&self, password: &str) -> Result<String, AuthError> {
        let argon2 = self.argon2.clone();
        let password = SecretString::from(password);
        task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon2
                .hash_password(password.expose_secret().as_bytes(), &salt)
                .map(|hash| hash.to_string())
                .map_err(|_| AuthError::Hashing)
        })
        .await
        .map_err(|_| AuthError::Hashing)?
    }

    async fn verify_password(&self, password: &str, hash: &str) -> Result<bool, AuthError> {
        let argon2 = self.argon2.clone();
        let password = SecretString::from(password);
        let hash = hash.to_string();
        task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&hash).map_err(|_| AuthError::Hashing)?;
            Ok(argon2
                .verify_password(password.expose_secret().as_bytes(), &parsed)
                .is_ok())
        })
        .await
        .map_err(|_| AuthError::Hashing)?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> Argon2PasswordHasher {
        Argon2PasswordHasher::with_params(1024, 1, 1).unwrap()
    }

    #[tokio::test]
    async fn test_hash_is_phc_argon2id() {
        let hash = fast_hasher().hash_password("correct horse").await.unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(!hash.contains("correct horse"));
    }

    #[tokio::test]
    async fn test_verify_roundtrip() {
        let hasher = fast_hasher();
        let hash = hasher.hash_password("correct horse").await.unwrap();
        assert!(hasher.verify_password("correct horse", &hash).await.unwrap());
        assert!(!hasher.verify_password("battery staple", &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_same_password_different_salts() {
        let hasher = fast_hasher();
        let a = hasher.hash_password("pw123456").await.unwrap();
        let b = hasher.hash_password("pw123456").await.unwrap();
        assert_ne!(a, b);
    }

    #[tokio::test]
    async fn test_default_params_verify_fast_hash() {
        let hash = fast_hasher().hash_password("pw123456").await.unwrap();
        assert!(Argon2PasswordHasher::new().verify_password("pw123456", &hash).await.unwrap());
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_hashing_does_not_block_the_executor() {
        let hasher = fast_hasher();
        let order = std::sync::Mutex::new(Vec::new());
        tokio::join!(
            async {
                hasher.hash_password("pw123456").await.unwrap();
                order.lock().unwrap().push("hash");
            },
            async {
                order.lock().unwrap().push("other task");
            },
        );
        assert_eq!(*order.lock().unwrap(), vec!["other task", "hash"]);
    }

    #[tokio::test]
    async fn test_garbage_hash_is_error() {
        let err = fast_hasher().verify_password("pw", "not-a-phc-string").await.unwrap_err();
        assert!(matches!(err, AuthError::Hashing));
    }
}
