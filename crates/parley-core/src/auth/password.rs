//! PasswordHasher trait for one-way credential hashing.
//!
//! Defined in parley-core so `AuthService` can hash and verify without
//! coupling to a specific algorithm. The Argon2 adapter lives in
//! parley-infra.

use parley_types::error::AuthError;

/// Abstraction over password hashing.
///
/// Async because real hashes are deliberately slow; adapters move the work
/// off the async executor.
pub trait PasswordHasher: Send + Sync {
    /// Hash a plaintext password into a self-describing string (PHC format).
    fn hash_password(
        &self,
        password: &str,
    ) -> impl std::future::Future<Output = Result<String, AuthError>> + Send;

    /// Check a plaintext password against a stored hash.
    ///
    /// `Ok(false)` for a mismatch; `Err` only when the stored hash is
    /// unreadable.
    fn verify_password(
        &self,
        password: &str,
        hash: &str,
    ) -> impl std::future::Future<Output = Result<bool, AuthError>> + Send;
}
