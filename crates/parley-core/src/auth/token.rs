//! TokenIssuer trait for stateless access tokens.
//!
//! Tokens are never stored server-side; they are invalidated only by
//! expiry. The JWT adapter lives in parley-infra.

use parley_types::error::AuthError;
use parley_types::user::{Claims, IssuedToken, User};

pub trait TokenIssuer: Send + Sync {
    /// Sign a token carrying the user's id and an expiry.
    fn issue(&self, user: &User) -> Result<IssuedToken, AuthError>;

    /// Check signature and expiry, returning the claims.
    ///
    /// Any failure maps to `AuthError::InvalidToken`.
    fn verify(&self, token: &str) -> Result<Claims, AuthError>;
}
