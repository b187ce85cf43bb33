//! Authentication service: registration, login, and token resolution.

use chrono::Utc;
use parley_types::error::{AuthError, RepositoryError};
use parley_types::user::{IssuedToken, User};
use tracing::{info, warn};
use uuid::Uuid;

use crate::auth::password::PasswordHasher;
use crate::auth::repository::UserRepository;
use crate::auth::token::TokenIssuer;

const MIN_USERNAME_CHARS: usize = 3;
const MAX_USERNAME_CHARS: usize = 50;
const MIN_PASSWORD_CHARS: usize = 8;

/// Service owning the user lifecycle and credential checks.
///
/// Generic over repository, hasher, and token traits; parley-api pins them
/// to the SQLite, Argon2, and JWT adapters.
pub struct AuthService<U: UserRepository, H: PasswordHasher, T: TokenIssuer> {
    users: U,
    hasher: H,
    tokens: T,
}

impl<U: UserRepository, H: PasswordHasher, T: TokenIssuer> AuthService<U, H, T> {
    pub fn new(users: U, hasher: H, tokens: T) -> Self {
        Self {
            users,
            hasher,
            tokens,
        }
    }

    /// Register a new user.
    ///
    /// Usernames are unique as given; emails are compared lowercased.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, AuthError> {
        let username = username.trim();
        let email = email.trim().to_lowercase();
        validate_username(username)?;
        validate_email(&email)?;
        if password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AuthError::Validation(format!(
                "password must be at least {MIN_PASSWORD_CHARS} characters"
            )));
        }

        if self.users.find_by_username(username).await?.is_some() {
            return Err(AuthError::UsernameTaken(username.to_string()));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AuthError::EmailTaken(email));
        }

        let user = User {
            id: Uuid::now_v7(),
            username: username.to_string(),
            email,
            password_hash: self.hasher.hash_password(password).await?,
            created_at: Utc::now(),
        };

        // A concurrent registration can still trip the unique constraints.
        match self.users.create_user(&user).await {
            Ok(()) => {}
            Err(RepositoryError::Conflict(msg)) if msg.contains("email") => {
                return Err(AuthError::EmailTaken(user.email));
            }
            Err(RepositoryError::Conflict(_)) => {
                return Err(AuthError::UsernameTaken(user.username));
            }
            Err(e) => return Err(e.into()),
        }

        info!(user_id = %user.id, username = %user.username, "User registered");
        Ok(user)
    }

    /// Verify credentials and issue an access token.
    ///
    /// Unknown usernames and wrong passwords produce the same error.
    pub async fn login(&self, username: &str, password: &str) -> Result<IssuedToken, AuthError> {
        let Some(user) = self.users.find_by_username(username.trim()).await? else {
            warn!(username = %username.trim(), "Login for unknown user");
            return Err(AuthError::InvalidCredentials);
        };

        if !self
            .hasher
            .verify_password(password, &user.password_hash)
            .await?
        {
            warn!(user_id = %user.id, "Login with wrong password");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(&user)?;
        info!(user_id = %user.id, "User logged in");
        Ok(token)
    }

    /// Mint a token for a user whose identity is already established,
    /// such as one that has just registered.
    pub fn issue_token(&self, user: &User) -> Result<IssuedToken, AuthError> {
        self.tokens.issue(user)
    }

    /// Resolve a bearer token to its user.
    pub async fn authenticate(&self, token: &str) -> Result<User, AuthError> {
        let claims = self.tokens.verify(token)?;
        let user_id = Uuid::parse_str(&claims.sub).map_err(|_| AuthError::InvalidToken)?;
        self.users
            .get_user(&user_id)
            .await?
            .ok_or(AuthError::InvalidToken)
    }
}

fn validate_username(username: &str) -> Result<(), AuthError> {
    let len = username.chars().count();
    if !(MIN_USERNAME_CHARS..=MAX_USERNAME_CHARS).contains(&len) {
        return Err(AuthError::Validation(format!(
            "username must be {MIN_USERNAME_CHARS}-{MAX_USERNAME_CHARS} characters"
        )));
    }
    if !username
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'))
    {
        return Err(AuthError::Validation(
            "username may only contain letters, digits, '_', '.' and '-'".to_string(),
        ));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), AuthError> {
    let invalid = || AuthError::Validation(format!("invalid email address: '{email}'"));
    let (local, domain) = email.split_once('@').ok_or_else(invalid)?;
    if local.is_empty() || domain.contains('@') || email.contains(char::is_whitespace) {
        return Err(invalid());
    }
    match domain.split_once('.') {
        Some((host, tld)) if !host.is_empty() && !tld.is_empty() && !domain.ends_with('.') => {
            Ok(())
        }
        _ => Err(invalid()),
    }
}
