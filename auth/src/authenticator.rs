use chrono::Duration;

use crate::jwt::Claims;
use crate::jwt::JwtError;
use crate::jwt::JwtHandler;
use crate::password::PasswordError;
use crate::password::PasswordHasher;

/// Authentication coordinator combining password verification and session
/// token issuance.
///
/// Built once at startup from the configured signing key and shared
/// read-only for the lifetime of the process.
pub struct Authenticator {
    password_hasher: PasswordHasher,
    jwt_handler: JwtHandler,
    token_ttl: Duration,
}

/// Result of successful authentication.
#[derive(Debug, Clone)]
pub struct AuthenticationResult {
    /// Signed session token
    pub access_token: String,

    /// Expiry of `access_token` (Unix timestamp)
    pub expires_at: i64,
}

/// Authentication operation errors.
#[derive(Debug, thiserror::Error)]
pub enum AuthenticationError {
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token lifetime must be positive, got {0} hours")]
    InvalidTokenLifetime(i64),

    #[error("Password error: {0}")]
    PasswordError(#[from] PasswordError),

    #[error("JWT error: {0}")]
    JwtError(#[from] JwtError),
}

impl Authenticator {
    /// Create a new authenticator.
    ///
    /// # Arguments
    /// * `jwt_secret` - Secret key for token signing
    /// * `token_ttl_hours` - Lifetime of issued tokens
    ///
    /// # Returns
    /// Configured Authenticator instance
    ///
    /// # Errors
    /// * `JwtError` - Signing key is unusable
    /// * `InvalidTokenLifetime` - Lifetime is zero or negative
    pub fn new(jwt_secret: &[u8], token_ttl_hours: i64) -> Result<Self, AuthenticationError> {
        if token_ttl_hours <= 0 {
            return Err(AuthenticationError::InvalidTokenLifetime(token_ttl_hours));
        }

        Ok(Self {
            password_hasher: PasswordHasher::new(),
            jwt_handler: JwtHandler::new(jwt_secret)?,
            token_ttl: Duration::hours(token_ttl_hours),
        })
    }

    /// Lifetime of issued tokens.
    pub fn token_ttl(&self) -> Duration {
        self.token_ttl
    }

    /// Hash a password for storage.
    ///
    /// # Errors
    /// * `PasswordError` - Hashing operation failed
    pub fn hash_password(&self, password: &str) -> Result<String, PasswordError> {
        self.password_hasher.hash(password)
    }

    /// Check a password against a stored hash.
    pub fn verify_password(&self, password: &str, stored_hash: &str) -> bool {
        self.password_hasher.verify(password, stored_hash)
    }

    /// Verify credentials and issue a session token.
    ///
    /// # Arguments
    /// * `password` - Plaintext password to verify
    /// * `stored_hash` - Stored password hash
    /// * `subject` - Identifier to embed as `sub`
    /// * `role` - Role name to embed
    ///
    /// # Returns
    /// AuthenticationResult with access token
    ///
    /// # Errors
    /// * `InvalidCredentials` - Password does not match
    /// * `JwtError` - Token generation failed
    pub fn authenticate(
        &self,
        password: &str,
        stored_hash: &str,
        subject: &str,
        role: &str,
    ) -> Result<AuthenticationResult, AuthenticationError> {
        if !self.password_hasher.verify(password, stored_hash) {
            return Err(AuthenticationError::InvalidCredentials);
        }

        Ok(self.issue_token(subject, role)?)
    }

    /// Reject a login attempt for which no account exists.
    ///
    /// Spends one decoy verification so unknown accounts are not
    /// distinguishable from wrong passwords by response time.
    pub fn reject_unknown(&self, password: &str) -> AuthenticationError {
        self.password_hasher.verify_decoy(password);
        AuthenticationError::InvalidCredentials
    }

    /// Issue a session token without password verification.
    ///
    /// Used right after registration, where the caller has just chosen
    /// the password.
    ///
    /// # Errors
    /// * `JwtError` - Token generation failed
    pub fn issue_token(&self, subject: &str, role: &str) -> Result<AuthenticationResult, JwtError> {
        let claims = Claims::for_subject(subject, role, self.token_ttl);
        let access_token = self.jwt_handler.encode(&claims)?;

        Ok(AuthenticationResult {
            access_token,
            expires_at: claims.exp,
        })
    }

    /// Validate and decode a session token.
    ///
    /// # Errors
    /// * `TokenExpired` - Token lifetime has elapsed
    /// * `MalformedToken` - Signature, structure, or claims are invalid
    pub fn validate_token(&self, token: &str) -> Result<Claims, JwtError> {
        self.jwt_handler.decode(token)
    }
}
