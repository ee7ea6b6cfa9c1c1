use async_trait::async_trait;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::models::EmailAddress;
use crate::user::models::Username;

/// Port for account and session operations.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new account and open a session for it.
    ///
    /// # Arguments
    /// * `command` - Validated registration data
    ///
    /// # Returns
    /// Session token plus the stored user
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `DuplicateEmail` - Email is already registered
    /// * `StoreUnavailable` - Store operation failed
    async fn register(&self, command: RegisterUserCommand) -> Result<AuthSession, UserError>;

    /// Verify credentials and open a session.
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown user, wrong password, or inactive account
    /// * `StoreUnavailable` - Store operation failed
    async fn login(&self, command: LoginCommand) -> Result<AuthSession, UserError>;

    /// Retrieve user by unique identifier.
    ///
    /// # Errors
    /// * `NotFound` - User does not exist
    /// * `StoreUnavailable` - Store operation failed
    async fn get_user(&self, id: &UserId) -> Result<User, UserError>;
}

/// Credential store: persistence operations for user accounts.
///
/// Implementations must enforce username and email uniqueness themselves;
/// the `exists_*` checks are advisory.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist new user to storage.
    ///
    /// # Arguments
    /// * `user` - User entity to create
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `DuplicateUsername` - Username is already taken
    /// * `DuplicateEmail` - Email is already registered
    /// * `StoreUnavailable` - Store operation failed
    async fn create(&self, user: User) -> Result<User, UserError>;

    /// Retrieve user by identifier.
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;

    /// Retrieve user by username.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;

    /// Retrieve user by email address.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;

    /// Check whether a username is taken.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError>;

    /// Check whether an email is registered.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store operation failed
    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError>;
}
