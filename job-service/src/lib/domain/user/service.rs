use std::sync::Arc;

use async_trait::async_trait;
use auth::AuthenticationError;
use auth::Authenticator;
use chrono::Utc;

use crate::domain::user::models::AuthSession;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::user::errors::UserError;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Domain service implementation for account operations.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR>
where
    UR: UserRepository,
{
    repository: Arc<UR>,
    authenticator: Arc<Authenticator>,
}

impl<UR> UserService<UR>
where
    UR: UserRepository,
{
    /// Create a new user service with injected dependencies.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `authenticator` - Password hashing and token issuance
    ///
    /// # Returns
    /// Configured user service instance
    pub fn new(repository: Arc<UR>, authenticator: Arc<Authenticator>) -> Self {
        Self {
            repository,
            authenticator,
        }
    }

    fn open_session(&self, user: User) -> Result<AuthSession, UserError> {
        let issued = self
            .authenticator
            .issue_token(&user.id.to_string(), user.role.as_str())
            .map_err(|e| UserError::Credential(format!("Token issuance failed: {}", e)))?;

        Ok(AuthSession {
            token: issued.access_token,
            expires_at: issued.expires_at,
            user,
        })
    }
}

#[async_trait]
impl<UR> UserServicePort for UserService<UR>
where
    UR: UserRepository,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<AuthSession, UserError> {
        // Fast path only; the store's unique constraints have the final word.
        if self.repository.exists_by_username(&command.username).await? {
            return Err(UserError::DuplicateUsername(command.username.to_string()));
        }
        if self.repository.exists_by_email(&command.email).await? {
            return Err(UserError::DuplicateEmail(command.email.as_str().to_string()));
        }

        let password_hash = self
            .authenticator
            .hash_password(command.password.expose())
            .map_err(|e| UserError::Credential(format!("Password hashing failed: {}", e)))?;

        let user = User {
            id: UserId::new(),
            username: command.username,
            email: command.email,
            password_hash,
            first_name: command.first_name,
            last_name: command.last_name,
            role: command.role,
            active: true,
            created_at: Utc::now(),
        };

        let created_user = self.repository.create(user).await?;
        tracing::info!(
            user_id = %created_user.id,
            role = %created_user.role,
            "User registered"
        );

        self.open_session(created_user)
    }

    async fn login(&self, command: LoginCommand) -> Result<AuthSession, UserError> {
        let user = match self.repository.find_by_username(&command.username).await? {
            Some(user) if user.active => user,
            Some(user) => {
                tracing::warn!(user_id = %user.id, "Login rejected: account inactive");
                return Err(UserError::from(
                    self.authenticator.reject_unknown(&command.password),
                ));
            }
            None => {
                tracing::warn!("Login rejected: unknown username");
                return Err(UserError::from(
                    self.authenticator.reject_unknown(&command.password),
                ));
            }
        };

        let issued = self
            .authenticator
            .authenticate(
                &command.password,
                &user.password_hash,
                &user.id.to_string(),
                user.role.as_str(),
            )
            .map_err(|e| {
                if matches!(e, AuthenticationError::InvalidCredentials) {
                    tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
                }
                UserError::from(e)
            })?;

        Ok(AuthSession {
            token: issued.access_token,
            expires_at: issued.expires_at,
            user,
        })
    }

    async fn get_user(&self, id: &UserId) -> Result<User, UserError> {
        self.repository
            .find_by_id(id)
            .await?
            .ok_or(UserError::NotFound(id.to_string()))
    }
}

impl From<AuthenticationError> for UserError {
    fn from(err: AuthenticationError) -> Self {
        match err {
            AuthenticationError::InvalidCredentials => UserError::InvalidCredentials,
            other => UserError::Credential(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use mockall::mock;

    use super::*;
    use crate::domain::user::models::EmailAddress;
    use crate::domain::user::models::Password;
    use crate::domain::user::models::PersonName;
    use crate::domain::user::models::Role;
    use crate::domain::user::models::Username;

    const SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";

    // Define mocks in the test module using mockall
    mock! {
        pub TestUserRepository {}

        #[async_trait]
        impl UserRepository for TestUserRepository {
            async fn create(&self, user: User) -> Result<User, UserError>;
            async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError>;
            async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError>;
            async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError>;
            async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError>;
            async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError>;
        }
    }

    fn authenticator() -> Arc<Authenticator> {
        Arc::new(Authenticator::new(SECRET, 24).unwrap())
    }

    fn register_command(username: &str, email: &str, role: Role) -> RegisterUserCommand {
        RegisterUserCommand {
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(email.to_string()).unwrap(),
            password: Password::new("password123".to_string()).unwrap(),
            first_name: PersonName::new("Asha".to_string(), "firstName").unwrap(),
            last_name: PersonName::new("Verma".to_string(), "lastName").unwrap(),
            role,
        }
    }

    fn stored_user(authenticator: &Authenticator, password: &str, role: Role, active: bool) -> User {
        User {
            id: UserId::new(),
            username: Username::new("testuser".to_string()).unwrap(),
            email: EmailAddress::new("test@example.com".to_string()).unwrap(),
            password_hash: authenticator.hash_password(password).unwrap(),
            first_name: PersonName::new("Asha".to_string(), "firstName").unwrap(),
            last_name: PersonName::new("Verma".to_string(), "lastName").unwrap(),
            role,
            active,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_register_success() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_create()
            .withf(|user| {
                user.username.as_str() == "testuser"
                    && user.role == Role::Employer
                    && user.active
                    && user.password_hash.starts_with("$argon2")
            })
            .times(1)
            .returning(Ok);

        let authenticator = authenticator();
        let service = UserService::new(Arc::new(repository), Arc::clone(&authenticator));

        let session = service
            .register(register_command("testuser", "test@example.com", Role::Employer))
            .await
            .unwrap();

        // The issued token carries the registered identity and role
        let claims = authenticator.validate_token(&session.token).unwrap();
        assert_eq!(claims.sub, session.user.id.to_string());
        assert_eq!(claims.role, "EMPLOYER");
        assert!(authenticator.verify_password("password123", &session.user.password_hash));
    }

    #[tokio::test]
    async fn test_register_duplicate_username_precheck() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(true));
        repository.expect_exists_by_email().times(0);
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .register(register_command("testuser", "test@example.com", Role::Worker))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateUsername(_))));
    }

    #[tokio::test]
    async fn test_register_duplicate_email_precheck() {
        let mut repository = MockTestUserRepository::new();

        repository
            .expect_exists_by_username()
            .times(1)
            .returning(|_| Ok(false));
        repository
            .expect_exists_by_email()
            .times(1)
            .returning(|_| Ok(true));
        repository.expect_create().times(0);

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .register(register_command("testuser", "test@example.com", Role::Worker))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateEmail(_))));
    }

    #[tokio::test]
    async fn test_register_lost_race_reports_constraint_violation() {
        let mut repository = MockTestUserRepository::new();

        // Pre-check passes, but a concurrent registration wins the insert
        repository
            .expect_exists_by_username()
            .returning(|_| Ok(false));
        repository.expect_exists_by_email().returning(|_| Ok(false));
        repository.expect_create().times(1).returning(|user| {
            Err(UserError::DuplicateUsername(
                user.username.as_str().to_string(),
            ))
        });

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .register(register_command("testuser", "test@example.com", Role::Worker))
            .await;
        assert!(matches!(result, Err(UserError::DuplicateUsername(_))));
    }

    #[tokio::test]
    async fn test_login_success() {
        let authenticator = authenticator();
        let user = stored_user(&authenticator, "password123", Role::Worker, true);
        let user_id = user.id;

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .withf(|username| username == "testuser")
            .times(1)
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository), Arc::clone(&authenticator));

        let session = service
            .login(LoginCommand {
                username: "testuser".to_string(),
                password: "password123".to_string(),
            })
            .await
            .unwrap();

        let claims = authenticator.validate_token(&session.token).unwrap();
        assert_eq!(claims.sub, user_id.to_string());
        assert_eq!(claims.role, "WORKER");
    }

    #[tokio::test]
    async fn test_login_wrong_password() {
        let authenticator = authenticator();
        let user = stored_user(&authenticator, "password123", Role::Worker, true);

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository), authenticator);

        let result = service
            .login(LoginCommand {
                username: "testuser".to_string(),
                password: "wrong-password".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_unknown_user_is_indistinguishable() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .login(LoginCommand {
                username: "nobody".to_string(),
                password: "password123".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_login_inactive_account() {
        let authenticator = authenticator();
        let user = stored_user(&authenticator, "password123", Role::Employer, false);

        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .returning(move |_| Ok(Some(user.clone())));

        let service = UserService::new(Arc::new(repository), authenticator);

        let result = service
            .login(LoginCommand {
                username: "testuser".to_string(),
                password: "password123".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::InvalidCredentials)));
    }

    #[tokio::test]
    async fn test_get_user_not_found() {
        let mut repository = MockTestUserRepository::new();
        repository.expect_find_by_id().times(1).returning(|_| Ok(None));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service.get_user(&UserId::new()).await;
        assert!(matches!(result, Err(UserError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_store_failure_propagates() {
        let mut repository = MockTestUserRepository::new();
        repository
            .expect_find_by_username()
            .returning(|_| Err(UserError::StoreUnavailable("connection refused".to_string())));

        let service = UserService::new(Arc::new(repository), authenticator());

        let result = service
            .login(LoginCommand {
                username: "testuser".to_string(),
                password: "password123".to_string(),
            })
            .await;
        assert!(matches!(result, Err(UserError::StoreUnavailable(_))));
    }
}
