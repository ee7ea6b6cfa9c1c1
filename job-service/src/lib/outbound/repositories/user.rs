use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::PersonName;
use crate::domain::user::models::User;
use crate::domain::user::models::UserId;
use crate::domain::user::models::Username;
use crate::domain::user::ports::UserRepository;
use crate::user::errors::UserError;

const USER_COLUMNS: &str =
    "id, username, email, password_hash, first_name, last_name, role, active, created_at";

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    first_name: String,
    last_name: String,
    role: String,
    active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = UserError;

    fn try_from(r: UserRow) -> Result<Self, Self::Error> {
        Ok(User {
            id: UserId(r.id),
            username: Username::new(r.username)?,
            email: EmailAddress::new(r.email)?,
            password_hash: r.password_hash,
            first_name: PersonName::new(r.first_name, "firstName")?,
            last_name: PersonName::new(r.last_name, "lastName")?,
            role: r.role.parse()?,
            active: r.active,
            created_at: r.created_at,
        })
    }
}

pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn find_one(&self, column: &str, value: &str) -> Result<Option<User>, UserError> {
        let sql = format!("SELECT {} FROM users WHERE {} = $1", USER_COLUMNS, column);

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::StoreUnavailable(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn exists(&self, column: &str, value: &str) -> Result<bool, UserError> {
        let sql = format!("SELECT EXISTS(SELECT 1 FROM users WHERE {} = $1)", column);

        sqlx::query_scalar::<_, bool>(&sql)
            .bind(value)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| UserError::StoreUnavailable(e.to_string()))
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create(&self, user: User) -> Result<User, UserError> {
        sqlx::query(
            r#"
            INSERT INTO users
                (id, username, email, password_hash, first_name, last_name, role, active, created_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(user.id.0)
        .bind(user.username.as_str())
        .bind(user.email.as_str())
        .bind(&user.password_hash)
        .bind(user.first_name.as_str())
        .bind(user.last_name.as_str())
        .bind(user.role.as_str())
        .bind(user.active)
        .bind(user.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    if db_err.constraint() == Some("users_username_key") {
                        return UserError::DuplicateUsername(user.username.as_str().to_string());
                    }
                    if db_err.constraint() == Some("users_email_key") {
                        return UserError::DuplicateEmail(user.email.as_str().to_string());
                    }
                }
            }
            UserError::StoreUnavailable(e.to_string())
        })?;

        Ok(user)
    }

    async fn find_by_id(&self, id: &UserId) -> Result<Option<User>, UserError> {
        let sql = format!("SELECT {} FROM users WHERE id = $1", USER_COLUMNS);

        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(id.0)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| UserError::StoreUnavailable(e.to_string()))?;

        row.map(User::try_from).transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, UserError> {
        self.find_one("username", username).await
    }

    async fn find_by_email(&self, email: &EmailAddress) -> Result<Option<User>, UserError> {
        self.find_one("email", email.as_str()).await
    }

    async fn exists_by_username(&self, username: &Username) -> Result<bool, UserError> {
        self.exists("username", username.as_str()).await
    }

    async fn exists_by_email(&self, email: &EmailAddress) -> Result<bool, UserError> {
        self.exists("email", email.as_str()).await
    }
}
