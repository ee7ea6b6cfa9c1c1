use std::sync::Arc;

use auth::Authenticator;
use auth::Claims;
use auth::JwtHandler;
use chrono::Duration;
use chrono::Utc;
use job_service::config::RoleSource;
use job_service::domain::job::query::PageLimits;
use job_service::domain::job::service::JobService;
use job_service::domain::user::models::EmailAddress;
use job_service::domain::user::models::PersonName;
use job_service::domain::user::models::Role;
use job_service::domain::user::models::User;
use job_service::domain::user::models::UserId;
use job_service::domain::user::models::Username;
use job_service::domain::user::ports::UserRepository;
use job_service::domain::user::service::UserService;
use job_service::inbound::http::router::create_router;
use job_service::outbound::repositories::InMemoryJobRepository;
use job_service::outbound::repositories::InMemoryUserRepository;
use serde_json::json;
use serde_json::Value;

pub const JWT_SECRET: &[u8] = b"test-secret-key-for-jwt-signing-at-least-32-bytes";
pub const PASSWORD: &str = "pass_word!";

/// Test application that spawns a real server over in-memory stores
pub struct TestApp {
    pub address: String,
    pub port: u16,
    pub users: Arc<InMemoryUserRepository>,
    pub authenticator: Arc<Authenticator>,
    pub api_client: reqwest::Client,
    pub jwt_handler: JwtHandler,
}

impl TestApp {
    /// Spawn the application in a background task and return TestApp
    pub async fn spawn() -> Self {
        Self::spawn_with(RoleSource::Token, PageLimits::default()).await
    }

    pub async fn spawn_with(role_source: RoleSource, limits: PageLimits) -> Self {
        // Use random port (0 = OS assigns)
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Failed to bind random port");
        let port = listener.local_addr().unwrap().port();
        let address = format!("http://127.0.0.1:{}", port);

        let authenticator =
            Arc::new(Authenticator::new(JWT_SECRET, 24).expect("Failed to build authenticator"));
        let users = Arc::new(InMemoryUserRepository::new());
        let jobs = Arc::new(InMemoryJobRepository::new());

        let user_service = Arc::new(UserService::new(
            Arc::clone(&users),
            Arc::clone(&authenticator),
        ));
        let job_service = Arc::new(JobService::new(jobs, Arc::clone(&users), limits));

        let router = create_router(
            user_service,
            job_service,
            Arc::clone(&authenticator),
            role_source,
        );

        // Spawn server in background
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("Server error");
        });

        let jwt_handler = JwtHandler::new(JWT_SECRET).expect("Failed to build JWT handler");

        Self {
            address,
            port,
            users,
            authenticator,
            api_client: reqwest::Client::new(),
            jwt_handler,
        }
    }

    /// Helper to make GET request
    pub fn get(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.get(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request
    pub fn post(&self, path: &str) -> reqwest::RequestBuilder {
        self.api_client.post(format!("{}{}", self.address, path))
    }

    /// Helper to make POST request with Bearer token
    pub fn post_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.post(path).bearer_auth(token)
    }

    /// Helper to make PUT request with Bearer token
    pub fn put_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .put(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Helper to make DELETE request with Bearer token
    pub fn delete_authenticated(&self, path: &str, token: &str) -> reqwest::RequestBuilder {
        self.api_client
            .delete(format!("{}{}", self.address, path))
            .bearer_auth(token)
    }

    /// Register an account through the API and return `(token, user_id)`.
    pub async fn register(&self, username: &str, role: &str) -> (String, String) {
        let response = self
            .post("/api/v1/auth/register")
            .json(&json!({
                "username": username,
                "email": format!("{}@example.com", username),
                "password": PASSWORD,
                "firstName": "Test",
                "lastName": "User",
                "role": role
            }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        (
            body["data"]["token"].as_str().unwrap().to_string(),
            body["data"]["user"]["id"].as_str().unwrap().to_string(),
        )
    }

    /// Insert an account directly into the store, bypassing registration
    /// rules (used for administrators and deactivated accounts).
    pub async fn seed_user(&self, username: &str, role: Role, active: bool) -> User {
        let user = User {
            id: UserId::new(),
            username: Username::new(username.to_string()).unwrap(),
            email: EmailAddress::new(format!("{}@example.com", username)).unwrap(),
            password_hash: self.authenticator.hash_password(PASSWORD).unwrap(),
            first_name: PersonName::new("Seeded".to_string(), "firstName").unwrap(),
            last_name: PersonName::new("User".to_string(), "lastName").unwrap(),
            role,
            active,
            created_at: Utc::now(),
        };
        self.users.create(user).await.expect("Failed to seed user")
    }

    /// Log in through the API and return the token.
    pub async fn login(&self, username: &str) -> String {
        let response = self
            .post("/api/v1/auth/login")
            .json(&json!({ "username": username, "password": PASSWORD }))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["token"].as_str().unwrap().to_string()
    }

    /// Create a posting as `token` and return its id.
    pub async fn create_job(&self, token: &str, title: &str, location: &str, job_type: &str) -> String {
        let response = self
            .post_authenticated("/api/v1/jobs", token)
            .json(&job_payload(title, location, job_type))
            .send()
            .await
            .expect("Failed to execute request");
        assert_eq!(response.status(), reqwest::StatusCode::CREATED);

        let body: Value = response.json().await.expect("Failed to parse response");
        body["data"]["id"].as_str().unwrap().to_string()
    }

    /// Mint a correctly signed token that expired an hour ago.
    pub fn expired_token(&self, user_id: &str, role: &str) -> String {
        let claims = Claims::issued_at(
            user_id,
            role,
            Utc::now() - Duration::hours(2),
            Duration::hours(1),
        );
        self.jwt_handler.encode(&claims).unwrap()
    }
}

pub fn job_payload(title: &str, location: &str, job_type: &str) -> Value {
    json!({
        "title": title,
        "description": format!("{} needed urgently", title),
        "location": location,
        "minSalary": 15000.0,
        "maxSalary": 25000.0,
        "currency": "INR",
        "jobType": job_type,
        "employmentType": "ON_SITE",
        "skills": ["punctual"],
        "contactEmail": "hr@example.com"
    })
}
