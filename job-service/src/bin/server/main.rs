use std::sync::Arc;

use auth::Authenticator;
use axum::Router;
use job_service::config::Config;
use job_service::config::StorageBackend;
use job_service::domain::job::query::PageLimits;
use job_service::domain::job::service::JobService;
use job_service::domain::user::service::UserService;
use job_service::inbound::http::router::create_router;
use job_service::outbound::repositories::InMemoryJobRepository;
use job_service::outbound::repositories::InMemoryUserRepository;
use job_service::outbound::repositories::PostgresJobRepository;
use job_service::outbound::repositories::PostgresUserRepository;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "job_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "job-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        backend = ?config.database.backend,
        http_port = config.server.http_port,
        token_ttl_hours = config.jwt.expiration_hours,
        role_source = ?config.auth.role_source,
        max_page_size = config.pagination.max_page_size,
        "Configuration loaded"
    );

    let authenticator = Arc::new(Authenticator::new(
        config.jwt.secret.as_bytes(),
        config.jwt.expiration_hours,
    )?);
    let limits = PageLimits::from(config.pagination);

    let http_application = match config.database.backend {
        StorageBackend::Postgres => {
            let pg_pool = PgPoolOptions::new()
                .max_connections(config.database.max_connections)
                .connect(&config.database.url)
                .await?;
            tracing::info!(
                max_connections = config.database.max_connections,
                database = "postgresql",
                "Database connection pool created"
            );

            sqlx::migrate!("./migrations").run(&pg_pool).await?;
            tracing::info!(database = "postgresql", "Database migrations completed");

            let user_repository = Arc::new(PostgresUserRepository::new(pg_pool.clone()));
            let job_repository = Arc::new(PostgresJobRepository::new(pg_pool));
            build_application(&config, authenticator, user_repository, job_repository, limits)
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on shutdown");
            let user_repository = Arc::new(InMemoryUserRepository::new());
            let job_repository = Arc::new(InMemoryJobRepository::new());
            build_application(&config, authenticator, user_repository, job_repository, limits)
        }
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;
    tracing::info!(
        address = %http_address,
        port = config.server.http_port,
        protocol = "http",
        "Http server listening"
    );

    axum::serve(http_listener, http_application).await?;
    tracing::info!("Server exited");

    Ok(())
}

fn build_application<UR, JR>(
    config: &Config,
    authenticator: Arc<Authenticator>,
    user_repository: Arc<UR>,
    job_repository: Arc<JR>,
    limits: PageLimits,
) -> Router
where
    UR: job_service::user::ports::UserRepository,
    JR: job_service::job::ports::JobRepository,
{
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repository),
        Arc::clone(&authenticator),
    ));
    let job_service = Arc::new(JobService::new(job_repository, user_repository, limits));

    create_router(
        user_service,
        job_service,
        authenticator,
        config.auth.role_source,
    )
}
