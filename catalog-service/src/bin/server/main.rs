use std::sync::Arc;

use catalog_service::config::Config;
use catalog_service::domain::access::Authenticator;
use catalog_service::domain::access::Authorizer;
use catalog_service::domain::movie::service::MovieService;
use catalog_service::domain::token::service::TokenService;
use catalog_service::domain::user::service::UserService;
use catalog_service::inbound::http::create_router;
use catalog_service::inbound::http::AppState;
use catalog_service::inbound::http::HttpMetrics;
use catalog_service::inbound::http::RateLimiter;
use catalog_service::lifecycle::serve;
use catalog_service::lifecycle::shutdown_signal;
use catalog_service::lifecycle::ShutdownCoordinator;
use catalog_service::outbound::repositories::PostgresMovieRepository;
use catalog_service::outbound::repositories::PostgresPermissionRepository;
use catalog_service::outbound::repositories::PostgresTokenRepository;
use catalog_service::outbound::repositories::PostgresUserRepository;
use catalog_service::outbound::LogMailer;
use sqlx::postgres::PgPoolOptions;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

#[tokio::main]
async fn main() -> Result<(), anyhow::Error> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "catalog_service=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        service = "catalog-service",
        version = env!("CARGO_PKG_VERSION"),
        "Service starting"
    );

    let config = Config::load()?;

    tracing::info!(
        environment = %config.environment,
        http_port = config.server.http_port,
        limiter_enabled = config.limiter.enabled,
        limiter_rps = config.limiter.rps,
        limiter_burst = config.limiter.burst,
        drain_timeout_secs = config.shutdown.drain_timeout_secs,
        "Configuration loaded"
    );

    let pg_pool = PgPoolOptions::new()
        .max_connections(config.database.max_connections)
        .idle_timeout(config.database.max_idle_time())
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
    let token_repository = Arc::new(PostgresTokenRepository::new(pg_pool.clone()));
    let permission_repository = Arc::new(PostgresPermissionRepository::new(pg_pool.clone()));
    let movie_repository = Arc::new(PostgresMovieRepository::new(pg_pool));

    let token_service = Arc::new(TokenService::new(token_repository));
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repository),
        Arc::clone(&permission_repository),
        token_service,
    ));
    let movie_service = Arc::new(MovieService::new(movie_repository));

    let coordinator = Arc::new(ShutdownCoordinator::new(config.shutdown.drain_timeout()));
    let rate_limiter = Arc::new(RateLimiter::new(
        config.limiter.rps,
        config.limiter.burst,
        config.limiter.enabled,
    ));
    if rate_limiter.enabled() {
        RateLimiter::spawn_purger(Arc::clone(&rate_limiter), &coordinator);
    }

    let state = AppState {
        user_service,
        movie_service,
        authenticator: Arc::new(Authenticator::new(user_repository)),
        authorizer: Arc::new(Authorizer::new(permission_repository)),
        rate_limiter,
        metrics: Arc::new(HttpMetrics::new()?),
        mailer: Arc::new(LogMailer::new(config.mailer.sender.clone())),
        coordinator: Arc::clone(&coordinator),
        environment: config.environment.clone(),
    };

    let http_address = format!("0.0.0.0:{}", config.server.http_port);
    let http_listener = tokio::net::TcpListener::bind(&http_address).await?;

    match serve(
        http_listener,
        create_router(state),
        coordinator,
        shutdown_signal(),
    )
    .await
    {
        Ok(()) => {
            tracing::info!("Server exited successfully");
            Ok(())
        }
        Err(e) => {
            tracing::error!(error = %e, "Server error");
            Err(e.into())
        }
    }
}
