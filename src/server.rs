//! HTTP server initialization and runtime setup.
//!
//! Handles storage and cache setup, background counter initialization,
//! and the Axum server lifecycle.

use crate::config::{Config, StorageBackend};
use crate::domain::entities::SHORT_URL_COUNTER;
use crate::domain::repositories::{CounterRepository, MappingRepository};
use crate::infrastructure::cache::{CacheService, NullCache, RedisCache};
use crate::infrastructure::memory::{InMemoryCounterRepository, InMemoryMappingRepository};
use crate::infrastructure::persistence::{PgCounterRepository, PgMappingRepository};
use crate::routes::app_router;
use crate::state::{AppState, SharedAllocator};
use crate::utils::url_validator::UrlValidator;

use anyhow::{Context, Result};
use axum::ServiceExt;
use axum::extract::Request;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::future::IntoFuture;
use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio_retry::Retry;
use tokio_retry::strategy::{ExponentialBackoff, jitter};

/// Counter and mapping stores for the configured backend.
struct Stores {
    counters: Arc<dyn CounterRepository>,
    mappings: Arc<dyn MappingRepository>,
    /// Present for the Postgres backend; migrations run against it.
    pool: Option<PgPool>,
}

/// Runs the HTTP server with the given configuration.
///
/// Initializes:
/// - Storage backend (lazy PostgreSQL pool or in-memory stores)
/// - Redis cache (or NullCache fallback)
/// - Background migrations and counter initialization
/// - Axum HTTP server with graceful shutdown
///
/// The listener is bound before the counter is ready. Creation requests
/// answer 503 until the background initialization succeeds.
///
/// # Errors
///
/// Returns an error if:
/// - The database URL is malformed
/// - Server bind fails
/// - Counter initialization exhausts a non-zero `COUNTER_INIT_MAX_RETRIES`
/// - Server runtime error occurs
pub async fn run(config: Config) -> Result<()> {
    let stores = build_stores(&config)?;
    let cache = build_cache(&config).await;

    let state = AppState::new(
        stores.counters,
        stores.mappings,
        cache,
        UrlValidator::new(config.verify_dns),
    );

    let (init_failed_tx, init_failed_rx) = oneshot::channel::<anyhow::Error>();
    let allocator = state.allocator.clone();
    let max_retries = config.counter_init_max_retries;
    tokio::spawn(async move {
        if let Err(e) = initialize_counter(allocator, stores.pool, max_retries).await {
            let _ = init_failed_tx.send(e);
        }
    });

    let app = app_router(state, &config);

    let addr: SocketAddr = config.listen_addr.parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Listening on http://{addr}");

    let server = axum::serve(
        listener,
        ServiceExt::<Request>::into_make_service_with_connect_info::<SocketAddr>(app),
    )
    .with_graceful_shutdown(shutdown_signal())
    .into_future();

    // A dropped sender means initialization succeeded; that branch is then disabled.
    tokio::select! {
        served = server => served?,
        Ok(e) = init_failed_rx => {
            tracing::error!(
                error = %format!("{e:#}"),
                retries = max_retries,
                "Giving up on counter initialization, stopping server"
            );
            return Err(e.context("Allocation counter could not be initialized"));
        }
    }

    tracing::info!("Server stopped");

    Ok(())
}

fn build_stores(config: &Config) -> Result<Stores> {
    match config.storage_backend {
        StorageBackend::Postgres => {
            let database_url = config
                .database_url
                .as_deref()
                .context("DATABASE_URL is required for the postgres storage backend")?;

            // Lazy so the server listens while the database is still coming up.
            let pool = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .acquire_timeout(Duration::from_secs(config.db_connect_timeout))
                .idle_timeout(Duration::from_secs(config.db_idle_timeout))
                .max_lifetime(Duration::from_secs(config.db_max_lifetime))
                .connect_lazy(database_url)
                .context("Invalid database connection string")?;

            let pool_arc = Arc::new(pool.clone());
            tracing::info!("Storage: PostgreSQL");

            Ok(Stores {
                counters: Arc::new(PgCounterRepository::new(pool_arc.clone())),
                mappings: Arc::new(PgMappingRepository::new(pool_arc)),
                pool: Some(pool),
            })
        }
        StorageBackend::Memory => {
            tracing::warn!("Storage: in-memory, mappings are lost on restart");

            Ok(Stores {
                counters: Arc::new(InMemoryCounterRepository::new()),
                mappings: Arc::new(InMemoryMappingRepository::new()),
                pool: None,
            })
        }
    }
}

async fn build_cache(config: &Config) -> Arc<dyn CacheService> {
    if let Some(redis_url) = &config.redis_url {
        match RedisCache::connect(redis_url, config.cache_ttl_seconds).await {
            Ok(redis) => {
                tracing::info!("Cache enabled (Redis)");
                Arc::new(redis)
            }
            Err(e) => {
                tracing::warn!("Failed to connect to Redis: {}. Using NullCache.", e);
                Arc::new(NullCache::new())
            }
        }
    } else {
        tracing::info!("Cache disabled (NullCache)");
        Arc::new(NullCache::new())
    }
}

/// Applies migrations and establishes the allocator baseline, retrying with
/// exponential backoff capped at ten seconds.
///
/// `max_retries == 0` retries until the store comes back. Creation requests
/// answer 503 in the meantime; resolution is unaffected.
///
/// # Errors
///
/// Returns the last failure once `max_retries` retries are exhausted.
async fn initialize_counter(
    allocator: Arc<SharedAllocator>,
    pool: Option<PgPool>,
    max_retries: usize,
) -> Result<i64> {
    let retries = if max_retries == 0 {
        usize::MAX
    } else {
        max_retries
    };
    let strategy = ExponentialBackoff::from_millis(10)
        .max_delay(Duration::from_secs(10))
        .map(jitter)
        .take(retries);

    let baseline = Retry::spawn(strategy, || {
        let allocator = allocator.clone();
        let pool = pool.clone();
        async move {
            let attempt = bootstrap_once(&allocator, pool.as_ref()).await;
            if let Err(e) = &attempt {
                tracing::warn!(error = %format!("{e:#}"), "Counter initialization attempt failed");
            }
            attempt
        }
    })
    .await?;

    tracing::info!(
        counter = SHORT_URL_COUNTER,
        baseline,
        "Accepting creation requests"
    );

    Ok(baseline)
}

async fn bootstrap_once(allocator: &SharedAllocator, pool: Option<&PgPool>) -> Result<i64> {
    if let Some(pool) = pool {
        sqlx::migrate!("./migrations")
            .run(pool)
            .await
            .context("Failed to run migrations")?;
    }

    allocator
        .initialize()
        .await
        .context("Failed to initialize allocation counter")
}

/// Resolves when Ctrl-C or SIGTERM is received.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl-C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
