use shared::{
    config::DatabaseConfig,
    error::{AppError, AppResult},
};
use sqlx::{
    migrate::{MigrateError, Migrator},
    postgres::{PgConnectOptions, PgPoolOptions},
    PgPool,
};

pub mod model;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

fn make_pg_connect_options(cfg: &DatabaseConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&cfg.host)
        .port(cfg.port)
        .username(&cfg.username)
        .password(&cfg.password)
        .database(&cfg.database)
}

/// Process-wide handle to the connection pool. Connections are checked out
/// per unit of work and returned to the pool when the guard is dropped,
/// whichever way the work ends.
#[derive(Clone)]
pub struct ConnectionPool(PgPool);

impl ConnectionPool {
    pub fn new(pool: PgPool) -> Self {
        Self(pool)
    }

    pub fn inner_ref(&self) -> &PgPool {
        &self.0
    }

    pub async fn begin(&self) -> AppResult<sqlx::Transaction<'_, sqlx::Postgres>> {
        self.0.begin().await.map_err(AppError::TransactionError)
    }

    /// Applies pending schema migrations. Safe to call on every start.
    pub async fn migrate(&self) -> Result<(), MigrateError> {
        MIGRATOR.run(&self.0).await
    }

    pub async fn close(&self) {
        self.0.close().await;
    }
}

pub fn connect_database_with(cfg: &DatabaseConfig) -> ConnectionPool {
    let pool = PgPoolOptions::new()
        .max_connections(cfg.max_connections)
        .acquire_timeout(cfg.acquire_timeout)
        .connect_lazy_with(make_pg_connect_options(cfg));
    ConnectionPool(pool)
}
